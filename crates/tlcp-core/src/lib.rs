/*
    tlcp-core
        connection-context assembly and session establishment for
        TLCP dual-certificate (sign + encrypt) clients.
 */

pub mod error;

pub mod config;
pub mod context;
pub mod engine;
pub mod exchange;
pub mod material;

pub use error::TlcpError;

#[cfg(test)]
mod test_engine;

#[cfg(test)]
mod material_tests;
#[cfg(test)]
mod context_tests;
