/*
    tlcp-net-tokio
        TCP session establishment for TLCP contexts.
 */

mod dial;
mod error;

pub use dial::dial_tcp;
pub use error::DialError;
