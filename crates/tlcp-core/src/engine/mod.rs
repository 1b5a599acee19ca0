pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;

use crate::material::MaterialError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unsupported protocol version: {0:#06x}")]
    UnsupportedVersion(u16),

    #[error("context rejected configuration: {0}")]
    Context(String),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("material error: {0}")]
    Material(#[from] MaterialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
