use thiserror::Error;

use tlcp_core::engine::EngineError;

// One coarse failure category for dialing: connect-level and
// handshake-level errors alike. The variants exist for diagnostics;
// callers treat the type uniformly.
#[derive(Debug, Error)]
pub enum DialError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
