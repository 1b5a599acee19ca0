use thiserror::Error;

use crate::{engine::EngineError, exchange::ExchangeError, material::MaterialError};

#[derive(Debug, Error)]
pub enum TlcpError {
    #[error("material error: {0}")]
    Material(#[from] MaterialError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}
