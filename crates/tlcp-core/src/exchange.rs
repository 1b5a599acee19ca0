use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::engine::{EngineError, TlcpSession};

/// Capacity of the single bounded response read.
pub const READ_BUF_LEN: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("failed to read operator input: {0}")]
    Input(std::io::Error),

    #[error("write failed: {0}")]
    Write(EngineError),

    // The one recoverable failure: callers report it and exit cleanly.
    #[error("read failed: {0}")]
    Read(EngineError),
}

// Outcome of one request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    // Bytes written to the session: the operator line (delimiter kept,
    // when present) plus exactly one appended newline.
    pub request: Vec<u8>,

    // Response prefix, at most `READ_BUF_LEN` bytes. A longer response
    // is silently truncated; no second read is issued.
    pub response: Vec<u8>,
}

/// Perform exactly one request/response exchange over the session.
///
/// Reads one line from `input`, appends a trailing newline, writes the
/// whole request in a single call, then does one bounded read.
pub async fn run_once<S, R>(session: &mut S, input: &mut R) -> Result<Exchange, ExchangeError>
where
    S: TlcpSession,
    R: AsyncBufRead + Unpin + Send,
{
    let mut line = String::new();
    input.read_line(&mut line).await.map_err(ExchangeError::Input)?;

    let mut request = line.into_bytes();
    request.push(b'\n');

    session.write(&request).await.map_err(ExchangeError::Write)?;
    tracing::debug!(len = request.len(), "request written");

    let mut buf = [0u8; READ_BUF_LEN];
    let n = session.read(&mut buf).await.map_err(ExchangeError::Read)?;
    tracing::debug!(len = n, "response read");

    Ok(Exchange {
        request,
        response: buf[..n].to_vec(),
    })
}
