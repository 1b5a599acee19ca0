use tokio::net::TcpStream;

use tlcp_core::engine::{TlcpContext, VerifyPolicy};

use crate::error::DialError;

/// Open a TCP connection to `addr` and drive the context's handshake
/// over it. No timeouts are configured here; deadlines are left to the
/// transport and engine defaults.
pub async fn dial_tcp<C: TlcpContext>(
    context: &C,
    addr: &str,
    policy: VerifyPolicy,
) -> Result<C::Session, DialError> {
    let stream = TcpStream::connect(addr).await?;
    tracing::debug!(addr, "transport connected");

    let session = context.handshake(Box::new(stream), policy).await?;
    tracing::debug!(addr, "session established");

    Ok(session)
}
