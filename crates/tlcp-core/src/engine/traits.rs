use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    engine::{EngineError, ProtocolVersion, SessionParams, VerifyPolicy},
    material::{Certificate, PrivateKey},
};

// Byte stream an engine drives its handshake and records over.
// Blanket-implemented so any connected transport qualifies.
pub trait EngineStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> EngineStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

// Trait boundary for the TLCP engine.
// Client logic must depend on these traits, never on a concrete engine.
pub trait TlcpEngine: Send + Sync + 'static {
    type Context: TlcpContext;

    fn context(&self, version: ProtocolVersion) -> Result<Self::Context, EngineError>;
}

// A connection context under configuration.
//
// Credential installs are independent: a private key may land before its
// certificate and the other way round. Pair completeness is checked by the
// engine at handshake time, not here.
#[async_trait]
pub trait TlcpContext: Send + Sync {
    type Session: TlcpSession;

    fn set_cipher_list(&mut self, ciphers: &str) -> Result<(), EngineError>;

    fn use_sign_certificate(&mut self, cert: &Certificate) -> Result<(), EngineError>;
    fn use_sign_private_key(&mut self, key: &PrivateKey) -> Result<(), EngineError>;

    fn use_encrypt_certificate(&mut self, cert: &Certificate) -> Result<(), EngineError>;
    fn use_encrypt_private_key(&mut self, key: &PrivateKey) -> Result<(), EngineError>;

    fn load_verify_locations(&mut self, path: &Path) -> Result<(), EngineError>;

    // Drive the handshake over an already-connected stream.
    // The context is not mutated; one context can dial repeatedly.
    async fn handshake(
        &self,
        stream: Box<dyn EngineStream>,
        policy: VerifyPolicy,
    ) -> Result<Self::Session, EngineError>;
}

// An established session. Exists only after a completed handshake, so the
// negotiated parameters are always present.
#[async_trait]
pub trait TlcpSession: Send {
    fn version(&self) -> &str;
    fn cipher(&self) -> &str;

    fn params(&self) -> SessionParams {
        SessionParams {
            version: self.version().to_string(),
            cipher: self.cipher().to_string(),
        }
    }

    // Write the whole buffer in one call. Partial writes are the
    // engine's concern, never retried by callers.
    async fn write(&mut self, buf: &[u8]) -> Result<usize, EngineError>;

    // One bounded read. Returns whatever arrived, up to `buf.len()`.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, EngineError>;

    // Release the underlying transport. Dropping the session is the
    // backstop; calling close twice is harmless.
    async fn close(&mut self);
}
