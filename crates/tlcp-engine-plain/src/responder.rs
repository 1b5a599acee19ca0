use tlcp_core::engine::{EngineError, EngineStream, ProtocolVersion};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::wire::{self, AcceptMsg, PreambleMessage, RejectMsg};

// Accept side of the plain preamble, for tests and demos. Picks the first
// cipher the initiator offers that is also in `supported`, then presents
// `identity` as its certificate.
#[derive(Debug, Clone)]
pub struct PlainResponder {
    supported: Vec<String>,
    identity: Vec<u8>,
}

impl PlainResponder {
    pub fn new(supported: Vec<String>, identity: Vec<u8>) -> Self {
        Self {
            supported,
            identity,
        }
    }

    pub async fn accept<S: EngineStream>(&self, mut stream: S) -> Result<PlainPeer<S>, EngineError> {
        let payload = wire::read_msg(&mut stream).await?;
        let config = match PreambleMessage::decode(&payload)? {
            PreambleMessage::ClientConfig(cc) => cc,
            _ => {
                return Err(EngineError::Handshake(
                    "expected a client config message".into(),
                ))
            }
        };

        if config.version != ProtocolVersion::Tlcp11.wire() {
            self.reject(&mut stream, "unsupported version").await?;
            return Err(EngineError::UnsupportedVersion(config.version));
        }

        let chosen = config
            .ciphers
            .split(':')
            .find(|c| self.supported.iter().any(|s| s == c));

        let cipher = match chosen {
            Some(c) => c.to_string(),
            None => {
                self.reject(&mut stream, "no shared cipher").await?;
                return Err(EngineError::Handshake("no shared cipher".into()));
            }
        };

        let accept = PreambleMessage::Accept(AcceptMsg {
            version: config.version,
            cipher: cipher.clone(),
            identity: self.identity.clone(),
        });
        wire::write_msg(&mut stream, &accept).await?;

        tracing::debug!(%cipher, flags = config.flags, "initiator accepted");
        Ok(PlainPeer { stream, cipher })
    }

    async fn reject<S: EngineStream>(&self, stream: &mut S, reason: &str) -> Result<(), EngineError> {
        let msg = PreambleMessage::Reject(RejectMsg {
            reason: reason.to_string(),
        });
        wire::write_msg(stream, &msg).await?;
        Ok(())
    }
}

// Accepted peer connection: raw passthrough, like the initiator side.
pub struct PlainPeer<S> {
    stream: S,
    cipher: String,
}

impl<S: EngineStream> PlainPeer<S> {
    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    pub async fn send(&mut self, buf: &[u8]) -> Result<(), EngineError> {
        self.stream.write_all(buf).await?;
        self.stream.flush().await?;
        Ok(())
    }

    pub async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, EngineError> {
        Ok(self.stream.read(buf).await?)
    }
}
