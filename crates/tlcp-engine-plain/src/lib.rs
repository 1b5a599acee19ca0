/*
    tlcp-engine-plain
      - null-security engine backend implementing tlcp-core's engine contract.
      - Cleartext parameter preamble, passthrough records. Development and
        test use only; a real national-crypto engine binds the same traits.
 */

mod responder;
mod wire;

use std::path::Path;

use async_trait::async_trait;

use tlcp_core::{
    engine::{
        EngineError, EngineStream, ProtocolVersion, TlcpContext, TlcpEngine, TlcpSession,
        VerifyPolicy,
    },
    material::{self, Certificate, PrivateKey},
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub use responder::{PlainPeer, PlainResponder};

use crate::wire::{
    AcceptMsg, ClientConfigMsg, PreambleMessage, RejectMsg, WireError, FLAG_ENC_CERT, FLAG_ENC_KEY,
    FLAG_SIGN_CERT, FLAG_SIGN_KEY,
};

impl From<WireError> for EngineError {
    fn from(e: WireError) -> Self {
        EngineError::Handshake(e.to_string())
    }
}

#[derive(Debug, Default)]
pub struct PlainEngine;

impl PlainEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TlcpEngine for PlainEngine {
    type Context = PlainContext;

    fn context(&self, version: ProtocolVersion) -> Result<PlainContext, EngineError> {
        Ok(PlainContext {
            version,
            ciphers: String::new(),
            sign_cert: None,
            sign_key: None,
            enc_cert: None,
            enc_key: None,
            anchors: None,
        })
    }
}

// Context state mirrors the configuration steps one-to-one. Installs are
// accepted in any order; consistency is checked when a handshake starts.
#[derive(Debug)]
pub struct PlainContext {
    version: ProtocolVersion,
    ciphers: String,
    sign_cert: Option<Certificate>,
    sign_key: Option<PrivateKey>,
    enc_cert: Option<Certificate>,
    enc_key: Option<PrivateKey>,
    anchors: Option<Vec<Certificate>>,
}

impl PlainContext {
    fn pair_flags(&self) -> u8 {
        let mut flags = 0;
        if self.sign_cert.is_some() {
            flags |= FLAG_SIGN_CERT;
        }
        if self.sign_key.is_some() {
            flags |= FLAG_SIGN_KEY;
        }
        if self.enc_cert.is_some() {
            flags |= FLAG_ENC_CERT;
        }
        if self.enc_key.is_some() {
            flags |= FLAG_ENC_KEY;
        }
        flags
    }

    // Handshake-time consistency checks deferred from configuration.
    fn check_credentials(&self, policy: VerifyPolicy) -> Result<(), EngineError> {
        if self.sign_cert.is_some() != self.sign_key.is_some() {
            return Err(EngineError::Handshake("incomplete signing pair".into()));
        }
        if self.enc_cert.is_some() != self.enc_key.is_some() {
            return Err(EngineError::Handshake("incomplete encryption pair".into()));
        }
        if policy == VerifyPolicy::Strict && self.anchors.is_none() {
            return Err(EngineError::Handshake(
                "strict verification requires trust anchors".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TlcpContext for PlainContext {
    type Session = PlainSession;

    fn set_cipher_list(&mut self, ciphers: &str) -> Result<(), EngineError> {
        if ciphers.is_empty() {
            return Err(EngineError::Context("empty cipher list".into()));
        }
        self.ciphers = ciphers.to_string();
        Ok(())
    }

    fn use_sign_certificate(&mut self, cert: &Certificate) -> Result<(), EngineError> {
        self.sign_cert = Some(cert.clone());
        Ok(())
    }

    fn use_sign_private_key(&mut self, key: &PrivateKey) -> Result<(), EngineError> {
        self.sign_key = Some(key.clone());
        Ok(())
    }

    fn use_encrypt_certificate(&mut self, cert: &Certificate) -> Result<(), EngineError> {
        self.enc_cert = Some(cert.clone());
        Ok(())
    }

    fn use_encrypt_private_key(&mut self, key: &PrivateKey) -> Result<(), EngineError> {
        self.enc_key = Some(key.clone());
        Ok(())
    }

    fn load_verify_locations(&mut self, path: &Path) -> Result<(), EngineError> {
        self.anchors = Some(material::load_trust_anchors(path)?);
        Ok(())
    }

    async fn handshake(
        &self,
        mut stream: Box<dyn EngineStream>,
        policy: VerifyPolicy,
    ) -> Result<PlainSession, EngineError> {
        self.check_credentials(policy)?;

        let config = PreambleMessage::ClientConfig(ClientConfigMsg {
            version: self.version.wire(),
            flags: self.pair_flags(),
            ciphers: self.ciphers.clone(),
        });
        wire::write_msg(&mut stream, &config).await?;

        let reply = wire::read_msg(&mut stream).await?;
        match PreambleMessage::decode(&reply)? {
            PreambleMessage::Reject(RejectMsg { reason }) => {
                Err(EngineError::Handshake(format!("peer rejected: {reason}")))
            }

            PreambleMessage::ClientConfig(_) => Err(EngineError::Handshake(
                "unexpected client message from peer".into(),
            )),

            PreambleMessage::Accept(AcceptMsg {
                version,
                cipher,
                identity,
            }) => {
                if version != self.version.wire() {
                    return Err(EngineError::UnsupportedVersion(version));
                }

                if !self.ciphers.split(':').any(|c| c == cipher) {
                    return Err(EngineError::Handshake(format!(
                        "peer chose unoffered cipher {cipher}"
                    )));
                }

                if policy == VerifyPolicy::Strict {
                    let anchored = self
                        .anchors
                        .as_deref()
                        .unwrap_or(&[])
                        .iter()
                        .any(|a| a.der() == identity.as_slice());
                    if !anchored {
                        return Err(EngineError::Handshake("peer identity not anchored".into()));
                    }
                }

                let fp_len = identity.len().min(12);
                tracing::debug!(
                    %cipher,
                    peer = %hex::encode(&identity[..fp_len]),
                    "preamble accepted"
                );

                Ok(PlainSession {
                    stream,
                    version: self.version.name(),
                    cipher,
                })
            }
        }
    }
}

// Established session: passthrough records over the preamble'd stream.
pub struct PlainSession {
    stream: Box<dyn EngineStream>,
    version: &'static str,
    cipher: String,
}

impl std::fmt::Debug for PlainSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainSession")
            .field("version", &self.version)
            .field("cipher", &self.cipher)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TlcpSession for PlainSession {
    fn version(&self) -> &str {
        self.version
    }

    fn cipher(&self) -> &str {
        &self.cipher
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, EngineError> {
        self.stream.write_all(buf).await?;
        self.stream.flush().await?;
        Ok(buf.len())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, EngineError> {
        Ok(self.stream.read(buf).await?)
    }

    async fn close(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}

#[cfg(test)]
mod tests;
