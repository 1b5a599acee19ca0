use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::{
    engine::{
        EngineError, EngineStream, ProtocolVersion, TlcpContext, TlcpEngine, TlcpSession,
        VerifyPolicy,
    },
    material::{Certificate, PrivateKey},
};

// Configuration steps a context saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    CipherList(String),
    SignCert,
    SignKey,
    EncCert,
    EncKey,
    VerifyLocations(PathBuf),
}

// Engine that records every context mutation instead of doing anything.
#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    pub steps: Arc<Mutex<Vec<Step>>>,
    pub reject_cipher: bool,
}

impl TlcpEngine for RecordingEngine {
    type Context = RecordingContext;

    fn context(&self, _version: ProtocolVersion) -> Result<RecordingContext, EngineError> {
        Ok(RecordingContext {
            steps: self.steps.clone(),
            reject_cipher: self.reject_cipher,
        })
    }
}

#[derive(Debug)]
pub(crate) struct RecordingContext {
    steps: Arc<Mutex<Vec<Step>>>,
    reject_cipher: bool,
}

impl RecordingContext {
    fn record(&self, step: Step) {
        self.steps.lock().unwrap().push(step);
    }
}

#[async_trait]
impl TlcpContext for RecordingContext {
    type Session = ScriptedSession;

    fn set_cipher_list(&mut self, ciphers: &str) -> Result<(), EngineError> {
        if self.reject_cipher {
            return Err(EngineError::Context("cipher list rejected".into()));
        }
        self.record(Step::CipherList(ciphers.to_string()));
        Ok(())
    }

    fn use_sign_certificate(&mut self, _cert: &Certificate) -> Result<(), EngineError> {
        self.record(Step::SignCert);
        Ok(())
    }

    fn use_sign_private_key(&mut self, _key: &PrivateKey) -> Result<(), EngineError> {
        self.record(Step::SignKey);
        Ok(())
    }

    fn use_encrypt_certificate(&mut self, _cert: &Certificate) -> Result<(), EngineError> {
        self.record(Step::EncCert);
        Ok(())
    }

    fn use_encrypt_private_key(&mut self, _key: &PrivateKey) -> Result<(), EngineError> {
        self.record(Step::EncKey);
        Ok(())
    }

    fn load_verify_locations(&mut self, path: &Path) -> Result<(), EngineError> {
        self.record(Step::VerifyLocations(path.to_path_buf()));
        Ok(())
    }

    async fn handshake(
        &self,
        _stream: Box<dyn EngineStream>,
        _policy: VerifyPolicy,
    ) -> Result<ScriptedSession, EngineError> {
        Err(EngineError::Handshake("recording engine does not dial".into()))
    }
}

// Session with scripted behavior for exercising the exchange driver.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSession {
    pub writes: Vec<Vec<u8>>,
    pub response: Vec<u8>,
    pub fail_write: bool,
    pub fail_read: bool,
    pub reads: usize,
    pub closed: bool,
}

#[async_trait]
impl TlcpSession for ScriptedSession {
    fn version(&self) -> &str {
        "NTLS"
    }

    fn cipher(&self) -> &str {
        "ECC-SM2-SM4-CBC-SM3"
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, EngineError> {
        if self.fail_write {
            return Err(EngineError::Io(std::io::ErrorKind::BrokenPipe.into()));
        }
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, EngineError> {
        self.reads += 1;
        if self.fail_read {
            return Err(EngineError::Io(std::io::ErrorKind::ConnectionReset.into()));
        }
        let n = self.response.len().min(buf.len());
        buf[..n].copy_from_slice(&self.response[..n]);
        Ok(n)
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
