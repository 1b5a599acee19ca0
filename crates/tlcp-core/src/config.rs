use std::path::PathBuf;

use crate::engine::VerifyPolicy;

/// Cipher-suite selector used when the caller supplies none.
pub const DEFAULT_CIPHER_SUITE: &str = "ECC-SM2-SM4-CBC-SM3";

/// Default transport address to dial.
pub const DEFAULT_CONN_ADDR: &str = "127.0.0.1:443";

// Client configuration. Plain named fields with documented defaults;
// the CLI layer converts its flags into this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // "host:port" to dial. Default `127.0.0.1:443`.
    pub conn_addr: String,

    // Cipher-suite selector handed to the engine, colon-separated.
    // Empty means "use the default suite".
    pub cipher_suite: String,

    // Dual-certificate identity. Any subset may be configured; an
    // incomplete pair is rejected by the engine at handshake time.
    pub sign_cert: Option<PathBuf>,
    pub sign_key: Option<PathBuf>,
    pub enc_cert: Option<PathBuf>,
    pub enc_key: Option<PathBuf>,

    // Trust-anchor bundle for peer verification.
    pub ca_file: Option<PathBuf>,

    // Peer verification policy. Default skips host verification,
    // matching the original client.
    pub verify: VerifyPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            conn_addr: DEFAULT_CONN_ADDR.to_string(),
            cipher_suite: DEFAULT_CIPHER_SUITE.to_string(),
            sign_cert: None,
            sign_key: None,
            enc_cert: None,
            enc_key: None,
            ca_file: None,
            verify: VerifyPolicy::default(),
        }
    }
}

impl ClientConfig {
    // The selector actually applied: an empty selector falls back to
    // the default suite.
    pub fn effective_cipher(&self) -> &str {
        if self.cipher_suite.is_empty() {
            DEFAULT_CIPHER_SUITE
        } else {
            &self.cipher_suite
        }
    }
}
