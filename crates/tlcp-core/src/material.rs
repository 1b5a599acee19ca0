use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use x509_parser::pem::Pem;
use zeroize::{Zeroize, ZeroizeOnDrop};

// PEM labels accepted for private-key material.
const KEY_LABELS: &[&str] = &["PRIVATE KEY", "EC PRIVATE KEY", "RSA PRIVATE KEY", "SM2 PRIVATE KEY"];

const CERT_LABEL: &str = "CERTIFICATE";

#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid PEM in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("unexpected PEM block `{label}` in {path}, expected {expected}")]
    WrongKind {
        path: PathBuf,
        label: String,
        expected: &'static str,
    },

    #[error("no PEM block found in {path}")]
    Empty { path: PathBuf },
}

// A binary-encoded (DER) identity certificate.
// Structurally valid PEM of the right kind; no semantic X.509 checks here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

// Binary-encoded private-key material. Zeroized on drop, never logged.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    der: Vec<u8>,
}

impl PrivateKey {
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Load a certificate from the first PEM block of `path`.
pub fn load_certificate(path: impl AsRef<Path>) -> Result<Certificate, MaterialError> {
    let path = path.as_ref();
    let block = first_block(path)?;

    if block.label != CERT_LABEL {
        return Err(MaterialError::WrongKind {
            path: path.to_path_buf(),
            label: block.label,
            expected: CERT_LABEL,
        });
    }

    tracing::debug!(path = %path.display(), "loaded certificate");
    Ok(Certificate {
        der: block.contents,
    })
}

/// Load a private key from the first PEM block of `path`.
pub fn load_private_key(path: impl AsRef<Path>) -> Result<PrivateKey, MaterialError> {
    let path = path.as_ref();
    let block = first_block(path)?;

    if !KEY_LABELS.contains(&block.label.as_str()) {
        return Err(MaterialError::WrongKind {
            path: path.to_path_buf(),
            label: block.label,
            expected: "a private key",
        });
    }

    tracing::debug!(path = %path.display(), "loaded private key");
    Ok(PrivateKey {
        der: block.contents,
    })
}

/// Load every certificate block of a trust-anchor bundle.
///
/// Helper for engine backends implementing `load_verify_locations`.
pub fn load_trust_anchors(path: impl AsRef<Path>) -> Result<Vec<Certificate>, MaterialError> {
    let path = path.as_ref();
    let bytes = read_file(path)?;

    let mut anchors = Vec::new();
    for parsed in Pem::iter_from_buffer(&bytes) {
        let block = parsed.map_err(|e| MaterialError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if block.label != CERT_LABEL {
            return Err(MaterialError::WrongKind {
                path: path.to_path_buf(),
                label: block.label,
                expected: CERT_LABEL,
            });
        }

        anchors.push(Certificate {
            der: block.contents,
        });
    }

    if anchors.is_empty() {
        return Err(MaterialError::Empty {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), count = anchors.len(), "loaded trust anchors");
    Ok(anchors)
}

fn read_file(path: &Path) -> Result<Vec<u8>, MaterialError> {
    fs::read(path).map_err(|source| MaterialError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn first_block(path: &Path) -> Result<Pem, MaterialError> {
    let bytes = read_file(path)?;

    match Pem::iter_from_buffer(&bytes).next() {
        Some(Ok(block)) => Ok(block),
        Some(Err(e)) => Err(MaterialError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        None => Err(MaterialError::Empty {
            path: path.to_path_buf(),
        }),
    }
}
