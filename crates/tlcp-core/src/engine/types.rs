use std::fmt;

// Protocol versions an engine can be asked to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    // TLCP 1.1, the dual-certificate national-crypto protocol.
    Tlcp11,
}

impl ProtocolVersion {
    pub const fn wire(self) -> u16 {
        match self {
            ProtocolVersion::Tlcp11 => 0x0101,
        }
    }

    // The version name engines report for an established session.
    pub const fn name(self) -> &'static str {
        match self {
            ProtocolVersion::Tlcp11 => "NTLS",
        }
    }
}

// Peer verification policy for the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPolicy {
    // Require the peer identity to chain to a loaded trust anchor.
    Strict,

    // Accept any peer identity. Matches the original client behavior.
    #[default]
    SkipHostVerification,
}

// Negotiated parameters of an established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub version: String,
    pub cipher: String,
}

impl fmt::Display for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, cipher={}", self.version, self.cipher)
    }
}
