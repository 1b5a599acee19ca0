use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const MSG_CLIENT_CONFIG: u8 = 0x01;
pub const MSG_SERVER_ACCEPT: u8 = 0x02;
pub const MSG_SERVER_REJECT: u8 = 0x03;

pub const FLAG_SIGN_CERT: u8 = 0b0000_0001;
pub const FLAG_SIGN_KEY: u8 = 0b0000_0010;
pub const FLAG_ENC_CERT: u8 = 0b0000_0100;
pub const FLAG_ENC_KEY: u8 = 0b0000_1000;

// Upper bound on one preamble message on the wire.
pub const MAX_PREAMBLE_LEN: u32 = 65_536;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed preamble message")]
    Malformed,

    #[error("unexpected message type: {0:#x}")]
    UnexpectedType(u8),

    #[error("invalid field length")]
    InvalidLength,

    #[error("preamble message too large: len={len}, max={max}")]
    TooLarge { len: u32, max: u32 },

    #[error("unexpected EOF in preamble")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfigMsg {
    pub version: u16,
    pub flags: u8,
    pub ciphers: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptMsg {
    pub version: u16,
    pub cipher: String,
    // Peer certificate (DER) as presented, for anchor checks.
    pub identity: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectMsg {
    pub reason: String,
}

// Envelope for the cleartext parameter preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreambleMessage {
    ClientConfig(ClientConfigMsg),
    Accept(AcceptMsg),
    Reject(RejectMsg),
}

impl PreambleMessage {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            PreambleMessage::ClientConfig(cc) => {
                let mut out = Vec::with_capacity(6 + cc.ciphers.len());
                out.push(MSG_CLIENT_CONFIG);
                out.extend_from_slice(&cc.version.to_be_bytes());
                out.push(cc.flags);
                put_str(&mut out, &cc.ciphers);
                out
            }
            PreambleMessage::Accept(ac) => {
                let mut out = Vec::with_capacity(9 + ac.cipher.len() + ac.identity.len());
                out.push(MSG_SERVER_ACCEPT);
                out.extend_from_slice(&ac.version.to_be_bytes());
                put_str(&mut out, &ac.cipher);
                out.extend_from_slice(&(ac.identity.len() as u32).to_be_bytes());
                out.extend_from_slice(&ac.identity);
                out
            }
            PreambleMessage::Reject(rj) => {
                let mut out = Vec::with_capacity(3 + rj.reason.len());
                out.push(MSG_SERVER_REJECT);
                put_str(&mut out, &rj.reason);
                out
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.is_empty() {
            return Err(WireError::Malformed);
        }

        match bytes[0] {
            MSG_CLIENT_CONFIG => {
                if bytes.len() < 4 {
                    return Err(WireError::InvalidLength);
                }
                let version = u16::from_be_bytes([bytes[1], bytes[2]]);
                let flags = bytes[3];
                let (ciphers, rest) = take_str(&bytes[4..])?;
                if !rest.is_empty() {
                    return Err(WireError::InvalidLength);
                }
                Ok(PreambleMessage::ClientConfig(ClientConfigMsg {
                    version,
                    flags,
                    ciphers,
                }))
            }

            MSG_SERVER_ACCEPT => {
                if bytes.len() < 3 {
                    return Err(WireError::InvalidLength);
                }
                let version = u16::from_be_bytes([bytes[1], bytes[2]]);
                let (cipher, rest) = take_str(&bytes[3..])?;

                if rest.len() < 4 {
                    return Err(WireError::InvalidLength);
                }
                let blob_len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
                let rest = &rest[4..];
                if rest.len() != blob_len {
                    return Err(WireError::InvalidLength);
                }

                Ok(PreambleMessage::Accept(AcceptMsg {
                    version,
                    cipher,
                    identity: rest.to_vec(),
                }))
            }

            MSG_SERVER_REJECT => {
                let (reason, rest) = take_str(&bytes[1..])?;
                if !rest.is_empty() {
                    return Err(WireError::InvalidLength);
                }
                Ok(PreambleMessage::Reject(RejectMsg { reason }))
            }

            other => Err(WireError::UnexpectedType(other)),
        }
    }
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u16).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn take_str(bytes: &[u8]) -> Result<(String, &[u8]), WireError> {
    if bytes.len() < 2 {
        return Err(WireError::InvalidLength);
    }
    let len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let rest = &bytes[2..];
    if rest.len() < len {
        return Err(WireError::InvalidLength);
    }
    let s = std::str::from_utf8(&rest[..len]).map_err(|_| WireError::Malformed)?;
    Ok((s.to_string(), &rest[len..]))
}

fn map_io_err(e: std::io::Error) -> WireError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        WireError::UnexpectedEof
    } else {
        WireError::Io(e.to_string())
    }
}

/// Write one length-prefixed preamble message.
pub async fn write_msg<S>(io: &mut S, msg: &PreambleMessage) -> Result<(), WireError>
where
    S: AsyncWrite + Unpin + Send,
{
    let payload = msg.encode();
    let len: u32 = payload.len().try_into().map_err(|_| WireError::TooLarge {
        len: u32::MAX,
        max: MAX_PREAMBLE_LEN,
    })?;

    if len > MAX_PREAMBLE_LEN {
        return Err(WireError::TooLarge {
            len,
            max: MAX_PREAMBLE_LEN,
        });
    }

    io.write_all(&len.to_be_bytes()).await.map_err(map_io_err)?;
    io.write_all(&payload).await.map_err(map_io_err)?;
    io.flush().await.map_err(map_io_err)?;
    Ok(())
}

/// Read one length-prefixed preamble message payload.
pub async fn read_msg<S>(io: &mut S) -> Result<Vec<u8>, WireError>
where
    S: AsyncRead + Unpin + Send,
{
    let mut len_buf = [0u8; 4];
    io.read_exact(&mut len_buf).await.map_err(map_io_err)?;

    let len = u32::from_be_bytes(len_buf);
    if len == 0 || len > MAX_PREAMBLE_LEN {
        return Err(WireError::TooLarge {
            len,
            max: MAX_PREAMBLE_LEN,
        });
    }

    let mut payload = vec![0u8; len as usize];
    io.read_exact(&mut payload).await.map_err(map_io_err)?;
    Ok(payload)
}
