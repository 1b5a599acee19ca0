use crate::{
    config::ClientConfig,
    engine::{ProtocolVersion, TlcpContext, TlcpEngine},
    error::TlcpError,
    material,
};

/// Build a connection context from the client configuration.
///
/// Applies the configuration steps in order: cipher selector (always),
/// sign certificate, sign key, encrypt certificate, encrypt key, trust
/// anchors. Unset paths are skipped entirely; the first failing step
/// aborts the build. No cross-checks between steps happen here: pair
/// completeness is the engine's call at handshake time.
pub fn build<E: TlcpEngine>(engine: &E, config: &ClientConfig) -> Result<E::Context, TlcpError> {
    let mut ctx = engine.context(ProtocolVersion::Tlcp11)?;

    let ciphers = config.effective_cipher();
    ctx.set_cipher_list(ciphers)?;
    tracing::debug!(ciphers, "cipher list set");

    if let Some(path) = &config.sign_cert {
        let cert = material::load_certificate(path)?;
        ctx.use_sign_certificate(&cert)?;
        tracing::debug!(path = %path.display(), "sign certificate installed");
    }

    if let Some(path) = &config.sign_key {
        let key = material::load_private_key(path)?;
        ctx.use_sign_private_key(&key)?;
        tracing::debug!(path = %path.display(), "sign private key installed");
    }

    if let Some(path) = &config.enc_cert {
        let cert = material::load_certificate(path)?;
        ctx.use_encrypt_certificate(&cert)?;
        tracing::debug!(path = %path.display(), "encrypt certificate installed");
    }

    if let Some(path) = &config.enc_key {
        let key = material::load_private_key(path)?;
        ctx.use_encrypt_private_key(&key)?;
        tracing::debug!(path = %path.display(), "encrypt private key installed");
    }

    if let Some(path) = &config.ca_file {
        ctx.load_verify_locations(path)?;
        tracing::debug!(path = %path.display(), "trust anchors loaded");
    }

    Ok(ctx)
}
