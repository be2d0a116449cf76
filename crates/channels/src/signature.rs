//! Webhook signature verification.
//!
//! Providers that sign webhooks send a base64 RSA signature (PKCS#1 v1.5
//! over SHA-256) of the raw request body in a header. The public key lives
//! in the channel configuration as PEM.

use std::io::Read;

use {
    base64::Engine,
    rsa::{Pkcs1v15Sign, RsaPublicKey, pkcs8::DecodePublicKey},
    sha2::{Digest, Sha256},
    tracing::debug,
};

use crate::{Error, Result, body::ReplayBody, channel::Channel};

/// Verifies webhook bodies against a PEM public key stored in channel
/// config under `key_config`.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    enabled: bool,
    key_config: &'static str,
}

impl SignatureVerifier {
    #[must_use]
    pub const fn new(key_config: &'static str) -> Self {
        Self {
            enabled: true,
            key_config,
        }
    }

    /// A verifier that accepts every request.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            key_config: "",
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn verify(
        &self,
        channel: &Channel,
        body: &ReplayBody,
        signature: Option<&str>,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::authentication("missing request signature"))?;

        let pem = channel.string_config(self.key_config).ok_or_else(|| {
            Error::authentication(format!(
                "no public key configured for channel {}",
                channel.uuid
            ))
        })?;

        verify_rsa_sha256(pem, body, signature)?;
        debug!(channel_uuid = %channel.uuid, "webhook signature verified");
        Ok(())
    }
}

/// Check `signature_b64` against the SHA-256 digest of `body`.
pub fn verify_rsa_sha256(public_key_pem: &str, body: &ReplayBody, signature_b64: &str) -> Result<()> {
    let key = RsaPublicKey::from_public_key_pem(public_key_pem.trim())
        .map_err(|e| Error::authentication(format!("failed to parse public key: {e}")))?;

    let digest = sha256_digest(body)?;

    let signature = base64::engine::general_purpose::STANDARD
        .decode(signature_b64)
        .map_err(|e| Error::authentication(format!("unable to decode base64 signature: {e}")))?;

    key.verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
        .map_err(|e| Error::authentication(format!("unable to verify signature: {e}")))
}

fn sha256_digest(body: &ReplayBody) -> Result<Vec<u8>> {
    let mut reader = body.reader();
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| Error::authentication(format!("unable to hash request body: {e}")))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_vec())
}
