use crate::error::Error;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey};
use std::fmt;
use std::path::Path;

/// Produces the `Signature` header value for an authentication request body.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, body: &[u8]) -> Result<String, Error>;
}

/// Signs with the account's RSA private key (PKCS#1 or PKCS#8 PEM) using
/// SHA-512, base64-encoded with the standard alphabet.
pub struct PrivateKeySigner {
    key: EncodingKey,
}

impl fmt::Debug for PrivateKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeySigner").finish_non_exhaustive()
    }
}

impl PrivateKeySigner {
    pub fn from_pem(pem: &[u8]) -> Result<Self, Error> {
        let key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| Error::CredentialError(format!("invalid private key: {e}")))?;
        Ok(Self { key })
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let pem = std::fs::read(path).map_err(|e| {
            Error::CredentialError(format!(
                "failed to read private key {}: {e}",
                path.display()
            ))
        })?;
        Self::from_pem(&pem)
    }
}

impl RequestSigner for PrivateKeySigner {
    fn sign(&self, body: &[u8]) -> Result<String, Error> {
        let signature = jsonwebtoken::crypto::sign(body, &self.key, Algorithm::RS512)
            .map_err(|e| Error::CredentialError(format!("signing failed: {e}")))?;
        // jsonwebtoken emits unpadded base64url; the API wants standard base64.
        let raw = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| Error::CredentialError(format!("signing failed: {e}")))?;
        Ok(STANDARD.encode(raw))
    }
}
