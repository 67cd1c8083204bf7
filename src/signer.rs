//! Response token signing.
//!
//! The JWT-secured response modes need a signer capability: given a claim
//! mapping and headers, produce a compact signed token. [`ResponseSigner`] is
//! the injection point; [`JwtResponseSigner`] is the bundled implementation
//! backed by `jsonwebtoken`.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};

use crate::session::JwtHeaders;

/// A JWT claim mapping as handed to the signer.
pub type MapClaims = Map<String, Value>;

/// Errors raised while signing a response token.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SigningError {
    /// Failed to encode the token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },

    /// The signing key is invalid or unusable.
    #[error("Invalid signing key: {message}")]
    InvalidKey {
        /// Description of why the key is invalid.
        message: String,
    },
}

impl SigningError {
    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}

/// A compact signed token plus its detached signature segment.
///
/// The signature segment is an artifact some hosts persist for token
/// bookkeeping; response delivery itself only uses the full token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// The compact serialized token.
    pub token: String,
    /// The token's final (signature) segment.
    pub signature: String,
}

/// Capability for signing response claim mappings.
pub trait ResponseSigner: Send + Sync {
    /// Signs `claims` using the session-declared `headers`.
    fn generate(&self, claims: &MapClaims, headers: &JwtHeaders)
    -> Result<SignedToken, SigningError>;
}

/// [`ResponseSigner`] backed by `jsonwebtoken`.
///
/// The session's `kid` header wins over the signer's own; other extra
/// session headers are not mapped onto the compact header.
#[derive(Debug)]
pub struct JwtResponseSigner {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    kid: Option<String>,
}

impl JwtResponseSigner {
    /// Creates an HS256 signer from a shared secret.
    #[must_use]
    pub fn from_hmac_secret(secret: &[u8]) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret),
            kid: None,
        }
    }

    /// Creates a signer from a PEM-encoded RSA private key.
    ///
    /// # Errors
    /// Returns an error if the PEM data is invalid or `algorithm` is not
    /// RSA-based.
    pub fn from_rsa_pem(private_pem: &[u8], algorithm: Algorithm) -> Result<Self, SigningError> {
        if !matches!(
            algorithm,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512
        ) {
            return Err(SigningError::invalid_key(format!(
                "Algorithm {algorithm:?} is not RSA-based"
            )));
        }
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| SigningError::invalid_key(e.to_string()))?;
        Ok(Self {
            algorithm,
            encoding_key,
            kid: None,
        })
    }

    /// Sets the default key id stamped into token headers.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }
}

impl ResponseSigner for JwtResponseSigner {
    fn generate(
        &self,
        claims: &MapClaims,
        headers: &JwtHeaders,
    ) -> Result<SignedToken, SigningError> {
        let mut header = Header::new(self.algorithm);
        header.kid = headers.kid.clone().or_else(|| self.kid.clone());

        let token = jsonwebtoken::encode(&header, claims, &self.encoding_key)
            .map_err(|e| SigningError::encoding(e.to_string()))?;
        let signature = token.rsplit('.').next().unwrap_or_default().to_string();

        Ok(SignedToken { token, signature })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims() -> MapClaims {
        json!({"iss": "https://as.example", "jti": "abc"})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_hmac_signer_produces_compact_token() {
        let signer = JwtResponseSigner::from_hmac_secret(b"top secret");
        let signed = signer.generate(&claims(), &JwtHeaders::new()).unwrap();

        assert_eq!(signed.token.split('.').count(), 3);
        assert!(signed.token.ends_with(&signed.signature));
        assert!(!signed.signature.is_empty());
    }

    #[test]
    fn test_session_kid_wins_over_signer_kid() {
        let signer = JwtResponseSigner::from_hmac_secret(b"top secret").with_kid("signer-key");
        let headers = JwtHeaders::new().with_kid("session-key");
        let signed = signer.generate(&claims(), &headers).unwrap();

        // The header is the first dot-separated segment.
        let header_b64 = signed.token.split('.').next().unwrap();
        let header_json = jsonwebtoken::decode_header(&signed.token).unwrap();
        assert!(!header_b64.is_empty());
        assert_eq!(header_json.kid.as_deref(), Some("session-key"));
    }

    #[test]
    fn test_rsa_pem_rejects_non_rsa_algorithm() {
        let err = JwtResponseSigner::from_rsa_pem(b"irrelevant", Algorithm::ES256).unwrap_err();
        assert!(matches!(err, SigningError::InvalidKey { .. }));
    }

    #[test]
    fn test_rsa_pem_rejects_garbage_key() {
        let err = JwtResponseSigner::from_rsa_pem(b"not a pem", Algorithm::RS256).unwrap_err();
        assert!(matches!(err, SigningError::InvalidKey { .. }));
    }
}
