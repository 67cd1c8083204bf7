//! Session claim capabilities for JWT-secured response modes.
//!
//! JARM reuses the signing material of the authorization session: the token's
//! issuer falls back to whatever `iss` the session's own claims declare, and
//! the session's JWT headers (key id and friends) are handed to the signer.
//! A session exposes exactly one of two capability shapes, modeled as a
//! closed tagged union instead of runtime type inspection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWT header values declared by the session for tokens minted on its behalf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtHeaders {
    /// Key id selecting the signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Additional header parameters, passed through to the signer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JwtHeaders {
    /// Creates empty headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key id.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }
}

/// The claim-bearing capability a session exposes for JARM.
///
/// `IdToken` is an OpenID Connect session that owns ID-token claims;
/// `JwtContainer` is a plain OAuth2 session carrying a generic JWT claims
/// container. Both supply a claim mapping and the headers for the signer;
/// the tag records which capability the host session implemented.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionClaims {
    /// Session owning OpenID Connect ID-token claims.
    IdToken {
        /// Headers for tokens minted on behalf of this session.
        headers: JwtHeaders,
        /// The session's ID-token claim mapping.
        claims: Map<String, Value>,
    },
    /// Session carrying a generic JWT claims container.
    JwtContainer {
        /// Headers for tokens minted on behalf of this session.
        headers: JwtHeaders,
        /// The session's JWT claim mapping.
        claims: Map<String, Value>,
    },
}

impl SessionClaims {
    /// Returns the session's JWT headers.
    #[must_use]
    pub fn headers(&self) -> &JwtHeaders {
        match self {
            Self::IdToken { headers, .. } | Self::JwtContainer { headers, .. } => headers,
        }
    }

    /// Returns the session's own claim mapping.
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        match self {
            Self::IdToken { claims, .. } | Self::JwtContainer { claims, .. } => claims,
        }
    }
}
