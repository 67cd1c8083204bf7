//! Internal error taxonomy for authorization response delivery.
//!
//! [`AuthorizeError`] is the error value the hosting authorization endpoint
//! hands to the dispatcher. Every variant maps onto the RFC 6749 vocabulary;
//! server-side faults (configuration problems, collaborator failures) all
//! externalize as `server_error`, with their detail attached as debug text
//! that only reaches the client when debug exposure is enabled.

use crate::rfc6749::{OAuthErrorCode, Rfc6749Error};

/// Errors raised while processing an authorization request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthorizeError {
    /// The authorization request is invalid or malformed.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The client is not authorized to use this method.
    #[error("Unauthorized client: {message}")]
    UnauthorizedClient {
        /// Description of why the client is not authorized.
        message: String,
    },

    /// The resource owner or authorization server denied the request.
    #[error("Access denied: {message}")]
    AccessDenied {
        /// Description of why access was denied.
        message: String,
    },

    /// The authorization server does not support the requested response type.
    #[error("Unsupported response type: {response_type}")]
    UnsupportedResponseType {
        /// The unsupported response type.
        response_type: String,
    },

    /// The requested scope is invalid, unknown, or malformed.
    #[error("Invalid scope: {message}")]
    InvalidScope {
        /// Description of why the scope is invalid.
        message: String,
    },

    /// The server is temporarily unable to handle the request.
    #[error("Temporarily unavailable: {message}")]
    TemporarilyUnavailable {
        /// Description of the temporary condition.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Server error: {message}")]
    ServerError {
        /// Description of the internal error.
        message: String,
    },

    /// The delivery configuration is invalid (missing signer, missing
    /// session capability, unhandled extension mode).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An already structured RFC 6749 error, passed through unchanged.
    #[error("{0}")]
    Structured(Rfc6749Error),
}

impl AuthorizeError {
    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `UnauthorizedClient` error.
    #[must_use]
    pub fn unauthorized_client(message: impl Into<String>) -> Self {
        Self::UnauthorizedClient {
            message: message.into(),
        }
    }

    /// Creates a new `AccessDenied` error.
    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    /// Creates a new `UnsupportedResponseType` error.
    #[must_use]
    pub fn unsupported_response_type(response_type: impl Into<String>) -> Self {
        Self::UnsupportedResponseType {
            response_type: response_type.into(),
        }
    }

    /// Creates a new `InvalidScope` error.
    #[must_use]
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::InvalidScope {
            message: message.into(),
        }
    }

    /// Creates a new `TemporarilyUnavailable` error.
    #[must_use]
    pub fn temporarily_unavailable(message: impl Into<String>) -> Self {
        Self::TemporarilyUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `ServerError`.
    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client-facing protocol error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.oauth_error_code().status().is_client_error()
    }

    /// Returns `true` if this externalizes as a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.oauth_error_code().status().is_server_error()
    }

    /// Returns the OAuth 2.0 error identifier this error maps onto.
    #[must_use]
    pub fn oauth_error_code(&self) -> OAuthErrorCode {
        match self {
            Self::InvalidRequest { .. } => OAuthErrorCode::InvalidRequest,
            Self::UnauthorizedClient { .. } => OAuthErrorCode::UnauthorizedClient,
            Self::AccessDenied { .. } => OAuthErrorCode::AccessDenied,
            Self::UnsupportedResponseType { .. } => OAuthErrorCode::UnsupportedResponseType,
            Self::InvalidScope { .. } => OAuthErrorCode::InvalidScope,
            Self::TemporarilyUnavailable { .. } => OAuthErrorCode::TemporarilyUnavailable,
            Self::ServerError { .. } | Self::Configuration { .. } => OAuthErrorCode::ServerError,
            Self::Structured(err) => err.code(),
        }
    }

    /// Converts into the structured RFC 6749 representation.
    ///
    /// Client-facing variants carry their message as the hint; server-side
    /// variants carry it as debug detail instead, so it is stripped unless
    /// debug exposure is enabled.
    #[must_use]
    pub fn to_rfc6749(&self) -> Rfc6749Error {
        match self {
            Self::Structured(err) => err.clone(),
            Self::InvalidRequest { message } => {
                Rfc6749Error::new(OAuthErrorCode::InvalidRequest).with_hint(message.clone())
            }
            Self::UnauthorizedClient { message } => {
                Rfc6749Error::new(OAuthErrorCode::UnauthorizedClient).with_hint(message.clone())
            }
            Self::AccessDenied { message } => {
                Rfc6749Error::new(OAuthErrorCode::AccessDenied).with_hint(message.clone())
            }
            Self::UnsupportedResponseType { response_type } => {
                Rfc6749Error::new(OAuthErrorCode::UnsupportedResponseType)
                    .with_hint(format!("The response type '{response_type}' is not supported."))
            }
            Self::InvalidScope { message } => {
                Rfc6749Error::new(OAuthErrorCode::InvalidScope).with_hint(message.clone())
            }
            Self::TemporarilyUnavailable { message } => {
                Rfc6749Error::new(OAuthErrorCode::TemporarilyUnavailable).with_hint(message.clone())
            }
            Self::ServerError { message } => {
                Rfc6749Error::new(OAuthErrorCode::ServerError).with_debug(message.clone())
            }
            Self::Configuration { message } => {
                Rfc6749Error::new(OAuthErrorCode::ServerError).with_debug(message.clone())
            }
        }
    }
}

impl From<Rfc6749Error> for AuthorizeError {
    fn from(err: Rfc6749Error) -> Self {
        Self::Structured(err)
    }
}
