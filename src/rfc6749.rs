//! RFC 6749 structured error representation.
//!
//! OAuth 2.0 defines a fixed vocabulary of machine-readable error identifiers,
//! each bound to an HTTP status code. [`Rfc6749Error`] is the externalizable
//! form of any internal failure: it carries the identifier, a human-readable
//! description and hint, and optional debug detail that is only ever emitted
//! when the debug-exposure policy is enabled for the call.
//!
//! Two wire formats exist. The current format folds the hint (and exposed
//! debug detail) into `error_description`; the legacy format emits separate
//! `error_hint` and `error_debug` parameters.

use std::fmt;

use http::StatusCode;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::params::Parameters;

/// OAuth 2.0 error identifiers for the authorization endpoint.
///
/// Defined in RFC 6749 Section 4.1.2.1, plus `invalid_client` from the token
/// endpoint vocabulary for hosts that reuse this type there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthErrorCode {
    /// The request is missing a parameter, repeats one, or is malformed.
    InvalidRequest,

    /// The client may not request an authorization code using this method.
    UnauthorizedClient,

    /// The resource owner or authorization server denied the request.
    AccessDenied,

    /// The server does not support obtaining a code using this method.
    UnsupportedResponseType,

    /// The requested scope is invalid, unknown, or malformed.
    InvalidScope,

    /// Client authentication failed.
    InvalidClient,

    /// An unexpected condition prevented the server from fulfilling the
    /// request.
    ServerError,

    /// The server is temporarily overloaded or under maintenance.
    TemporarilyUnavailable,
}

impl OAuthErrorCode {
    /// Returns the wire identifier of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::AccessDenied => "access_denied",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidScope => "invalid_scope",
            Self::InvalidClient => "invalid_client",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }

    /// Returns the HTTP status code bound to this identifier.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest
            | Self::UnauthorizedClient
            | Self::UnsupportedResponseType
            | Self::InvalidScope => StatusCode::BAD_REQUEST,
            Self::InvalidClient => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TemporarilyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the canonical RFC 6749 description for this identifier.
    #[must_use]
    pub fn default_description(&self) -> &'static str {
        match self {
            Self::InvalidRequest => {
                "The request is missing a required parameter, includes an invalid parameter value, includes a parameter more than once, or is otherwise malformed."
            }
            Self::UnauthorizedClient => {
                "The client is not authorized to request a token using this method."
            }
            Self::AccessDenied => {
                "The resource owner or authorization server denied the request."
            }
            Self::UnsupportedResponseType => {
                "The authorization server does not support obtaining a token using this method."
            }
            Self::InvalidScope => "The requested scope is invalid, unknown, or malformed.",
            Self::InvalidClient => {
                "Client authentication failed (e.g., unknown client, no client authentication included, or unsupported authentication method)."
            }
            Self::ServerError => {
                "The authorization server encountered an unexpected condition that prevented it from fulfilling the request."
            }
            Self::TemporarilyUnavailable => {
                "The authorization server is currently unable to handle the request due to a temporary overloading or maintenance of the server."
            }
        }
    }
}

impl fmt::Display for OAuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Localizes error descriptions and hints.
///
/// Implementations may back this however they like (gettext catalogues, a
/// database, static maps). `id` is the machine identifier of the message
/// (error codes for descriptions, the hint text itself for hints); `default`
/// is returned verbatim when no translation exists. Localization never
/// changes the machine-readable error identifier or the status code.
pub trait MessageCatalog: Send + Sync {
    /// Returns the localized text for `id` in `locale`, or `default`.
    fn message(&self, locale: &str, id: &str, default: &str) -> String;
}

/// A structured RFC 6749 error ready for externalization.
///
/// Construction starts from an [`OAuthErrorCode`] (which fixes the identifier,
/// the status code, and the canonical description), then applies the
/// formatting policy via the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rfc6749Error {
    code: OAuthErrorCode,
    description: String,
    hint: String,
    debug: Option<String>,
    legacy_format: bool,
    expose_debug: bool,
}

impl Rfc6749Error {
    /// Creates an error with the canonical description for `code`.
    #[must_use]
    pub fn new(code: OAuthErrorCode) -> Self {
        Self {
            code,
            description: code.default_description().to_string(),
            hint: String::new(),
            debug: None,
            legacy_format: false,
            expose_debug: false,
        }
    }

    /// Replaces the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets a hint with request-specific detail for the client developer.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Attaches debug detail. It is only externalized when debug exposure
    /// is enabled via [`Rfc6749Error::with_expose_debug`].
    #[must_use]
    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = Some(debug.into());
        self
    }

    /// Selects the legacy wire format (separate `error_hint` and
    /// `error_debug` parameters).
    #[must_use]
    pub fn with_legacy_format(mut self, legacy: bool) -> Self {
        self.legacy_format = legacy;
        self
    }

    /// Enables or disables externalization of the debug detail.
    #[must_use]
    pub fn with_expose_debug(mut self, expose: bool) -> Self {
        self.expose_debug = expose;
        self
    }

    /// Localizes the description and hint for `locale` through `catalog`.
    ///
    /// The identifier and status code are never altered.
    #[must_use]
    pub fn with_localizer(mut self, catalog: &dyn MessageCatalog, locale: Option<&str>) -> Self {
        if let Some(locale) = locale {
            self.description = catalog.message(locale, self.code.as_str(), &self.description);
            if !self.hint.is_empty() {
                self.hint = catalog.message(locale, &self.hint, &self.hint);
            }
        }
        self
    }

    /// Returns the machine-readable error identifier.
    #[must_use]
    pub fn code(&self) -> OAuthErrorCode {
        self.code
    }

    /// Returns the HTTP status code mapped from the identifier.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    /// Returns the hint, if one was set.
    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Returns the debug detail regardless of the exposure policy.
    /// For logging on the server side only.
    #[must_use]
    pub fn debug(&self) -> Option<&str> {
        self.debug.as_deref()
    }

    /// The `error_description` value for the active wire format.
    ///
    /// The current format folds the hint, and the debug detail when exposed,
    /// into the description. Double quotes are normalized away so the value
    /// stays safe to embed.
    #[must_use]
    pub fn wire_description(&self) -> String {
        let mut description = self.description.clone();
        if !self.legacy_format {
            if !self.hint.is_empty() {
                description.push(' ');
                description.push_str(&self.hint);
            }
            if self.expose_debug
                && let Some(debug) = &self.debug
            {
                description.push(' ');
                description.push_str(debug);
            }
        }
        description.replace('"', "'")
    }

    /// Renders the error as response parameters for redirect or form-post
    /// delivery.
    #[must_use]
    pub fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.set("error", self.code.as_str());
        let description = self.wire_description();
        if !description.is_empty() {
            params.set("error_description", description);
        }
        if self.legacy_format {
            if !self.hint.is_empty() {
                params.set("error_hint", self.hint.replace('"', "'"));
            }
            if self.expose_debug
                && let Some(debug) = &self.debug
            {
                params.set("error_debug", debug.replace('"', "'"));
            }
        }
        params
    }
}

impl fmt::Display for Rfc6749Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.wire_description())
    }
}

impl Serialize for Rfc6749Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("error", self.code.as_str())?;
        let description = self.wire_description();
        if !description.is_empty() {
            map.serialize_entry("error_description", &description)?;
        }
        if self.legacy_format {
            if !self.hint.is_empty() {
                map.serialize_entry("error_hint", &self.hint.replace('"', "'"))?;
            }
            if self.expose_debug
                && let Some(debug) = &self.debug
            {
                map.serialize_entry("error_debug", &debug.replace('"', "'"))?;
            }
        }
        map.serialize_entry("status_code", &self.code.status().as_u16())?;
        map.end()
    }
}

/// Escapes a string for safe embedding inside a JSON string literal.
///
/// Used by the hardcoded fallback error body, where no serializer is
/// available anymore.
#[must_use]
pub fn escape_json_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                escaped.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => escaped.push(c),
        }
    }
    escaped
}
