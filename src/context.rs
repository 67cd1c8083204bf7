//! Call-scoped authorization context and success payload.

use http::HeaderMap;
use url::Url;

use crate::mode::ResponseMode;
use crate::params::Parameters;
use crate::session::SessionClaims;

/// The read-only view of an in-flight authorization request that response
/// delivery needs.
///
/// The hosting endpoint validates the request (client, redirect target,
/// scopes, PKCE) before dispatch; this context only carries the result of
/// that validation. `redirect_uri` is `None` when the target could not be
/// verified as registered — delivery then never redirects.
#[derive(Debug, Clone)]
pub struct AuthorizeContext {
    /// The validated redirect target, or `None` when untrusted.
    pub redirect_uri: Option<Url>,

    /// The requested response types (e.g. `["code"]`).
    pub response_types: Vec<String>,

    /// The requested response mode.
    pub response_mode: ResponseMode,

    /// The requesting client's identifier.
    pub client_id: String,

    /// The authorization session's claim capability, when one exists.
    /// Required for the JWT-secured response modes.
    pub session: Option<SessionClaims>,

    /// The client's `state` request token, echoed back on error delivery.
    pub state: String,

    /// Preferred locale for human-readable error text (from `ui_locales`).
    pub locale: Option<String>,
}

impl AuthorizeContext {
    /// Creates a context with defaults: no redirect target, response type
    /// `code`, default response mode, no session.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            redirect_uri: None,
            response_types: vec!["code".to_string()],
            response_mode: ResponseMode::Default,
            client_id: client_id.into(),
            session: None,
            state: String::new(),
            locale: None,
        }
    }

    /// Sets the validated redirect target.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: Url) -> Self {
        self.redirect_uri = Some(redirect_uri);
        self
    }

    /// Sets the requested response types.
    #[must_use]
    pub fn with_response_types(
        mut self,
        response_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.response_types = response_types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the requested response mode.
    #[must_use]
    pub fn with_response_mode(mut self, response_mode: ResponseMode) -> Self {
        self.response_mode = response_mode;
        self
    }

    /// Attaches the session's claim capability.
    #[must_use]
    pub fn with_session(mut self, session: SessionClaims) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the `state` request token.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Sets the preferred locale for error text.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// The successful outcome of an authorization request.
#[derive(Debug, Clone, Default)]
pub struct SuccessPayload {
    /// Custom headers to merge into the response before the
    /// cache-suppression directives are applied.
    pub headers: HeaderMap,

    /// The response parameters (authorization code, state, tokens, ...).
    pub parameters: Parameters,
}

impl SuccessPayload {
    /// Creates a payload carrying `parameters` and no custom headers.
    #[must_use]
    pub fn new(parameters: Parameters) -> Self {
        Self {
            headers: HeaderMap::new(),
            parameters,
        }
    }
}
