//! Authorization response dispatch.
//!
//! [`AuthorizeResponder`] is the single entry point for delivering the
//! outcome of an authorization request back to the client, successful or
//! not. Both entry points run the same pipeline: resolve the response mode,
//! wrap the parameters in a signed token for the JWT-secured modes, encode
//! them for the carrier, and write the transport action. Sharing the
//! pipeline guarantees an error is never delivered through a different
//! channel than the matching success would have used.
//!
//! An unvalidated redirect target is never redirected to. Whenever the
//! context carries no `redirect_uri`, and whenever a server-side fault makes
//! redirecting unsafe, the error is written as a JSON body instead.

use std::sync::Arc;

use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, StatusCode};

use crate::config::ResponderConfig;
use crate::context::{AuthorizeContext, SuccessPayload};
use crate::encode::{encode_parameters, TransportAction};
use crate::error::AuthorizeError;
use crate::jarm;
use crate::mode::{resolve_response_mode, ConcreteResponseMode};
use crate::params::Parameters;
use crate::rfc6749::{escape_json_string, OAuthErrorCode, Rfc6749Error};
use crate::transport::{set_cache_suppression_headers, ResponseTransport};

/// Content type of the JSON error body.
const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// The outcome being delivered, after error formatting.
enum Outcome<'a> {
    Success(&'a SuccessPayload),
    Error {
        cause: &'a AuthorizeError,
        formatted: &'a Rfc6749Error,
    },
}

impl Outcome<'_> {
    /// Renders the outcome as response parameters. Error delivery echoes
    /// the client's `state` token alongside the error parameters.
    fn to_parameters(&self, ctx: &AuthorizeContext) -> Parameters {
        match self {
            Outcome::Success(payload) => payload.parameters.clone(),
            Outcome::Error { formatted, .. } => {
                let mut params = formatted.to_parameters();
                params.set("state", &ctx.state);
                params
            }
        }
    }
}

/// Delivers authorization outcomes over a [`ResponseTransport`].
///
/// Cheap to clone; all dispatch state is call-scoped, so one responder is
/// safely shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct AuthorizeResponder {
    config: Arc<ResponderConfig>,
}

impl AuthorizeResponder {
    /// Creates a responder over the given configuration.
    #[must_use]
    pub fn new(config: Arc<ResponderConfig>) -> Self {
        Self { config }
    }

    /// Delivers a successful authorization outcome.
    ///
    /// Custom headers from the payload are merged first; the
    /// cache-suppression directives are applied afterwards and therefore
    /// always win.
    pub fn write_authorize_response(
        &self,
        rw: &mut dyn ResponseTransport,
        ctx: &AuthorizeContext,
        payload: &SuccessPayload,
    ) {
        for (name, value) in &payload.headers {
            rw.headers_mut().insert(name.clone(), value.clone());
        }
        set_cache_suppression_headers(rw.headers_mut());
        self.deliver(rw, ctx, &Outcome::Success(payload));
    }

    /// Delivers an authorization error.
    ///
    /// When the context carries no validated redirect target the error is
    /// written as a JSON body with the status mapped from its identifier;
    /// the user agent is never redirected to an unvalidated target.
    pub fn write_authorize_error(
        &self,
        rw: &mut dyn ResponseTransport,
        ctx: &AuthorizeContext,
        error: &AuthorizeError,
    ) {
        set_cache_suppression_headers(rw.headers_mut());

        let formatted = self.format_error(ctx, error);
        if ctx.redirect_uri.is_none() {
            tracing::debug!(
                client_id = %ctx.client_id,
                error = %formatted.code(),
                "no validated redirect target, writing error as JSON"
            );
            self.write_error_json(rw, &formatted);
            return;
        }

        self.deliver(
            rw,
            ctx,
            &Outcome::Error {
                cause: error,
                formatted: &formatted,
            },
        );
    }

    /// The shared delivery pipeline for success and error outcomes.
    fn deliver(&self, rw: &mut dyn ResponseTransport, ctx: &AuthorizeContext, outcome: &Outcome) {
        let mode = resolve_response_mode(&ctx.response_mode, &ctx.response_types);

        let method = match &mode {
            ConcreteResponseMode::Extension(tag) => {
                let Some(handler) = self.config.response_modes().find(tag) else {
                    tracing::error!(
                        client_id = %ctx.client_id,
                        response_mode = %tag,
                        "no handler registered for extension response mode"
                    );
                    let fault = AuthorizeError::configuration(format!(
                        "No handler is registered for response mode '{tag}'."
                    ));
                    self.write_error_json(rw, &self.format_error(ctx, &fault));
                    return;
                };
                match outcome {
                    Outcome::Success(payload) => handler.write_response(rw, ctx, payload),
                    Outcome::Error { cause, .. } => handler.write_error(rw, ctx, cause),
                }
                return;
            }
            ConcreteResponseMode::Plain(method) | ConcreteResponseMode::Jwt(method) => *method,
        };

        let Some(redirect_uri) = &ctx.redirect_uri else {
            // Success dispatch without a validated target is a host bug;
            // error dispatch already branched to JSON before reaching here.
            tracing::error!(
                client_id = %ctx.client_id,
                "authorization success dispatched without a validated redirect target"
            );
            let fault =
                AuthorizeError::configuration("No validated redirect target is available.");
            self.write_error_json(rw, &self.format_error(ctx, &fault));
            return;
        };

        let mut parameters = outcome.to_parameters(ctx);
        if mode.is_jwt_secured() {
            parameters = match jarm::generate_parameters(
                &self.config,
                &ctx.client_id,
                ctx.session.as_ref(),
                &parameters,
            ) {
                Ok(parameters) => parameters,
                Err(err) => {
                    tracing::error!(
                        client_id = %ctx.client_id,
                        error = %err,
                        "failed to produce JWT-secured response"
                    );
                    let fault = AuthorizeError::server_error(err.to_string());
                    self.write_error_json(rw, &self.format_error(ctx, &fault));
                    return;
                }
            };
        }

        let action = encode_parameters(
            method,
            redirect_uri,
            &parameters,
            &self.config.form_post_template,
        );
        self.transmit(rw, ctx, action);
    }

    /// Writes an encoded transport action to the response.
    fn transmit(&self, rw: &mut dyn ResponseTransport, ctx: &AuthorizeContext, action: TransportAction) {
        match action {
            TransportAction::Redirect { location } => match HeaderValue::from_str(&location) {
                Ok(value) => {
                    rw.headers_mut().insert(LOCATION, value);
                    rw.write_status(StatusCode::SEE_OTHER);
                }
                Err(err) => {
                    tracing::error!(
                        client_id = %ctx.client_id,
                        error = %err,
                        "redirect location is not a valid header value"
                    );
                    let fault =
                        AuthorizeError::server_error("Failed to encode the redirect location.");
                    self.write_error_json(rw, &self.format_error(ctx, &fault));
                }
            },
            TransportAction::Body {
                status,
                content_type,
                body,
            } => {
                rw.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                rw.write_status(status);
                rw.write_body(body.as_bytes());
            }
        }
    }

    /// Applies the configured formatting policy to an error.
    fn format_error(&self, ctx: &AuthorizeContext, error: &AuthorizeError) -> Rfc6749Error {
        let mut formatted = error
            .to_rfc6749()
            .with_legacy_format(self.config.use_legacy_error_format)
            .with_expose_debug(self.config.send_debug_messages_to_clients);
        if let Some(catalog) = self.config.message_catalog() {
            formatted = formatted.with_localizer(catalog.as_ref(), ctx.locale.as_deref());
        }
        formatted
    }

    /// Writes an error as a JSON body with its mapped status code.
    fn write_error_json(&self, rw: &mut dyn ResponseTransport, error: &Rfc6749Error) {
        rw.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        match serde_json::to_vec(error) {
            Ok(body) => {
                rw.write_status(error.status());
                rw.write_body(&body);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize error body");
                let mut body = format!(r#"{{"error":"{}""#, OAuthErrorCode::ServerError.as_str());
                if self.config.send_debug_messages_to_clients {
                    body.push_str(&format!(
                        r#","error_description":"{}""#,
                        escape_json_string(&err.to_string())
                    ));
                }
                body.push('}');
                rw.write_status(StatusCode::INTERNAL_SERVER_ERROR);
                rw.write_body(body.as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JarmConfig;
    use crate::extension::ResponseModeHandler;
    use crate::mode::ResponseMode;
    use crate::rfc6749::MessageCatalog;
    use crate::session::{JwtHeaders, SessionClaims};
    use crate::signer::{MapClaims, ResponseSigner, SignedToken, SigningError};
    use crate::transport::RecordedResponse;
    use serde_json::{json, Map};
    use std::time::Duration;
    use url::Url;

    struct StaticSigner;

    impl ResponseSigner for StaticSigner {
        fn generate(
            &self,
            _claims: &MapClaims,
            _headers: &JwtHeaders,
        ) -> Result<SignedToken, SigningError> {
            Ok(SignedToken {
                token: "abc.def.ghi".to_string(),
                signature: "ghi".to_string(),
            })
        }
    }

    fn session() -> SessionClaims {
        SessionClaims::JwtContainer {
            headers: JwtHeaders::new(),
            claims: Map::new(),
        }
    }

    fn responder(config: ResponderConfig) -> AuthorizeResponder {
        AuthorizeResponder::new(Arc::new(config))
    }

    fn jarm_responder() -> AuthorizeResponder {
        responder(
            ResponderConfig::new()
                .with_jarm(JarmConfig {
                    issuer: "https://as.example".to_string(),
                    lifespan: Duration::from_secs(600),
                })
                .with_signer(Arc::new(StaticSigner)),
        )
    }

    fn ctx(mode: ResponseMode) -> AuthorizeContext {
        AuthorizeContext::new("client-1")
            .with_redirect_uri(Url::parse("https://cb.example/cb").unwrap())
            .with_response_mode(mode)
            .with_state("xyz")
    }

    fn payload() -> SuccessPayload {
        SuccessPayload::new(Parameters::from_pairs([("code", "abc"), ("state", "xyz")]))
    }

    #[test]
    fn test_success_delivery_per_mode() {
        // Redirect modes: (mode, expected location).
        let redirects = [
            (
                ResponseMode::Default,
                "https://cb.example/cb?code=abc&state=xyz",
            ),
            (
                ResponseMode::Query,
                "https://cb.example/cb?code=abc&state=xyz",
            ),
            (
                ResponseMode::Fragment,
                "https://cb.example/cb#code=abc&state=xyz",
            ),
            (ResponseMode::Jwt, "https://cb.example/cb?response=abc.def.ghi"),
            (
                ResponseMode::JwtQuery,
                "https://cb.example/cb?response=abc.def.ghi",
            ),
            (
                ResponseMode::JwtFragment,
                "https://cb.example/cb#response=abc.def.ghi",
            ),
        ];
        for (mode, location) in redirects {
            let mut rw = RecordedResponse::new();
            jarm_responder().write_authorize_response(
                &mut rw,
                &ctx(mode.clone()).with_session(session()),
                &payload(),
            );
            assert_eq!(rw.status, Some(StatusCode::SEE_OTHER), "mode {mode}");
            assert_eq!(rw.header("location"), Some(location), "mode {mode}");
        }

        // Body modes render an auto-submitting form.
        for mode in [ResponseMode::FormPost, ResponseMode::JwtFormPost] {
            let mut rw = RecordedResponse::new();
            jarm_responder().write_authorize_response(
                &mut rw,
                &ctx(mode.clone()).with_session(session()),
                &payload(),
            );
            assert_eq!(rw.status, Some(StatusCode::OK), "mode {mode}");
            assert_eq!(
                rw.header("content-type"),
                Some("text/html;charset=UTF-8"),
                "mode {mode}"
            );
            assert!(rw.body_str().contains("document.forms[0].submit()"));
        }
    }

    #[test]
    fn test_cache_suppression_on_every_response() {
        let mut success = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_response(
            &mut success,
            &ctx(ResponseMode::Query),
            &payload(),
        );
        assert_eq!(success.header("cache-control"), Some("no-store"));
        assert_eq!(success.header("pragma"), Some("no-cache"));

        let mut error = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_error(
            &mut error,
            &AuthorizeContext::new("client-1"),
            &AuthorizeError::invalid_request("bad"),
        );
        assert_eq!(error.header("cache-control"), Some("no-store"));
        assert_eq!(error.header("pragma"), Some("no-cache"));
    }

    #[test]
    fn test_payload_headers_cannot_override_cache_suppression() {
        let mut payload = payload();
        payload
            .headers
            .insert("cache-control", HeaderValue::from_static("max-age=3600"));
        payload
            .headers
            .insert("x-custom", HeaderValue::from_static("kept"));

        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_response(
            &mut rw,
            &ctx(ResponseMode::Query),
            &payload,
        );
        assert_eq!(rw.header("cache-control"), Some("no-store"));
        assert_eq!(rw.header("x-custom"), Some("kept"));
    }

    #[test]
    fn test_untrusted_redirect_writes_json_error() {
        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_error(
            &mut rw,
            &AuthorizeContext::new("client-1").with_state("xyz"),
            &AuthorizeError::access_denied("nope"),
        );

        assert_eq!(rw.status, Some(StatusCode::FORBIDDEN));
        assert!(rw.header("location").is_none());
        assert_eq!(rw.header("content-type"), Some(JSON_CONTENT_TYPE));

        let body: serde_json::Value = serde_json::from_slice(&rw.body).unwrap();
        assert_eq!(body["error"], json!("access_denied"));
        assert_eq!(body["status_code"], json!(403));
    }

    #[test]
    fn test_fragment_error_delivery() {
        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_error(
            &mut rw,
            &ctx(ResponseMode::Fragment),
            &AuthorizeError::invalid_scope("The scope is unknown."),
        );

        assert_eq!(rw.status, Some(StatusCode::SEE_OTHER));
        let location = rw.header("location").unwrap();
        let (base, fragment) = location.split_once('#').unwrap();
        assert_eq!(base, "https://cb.example/cb");
        let params: Parameters = url::form_urlencoded::parse(fragment.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(params.get("error"), Some("invalid_scope"));
        assert!(params.get("error_description").unwrap().contains("unknown"));
        assert_eq!(params.get("state"), Some("xyz"));
    }

    #[test]
    fn test_error_mode_matches_success_mode() {
        // The generic jwt mode with a hybrid response type set resolves to
        // the fragment for errors exactly as it would for successes.
        let context = ctx(ResponseMode::Jwt)
            .with_response_types(["code", "id_token"])
            .with_session(session());

        let mut rw = RecordedResponse::new();
        jarm_responder().write_authorize_error(
            &mut rw,
            &context,
            &AuthorizeError::access_denied("nope"),
        );

        let location = rw.header("location").unwrap();
        assert!(location.contains("#response=abc.def.ghi"));
    }

    #[test]
    fn test_jwt_mode_without_signer_is_server_fault() {
        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_response(
            &mut rw,
            &ctx(ResponseMode::JwtQuery).with_session(session()),
            &payload(),
        );

        assert_eq!(rw.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(rw.header("location").is_none());
        let body: serde_json::Value = serde_json::from_slice(&rw.body).unwrap();
        assert_eq!(body["error"], json!("server_error"));
    }

    #[test]
    fn test_jwt_mode_without_session_is_server_fault() {
        let mut rw = RecordedResponse::new();
        jarm_responder().write_authorize_response(
            &mut rw,
            &ctx(ResponseMode::JwtQuery),
            &payload(),
        );

        assert_eq!(rw.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        let body: serde_json::Value = serde_json::from_slice(&rw.body).unwrap();
        assert_eq!(body["error"], json!("server_error"));
    }

    #[test]
    fn test_success_without_redirect_target_is_server_fault() {
        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_response(
            &mut rw,
            &AuthorizeContext::new("client-1"),
            &payload(),
        );

        assert_eq!(rw.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(rw.header("location").is_none());
        let body: serde_json::Value = serde_json::from_slice(&rw.body).unwrap();
        assert_eq!(body["error"], json!("server_error"));
    }

    struct WebMessageHandler;

    impl ResponseModeHandler for WebMessageHandler {
        fn handles(&self, mode: &str) -> bool {
            mode == "web_message"
        }

        fn write_response(
            &self,
            rw: &mut dyn ResponseTransport,
            _ctx: &AuthorizeContext,
            payload: &SuccessPayload,
        ) {
            rw.write_status(StatusCode::OK);
            rw.write_body(payload.parameters.to_query_string().as_bytes());
        }

        fn write_error(
            &self,
            rw: &mut dyn ResponseTransport,
            _ctx: &AuthorizeContext,
            error: &AuthorizeError,
        ) {
            rw.write_status(StatusCode::OK);
            rw.write_body(error.oauth_error_code().as_str().as_bytes());
        }
    }

    #[test]
    fn test_extension_mode_dispatches_to_handler() {
        let responder = responder(
            ResponderConfig::new().with_response_mode_handler(Arc::new(WebMessageHandler)),
        );
        let context = ctx(ResponseMode::Extension("web_message".to_string()));

        let mut success = RecordedResponse::new();
        responder.write_authorize_response(&mut success, &context, &payload());
        assert_eq!(success.status, Some(StatusCode::OK));
        assert_eq!(success.body_str(), "code=abc&state=xyz");

        let mut error = RecordedResponse::new();
        responder.write_authorize_error(
            &mut error,
            &context,
            &AuthorizeError::access_denied("nope"),
        );
        assert_eq!(error.body_str(), "access_denied");
    }

    #[test]
    fn test_unhandled_extension_mode_is_configuration_fault() {
        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_response(
            &mut rw,
            &ctx(ResponseMode::Extension("pigeon".to_string())),
            &payload(),
        );

        assert_eq!(rw.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(rw.header("location").is_none());
        let body: serde_json::Value = serde_json::from_slice(&rw.body).unwrap();
        assert_eq!(body["error"], json!("server_error"));
    }

    #[test]
    fn test_debug_detail_only_exposed_when_enabled() {
        let error = AuthorizeError::server_error("pipe broke");

        let mut hidden = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_error(
            &mut hidden,
            &AuthorizeContext::new("client-1"),
            &error,
        );
        assert!(!hidden.body_str().contains("pipe broke"));

        let mut exposed = RecordedResponse::new();
        responder(ResponderConfig::new().with_debug_messages(true)).write_authorize_error(
            &mut exposed,
            &AuthorizeContext::new("client-1"),
            &error,
        );
        assert!(exposed.body_str().contains("pipe broke"));
    }

    #[test]
    fn test_legacy_error_format_on_redirect() {
        let mut rw = RecordedResponse::new();
        responder(
            ResponderConfig::new()
                .with_legacy_error_format(true)
                .with_debug_messages(true),
        )
        .write_authorize_error(
            &mut rw,
            &ctx(ResponseMode::Query),
            &AuthorizeError::server_error("pipe broke"),
        );

        let location = Url::parse(rw.header("location").unwrap()).unwrap();
        let params: Parameters = location
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(params.get("error"), Some("server_error"));
        assert_eq!(params.get("error_debug"), Some("pipe broke"));
        assert!(!params.get("error_description").unwrap().contains("pipe"));
    }

    struct UpperCaseCatalog;

    impl MessageCatalog for UpperCaseCatalog {
        fn message(&self, locale: &str, _id: &str, default: &str) -> String {
            if locale == "shout" {
                default.to_uppercase()
            } else {
                default.to_string()
            }
        }
    }

    #[test]
    fn test_localization_keeps_identifier_and_status() {
        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new().with_message_catalog(Arc::new(UpperCaseCatalog)))
            .write_authorize_error(
                &mut rw,
                &AuthorizeContext::new("client-1").with_locale("shout"),
                &AuthorizeError::access_denied("nope"),
            );

        assert_eq!(rw.status, Some(StatusCode::FORBIDDEN));
        let body: serde_json::Value = serde_json::from_slice(&rw.body).unwrap();
        assert_eq!(body["error"], json!("access_denied"));
        assert!(
            body["error_description"]
                .as_str()
                .unwrap()
                .contains("DENIED")
        );
    }

    #[test]
    fn test_query_delivery_preserves_unrelated_parameters() {
        let context = AuthorizeContext::new("client-1")
            .with_redirect_uri(Url::parse("https://cb.example/cb?tenant=acme").unwrap())
            .with_state("xyz");

        let mut rw = RecordedResponse::new();
        responder(ResponderConfig::new()).write_authorize_response(&mut rw, &context, &payload());

        let location = Url::parse(rw.header("location").unwrap()).unwrap();
        let params: Parameters = location
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(params.get("tenant"), Some("acme"));
        assert_eq!(params.get("code"), Some("abc"));
    }
}
