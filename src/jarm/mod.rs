//! JWT Secured Authorization Response Mode (JARM).
//!
//! Instead of sending response parameters as plaintext query, fragment, or
//! form fields, the JWT-secured modes wrap them in a signed token and deliver
//! that token as the single `response` parameter. The claim set binds the
//! token to the issuer, the requesting client, and a validity window.
//!
//! All failures here are server-side configuration faults: a session and a
//! signer are hard requirements of the JWT-secured modes, never something
//! the client did wrong.

mod claims;

pub use claims::JarmClaims;

use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::ResponderConfig;
use crate::params::Parameters;
use crate::session::SessionClaims;
use crate::signer::SignedToken;

/// Errors raised while producing a JWT-secured response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JarmError {
    /// The authorization request carried no session.
    #[error(
        "The JWT-secured response modes require the authorization request to carry a session, but none was attached"
    )]
    MissingSession,

    /// No response signer is configured.
    #[error("The JWT-secured response modes require a configured response signer")]
    MissingSigner,

    /// The signer failed to produce a token.
    #[error(transparent)]
    Signing(#[from] crate::signer::SigningError),
}

/// Wraps `params` in a signed response token.
///
/// Returns a single-entry parameter collection `response=<token>`; the
/// original plaintext parameters are embedded inside the token and dropped
/// from the wire representation.
///
/// # Errors
/// Fails when the session or signer is missing, or when signing fails.
pub fn generate_parameters(
    config: &ResponderConfig,
    client_id: &str,
    session: Option<&SessionClaims>,
    params: &Parameters,
) -> Result<Parameters, JarmError> {
    let signed = generate_token(config, client_id, session, params)?;
    let mut parameters = Parameters::new();
    parameters.set("response", signed.token);
    Ok(parameters)
}

/// Builds the JARM claim set for `params` and signs it.
///
/// The token issuer is the session's own `iss` claim when it declares one,
/// falling back to the configured issuer. Every response parameter is
/// flattened onto the claim set as a string-valued entry.
///
/// # Errors
/// Fails when the session or signer is missing, or when signing fails.
pub fn generate_token(
    config: &ResponderConfig,
    client_id: &str,
    session: Option<&SessionClaims>,
    params: &Parameters,
) -> Result<SignedToken, JarmError> {
    let session = session.ok_or(JarmError::MissingSession)?;

    let issuer = session
        .claims()
        .get("iss")
        .and_then(Value::as_str)
        .filter(|iss| !iss.is_empty())
        .map_or_else(|| config.jarm.issuer.clone(), ToString::to_string);

    let now = OffsetDateTime::now_utc();
    let mut claims = JarmClaims {
        jti: Uuid::new_v4().to_string(),
        issuer,
        audience: vec![client_id.to_string()],
        issued_at: Some(now),
        expires_at: Some(now + config.jarm.lifespan),
        extra: crate::signer::MapClaims::new(),
    };

    for (key, value) in params.iter() {
        claims.add(key, Value::String(value.to_string()));
    }

    let signer = config.signer().ok_or(JarmError::MissingSigner)?;
    Ok(signer.generate(&claims.to_map(), session.headers())?)
}
