//! Authorization response delivery for OAuth 2.0 and OpenID Connect servers.
//!
//! This crate implements the back half of an authorization endpoint: once the
//! host has validated an authorization request and produced an outcome, the
//! [`AuthorizeResponder`] delivers that outcome to the client through the
//! requested response mode. Supported are the plaintext modes of RFC 6749 and
//! OAuth 2.0 Form Post Response Mode (`query`, `fragment`, `form_post`), the
//! JWT-secured modes of JARM (`jwt`, `query.jwt`, `fragment.jwt`,
//! `form_post.jwt`), and host-registered extension modes.
//!
//! # Modules
//!
//! - [`respond`]: the dispatcher with the shared success/error pipeline
//! - [`mode`]: response mode parsing and canonicalization
//! - [`encode`]: query, fragment, and form-post wire encoding
//! - [`jarm`]: JWT-secured response generation
//! - [`rfc6749`]: structured OAuth errors and their wire formats
//! - [`error`]: the internal failure taxonomy
//! - [`config`]: responder configuration
//! - [`signer`]: response token signing
//! - [`session`]: session claim capabilities
//! - [`transport`]: the minimal HTTP response surface
//! - [`extension`]: extension response mode handlers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use authwrite::{
//!     AuthorizeContext, AuthorizeResponder, Parameters, RecordedResponse,
//!     ResponderConfig, SuccessPayload,
//! };
//! use url::Url;
//!
//! let responder = AuthorizeResponder::new(Arc::new(ResponderConfig::new()));
//! let ctx = AuthorizeContext::new("client-1")
//!     .with_redirect_uri(Url::parse("https://cb.example/cb").unwrap())
//!     .with_state("xyz");
//! let payload = SuccessPayload::new(Parameters::from_pairs([
//!     ("code", "abc"),
//!     ("state", "xyz"),
//! ]));
//!
//! let mut rw = RecordedResponse::new();
//! responder.write_authorize_response(&mut rw, &ctx, &payload);
//! assert_eq!(
//!     rw.header("location"),
//!     Some("https://cb.example/cb?code=abc&state=xyz"),
//! );
//! ```

pub mod config;
pub mod context;
pub mod encode;
pub mod error;
pub mod extension;
pub mod jarm;
pub mod mode;
pub mod params;
pub mod respond;
pub mod rfc6749;
pub mod session;
pub mod signer;
pub mod transport;

pub use config::{JarmConfig, ResponderConfig};
pub use context::{AuthorizeContext, SuccessPayload};
pub use encode::{FormPostTemplate, TransportAction};
pub use error::AuthorizeError;
pub use extension::{ResponseModeHandler, ResponseModeRegistry};
pub use jarm::{JarmClaims, JarmError};
pub use mode::{resolve_response_mode, ConcreteResponseMode, DeliveryMethod, ResponseMode};
pub use params::Parameters;
pub use respond::AuthorizeResponder;
pub use rfc6749::{MessageCatalog, OAuthErrorCode, Rfc6749Error};
pub use session::{JwtHeaders, SessionClaims};
pub use signer::{JwtResponseSigner, ResponseSigner, SignedToken, SigningError};
pub use transport::{set_cache_suppression_headers, RecordedResponse, ResponseTransport};
