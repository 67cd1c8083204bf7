//! Responder configuration.
//!
//! [`ResponderConfig`] is the process-wide, read-only collaborator shared by
//! all concurrent dispatch calls: plain-data policy flags and JARM settings,
//! plus handles to the injected capabilities (signer, message catalogue,
//! extension mode handlers).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encode::FormPostTemplate;
use crate::extension::{ResponseModeHandler, ResponseModeRegistry};
use crate::rfc6749::MessageCatalog;
use crate::signer::ResponseSigner;

/// Settings for the JWT-secured response modes.
///
/// # Example (TOML)
///
/// ```toml
/// [jarm]
/// issuer = "https://as.example"
/// lifespan = "10m"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JarmConfig {
    /// Issuer of response tokens when the session declares none.
    pub issuer: String,

    /// Validity window of response tokens.
    #[serde(with = "humantime_serde")]
    pub lifespan: Duration,
}

impl Default for JarmConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            lifespan: Duration::from_secs(10 * 60),
        }
    }
}

/// Configuration for authorization response delivery.
#[derive(Clone, Default)]
pub struct ResponderConfig {
    /// JWT-secured response mode settings.
    pub jarm: JarmConfig,

    /// Emit errors in the legacy wire format (separate `error_hint` and
    /// `error_debug` parameters).
    pub use_legacy_error_format: bool,

    /// Send debug detail of server-side faults to clients. Leave disabled
    /// outside development environments.
    pub send_debug_messages_to_clients: bool,

    /// Document used for form-post delivery.
    pub form_post_template: FormPostTemplate,

    signer: Option<Arc<dyn ResponseSigner>>,
    message_catalog: Option<Arc<dyn MessageCatalog>>,
    response_modes: ResponseModeRegistry,
}

impl ResponderConfig {
    /// Creates a configuration with defaults and no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the JARM settings.
    #[must_use]
    pub fn with_jarm(mut self, jarm: JarmConfig) -> Self {
        self.jarm = jarm;
        self
    }

    /// Selects the legacy error wire format.
    #[must_use]
    pub fn with_legacy_error_format(mut self, legacy: bool) -> Self {
        self.use_legacy_error_format = legacy;
        self
    }

    /// Enables sending debug detail to clients.
    #[must_use]
    pub fn with_debug_messages(mut self, send: bool) -> Self {
        self.send_debug_messages_to_clients = send;
        self
    }

    /// Replaces the form-post document.
    #[must_use]
    pub fn with_form_post_template(mut self, template: FormPostTemplate) -> Self {
        self.form_post_template = template;
        self
    }

    /// Attaches the response signer required by the JWT-secured modes.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn ResponseSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Attaches a message catalogue for localized error text.
    #[must_use]
    pub fn with_message_catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.message_catalog = Some(catalog);
        self
    }

    /// Registers an extension response mode handler.
    #[must_use]
    pub fn with_response_mode_handler(mut self, handler: Arc<dyn ResponseModeHandler>) -> Self {
        self.response_modes.register(handler);
        self
    }

    /// Returns the configured signer, if any.
    #[must_use]
    pub fn signer(&self) -> Option<&Arc<dyn ResponseSigner>> {
        self.signer.as_ref()
    }

    /// Returns the configured message catalogue, if any.
    #[must_use]
    pub fn message_catalog(&self) -> Option<&Arc<dyn MessageCatalog>> {
        self.message_catalog.as_ref()
    }

    /// Returns the extension response mode registry.
    #[must_use]
    pub fn response_modes(&self) -> &ResponseModeRegistry {
        &self.response_modes
    }
}

impl fmt::Debug for ResponderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponderConfig")
            .field("jarm", &self.jarm)
            .field("use_legacy_error_format", &self.use_legacy_error_format)
            .field(
                "send_debug_messages_to_clients",
                &self.send_debug_messages_to_clients,
            )
            .field("has_signer", &self.signer.is_some())
            .field("has_message_catalog", &self.message_catalog.is_some())
            .field("response_modes", &self.response_modes)
            .finish()
    }
}
