//! Extension response modes.
//!
//! Response modes this crate does not know at compile time can be served by
//! registering a [`ResponseModeHandler`]. The registry is owned by the
//! responder configuration and queried by mode tag during dispatch; an
//! extension mode without a registered handler is a configuration fault.

use std::fmt;
use std::sync::Arc;

use crate::context::{AuthorizeContext, SuccessPayload};
use crate::error::AuthorizeError;
use crate::transport::ResponseTransport;

/// Handles delivery for response modes unknown to the built-in resolver.
///
/// Implementations receive the same context and outcome the built-in
/// pipeline would and are responsible for the full transport write,
/// including any framing of their own.
pub trait ResponseModeHandler: Send + Sync {
    /// Returns `true` if this handler serves the given mode tag.
    fn handles(&self, mode: &str) -> bool;

    /// Delivers a successful authorization outcome.
    fn write_response(
        &self,
        rw: &mut dyn ResponseTransport,
        ctx: &AuthorizeContext,
        payload: &SuccessPayload,
    );

    /// Delivers an authorization error.
    fn write_error(
        &self,
        rw: &mut dyn ResponseTransport,
        ctx: &AuthorizeContext,
        error: &AuthorizeError,
    );
}

/// Registry of extension response mode handlers, queried by mode tag.
#[derive(Clone, Default)]
pub struct ResponseModeRegistry {
    handlers: Vec<Arc<dyn ResponseModeHandler>>,
}

impl ResponseModeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. Handlers are queried in registration order.
    pub fn register(&mut self, handler: Arc<dyn ResponseModeHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the first handler serving `mode`, if any.
    #[must_use]
    pub fn find(&self, mode: &str) -> Option<&Arc<dyn ResponseModeHandler>> {
        self.handlers.iter().find(|handler| handler.handles(mode))
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ResponseModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseModeRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
