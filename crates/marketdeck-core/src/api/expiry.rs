use std::sync::Arc;

use tracing::error;

use crate::auth::{Navigator, SessionStore};

use super::observability::{EventKind, EventSink, LogEvent, LogFields, Severity};
use super::pipeline::{RequestContext, Stage};
use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    Unauthenticated,
}

/// Ends the session when a service answers 401.
///
/// Clears the stored token and sends the user to the login entry point.
/// Only the login flow moves the session back to `Authenticated`.
pub struct SessionExpiryHandler {
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    sink: Arc<dyn EventSink>,
}

impl SessionExpiryHandler {
    pub fn new(
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            session,
            navigator,
            sink,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}

impl Stage for SessionExpiryHandler {
    fn name(&self) -> &'static str {
        "session-expiry"
    }

    fn on_failure(&self, ctx: &RequestContext, failure: &ApiError) {
        if !failure.is_unauthorized() {
            return;
        }

        self.sink.emit(&LogEvent {
            kind: EventKind::SessionExpired,
            severity: Severity::Warn,
            message: "Session expired, redirecting to login",
            fields: LogFields {
                status: failure.status().map(|s| s.as_u16()),
                correlation_id: failure.correlation_id().map(str::to_string),
                ..LogFields::for_request(ctx)
            },
            failure: None,
        });

        if let Err(e) = self.session.clear() {
            error!(error = %e, "Failed to clear session token");
        }
        self.navigator.go_to_login();
    }
}
