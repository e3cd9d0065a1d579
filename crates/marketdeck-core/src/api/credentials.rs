use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use tracing::warn;

use crate::auth::SessionStore;

use super::pipeline::{RequestContext, Stage};

/// Puts the stored session token on outgoing requests as a bearer credential.
pub struct CredentialAttacher {
    session: Arc<dyn SessionStore>,
}

impl CredentialAttacher {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }
}

impl Stage for CredentialAttacher {
    fn name(&self) -> &'static str {
        "credentials"
    }

    fn on_request(&self, ctx: &mut RequestContext) {
        let Some(token) = self.session.get() else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                ctx.headers.insert(header::AUTHORIZATION, value);
            }
            Err(_) => {
                warn!(path = %ctx.path, "Stored session token is not a valid header value, sending request without it");
            }
        }
    }
}
