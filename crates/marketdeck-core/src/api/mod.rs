//! REST API client module for the MarketDeck services.
//!
//! This module provides the `ApiClient` for talking to the primary service
//! (auth, campaigns, agents) and the analytics service. Every call runs
//! through the same pipeline:
//!
//! 1. `CredentialAttacher` adds the stored session token as a bearer credential
//! 2. `ObservabilityInterceptor` stamps the request and logs its outcome
//! 3. `SessionExpiryHandler` ends the session on a 401
//!
//! Errors are always returned to the caller after the stages have run.

pub mod client;
mod credentials;
mod endpoints;
pub mod error;
pub mod expiry;
pub mod observability;
pub mod pipeline;

pub use client::{ApiClient, ApiClientBuilder, CORRELATION_HEADER};
pub use credentials::CredentialAttacher;
pub use error::{ApiError, ErrorResponse};
pub use expiry::{SessionExpiryHandler, SessionState};
pub use observability::{
    EventKind, EventSink, LogEvent, LogFields, ObservabilityInterceptor, Severity, TracingSink,
};
pub use pipeline::{Pipeline, RequestContext, ResponseMeta, Service, Stage};
