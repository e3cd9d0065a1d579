//! Request pipeline: the ordered stages every API call passes through.
//!
//! A call builds a [`RequestContext`], runs every stage's `on_request` in
//! order, goes out over the network, then runs every stage's `on_success`
//! or `on_failure` in the same order. Stages only see the context and the
//! outcome; they cannot alter the outcome handed back to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;

use super::ApiError;

/// Which backend a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Auth, campaigns and agents
    Primary,
    Analytics,
}

/// Everything needed to send one request, plus the metadata stages stash
/// on it. Owned by the pipeline for the duration of a single call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub service: Service,
    pub origin: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
    /// Set when the request is handed to the transport
    pub dispatched_at: Option<Instant>,
}

impl RequestContext {
    pub fn new(method: Method, service: Service, origin: &str, path: &str) -> Self {
        Self {
            method,
            service,
            origin: origin.to_string(),
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            dispatched_at: None,
        }
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.origin, self.path)
    }

    /// Query parameters rendered as `k=v&k=v`, for logging
    pub fn params_display(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        Some(
            self.query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&"),
        )
    }

    /// Time since dispatch, zero if the request was never stamped.
    pub fn elapsed(&self) -> Duration {
        self.dispatched_at
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

/// What a successful exchange looked like on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub correlation_id: Option<String>,
}

/// One step of the pipeline. Each hook has a single declared side effect.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_request(&self, _ctx: &mut RequestContext) {}

    fn on_success(&self, _ctx: &RequestContext, _response: &ResponseMeta) {}

    fn on_failure(&self, _ctx: &RequestContext, _error: &ApiError) {}
}

#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn before_dispatch(&self, ctx: &mut RequestContext) {
        for stage in &self.stages {
            stage.on_request(ctx);
        }
    }

    pub fn after_response(&self, ctx: &RequestContext, outcome: Result<&ResponseMeta, &ApiError>) {
        for stage in &self.stages {
            match outcome {
                Ok(response) => stage.on_success(ctx, response),
                Err(error) => stage.on_failure(ctx, error),
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
