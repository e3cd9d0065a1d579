//! API client for the MarketDeck services.
//!
//! `ApiClient` owns one `reqwest::Client` and the request pipeline
//! (credentials → observability → session expiry). Typed endpoint methods
//! live in `endpoints.rs`; they all funnel into [`ApiClient::execute`].

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{MemorySessionStore, Navigator, NoopNavigator, SessionStore};
use crate::config::ServiceOrigins;

use super::credentials::CredentialAttacher;
use super::expiry::{SessionExpiryHandler, SessionState};
use super::observability::{EventSink, ObservabilityInterceptor, TracingSink};
use super::pipeline::{Pipeline, RequestContext, ResponseMeta, Service};
use super::ApiError;

/// Response header carrying the server-side request ID
pub const CORRELATION_HEADER: &str = "x-request-id";

/// API client for the campaign, agent and analytics services.
/// Clone is cheap - reqwest::Client and the stages are reference counted.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    origins: ServiceOrigins,
    pipeline: Pipeline,
    session: Arc<dyn SessionStore>,
}

pub struct ApiClientBuilder {
    origins: ServiceOrigins,
    session: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    sink: Option<Arc<dyn EventSink>>,
    client: Option<Client>,
}

impl ApiClientBuilder {
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Use a preconfigured HTTP client, sharing its connection pool
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut headers = HeaderMap::new();
                headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
                Client::builder().default_headers(headers).build()?
            }
        };

        let session: Arc<dyn SessionStore> = match self.session {
            Some(session) => session,
            None => Arc::new(MemorySessionStore::new()),
        };
        let navigator: Arc<dyn Navigator> = match self.navigator {
            Some(navigator) => navigator,
            None => Arc::new(NoopNavigator),
        };
        let sink: Arc<dyn EventSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(TracingSink),
        };

        let pipeline = Pipeline::new()
            .with_stage(CredentialAttacher::new(session.clone()))
            .with_stage(ObservabilityInterceptor::new(sink.clone()))
            .with_stage(SessionExpiryHandler::new(session.clone(), navigator, sink));

        Ok(ApiClient {
            client,
            origins: self.origins,
            pipeline,
            session,
        })
    }
}

impl ApiClient {
    pub fn builder(origins: ServiceOrigins) -> ApiClientBuilder {
        ApiClientBuilder {
            origins,
            session: None,
            navigator: None,
            sink: None,
            client: None,
        }
    }

    /// Create a client logging through `tracing`
    pub fn new(
        origins: ServiceOrigins,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Self::builder(origins)
            .session(session)
            .navigator(navigator)
            .build()
    }

    pub fn origins(&self) -> &ServiceOrigins {
        &self.origins
    }

    pub fn origin(&self, service: Service) -> &str {
        match service {
            Service::Primary => &self.origins.primary,
            Service::Analytics => &self.origins.analytics,
        }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        if self.session.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Start a request descriptor against one of the services
    pub fn request(&self, method: Method, service: Service, path: &str) -> RequestContext {
        RequestContext::new(method, service, self.origin(service), path)
    }

    /// Run a request through the pipeline and decode the response body.
    ///
    /// Failures are logged and passed to the stages, then returned unchanged.
    pub async fn execute<T: DeserializeOwned>(&self, mut ctx: RequestContext) -> Result<T, ApiError> {
        self.pipeline.before_dispatch(&mut ctx);

        let result = self.dispatch::<T>(&ctx).await;
        match &result {
            Ok((meta, _)) => self.pipeline.after_response(&ctx, Ok(meta)),
            Err(e) => self.pipeline.after_response(&ctx, Err(e)),
        }

        result.map(|(_, value)| value)
    }

    async fn dispatch<T: DeserializeOwned>(&self, ctx: &RequestContext) -> Result<(ResponseMeta, T), ApiError> {
        let mut request = self
            .client
            .request(ctx.method.clone(), ctx.url())
            .headers(ctx.headers.clone());
        if !ctx.query.is_empty() {
            request = request.query(&ctx.query);
        }
        if let Some(ref body) = ctx.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let correlation_id = response
            .headers()
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            // The status line already arrived; a cut-off body must not hide it
            let body = match response.bytes().await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                    String::new()
                }
            };
            return Err(ApiError::from_status(status, &body, correlation_id));
        }

        let bytes = response.bytes().await?;

        // Empty bodies (204 No Content) decode as JSON null, i.e. `()`
        let raw: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        match serde_json::from_slice(raw) {
            Ok(value) => Ok((
                ResponseMeta {
                    status,
                    correlation_id,
                },
                value,
            )),
            Err(e) => Err(ApiError::InvalidResponse {
                status,
                message: format!("Failed to parse JSON response from {}: {}", ctx.path, e),
                correlation_id,
            }),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("origins", &self.origins)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
