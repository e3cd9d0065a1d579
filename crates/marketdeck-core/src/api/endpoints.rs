//! Typed endpoint surface.
//!
//! One method per remote operation. Each maps its arguments onto a request
//! descriptor and hands it to [`ApiClient::execute`]; nothing here retries,
//! validates or reshapes payloads. The service each operation targets is
//! fixed here, not chosen at runtime.

use reqwest::Method;

use crate::models::{
    AgentConfig, AgentRun, AgentRunFilter, AgentRunRequest, AnalyticsFilter, AnalyticsSummary,
    Campaign, CampaignCreate, CampaignUpdate, FunnelReport, LlmStatus, LoginRequest,
    LoginResponse, PublishRequest, RegisterRequest, RegisterResponse, ServiceHealth, Timeseries,
    TimeseriesQuery,
};

use super::client::ApiClient;
use super::pipeline::Service;
use super::ApiError;

impl ApiClient {
    // ===== Auth =====

    /// Exchange credentials for a session token. Does not store the token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let ctx = self
            .request(Method::POST, Service::Primary, "/auth/login")
            .json(&body)?;
        self.execute(ctx).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let ctx = self
            .request(Method::POST, Service::Primary, "/auth/register")
            .json(request)?;
        self.execute(ctx).await
    }

    // ===== Campaigns =====

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.execute(self.request(Method::GET, Service::Primary, "/campaigns"))
            .await
    }

    pub async fn get_campaign(&self, id: i64) -> Result<Campaign, ApiError> {
        let path = format!("/campaigns/{}", id);
        self.execute(self.request(Method::GET, Service::Primary, &path))
            .await
    }

    pub async fn create_campaign(&self, campaign: &CampaignCreate) -> Result<Campaign, ApiError> {
        let ctx = self
            .request(Method::POST, Service::Primary, "/campaigns")
            .json(campaign)?;
        self.execute(ctx).await
    }

    pub async fn update_campaign(&self, id: i64, update: &CampaignUpdate) -> Result<Campaign, ApiError> {
        let path = format!("/campaigns/{}", id);
        let ctx = self
            .request(Method::PUT, Service::Primary, &path)
            .json(update)?;
        self.execute(ctx).await
    }

    pub async fn delete_campaign(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/campaigns/{}", id);
        self.execute(self.request(Method::DELETE, Service::Primary, &path))
            .await
    }

    /// Publish to the given channels. The service's reply is passed through as-is.
    pub async fn publish_campaign(
        &self,
        id: i64,
        request: &PublishRequest,
    ) -> Result<serde_json::Value, ApiError> {
        let path = format!("/campaigns/{}/publish", id);
        let ctx = self
            .request(Method::POST, Service::Primary, &path)
            .json(request)?;
        self.execute(ctx).await
    }

    // ===== Agents =====

    pub async fn agent_configs(&self) -> Result<Vec<AgentConfig>, ApiError> {
        self.execute(self.request(Method::GET, Service::Primary, "/agents/config"))
            .await
    }

    pub async fn run_agent(&self, request: &AgentRunRequest) -> Result<AgentRun, ApiError> {
        let ctx = self
            .request(Method::POST, Service::Primary, "/agents/run")
            .json(request)?;
        self.execute(ctx).await
    }

    pub async fn agent_runs(&self, filter: &AgentRunFilter) -> Result<Vec<AgentRun>, ApiError> {
        let ctx = self
            .request(Method::GET, Service::Primary, "/agents/runs")
            .query(filter.to_query());
        self.execute(ctx).await
    }

    pub async fn agent_run(&self, id: i64) -> Result<AgentRun, ApiError> {
        let path = format!("/agents/runs/{}", id);
        self.execute(self.request(Method::GET, Service::Primary, &path))
            .await
    }

    pub async fn llm_status(&self) -> Result<LlmStatus, ApiError> {
        self.execute(self.request(Method::GET, Service::Primary, "/agents/llm/status"))
            .await
    }

    // ===== Analytics =====

    pub async fn analytics_summary(&self, filter: &AnalyticsFilter) -> Result<AnalyticsSummary, ApiError> {
        let ctx = self
            .request(Method::GET, Service::Analytics, "/summary")
            .query(filter.to_query());
        self.execute(ctx).await
    }

    pub async fn timeseries(&self, query: &TimeseriesQuery) -> Result<Timeseries, ApiError> {
        let ctx = self
            .request(Method::GET, Service::Analytics, "/timeseries")
            .query(query.to_query());
        self.execute(ctx).await
    }

    /// Funnel over the given event steps, e.g. `["pageview", "click", "conversion"]`.
    /// An empty list leaves the step choice to the service.
    pub async fn funnel<S: AsRef<str>>(
        &self,
        steps: &[S],
        filter: &AnalyticsFilter,
    ) -> Result<FunnelReport, ApiError> {
        let mut query = Vec::new();
        if !steps.is_empty() {
            let joined = steps.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(",");
            query.push(("steps".to_string(), joined));
        }
        query.extend(filter.to_query());
        let ctx = self
            .request(Method::GET, Service::Analytics, "/funnel")
            .query(query);
        self.execute(ctx).await
    }

    pub async fn analytics_health(&self) -> Result<ServiceHealth, ApiError> {
        self.execute(self.request(Method::GET, Service::Analytics, "/health"))
            .await
    }
}
