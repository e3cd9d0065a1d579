//! Data models for the MarketDeck services.
//!
//! This module contains the request and response shapes of the remote
//! services the client talks to:
//!
//! - Auth: `LoginRequest`, `LoginResponse`, `RegisterRequest`, `RegisterResponse`
//! - Campaigns: `Campaign`, `CampaignCreate`, `CampaignUpdate`, `PublishRequest`
//! - Agents: `AgentConfig`, `AgentRunRequest`, `AgentRun`, `LlmStatus`
//! - Analytics: `AnalyticsSummary`, `Timeseries`, `FunnelReport`
//!
//! The services are the only validators of these payloads. Loosely typed
//! fields (agent context, run output) stay as `serde_json::Value`.

pub mod agent;
pub mod analytics;
pub mod auth;
pub mod campaign;

pub use agent::{AgentConfig, AgentRun, AgentRunFilter, AgentRunRequest, LlmProviderStatus, LlmStatus};
pub use analytics::{
    AnalyticsFilter, AnalyticsSummary, FunnelReport, FunnelStep, Granularity, ServiceHealth,
    Timeseries, TimeseriesPoint, TimeseriesQuery,
};
pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use campaign::{Campaign, CampaignCreate, CampaignUpdate, PublishRequest};
