use serde::{Deserialize, Serialize};

/// Static configuration of one agent, as reported by `GET /agents/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AgentConfig {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    /// openai or local
    pub llm_provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AgentRunRequest {
    /// CreativeAgent, ComplianceAgent, ChannelPlanner, BudgetPacer, Optimizer, AnalystAgent
    pub agent: String,
    pub context: serde_json::Value,
    /// Overrides the service's default provider when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AgentRun {
    pub id: i64,
    #[serde(default)]
    pub tenant_id: Option<i64>,
    pub agent: String,
    pub status: String,
    #[serde(default)]
    pub output_json: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub tokens_used: i64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AgentRun {
    /// Parse `output_json` when the agent produced any output.
    pub fn output(&self) -> Option<serde_json::Value> {
        self.output_json
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "failed")
    }
}

/// Query filters for `GET /agents/runs`.
#[derive(Debug, Clone, Default)]
pub struct AgentRunFilter {
    pub agent: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl AgentRunFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref agent) = self.agent {
            query.push(("agent".to_string(), agent.clone()));
        }
        if let Some(skip) = self.skip {
            query.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LlmProviderStatus {
    pub enabled: bool,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response of `GET /agents/llm/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LlmStatus {
    pub default_provider: String,
    pub openai: LlmProviderStatus,
    pub local: LlmProviderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_filter_query_skips_unset() {
        let filter = AgentRunFilter {
            agent: Some("CreativeAgent".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("agent".to_string(), "CreativeAgent".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
        assert!(AgentRunFilter::default().to_query().is_empty());
    }

    #[test]
    fn test_run_output_parses_embedded_json() {
        let run: AgentRun = serde_json::from_value(serde_json::json!({
            "id": 3,
            "agent": "AnalystAgent",
            "status": "completed",
            "output_json": "{\"insights\": [\"ctr up\"]}"
        }))
        .unwrap();
        assert!(run.is_finished());
        assert_eq!(run.output().unwrap()["insights"][0], "ctr up");
    }

    #[test]
    fn test_llm_status_decodes_without_local_url() {
        let status: LlmStatus = serde_json::from_value(serde_json::json!({
            "default_provider": "openai",
            "openai": {"enabled": true, "model": "gpt-4o"},
            "local": {"enabled": false, "model": "llama3"}
        }))
        .unwrap();
        assert_eq!(status.default_provider, "openai");
        assert!(status.openai.enabled);
        assert_eq!(status.local.url, None);
    }
}
