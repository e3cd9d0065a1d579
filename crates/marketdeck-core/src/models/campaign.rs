use serde::{Deserialize, Serialize};

/// A campaign as returned by the campaign store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Campaign {
    pub id: i64,
    #[serde(default)]
    pub tenant_id: Option<i64>,
    pub name: String,
    /// awareness, traffic, leads, conversions, sales
    pub objective: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget_daily: Option<f64>,
    #[serde(default)]
    pub budget_total: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Campaign {
    /// Daily budget formatted for display, e.g. `100.00 USD/day`
    pub fn display_budget(&self) -> String {
        match self.budget_daily {
            Some(budget) => format!(
                "{:.2} {}/day",
                budget,
                self.currency.as_deref().unwrap_or("USD")
            ),
            None => "No daily budget".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CampaignCreate {
    pub name: String,
    pub objective: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_daily: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_voice_json: Option<String>,
}

/// Partial update; unset fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CampaignUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_daily: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PublishRequest {
    /// Channel IDs or channel types
    pub channels: Vec<String>,
}
