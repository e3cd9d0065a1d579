use serde::{Deserialize, Serialize};

/// Common filters accepted by the analytics service.
///
/// Dates are `YYYY-MM-DD`; the service defaults to a trailing window when
/// they are omitted.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsFilter {
    pub tenant_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl AnalyticsFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref tenant_id) = self.tenant_id {
            query.push(("tenant_id".to_string(), tenant_id.clone()));
        }
        if let Some(ref start) = self.start_date {
            query.push(("start_date".to_string(), start.clone()));
        }
        if let Some(ref end) = self.end_date {
            query.push(("end_date".to_string(), end.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
}

impl Granularity {
    pub fn as_param(&self) -> &'static str {
        match self {
            Granularity::Hour => "h",
            Granularity::Day => "d",
            Granularity::Week => "w",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h" | "hour" => Ok(Granularity::Hour),
            "d" | "day" => Ok(Granularity::Day),
            "w" | "week" => Ok(Granularity::Week),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

/// Query for `GET /timeseries`.
#[derive(Debug, Clone, Default)]
pub struct TimeseriesQuery {
    /// impressions, clicks, conversions, pageviews or revenue
    pub metric: Option<String>,
    pub granularity: Option<Granularity>,
    pub filter: AnalyticsFilter,
}

impl TimeseriesQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref metric) = self.metric {
            query.push(("metric".to_string(), metric.clone()));
        }
        if let Some(granularity) = self.granularity {
            query.push(("granularity".to_string(), granularity.as_param().to_string()));
        }
        query.extend(self.filter.to_query());
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AnalyticsSummary {
    pub sessions: u64,
    pub pageviews: u64,
    pub revenue: f64,
    pub clicks: u64,
    pub conversions: u64,
    /// Click-through rate, percent
    pub ctr: f64,
    /// Conversion rate, percent
    pub cvr: f64,
    #[serde(default)]
    pub users: Option<u64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TimeseriesPoint {
    pub period: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Timeseries {
    pub metric: String,
    pub granularity: String,
    #[serde(default)]
    pub data: Vec<TimeseriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FunnelStep {
    pub step: String,
    pub count: u64,
    /// Percent of the previous step's count; 100 for the first step
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FunnelReport {
    pub funnel: Vec<FunnelStep>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub clickhouse: Option<bool>,
}
