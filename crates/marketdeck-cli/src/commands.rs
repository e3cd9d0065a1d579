use clap::{Args, Subcommand};

use marketdeck_core::models::Granularity;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email; defaults to the last one used
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account and tenant, then sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        tenant_name: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is stored
    Whoami,
    /// Overview: analytics summary, campaigns and LLM status, fetched together
    Dashboard,
    /// Manage campaigns
    #[command(subcommand)]
    Campaigns(CampaignCommand),
    /// Inspect and run AI agents
    #[command(subcommand)]
    Agents(AgentCommand),
    /// Query the analytics service
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
}

#[derive(Subcommand)]
pub enum CampaignCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        /// awareness, traffic, leads, conversions or sales
        #[arg(long)]
        objective: String,
        #[arg(long)]
        budget_daily: Option<f64>,
        #[arg(long)]
        budget_total: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        objective: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        budget_daily: Option<f64>,
        #[arg(long)]
        budget_total: Option<f64>,
    },
    Delete {
        id: i64,
    },
    Publish {
        id: i64,
        /// Channel ID or type; repeat for several
        #[arg(long = "channel", required = true)]
        channels: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum AgentCommand {
    /// List agent configurations
    Config,
    /// Queue an agent run
    Run {
        /// CreativeAgent, ComplianceAgent, ChannelPlanner, BudgetPacer, Optimizer or AnalystAgent
        agent: String,
        /// Run context as a JSON object
        #[arg(long, default_value = "{}")]
        context: String,
        /// openai or local; defaults to the service setting
        #[arg(long)]
        provider: Option<String>,
    },
    /// List past runs
    Runs {
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one run
    RunStatus {
        id: i64,
    },
    /// Show LLM provider status
    LlmStatus,
}

#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub tenant_id: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,
}

#[derive(Subcommand)]
pub enum AnalyticsCommand {
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Timeseries {
        /// impressions, clicks, conversions, pageviews or revenue
        #[arg(long)]
        metric: Option<String>,
        /// h, d or w
        #[arg(long)]
        granularity: Option<Granularity>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    Funnel {
        /// Comma-separated event names
        #[arg(long, value_delimiter = ',')]
        steps: Vec<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    Health,
}
