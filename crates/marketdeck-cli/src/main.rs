//! MarketDeck CLI - command-line access to the campaign, agent and
//! analytics services.
//!
//! Every command goes through the same authenticated client as the
//! dashboard: the stored session token is attached to each request, and a
//! 401 from any service clears it and asks the user to log in again.

mod commands;
mod navigator;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use marketdeck_core::models::{
    AgentRunFilter, AgentRunRequest, AnalyticsFilter, CampaignCreate, CampaignUpdate,
    PublishRequest, RegisterRequest, TimeseriesQuery,
};
use marketdeck_core::{
    ApiClient, ApiError, Config, FileSessionStore, KeyringSessionStore, SessionStore, TokenStorage,
};

use commands::{AgentCommand, AnalyticsCommand, CampaignCommand, Commands, FilterArgs};
use navigator::ConsoleNavigator;

// ============================================================================
// Constants
// ============================================================================

/// Exit code when the session expired during the command
const EXIT_SESSION_EXPIRED: u8 = 3;

#[derive(Parser)]
#[command(name = "marketdeck")]
#[command(about = "Manage campaigns, AI agents and analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Primary service origin
    #[arg(long, global = true, env = "MARKETDECK_API_URL")]
    api_url: Option<String>,

    /// Analytics service origin; derived from the primary origin when unset
    #[arg(long, global = true, env = "MARKETDECK_ANALYTICS_URL")]
    analytics_url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = "MARKETDECK_LOG_FILE")]
    log_file: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_file: Option<&PathBuf>) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=marketdeck=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .context("Log file path has no file name")?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
        }
        None => tracing_appender::non_blocking(io::stderr()),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(log_file.is_none()))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = match init_tracing(cli.log_file.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let navigator = match cli.command {
        Commands::Login { .. } | Commands::Register { .. } => ConsoleNavigator::quiet(),
        _ => ConsoleNavigator::new(),
    };
    let navigator = Arc::new(navigator);
    let result = run(cli, navigator.clone()).await;

    if let Err(ref e) = result {
        match e.downcast_ref::<ApiError>() {
            Some(api_err) => eprintln!("Error: {}", api_err.message()),
            None => eprintln!("Error: {:#}", e),
        }
    }
    ExitCode::from(exit_status(result.is_ok(), navigator.session_expired()))
}

/// Process exit status: session expiry wins over plain success or failure.
fn exit_status(succeeded: bool, session_expired: bool) -> u8 {
    if session_expired {
        EXIT_SESSION_EXPIRED
    } else if succeeded {
        0
    } else {
        1
    }
}

fn session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.token_storage {
        TokenStorage::File => Arc::new(FileSessionStore::new(config.cache_dir()?)),
        TokenStorage::Keyring => Arc::new(KeyringSessionStore::new()),
    };
    Ok(store)
}

async fn run(cli: Cli, navigator: Arc<ConsoleNavigator>) -> Result<()> {
    let mut config = Config::load()?;
    if cli.api_url.is_some() {
        config.api_url = cli.api_url;
    }
    if cli.analytics_url.is_some() {
        config.analytics_url = cli.analytics_url;
    }

    let origins = config.origins();
    debug!(primary = %origins.primary, analytics = %origins.analytics, "Resolved service origins");

    let session = session_store(&config)?;
    let client = ApiClient::new(origins, session.clone(), navigator)?;

    match cli.command {
        Commands::Login { email } => {
            let email = match email.or_else(|| config.last_email.clone()) {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let password = rpassword::prompt_password("Password: ")
                .context("Failed to read password")?;
            let login = client.login(&email, &password).await?;
            session.set(&login.access_token)?;
            info!(user_id = login.user_id, tenant_id = login.tenant_id, "Logged in");

            Config::remember_email(&email)?;
            eprintln!("Logged in as {} ({})", email, login.role);
        }
        Commands::Register {
            email,
            first_name,
            last_name,
            tenant_name,
        } => {
            let password = rpassword::prompt_password("Choose a password: ")
                .context("Failed to read password")?;
            let request = RegisterRequest {
                email: email.clone(),
                password,
                first_name,
                last_name,
                tenant_name,
            };
            let registered = client.register(&request).await?;
            session.set(&registered.access_token)?;

            Config::remember_email(&email)?;
            eprintln!("Registered {} in tenant {}", email, registered.tenant_id);
        }
        Commands::Logout => {
            session.clear()?;
            eprintln!("Logged out");
        }
        Commands::Whoami => {
            if session.is_authenticated() {
                println!("Session token stored ({:?} storage)", config.token_storage);
            } else {
                println!("Not logged in");
            }
        }
        Commands::Dashboard => run_dashboard(&client).await?,
        Commands::Campaigns(command) => run_campaigns(&client, command).await?,
        Commands::Agents(command) => run_agents(&client, command).await?,
        Commands::Analytics(command) => run_analytics(&client, command).await?,
    }

    Ok(())
}

/// Each panel is fetched independently; one failing does not hide the others.
async fn run_dashboard(client: &ApiClient) -> Result<()> {
    let filter = AnalyticsFilter::default();
    let (summary, campaigns, llm_status) = futures::join!(
        client.analytics_summary(&filter),
        client.list_campaigns(),
        client.llm_status(),
    );

    let overview = serde_json::json!({
        "summary": panel("summary", summary),
        "campaigns": panel("campaigns", campaigns),
        "llm_status": panel("llm_status", llm_status),
    });
    print_json(&overview)
}

fn panel<T: Serialize>(name: &str, result: Result<T, ApiError>) -> serde_json::Value {
    match result {
        Ok(value) => serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        Err(e) => {
            eprintln!("{}: {}", name, e.message());
            serde_json::Value::Null
        }
    }
}

async fn run_campaigns(client: &ApiClient, command: CampaignCommand) -> Result<()> {
    match command {
        CampaignCommand::List => print_json(&client.list_campaigns().await?),
        CampaignCommand::Get { id } => print_json(&client.get_campaign(id).await?),
        CampaignCommand::Create {
            name,
            objective,
            budget_daily,
            budget_total,
            currency,
        } => {
            let create = CampaignCreate {
                name,
                objective,
                budget_daily,
                budget_total,
                currency,
                ..Default::default()
            };
            print_json(&client.create_campaign(&create).await?)
        }
        CampaignCommand::Update {
            id,
            name,
            objective,
            status,
            budget_daily,
            budget_total,
        } => {
            let update = CampaignUpdate {
                name,
                objective,
                status,
                budget_daily,
                budget_total,
                ..Default::default()
            };
            print_json(&client.update_campaign(id, &update).await?)
        }
        CampaignCommand::Delete { id } => {
            client.delete_campaign(id).await?;
            eprintln!("Deleted campaign {}", id);
            Ok(())
        }
        CampaignCommand::Publish { id, channels } => {
            print_json(&client.publish_campaign(id, &PublishRequest { channels }).await?)
        }
    }
}

async fn run_agents(client: &ApiClient, command: AgentCommand) -> Result<()> {
    match command {
        AgentCommand::Config => print_json(&client.agent_configs().await?),
        AgentCommand::Run {
            agent,
            context,
            provider,
        } => {
            let context: serde_json::Value = serde_json::from_str(&context)
                .context("--context must be valid JSON")?;
            let request = AgentRunRequest {
                agent,
                context,
                llm_provider: provider,
            };
            print_json(&client.run_agent(&request).await?)
        }
        AgentCommand::Runs { agent, skip, limit } => {
            let filter = AgentRunFilter { agent, skip, limit };
            print_json(&client.agent_runs(&filter).await?)
        }
        AgentCommand::RunStatus { id } => print_json(&client.agent_run(id).await?),
        AgentCommand::LlmStatus => print_json(&client.llm_status().await?),
    }
}

async fn run_analytics(client: &ApiClient, command: AnalyticsCommand) -> Result<()> {
    match command {
        AnalyticsCommand::Summary { filter } => {
            print_json(&client.analytics_summary(&analytics_filter(filter)).await?)
        }
        AnalyticsCommand::Timeseries {
            metric,
            granularity,
            filter,
        } => {
            let query = TimeseriesQuery {
                metric,
                granularity,
                filter: analytics_filter(filter),
            };
            print_json(&client.timeseries(&query).await?)
        }
        AnalyticsCommand::Funnel { steps, filter } => {
            print_json(&client.funnel(steps.as_slice(), &analytics_filter(filter)).await?)
        }
        AnalyticsCommand::Health => print_json(&client.analytics_health().await?),
    }
}

fn analytics_filter(args: FilterArgs) -> AnalyticsFilter {
    AnalyticsFilter {
        tenant_id: args.tenant_id,
        start_date: args.start_date,
        end_date: args.end_date,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    use std::io::Write;

    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let value = line.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("No value entered");
    }
    Ok(value)
}
