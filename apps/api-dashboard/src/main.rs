use anyhow::{anyhow, Context, Result};
use apikit::{ApiClient, TracedClient};
use clap::{Parser, Subcommand};
use dashboard::render::render;
use dashboard::{
    Bootstrap, Dashboard, Document, FileStore, FlowResult, KeyValueStore, MemoryNavigator,
    Navigator, SystemClock, AUTH_TOKEN_KEY,
};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// API dashboard - exercise the platform API from the command line
#[derive(Parser)]
#[command(name = "api-dashboard")]
#[command(about = "API dashboard - exercise the platform API from the command line")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the platform API (overrides config)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a synthetic test user
    Register,
    /// Fetch the project list
    Projects,
    /// Fetch webinar announcements
    Webinars,
    /// Run every dashboard flow concurrently
    All,
    /// Initialize the site page from stored auth state
    Bootstrap,
    /// Forget the stored auth token
    Logout,
    /// Store an auth token for later page loads
    StoreToken {
        /// Token value
        token: String,
    },
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        base_url: cli.base_url.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::info!("api-dashboard starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Register => run_flows(&config, Flows::Register).await,
        Commands::Projects => run_flows(&config, Flows::Projects).await,
        Commands::Webinars => run_flows(&config, Flows::Webinars).await,
        Commands::All => run_flows(&config, Flows::All).await,
        Commands::Bootstrap => bootstrap_page(&config, false),
        Commands::Logout => bootstrap_page(&config, true),
        Commands::StoreToken { token } => store_token(&config, &token),
        Commands::Check => check_config(&config),
    }
}

#[derive(Clone, Copy)]
enum Flows {
    Register,
    Projects,
    Webinars,
    All,
}

fn build_api_client(config: &AppConfig) -> Result<ApiClient> {
    let mut builder = reqwest::Client::builder();
    if config.api.timeout_sec > 0 {
        builder = builder.timeout(Duration::from_secs(config.api.timeout_sec));
    }
    let http = builder.build().context("Failed to build HTTP client")?;
    Ok(ApiClient::new(TracedClient::new(http), config.api_base_url()?))
}

fn failed<T>(result: &FlowResult<T>) -> usize {
    usize::from(result.is_err())
}

async fn run_flows(config: &AppConfig, which: Flows) -> Result<()> {
    let api = build_api_client(config)?;
    tracing::info!(base_url = %api.base_url(), "running dashboard flows");

    let document = Arc::new(Document::dashboard());
    let dash = Dashboard::new(api, document.clone(), Arc::new(SystemClock));
    Bootstrap::dashboard_ready(dash.logger());

    let failures = match which {
        Flows::Register => failed(&dash.register().await),
        Flows::Projects => failed(&dash.fetch_projects().await),
        Flows::Webinars => failed(&dash.fetch_webinars().await),
        Flows::All => {
            let (r, p, w) =
                tokio::join!(dash.register(), dash.fetch_projects(), dash.fetch_webinars());
            failed(&r) + failed(&p) + failed(&w)
        }
    };

    print!("{}", render(&document));

    if failures > 0 {
        return Err(anyhow!("{failures} flow(s) failed"));
    }
    Ok(())
}

fn bootstrap_page(config: &AppConfig, logout: bool) -> Result<()> {
    let document = Arc::new(Document::site());
    let store = Arc::new(FileStore::new(config.storage_path()));
    let navigator = Arc::new(MemoryNavigator::default());

    let report = Bootstrap::new(document.clone(), store, navigator.clone()).run()?;

    if logout {
        match report.logout {
            Some(control) => {
                control.activate();
                println!("Logged out");
            }
            None => println!("Not logged in"),
        }
    } else {
        print!("{}", render(&document));
    }
    println!("Location: {}", navigator.location());
    Ok(())
}

fn store_token(config: &AppConfig, token: &str) -> Result<()> {
    let store = FileStore::new(config.storage_path());
    store.set(AUTH_TOKEN_KEY, token)?;
    println!("Token stored in {}", store.path().display());
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let base = config.api_base_url()?;
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("API base URL: {base}");
    println!("Storage file: {}", config.storage_path().display());
    println!("{}", config.to_yaml()?);

    Ok(())
}
