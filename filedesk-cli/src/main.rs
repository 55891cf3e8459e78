//! filedesk CLI - terminal client for the account and file service
//!
//! - `shell`: interactive session that keeps the login cookie between actions
//! - `login` / `signup` / `upload`: one-shot flows
//! - `config`: inspect or create ~/.filedesk/config.toml

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use filedesk_core::{ClientConfig, Dispatcher, Flow, HttpBackend, Outcome, SelectedFile};
use tracing::info;

mod config;
mod shell;
mod terminal;
mod tracing_setup;
mod ui;

use terminal::TerminalNotifier;

#[derive(Parser, Debug)]
#[command(
    name = "filedesk",
    author,
    version,
    about = "Log in, upload and manage files on a filedesk server"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
pub(crate) struct GlobalArgs {
    /// Server base URL (overrides [server].endpoint)
    #[arg(long, env = "FILEDESK_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Config file (default: ~/.filedesk/config.toml)
    #[arg(long, env = "FILEDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Debug logging to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress the upload spinner
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session (login, upload, rename, delete, logout)
    Shell,
    /// Check credentials against the server
    Login(AuthArgs),
    /// Create an account
    Signup(AuthArgs),
    /// Upload one file (only useful when the server does not require a session)
    Upload(UploadArgs),
    /// Manage filedesk configuration (init, show, path)
    Config(config::ConfigArgs),
}

#[derive(Parser, Debug)]
struct AuthArgs {
    /// Account name
    username: String,

    /// Password (prompted when omitted)
    #[arg(long, short)]
    password: Option<String>,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    /// File to upload
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = &cli.global;
    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: global.debug,
    })?;
    ui::init_quiet_mode(global.quiet);

    match cli.command {
        Commands::Config(args) => config::run_config(args, global),
        Commands::Shell => {
            let dispatcher = connect(global)?;
            shell::run_shell(&dispatcher).await
        }
        Commands::Login(args) => {
            let dispatcher = connect(global)?;
            let password = resolve_password(args.password)?;
            dispatcher.set_login_fields(&args.username, &password);
            let outcome = dispatcher.login().await;
            if outcome.is_success() {
                println!("→ {}", dispatcher.page().location);
            }
            finish(Flow::Login, outcome)
        }
        Commands::Signup(args) => {
            let dispatcher = connect(global)?;
            let password = resolve_password(args.password)?;
            dispatcher.set_signup_fields(&args.username, &password);
            finish(Flow::Signup, dispatcher.signup().await)
        }
        Commands::Upload(args) => {
            let dispatcher = connect(global)?;
            dispatcher.select_file(Some(SelectedFile::from_path(&args.path)?));
            let outcome = dispatcher.upload_file().await;
            for row in dispatcher.page().rows() {
                println!("{}", row.filename);
            }
            finish(Flow::Upload, outcome)
        }
    }
}

fn config_path(global: &GlobalArgs) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(ClientConfig::config_path)
}

/// Priority: flag/env > config file > defaults
fn load_config(global: &GlobalArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_from(&config_path(global))?;

    if let Some(ref endpoint) = global.endpoint {
        config.server.endpoint = endpoint.clone();
    }
    if global.insecure {
        config.server.insecure = true;
    }
    config.validate().context("Invalid --endpoint or FILEDESK_ENDPOINT")?;
    Ok(config)
}

fn connect(global: &GlobalArgs) -> Result<Dispatcher<HttpBackend, TerminalNotifier>> {
    let config = load_config(global)?;
    let backend = HttpBackend::new(config.server).context("Failed to set up HTTP client")?;
    info!(endpoint = %backend.endpoint(), "using server");
    Ok(Dispatcher::new(backend, TerminalNotifier::new(), config.ui))
}

fn resolve_password(password: Option<String>) -> Result<String> {
    password
        .or_else(|| terminal::read_secret("Password:"))
        .ok_or_else(|| anyhow!("No password given"))
}

/// The alert has already been shown; this only sets the exit status
fn finish(flow: Flow, outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Succeeded => Ok(()),
        Outcome::Failed(err) => Err(anyhow::Error::new(err).context(format!("{} failed", flow))),
        other => Err(anyhow!("{} did not complete ({:?})", flow, other)),
    }
}
