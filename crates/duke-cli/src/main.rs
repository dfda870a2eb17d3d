//! duke CLI: chat with the HR assistant from the terminal

use clap::{Parser, Subcommand};
use duke_engine::{Config, ConversationController, HealthStatus, HttpReplyService};
use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Chat client for the Duke HR assistant
#[derive(Parser)]
#[command(name = "duke")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chat endpoint URL (overrides config and DUKE_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,

        /// Print the whole conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the reply service is reachable
    Ping,

    /// Print the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

type CliResult = Result<(), Box<dyn Error>>;

fn main() {
    let cli = Cli::parse();

    let tui_mode = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(tui_mode);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let config = load_config(cli.endpoint)?;
    debug!(endpoint = %config.endpoint, "config loaded");

    match cli.command {
        None | Some(Commands::Tui) => cmd_tui(&config),
        Some(Commands::Send { message, json }) => cmd_send(&config, &message, json),
        Some(Commands::Ping) => cmd_ping(&config),
        Some(Commands::Config { init }) => cmd_config(&config, init),
    }
}

/// Load the config file, then apply `DUKE_ENDPOINT`, then `--endpoint`.
fn load_config(endpoint: Option<String>) -> Result<Config, Box<dyn Error>> {
    let path = Config::default_path()?;
    let config = Config::load_or_default(&path)?
        .with_env_overrides()
        .with_endpoint_override(endpoint);
    Ok(config)
}

/// Set up tracing.
///
/// The TUI owns the terminal, so in that mode logs go to a file under the
/// cache dir (or nowhere if it cannot be opened).
fn init_logging(tui_mode: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if tui_mode {
        if let Some(file) = open_log_file() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("duke").join("duke.log"))
}

fn open_log_file() -> Option<File> {
    let path = log_file_path()?;
    fs::create_dir_all(path.parent()?).ok()?;
    File::options().create(true).append(true).open(path).ok()
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
}

fn cmd_tui(config: &Config) -> CliResult {
    let service = HttpReplyService::from_config(config)?;
    runtime()?.block_on(duke_tui::run_tui(config, Arc::new(service)))
}

fn cmd_send(config: &Config, message: &str, json: bool) -> CliResult {
    let service = HttpReplyService::from_config(config)?;
    let mut controller = ConversationController::new(config);

    let sent = runtime()?.block_on(controller.exchange(&service, message));
    if !sent {
        return Err("message is empty".into());
    }

    if json {
        let messages = controller.conversation().messages();
        println!("{}", serde_json::to_string_pretty(messages)?);
    } else if let Some(reply) = controller.conversation().last() {
        println!("{}", reply.text);
    }
    Ok(())
}

fn cmd_ping(config: &Config) -> CliResult {
    let service = HttpReplyService::from_config(config)?;
    let root = service.root_url();

    let health = runtime()?.block_on(service.health())?;
    info!(url = %root, status = %health.status, "health check");

    println!("{}", health_line(&root, &health)?);
    Ok(())
}

/// One-line summary of a health check. Fails unless the service is up.
fn health_line(
    root: &impl std::fmt::Display,
    health: &HealthStatus,
) -> Result<String, Box<dyn Error>> {
    let line = match &health.message {
        Some(message) => format!("{root}: {} ({message})", health.status),
        None => format!("{root}: {}", health.status),
    };
    if health.is_ok() {
        Ok(line)
    } else {
        Err(format!("service not healthy: {line}").into())
    }
}

fn cmd_config(config: &Config, init: bool) -> CliResult {
    let path = Config::default_path()?;

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            Config::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
