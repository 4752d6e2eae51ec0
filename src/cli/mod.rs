//! CLI module for fabric-desk
//!
//! Command-line front-end over the client core.
//!
//! # Commands
//!
//! - `serve` - Run the managed pattern server and stream its events
//! - `chat` - Send one chat request and stream the answer
//! - `health` - Probe the server once
//! - `patterns` - List available patterns
//! - `models` - List available models by vendor
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the server and follow its output
//! fabric-desk serve
//!
//! # Summarize a file
//! cat notes.md | fabric-desk chat -p summarize -m gpt-4o
//!
//! # Generate shell completions
//! fabric-desk completions bash > ~/.bash_completion.d/fabric-desk
//! ```

pub mod catalog;
pub mod chat;
pub mod completions;
pub mod config;
pub mod health;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{normalize_base_url, AppConfig, ConfigError};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fabric-desk.toml";

/// fabric-desk - Desktop client core for a local pattern server
#[derive(Parser, Debug)]
#[command(
    name = "fabric-desk",
    version,
    about = "Manage a local pattern server and chat with it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the pattern server and stream its events until interrupted
    Serve(ServeArgs),
    /// Send a chat request and stream the answer
    Chat(ChatArgs),
    /// Probe the server once
    Health(HealthArgs),
    /// List available patterns
    Patterns(PatternsArgs),
    /// List available models
    Models(ModelsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the server base URL
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Override the server executable
    #[arg(short, long)]
    pub executable: Option<String>,

    /// Path to the preferences file (defaults to the platform config directory)
    #[arg(long)]
    pub preferences: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FABRIC_DESK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable periodic health checks
    #[arg(long)]
    pub no_health_check: bool,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Pattern to apply
    #[arg(short, long)]
    pub pattern: String,

    /// Model name
    #[arg(short, long)]
    pub model: String,

    /// Vendor serving the model (looked up from the server when omitted)
    #[arg(long)]
    pub vendor: Option<String>,

    /// Input text (read from stdin when omitted)
    pub input: Option<String>,

    /// Start the managed server for this request if it is not reachable
    #[arg(long)]
    pub start_server: bool,

    /// Print the finished exchange as JSON instead of streaming text
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the server base URL
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the server base URL
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct PatternsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the server base URL
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only show models of this vendor
    #[arg(long)]
    pub vendor: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the server base URL
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration: file (if present), then env, then a base URL flag. Validated.
pub fn load_config(path: &Path, base_url: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut config = if path.exists() {
        AppConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        AppConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(url) = base_url {
        config.server.base_url = normalize_base_url(url);
    }

    config.validate()?;
    Ok(config)
}
