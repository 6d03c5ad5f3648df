// CLI interface
pub mod commands;

use crate::auth::AuthManager;
use crate::config::Config;
use crate::dates;
use crate::error::{FleetError, Result};
use crate::models::{SessionToken, VehicleStatus, VehicleType};
use crate::snapshot::FleetSnapshot;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fleetwatch")]
#[command(
    about = "Expiry and maintenance tracking for fire-department vehicle fleets",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Fleet API root URL
    #[arg(long, env = "FLEETWATCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Read collections from a JSON export instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Reference date for due-soon checks (defaults to today, UTC)
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Look-ahead window in days (defaults to config, then 30)
    #[arg(long, global = true)]
    pub window_days: Option<i64>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to the fleet API and cache the session token
    Login {
        /// Account email (defaults to config)
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove the cached session
    Logout,

    /// Check the cached session
    Status {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,

        /// Ask the API whether the token is still accepted
        #[arg(long)]
        verify: bool,
    },

    /// Documents and oil changes due within the window
    Due {
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Dashboard statistics
    Dashboard {
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Limit vehicle counts to one station
        #[arg(long)]
        station: Option<String>,
    },

    /// List vehicles with expiry warnings
    Vehicles {
        /// Filter by status (active, faulty, accident)
        #[arg(long)]
        status: Option<VehicleStatus>,

        /// Filter by type (ladder, tanker, snorkel, terrain, rescue, service, machinery)
        #[arg(long = "type")]
        vehicle_type: Option<VehicleType>,

        /// Filter by station id
        #[arg(long)]
        station: Option<String>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Oil changes and inspections coming up
    Maintenance {
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completion scripts
    ///
    /// Bash:
    ///   eval "$(fleetwatch completions bash)"    # Add to ~/.bashrc
    ///
    /// Zsh:
    ///   eval "$(fleetwatch completions zsh)"     # Add to ~/.zshrc
    ///
    /// Fish:
    ///   fleetwatch completions fish > ~/.config/fish/completions/fleetwatch.fish
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create a sample config file
    Init,
    /// Show config file location and status
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Settings shared by every report command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub api_url: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub reference_date: NaiveDate,
    pub window_days: i64,
}

impl Context {
    pub fn new(cli: &Cli, config: Config) -> Result<Self> {
        let reference_date = match cli.date.as_deref() {
            Some(raw) => dates::parse_required_date(raw)?,
            None => dates::today(),
        };

        let window_days = cli.window_days.unwrap_or(config.thresholds.window_days);
        if window_days < 0 {
            return Err(FleetError::ConfigError(format!(
                "--window-days must not be negative (got {})",
                window_days
            )));
        }

        tracing::debug!(
            "Reference date {}, window {} days",
            reference_date,
            window_days
        );

        Ok(Self {
            api_url: cli.api_url.clone(),
            snapshot_path: cli.snapshot.clone(),
            config,
            reference_date,
            window_days,
        })
    }

    /// API root from --api-url / FLEETWATCH_API_URL, then the config file
    pub fn base_url(&self) -> Result<String> {
        match self.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => Ok(url.to_string()),
            None => self.config.api_base_url().map(str::to_string),
        }
    }

    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.unwrap_or_else(|| {
            if self.config.display.format.eq_ignore_ascii_case("json") {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            }
        })
    }

    /// Snapshot from --snapshot, or from the API with the cached session
    pub async fn load_snapshot(&self) -> Result<(FleetSnapshot, Option<SessionToken>)> {
        if let Some(path) = &self.snapshot_path {
            let snapshot = FleetSnapshot::from_json_file(path, self.reference_date)?;
            return Ok((snapshot, None));
        }

        let base_url = self.base_url()?;
        let client = crate::api::ApiClient::new(&base_url)?;
        let session = AuthManager::new()?.require_token(client.base_url())?;
        let client = client.with_token(session.token.clone());

        let snapshot = FleetSnapshot::fetch(&client, self.reference_date).await?;
        Ok((snapshot, Some(session)))
    }
}

pub async fn execute(args: Cli) -> Result<()> {
    // These don't need a reference date or data source
    match &args.command {
        Commands::Config { command } => return commands::config::execute(command),
        Commands::Completions { shell } => {
            commands::completions::execute(shell.clone());
            return Ok(());
        }
        _ => {}
    }

    let ctx = Context::new(&args, Config::load()?)?;

    match args.command {
        Commands::Login { email } => commands::login::execute(&ctx, email).await,
        Commands::Logout => commands::logout::execute(&ctx),
        Commands::Status { json, verify } => commands::status::execute(&ctx, json, verify).await,
        Commands::Due { format } => commands::due::execute(&ctx, format).await,
        Commands::Dashboard { format, station } => {
            commands::dashboard::execute(&ctx, format, station).await
        }
        Commands::Vehicles {
            status,
            vehicle_type,
            station,
            format,
        } => commands::vehicles::execute(&ctx, status, vehicle_type, station, format).await,
        Commands::Maintenance { format } => commands::maintenance::execute(&ctx, format).await,
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
