//! Command-line interface for componentry.
//!
//! # Commands
//!
//! - `render` - Render a component and print its output
//! - `list` - List the components known to the engine
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config <FILE>` - Engine configuration file (default `components.toml`)
//!
//! # Examples
//!
//! ```bash
//! componentry --config app/components.toml render card --attr title=Hello
//! componentry render card --collection '[{"id": 1}, {"id": 2}]'
//! componentry list --templates app/components
//! ```

mod list;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use list::ListCommand;
pub use render::RenderCommand;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter; `None` disables logging.
    pub log_level: Option<String>,
    /// Engine configuration file, if given explicitly.
    pub config_path: Option<PathBuf>,
}

/// Render server-side view components from the command line.
#[derive(Parser)]
#[command(
    name = "componentry",
    about = "Render view components from templates",
    version,
    long_about = "componentry renders self-contained view components: it resolves a component by name, runs its action, renders its template and caches the fragment."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Engine configuration file.
    #[arg(short, long, global = true, env = "COMPONENTRY_CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a component and print its output
    Render(RenderCommand),
    /// List known components
    List(ListCommand),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(config.log_level.as_deref());

        match self.command {
            Commands::Render(cmd) => cmd.execute(config.config_path),
            Commands::List(cmd) => cmd.execute(config.config_path),
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `level`.
fn init_logging(level: Option<&str>) {
    let Some(level) = level else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse `key=value`; the value is read as JSON when it parses, as a string otherwise.
pub(crate) fn parse_attribute(input: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = input.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{input}'"))?;
    if key.is_empty() {
        return Err(format!("missing attribute name in '{input}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
