// Command-line and environment configuration.
// Flags fall back to DEVFLAGS_* environment variables, then to defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::cache::FileStore;
use crate::error::{DevFlagsError, Result};
use crate::feature::DEFAULT_ENDPOINT;
use crate::service::DEFAULT_TIMEOUT;
use crate::toggles::Toggle;

/// Command-line arguments for the devflags binary.
#[derive(Debug, Parser)]
#[command(name = "devflags", version, about = "Developer settings and remote feature config")]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Feature-configuration endpoint.
    #[arg(long, env = "DEVFLAGS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Directory for the durable cache. Defaults to the platform cache dir.
    #[arg(long, env = "DEVFLAGS_CACHE_DIR", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    #[arg(
        long,
        env = "DEVFLAGS_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "DEVFLAGS_LOG", default_value = "warn")]
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Durable store at the configured or platform cache directory.
    pub fn file_store(&self) -> Result<FileStore> {
        match &self.cache_dir {
            Some(dir) => Ok(FileStore::new(dir)),
            None => FileStore::default_location().ok_or_else(|| {
                DevFlagsError::Other("could not determine cache directory".to_string())
            }),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the cached feature config without touching the network.
    Show,
    /// Fetch the feature config and print it.
    Refresh,
    /// Print the value at a dotted path, fetching only if nothing fresh is cached.
    Get {
        /// Dotted path, e.g. `ios.0.yir.isEnabled`.
        path: String,
    },
    /// Inspect or change local developer toggles.
    Toggles {
        #[command(subcommand)]
        action: TogglesAction,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TogglesAction {
    /// List every toggle and its value.
    List,
    /// Set a toggle.
    Set {
        toggle: Toggle,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}
