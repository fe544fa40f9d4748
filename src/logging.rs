// Tracing subscriber setup for the binary.
// Logs go to stderr so command output on stdout stays machine-readable.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{DevFlagsError, Result};

/// Install a global subscriber. `RUST_LOG` directives take precedence over `level`.
pub fn init(level: LevelFilter) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| DevFlagsError::Other(format!("failed to install tracing subscriber: {err}")))
}
