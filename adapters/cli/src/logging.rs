//! Tracing subscriber setup for the command-line adapter.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber so stdout stays reserved for the transcript.
///
/// `RUST_LOG` wins over `default_level` when it is set.
pub(crate) fn init(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level `{default_level}`"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!(error))
}
