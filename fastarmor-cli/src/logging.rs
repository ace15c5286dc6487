//! tracing subscriber wiring for the fastarmor binary.
//!
//! The `[general]` section is parsed into [`LogFormat`] before it reaches
//! this module, so there is no format string to re-interpret here: this is
//! only the layer assembly. `RUST_LOG` wins over the configured level when
//! set, which keeps ad-hoc `RUST_LOG=fastarmor_runner=trace` debugging
//! possible without touching fastarmor.toml.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fastarmor_core::config::{GeneralConfig, LogFormat};

/// Initialize the global tracing subscriber from the `[general]` section.
///
/// Must be called exactly once, before the verification run emits its first
/// event. JSON output is the default so a CI job capturing stderr gets
/// machine-parseable lines; `pretty` is for a human watching a run live.
pub fn init_tracing(general: &GeneralConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let format = general
        .parse_log_format()
        .context("general.log_format rejected after validation")?;
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    Ok(())
}
