use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured filter.
pub fn init_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter)?)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}

fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log filter {:?}", default_filter))
    })
}
