use anyhow::{Context, Result};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays machine-readable.
pub fn setup_tracing(debug: bool) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let filter_level = if debug { "hydro=debug" } else { "hydro=info" };

    let filter = EnvFilter::from_default_env().add_directive(
        filter_level
            .parse()
            .context("invalid tracing filter directive")?,
    );

    let subscriber = Registry::default().with(stderr_layer).with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set global tracing subscriber")?;

    Ok(())
}
