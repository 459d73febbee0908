//! CryptoGuide - a terminal client for cryptocurrency market data.

use anyhow::Context;
use cryptoguide::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a daily file; stdout belongs to the terminal UI
    let log_dir = cryptoguide::config::log_dir().context("resolving log directory")?;
    std::fs::create_dir_all(&log_dir).context("creating log directory")?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "cryptoguide.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptoguide=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting CryptoGuide");

    let config = Config::load_or_default().context("loading configuration")?;

    let mut app = App::new(config).context("starting application")?;
    app.run().await?;

    Ok(())
}
