use anyhow::Context;
use ski_report_etl::EtlConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EtlConfig::default();

    ski_report_etl::run(&config)
        .await
        .with_context(|| format!("Failed to build the daily ski report from {}", config.url))?;

    Ok(())
}
