use anyhow::Result;
use linkshort::{config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    init_tracing(&config.log_level, &config.log_format)?;
    config.print_summary();

    server::run(config).await
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).or_else(|_| EnvFilter::try_new("info"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
