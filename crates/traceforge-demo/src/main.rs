use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use traceforge_demo::{run_demo, DemoConfig};
use traceforge_llm::OpenAIClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = DemoConfig::load().context("Failed to load configuration")?;

    init_logging(&config);

    let client = OpenAIClient::new(config.client_config())
        .context("Failed to create chat-completion client")?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    let mut stdout = std::io::stdout();
    let summary = run_demo(&client, client.base_url(), &mut stdout).await?;

    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        "demo finished"
    );

    Ok(())
}

fn init_logging(config: &DemoConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
