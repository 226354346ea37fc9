use anyhow::Context;
use clap::Parser;

use mealmind_client::{
    cli::{self, Cli},
    ClientConfig, ClientContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "mealmind_client=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    let ctx = ClientContext::init(config).context("build client context")?;
    tracing::debug!(
        api_url = %ctx.config.api_url,
        store = %ctx.config.store_path.display(),
        timeout_secs = ctx.config.request_timeout.as_secs(),
        "client configured"
    );

    match cli::run(args.command, &ctx).await {
        Ok(out) => {
            println!("{out}");
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}", cli::render_error(&e));
            std::process::exit(1);
        }
    }
}
