use anyhow::Result;
use clap::Parser;
use ragsearch_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be configured.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    ragsearch_telemetry::init_with_config(&cli.logging());

    ragsearch_cli::run(cli).await
}
