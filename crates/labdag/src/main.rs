//! LabDAG CLI binary.

use anyhow::Result;
use labdag::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the labdag CLI.
///
/// Uses tokio's current_thread runtime; all I/O is sequential.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so shell output on stdout stays clean.
    // Example: RUST_LOG=labdag=debug,labdag_jsonl=trace labdag
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("labdag=info,labdag_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting labdag CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("labdag CLI completed successfully");
    Ok(())
}
