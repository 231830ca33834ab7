//! Beads CLI binary.

use anyhow::Result;
use beads::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the beads CLI.
///
/// Uses tokio's current_thread runtime; CLI work is sequential and
/// I/O-bound.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=beads=debug,beads_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("beads=info,beads_jsonl=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse_args();
    cli.execute().await?;

    Ok(())
}
