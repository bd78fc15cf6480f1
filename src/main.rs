//! udm-dash - matching status dashboard for the archive indexing pipeline.
//!
//! Shows how NAS video files line up with spreadsheet segments and their
//! UDM conversions, backed by the indexing service's REST API.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "udm_dash=info"
    } else {
        "udm_dash=warn"
    };

    // stderr keeps stdout clean for --json output and the live view
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run CLI
    cli::run().await
}
