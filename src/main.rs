//! Main entry point for the download CLI

use clap::Parser;
use download::cli::{Args, OutputFormatter, VerbosityLevel};
use download::core::{Dispatcher, Outcome};
use download::engine::YtDlpEngine;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments; malformed input exits here with usage
    let args = Args::parse();

    init_logging(args.verbosity_level())?;
    debug!("Starting download with args: {:?}", args);

    let formatter = OutputFormatter::new(args.verbosity_level()).with_progress(!args.no_progress);
    formatter.print_banner();

    let config = args.run_config();
    let engine = YtDlpEngine::new(&args.yt_dlp);
    let cookies = args.cookie_source();

    // Engine failures are reported on the console; the exit code stays 0
    match Dispatcher::new(&engine, &cookies, &formatter).run(&config).await {
        Outcome::Done => info!("Run completed"),
        Outcome::Failed(message) => info!("Run failed: {}", message),
    }

    Ok(())
}

/// Initialize logging system
fn init_logging(verbosity: VerbosityLevel) -> anyhow::Result<()> {
    // RUST_LOG wins over the verbosity flags
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.default_log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
