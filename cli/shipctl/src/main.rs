//! ship - CLI for deploying and managing applications on the platform.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shipctl::commands::Cli;
use shipctl::error;

// Requests are issued one at a time, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics go to stderr so table and JSON output on stdout stay clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("SHIP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }
}
