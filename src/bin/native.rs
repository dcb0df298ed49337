use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use cluster_dashboard::config::Cli;

const DEFAULT_FILTER: &str = "cluster_dashboard=info";

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    fmt().with_env_filter(filter).with_target(true).init();

    cluster_dashboard::native::run(cli.resolve())
}
