use clap::Parser;
use tracing_subscriber::EnvFilter;

use gfa_align::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("gfa_align=debug,info")
    } else {
        EnvFilter::new("gfa_align=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    cli::align::run(&cli)
}
