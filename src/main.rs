use anyhow::Result;
use clap::Parser;
use outlay::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("outlay={}", settings.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run(&settings)
}
