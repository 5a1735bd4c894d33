use clap::Parser;
use rsiwatch::cli::{run, Cli};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
