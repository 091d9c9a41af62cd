mod downsample;
mod io;
mod plan;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "spinevis",
    about = "Peak-preserving downsampling of imaging session traces"
)]
struct Cli {
    /// Log debug output (including timings) to stderr. RUST_LOG overrides this.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Downsample the traces of a session dump
    Downsample(downsample::Opts),
    /// Show chunk sizes and point counts for a series length
    Plan(plan::Opts),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Downsample(opts) => downsample::downsample(&opts).await,
        Command::Plan(opts) => plan::plan(&opts).await,
    }
}
