//! Vonic CLI - command-line front end for the three-band equalizer.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vonic")]
#[command(author, version, about = "Vonic three-band equalizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Equalize a WAV file
    Process(commands::process::ProcessArgs),

    /// Print the magnitude response of an equalizer setting
    Response(commands::response::ResponseArgs),

    /// List the equalizer parameters
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table and JSON output on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Response(args) => commands::response::run(args),
        Commands::Params(args) => commands::params::run(args),
    }
}
