//! Weightbrush CLI - edit weight files from the command line.

mod commands;
mod weight_file;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "weightbrush")]
#[command(author, version, about = "Weight-matrix edit engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an edit operation to selected rows and drivers
    Apply(commands::apply::ApplyArgs),

    /// Smooth or sharpen weights across neighboring elements
    Smooth(commands::smooth::SmoothArgs),

    /// Show left/right driver pairs
    Mirror(commands::mirror::MirrorArgs),

    /// Check row budgets, optionally renormalizing
    Check(commands::check::CheckArgs),

    /// Manage brush settings
    Settings(commands::settings::SettingsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Smooth(args) => commands::smooth::run(args),
        Commands::Mirror(args) => commands::mirror::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Settings(args) => commands::settings::run(args),
    }
}
