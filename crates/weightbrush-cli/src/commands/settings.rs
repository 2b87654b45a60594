//! Brush settings management.

use anyhow::bail;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use weightbrush_config::{BrushSettings, load_settings, settings_path};

/// Show, create, or validate brush settings.
#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective settings as TOML
    Show {
        /// Settings file (default: user settings)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the user settings path
    Path,

    /// Write default settings
    Init {
        /// Target file (default: user settings)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a settings file
    Validate {
        /// Settings file (default: user settings)
        file: Option<PathBuf>,
    },
}

/// Run the settings command.
pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    match args.command {
        SettingsCommand::Show { file } => {
            let settings = load_settings(file.as_deref())?;
            print!("{}", settings.to_toml()?);
        }
        SettingsCommand::Path => println!("{}", settings_path().display()),
        SettingsCommand::Init { file, force } => {
            let path = file.unwrap_or_else(settings_path);
            if path.exists() && !force {
                bail!("'{}' already exists (use --force to overwrite)", path.display());
            }
            BrushSettings::default().save(&path)?;
            tracing::info!(path = %path.display(), "wrote default settings");
            println!("Wrote {}", path.display());
        }
        SettingsCommand::Validate { file } => {
            let settings = load_settings(file.as_deref())?;
            settings.validate()?;
            settings.mirror_resolver()?;
            println!("Settings OK");
        }
    }
    Ok(())
}
