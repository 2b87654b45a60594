//! Platform-specific paths for brush settings.
//!
//! The settings file lives in the user configuration directory. There is no
//! system-wide settings location; a missing user file means defaults.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/weightbrush/` (Linux), `~/Library/Application Support/weightbrush/` (macOS), `%APPDATA%\weightbrush\` (Windows)
//! - **Settings file**: `settings.toml` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use weightbrush_config::paths;
//!
//! // Where `weightbrush settings init` writes
//! println!("Settings: {:?}", paths::settings_path());
//!
//! // Explicit file first, else the user file, else defaults
//! let settings = paths::load_settings(None).unwrap();
//! println!("Undo limit: {}", settings.undo_limit);
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::settings::BrushSettings;

/// Application name used for directory paths.
const APP_NAME: &str = "weightbrush";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/weightbrush/`
/// - macOS: `~/Library/Application Support/weightbrush/`
/// - Windows: `%APPDATA%\weightbrush\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user settings file path.
///
/// # Platform Paths
///
/// - Linux: `~/.config/weightbrush/settings.toml`
/// - macOS: `~/Library/Application Support/weightbrush/settings.toml`
/// - Windows: `%APPDATA%\weightbrush\settings.toml`
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Load settings from `explicit` if given, else from the user settings file.
///
/// A missing user settings file yields the defaults; a missing explicit file
/// is an error.
///
/// # Errors
///
/// [`ConfigError::ReadFile`] when the file cannot be read,
/// [`ConfigError::TomlParse`] when it is not valid settings TOML.
pub fn load_settings(explicit: Option<&Path>) -> Result<BrushSettings, ConfigError> {
    match explicit {
        Some(path) => BrushSettings::load(path),
        None => BrushSettings::load_or_default(settings_path()),
    }
}
