//! Persistent brush settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use weightbrush_core::{AdjacencyGraph, DEFAULT_UNDO_LIMIT, EditSession, SmoothParams};
use weightbrush_mirror::{DEFAULT_LEFT, DEFAULT_RIGHT, MirrorResolver};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_settings};

/// Brush settings stored as TOML.
///
/// Every section is optional; missing keys take their defaults.
///
/// # TOML Format
///
/// ```toml
/// soft_selection = true
/// undo_limit = 32
///
/// [mirror]
/// left = "*_L_* L_*"
/// right = "*_R_* R_*"
///
/// [prune]
/// auto = true
/// threshold = 0.01
///
/// [smooth]
/// repeat = 2
/// depth = 1
/// strength = 1.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrushSettings {
    /// Honor per-row soft-selection weights.
    pub soft_selection: bool,
    /// Undo snapshots kept per session.
    pub undo_limit: usize,
    /// Left/right naming tokens.
    pub mirror: MirrorSettings,
    /// Auto-prune after each edit.
    pub prune: PruneSettings,
    /// Smooth and sharpen defaults.
    pub smooth: SmoothSettings,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            soft_selection: true,
            undo_limit: DEFAULT_UNDO_LIMIT,
            mirror: MirrorSettings::default(),
            prune: PruneSettings::default(),
            smooth: SmoothSettings::default(),
        }
    }
}

/// Whitespace separated left and right token lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MirrorSettings {
    /// Left-side tokens.
    pub left: String,
    /// Right-side tokens, paired by position with `left`.
    pub right: String,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT.to_string(),
            right: DEFAULT_RIGHT.to_string(),
        }
    }
}

/// Auto-prune toggle and threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PruneSettings {
    /// Run a prune pass over each edited row.
    pub auto: bool,
    /// Cells below this value are zeroed.
    pub threshold: f64,
}

impl Default for PruneSettings {
    fn default() -> Self {
        Self {
            auto: false,
            threshold: 0.01,
        }
    }
}

/// Smoothing defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothSettings {
    /// Rounds per smooth stroke.
    pub repeat: u32,
    /// Neighbor ring depth.
    pub depth: usize,
    /// Fraction of the way toward the neighbor mean.
    pub strength: f64,
}

impl Default for SmoothSettings {
    fn default() -> Self {
        Self {
            repeat: 1,
            depth: 1,
            strength: 1.0,
        }
    }
}

impl SmoothSettings {
    /// Smooth (or sharpen when `invert`) parameters from these defaults.
    pub fn params(&self, invert: bool) -> SmoothParams {
        SmoothParams {
            iterations: self.repeat,
            strength: self.strength,
            invert,
        }
    }

    /// Adjacency widened to the configured ring depth.
    pub fn widen(&self, adjacency: &AdjacencyGraph) -> AdjacencyGraph {
        adjacency.with_depth(self.depth)
    }
}

impl BrushSettings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings, or the defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check every field range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }

    /// Auto-prune threshold, `None` when auto-prune is off.
    pub fn auto_prune_threshold(&self) -> Option<f64> {
        self.prune.auto.then_some(self.prune.threshold)
    }

    /// Compile the configured mirror tokens.
    pub fn mirror_resolver(&self) -> Result<MirrorResolver, ConfigError> {
        Ok(MirrorResolver::new(&self.mirror.left, &self.mirror.right)?)
    }

    /// Apply auto-prune and the undo limit to a session.
    pub fn configure(&self, session: EditSession) -> EditSession {
        session
            .with_auto_prune(self.auto_prune_threshold())
            .with_undo_limit(self.undo_limit)
    }
}
