//! Engine configuration.
//!
//! # Example RON
//!
//! ```ron
//! EngineConfig(
//!     tick_interval_ms: 1000,
//!     history_depth: 32,
//!     debug_commands: false,
//!     catalog_path: Some("content/catalog.ron"),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{GameError, Result};

/// Default passive-income cadence in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default number of snapshots kept for undo.
pub const DEFAULT_HISTORY_DEPTH: usize = 32;

/// Host-side settings for running the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Milliseconds between passive-income accruals.
    pub tick_interval_ms: u64,
    /// Maximum undo snapshots retained.
    pub history_depth: usize,
    /// Whether debug commands (`reset`, `addmoney`) are honoured.
    pub debug_commands: bool,
    /// Catalog file replacing the built-in content.
    pub catalog_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            debug_commands: false,
            catalog_path: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] on malformed RON and
    /// [`GameError::InvalidState`] for a zero tick interval.
    pub fn from_ron_str(text: &str, label: &str) -> Result<Self> {
        let config: Self = ron::from_str(text).map_err(|e| GameError::DataParseError {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        if config.tick_interval_ms == 0 {
            return Err(GameError::InvalidState(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IoError`] if the file cannot be read, otherwise
    /// whatever [`EngineConfig::from_ron_str`] returns.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text, &path.display().to_string())
    }

    /// The catalog to play with: the configured file, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded or fails
    /// validation.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::load(path)?;
                tracing::info!(path = %path.display(), "Loaded catalog");
                Ok(catalog)
            }
            None => Ok(Catalog::standard()),
        }
    }
}
