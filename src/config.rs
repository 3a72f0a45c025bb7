//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$NGARCHIVE_CONFIG` (environment variable)
//! 2. `~/.config/ngarchive/config.toml` (Linux/macOS)
//!    `%APPDATA%\ngarchive\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::archive::{IngestOptions, ModerationOverlay};
use crate::error::{ArchiveError, Result};
use crate::flags::{FlagTables, BUILTIN_SUSPECT_SENDERS};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Ingestion switches.
    pub ingest: IngestConfig,
    /// Extra moderation table entries.
    pub flags: FlagsConfig,
    /// Runtime spam reporting.
    pub moderation: ModerationConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Ingestion switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Build the word index and frequency counts.
    pub build_corpus: bool,
    /// Abort when any message fails to parse or an identity repeats.
    pub require_clean: bool,
    /// Print the header key census after ingestion.
    pub show_headers: bool,
}

/// Identities merged into the built-in moderation tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagsConfig {
    pub spam_ids: Vec<String>,
    pub removed_ids: Vec<String>,
    /// Senders listed by the suspect-spam report, on top of the built-in ones.
    pub suspect_senders: Vec<String>,
}

/// Runtime spam reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub allow_reports: bool,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            build_corpus: true,
            require_clean: false,
            show_headers: false,
        }
    }
}

impl Config {
    /// The built-in moderation tables plus the configured extra identities.
    pub fn flag_tables(&self) -> FlagTables {
        let mut tables = FlagTables::builtin();
        for id in &self.flags.spam_ids {
            tables.add_spam(id.trim());
        }
        for id in &self.flags.removed_ids {
            tables.add_removed(id.trim());
        }
        tables
    }

    /// An empty overlay honoring the `allow_reports` switch.
    pub fn moderation_overlay(&self) -> ModerationOverlay {
        ModerationOverlay::new(self.moderation.allow_reports)
    }

    /// The built-in suspect senders plus the configured ones, without repeats.
    pub fn suspect_senders(&self) -> Vec<String> {
        let mut senders: Vec<String> = BUILTIN_SUSPECT_SENDERS
            .iter()
            .map(|s| s.to_string())
            .collect();
        for sender in &self.flags.suspect_senders {
            let sender = sender.trim();
            if !senders.iter().any(|s| s == sender) {
                senders.push(sender.to_string());
            }
        }
        senders
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            build_corpus: self.ingest.build_corpus,
            require_clean: self.ingest.require_clean,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| ArchiveError::Config("Could not determine config file path".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ArchiveError::Config(e.to_string()))?;
    std::fs::write(&path, contents).map_err(|e| ArchiveError::io(&path, e))?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("NGARCHIVE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("ngarchive").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ngarchive")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("ngarchive.log")
}
