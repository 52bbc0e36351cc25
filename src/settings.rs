//! CLI settings with provenance
//!
//! Settings are merged from three layers, later layers winning:
//! 1. Built-in defaults
//! 2. Settings file (`env-compose.toml`, or `--settings`)
//! 3. CLI flags

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use env_compose_types::ResolutionPolicy;

use crate::config::{merge_layers, toml_to_json};

/// File looked up in the working directory when `--settings` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "env-compose.toml";

/// Resolved CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding config documents
    pub store_dir: String,

    /// Policy for missing references
    pub resolution: ResolutionPolicy,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: "configs".to_string(),
            resolution: ResolutionPolicy::Required,
            pretty: false,
        }
    }
}

/// Where a settings layer came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSource {
    pub origin: SettingsOrigin,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged settings plus the layers they came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub settings: Settings,
    pub sources: Vec<SettingsSource>,
}

impl EffectiveSettings {
    /// Merge builtin defaults, an optional settings file and CLI overrides.
    ///
    /// A missing file is skipped; an unreadable or invalid one is an error.
    pub fn build(
        settings_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, SettingsError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        let builtin = serde_json::to_value(Settings::default())
            .map_err(|e| SettingsError::Parse(e.to_string()))?;
        layers.push(builtin);
        sources.push(SettingsSource {
            origin: SettingsOrigin::Builtin,
            path: None,
            digest: None,
        });

        if let Some(path) = settings_path {
            if path.exists() {
                let (value, digest) = load_toml_file(path)?;
                layers.push(value);
                sources.push(SettingsSource {
                    origin: SettingsOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(SettingsSource {
                origin: SettingsOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let settings: Settings = serde_json::from_value(merged)
            .map_err(|e| SettingsError::Validation(e.to_string()))?;
        validate(&settings)?;

        Ok(Self { settings, sources })
    }
}

fn load_toml_file(path: &Path) -> Result<(Value, String), SettingsError> {
    let bytes = fs::read(path).map_err(|e| SettingsError::Io(e.to_string()))?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let contents = String::from_utf8(bytes)
        .map_err(|e| SettingsError::Parse(format!("Invalid UTF-8: {}", e)))?;
    let toml_value: toml::Value = toml::from_str(&contents)
        .map_err(|e| SettingsError::Parse(format!("TOML parse error: {}", e)))?;

    Ok((toml_to_json(toml_value), digest))
}

fn validate(settings: &Settings) -> Result<(), SettingsError> {
    if settings.store_dir.trim().is_empty() {
        return Err(SettingsError::Validation(
            "store_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
