use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::filters::{DecodeContext, MAX_FILTER_JSON_SIZE, MAX_FILTERS, ParseLimits, ValueEncoding};
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_TIMEZONE};

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Filter section of the config file
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FiltersFileConfig {
    pub encoding: Option<ValueEncoding>,
    pub timezone: Option<String>,
    pub max_filters: Option<usize>,
    pub max_json_bytes: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filters: Option<FiltersFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Names of top-level keys this version does not understand
    fn unknown_fields(&self) -> Vec<String> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Overlay `other` on top of self, field by field
    fn merge(&mut self, other: FileConfig) {
        if let Some(filters) = other.filters {
            let current = self
                .filters
                .get_or_insert_with(FiltersFileConfig::default);
            if filters.encoding.is_some() {
                tracing::trace!(encoding = ?filters.encoding, "Merging filters.encoding");
                current.encoding = filters.encoding;
            }
            if filters.timezone.is_some() {
                tracing::trace!(timezone = ?filters.timezone, "Merging filters.timezone");
                current.timezone = filters.timezone;
            }
            if filters.max_filters.is_some() {
                current.max_filters = filters.max_filters;
            }
            if filters.max_json_bytes.is_some() {
                current.max_json_bytes = filters.max_json_bytes;
            }
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

/// Filter parsing settings
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub encoding: ValueEncoding,
    pub timezone: Tz,
    pub limits: ParseLimits,
}

impl FilterConfig {
    pub fn decode_context(&self) -> DecodeContext {
        DecodeContext::with_timezone(self.timezone)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub filters: FilterConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.tracefilter/tracefilter.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(cli, file_config)
    }

    /// Layer defaults -> file config -> CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_filters = file_config.filters.unwrap_or_default();

        let encoding = cli.encoding.or(file_filters.encoding).unwrap_or_default();

        let timezone_name = cli
            .timezone
            .clone()
            .or(file_filters.timezone)
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid timezone '{}'", timezone_name))?;

        let max_filters = cli
            .max_filters
            .or(file_filters.max_filters)
            .unwrap_or(MAX_FILTERS);
        let max_json_bytes = cli
            .max_json_bytes
            .or(file_filters.max_json_bytes)
            .unwrap_or(MAX_FILTER_JSON_SIZE);
        if max_filters == 0 || max_json_bytes == 0 {
            anyhow::bail!("max_filters and max_json_bytes must be greater than 0");
        }

        let config = Self {
            filters: FilterConfig {
                encoding,
                timezone,
                limits: ParseLimits {
                    max_filters,
                    max_json_bytes,
                },
            },
        };
        tracing::debug!(
            encoding = %config.filters.encoding,
            timezone = %config.filters.timezone,
            max_filters,
            max_json_bytes,
            "Configuration resolved"
        );
        Ok(config)
    }
}

fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
