//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/headcount/headcount.toml`
//! 3. Local config: `<chart_dir>/.headcount.toml`
//! 4. Environment variables: `HEADCOUNT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{RenderStyle, ReportFormat};

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Output style: "flat" or "tree"
    pub style: RenderStyle,
    /// Word appended to unit labels
    pub unit_suffix: String,
    /// Prefix of composite summary lines
    pub total_label: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let format = ReportFormat::default();
        Self {
            style: RenderStyle::Flat,
            unit_suffix: format.unit_suffix,
            total_label: format.total_label,
        }
    }
}

impl RenderSettings {
    pub fn format(&self) -> ReportFormat {
        ReportFormat {
            unit_suffix: self.unit_suffix.clone(),
            total_label: self.total_label.clone(),
        }
    }

    fn merge(&self, overlay: &RawRenderSettings) -> Self {
        Self {
            style: overlay.style.unwrap_or(self.style),
            unit_suffix: overlay
                .unit_suffix
                .clone()
                .unwrap_or_else(|| self.unit_suffix.clone()),
            total_label: overlay
                .total_label
                .clone()
                .unwrap_or_else(|| self.total_label.clone()),
        }
    }
}

/// Raw render config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub style: Option<RenderStyle>,
    pub unit_suffix: Option<String>,
    pub total_label: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_chart: Option<PathBuf>,
    pub render: RawRenderSettings,
}

/// Unified configuration for headcount.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Chart used when a command is given no file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_chart: Option<PathBuf>,
    pub render: RenderSettings,
}

/// Get the XDG config directory for headcount.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "headcount").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("headcount.toml"))
}

/// Get the path to the local config file in a chart directory.
pub fn local_config_path(chart_dir: &Path) -> PathBuf {
    chart_dir.join(".headcount.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input as is on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    fn expand_paths(&mut self) {
        if let Some(chart) = &self.default_chart {
            let expanded = expand_env_vars(chart.to_string_lossy().as_ref());
            self.default_chart = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_chart: overlay
                .default_chart
                .clone()
                .or_else(|| self.default_chart.clone()),
            render: self.render.merge(&overlay.render),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `chart_dir` - Optional directory holding a local `.headcount.toml`
    pub fn load(chart_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = chart_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply HEADCOUNT_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `HEADCOUNT_RENDER__STYLE=tree`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("HEADCOUNT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional::<String>(&config, "default_chart")? {
            settings.default_chart = Some(PathBuf::from(val));
        }
        if let Some(val) = optional::<RenderStyle>(&config, "render.style")? {
            settings.render.style = val;
        }
        if let Some(val) = optional::<String>(&config, "render.unit_suffix")? {
            settings.render.unit_suffix = val;
        }
        if let Some(val) = optional::<String>(&config, "render.total_label")? {
            settings.render.total_label = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# headcount configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/headcount/headcount.toml
#   Local:  <chart_dir>/.headcount.toml
#   Env:    HEADCOUNT_* environment variables (HEADCOUNT_RENDER__STYLE=tree)

# Chart used when no file is given on the command line
# default_chart = "~/org/chart.toml"

[render]
# "flat" (header, children, total) or "tree"
# style = "flat"

# Appended to every unit label
# unit_suffix = "Department"

# Prefix of the composite summary line
# total_label = "Total Employees"
"#
        .to_string()
    }
}

/// Missing keys are `None`; malformed values are errors.
fn optional<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
