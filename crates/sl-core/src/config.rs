//! Configuration types and parsing for spendlake.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the warehouse connection target
pub const WAREHOUSE_URL_ENV: &str = "WAREHOUSE_URL";

/// Environment variable naming the target to use when `--target` is absent
pub const TARGET_ENV: &str = "SL_TARGET";

/// Main project configuration from spendlake.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory holding the raw source files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File names of the three sources, relative to `data_dir`
    #[serde(default)]
    pub sources: SourcePaths,

    /// Directory for the issue report and the default warehouse file
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Issue report file name, relative to `output_dir`
    #[serde(default = "default_report_file")]
    pub report_file: String,

    /// Warehouse connection configuration
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Stage retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// File names of the raw sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcePaths {
    /// Nested API export (JSON)
    #[serde(default = "default_google_ads_file")]
    pub google_ads: String,

    /// Flat platform export (CSV)
    #[serde(default = "default_facebook_file")]
    pub facebook: String,

    /// Hand-maintained revenue ledger (CSV, possibly malformed)
    #[serde(default = "default_crm_file")]
    pub crm: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            google_ads: default_google_ads_file(),
            facebook: default_facebook_file(),
            crm: default_crm_file(),
        }
    }
}

/// Warehouse connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Connection target: a DuckDB file path, `:memory:`, or a
    /// `postgres://` URL
    #[serde(default = "default_warehouse_target")]
    pub target: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            target: default_warehouse_target(),
        }
    }
}

/// Retry policy applied around each pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per stage, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff base; attempt `n` (0-based) waits `base^n` seconds
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
        }
    }
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Warehouse configuration override
    #[serde(default)]
    pub warehouse: Option<WarehouseConfig>,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_report_file() -> String {
    "validation_report.csv".to_string()
}

fn default_google_ads_file() -> String {
    "google_ads_api.json".to_string()
}

fn default_facebook_file() -> String {
    "facebook_export.csv".to_string()
}

fn default_crm_file() -> String {
    "crm_revenue.csv".to_string()
}

fn default_warehouse_target() -> String {
    "output/warehouse.duckdb".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_secs() -> f64 {
    2.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "spendlake".to_string(),
            data_dir: default_data_dir(),
            sources: SourcePaths::default(),
            output_dir: default_output_dir(),
            report_file: default_report_file(),
            warehouse: WarehouseConfig::default(),
            retry: RetryConfig::default(),
            targets: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for spendlake.yml or spendlake.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("spendlake.yml");
        let yaml_path = dir.join("spendlake.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Load from a project directory, falling back to built-in defaults when
    /// no config file exists. Parse and validation errors still fail.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { path }) => {
                log::debug!("No config at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }

        let base = self.retry.backoff_base_secs;
        if base.is_nan() || base <= 0.0 {
            return Err(CoreError::ConfigInvalid {
                message: "retry.backoff_base_secs must be greater than 0".to_string(),
            });
        }

        if self.warehouse.target.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "warehouse.target cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Absolute path of the nested API export
    pub fn google_ads_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir).join(&self.sources.google_ads)
    }

    /// Absolute path of the flat platform export
    pub fn facebook_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir).join(&self.sources.facebook)
    }

    /// Absolute path of the revenue ledger
    pub fn crm_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir).join(&self.sources.crm)
    }

    /// Absolute path of the issue report
    pub fn report_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir).join(&self.report_file)
    }

    /// Get the list of available target names
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get warehouse configuration, optionally applying target overrides
    pub fn get_warehouse_config(&self, target: Option<&str>) -> CoreResult<WarehouseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .warehouse
                    .clone()
                    .unwrap_or_else(|| self.warehouse.clone()))
            }
            None => Ok(self.warehouse.clone()),
        }
    }

    /// Resolve the warehouse connection target.
    ///
    /// Priority: explicit override > `WAREHOUSE_URL` > named target
    /// (CLI or `SL_TARGET`) > `warehouse.target`. Relative file targets are
    /// resolved against `root`; URLs and `:memory:` pass through untouched.
    pub fn resolve_warehouse_target(
        &self,
        root: &Path,
        explicit: Option<&str>,
        cli_target: Option<&str>,
    ) -> CoreResult<String> {
        if let Some(url) = explicit {
            return Ok(url.to_string());
        }
        if let Some(url) = std::env::var(WAREHOUSE_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
        {
            return Ok(url);
        }
        let target = Self::resolve_target(cli_target);
        let warehouse = self.get_warehouse_config(target.as_deref())?;
        Ok(resolve_relative_target(root, &warehouse.target))
    }

    /// Resolve target from CLI flag or SL_TARGET environment variable
    ///
    /// Priority: CLI flag > SL_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV).ok())
    }
}

/// Anchor a relative file target at `root`
fn resolve_relative_target(root: &Path, target: &str) -> String {
    if target == ":memory:" || target.contains("://") || Path::new(target).is_absolute() {
        target.to_string()
    } else {
        root.join(target).display().to_string()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
