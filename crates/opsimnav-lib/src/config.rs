use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::estimator::{EstimatorStrategy, FormulaCoefficients, ModelSettings};
use crate::report::ReportStore;
use crate::scenario::ScenarioLimits;
use crate::ship::ShipClassCatalog;

/// Default filename for the configuration file inside the platform config dir.
const CONFIG_FILENAME: &str = "config.json";

/// Directory under the platform data dir that reports are written to.
const REPORTS_DIRNAME: &str = "reports";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "OPSIMNAV_CONFIG";

/// Environment variable naming the report output directory.
pub const REPORT_DIR_ENV: &str = "OPSIMNAV_REPORT_DIR";

/// Runtime configuration for estimation and reporting.
///
/// Every section falls back to built-in defaults, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsimnavConfig {
    pub strategy: EstimatorStrategy,
    pub formula: FormulaCoefficients,
    pub model: ModelSettings,
    pub limits: ScenarioLimits,
    /// CSV ship class catalog replacing the built-in classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_classes: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

impl OpsimnavConfig {
    /// Load a configuration file. Relative paths inside it resolve against its directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let mut config: Self = serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;

        if let Some(base) = path.parent() {
            config.rebase_paths(base);
        }

        config.validate()?;
        debug!(strategy = %config.strategy, "loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration to use.
    ///
    /// The resolution order is:
    /// 1. Explicit `path` argument when provided.
    /// 2. `OPSIMNAV_CONFIG` environment variable.
    /// 3. `config.json` in the platform-specific config directory, if present.
    /// 4. Built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(explicit) = path {
            return Self::from_path(explicit);
        }

        if let Some(env_path) = env::var_os(CONFIG_ENV) {
            return Self::from_path(Path::new(&env_path));
        }

        if let Ok(default) = default_config_path() {
            if default.exists() {
                return Self::from_path(&default);
            }
        }

        debug!("no configuration file found; using built-in defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        self.formula.validate()?;
        self.model.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Ship class catalog named by the configuration, or the built-in one.
    pub fn ship_catalog(&self) -> Result<ShipClassCatalog> {
        match &self.ship_classes {
            Some(path) => ShipClassCatalog::from_path(path),
            None => Ok(ShipClassCatalog::builtin()),
        }
    }

    /// Report store rooted at the first of: `explicit`, `report_dir`,
    /// `OPSIMNAV_REPORT_DIR`, or the platform data directory.
    pub fn report_store(&self, explicit: Option<&Path>) -> Result<ReportStore> {
        let root = if let Some(dir) = explicit {
            dir.to_path_buf()
        } else if let Some(dir) = &self.report_dir {
            dir.clone()
        } else if let Some(dir) = env::var_os(REPORT_DIR_ENV) {
            PathBuf::from(dir)
        } else {
            default_report_dir()?
        };

        info!("report store at {}", root.display());
        Ok(ReportStore::new(root))
    }

    fn rebase_paths(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(p) = self.model.artifact.as_mut() {
            rebase(p);
        }
        if let Some(p) = self.ship_classes.as_mut() {
            rebase(p);
        }
        if let Some(p) = self.report_dir.as_mut() {
            rebase(p);
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "opsimnav", "opsimnav").ok_or(Error::ProjectDirsUnavailable)
}

/// Resolve the default configuration file location using platform-specific project directories.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILENAME))
}

/// Resolve the default report directory using platform-specific project directories.
pub fn default_report_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join(REPORTS_DIRNAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_yields_defaults() {
        let config: OpsimnavConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, OpsimnavConfig::default());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"strategy": "model", "model": {{"artifact": "model.json"}}, "report_dir": "out"}}"#
        )
        .unwrap();

        let config = OpsimnavConfig::from_path(&path).unwrap();
        assert_eq!(config.strategy, EstimatorStrategy::Model);
        assert_eq!(config.model.artifact, Some(dir.path().join("model.json")));
        assert_eq!(config.report_dir, Some(dir.path().join("out")));
        assert_eq!(
            config.model.fuel_per_resistance_speed,
            ModelSettings::default().fuel_per_resistance_speed
        );
    }

    #[test]
    fn inconsistent_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"limits": {"engine_load_pct": {"min": 100, "max": 50}}}"#).unwrap();
        assert!(matches!(
            OpsimnavConfig::from_path(&path),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn explicit_report_dir_wins() {
        let config = OpsimnavConfig {
            report_dir: Some(PathBuf::from("/from/config")),
            ..OpsimnavConfig::default()
        };
        let store = config.report_store(Some(Path::new("/explicit"))).unwrap();
        assert_eq!(store.root(), Path::new("/explicit"));
    }
}
