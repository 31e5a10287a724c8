//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration and optional seed data from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::store::SeedData;

use super::types::{EngineConfig, EngineMetadata, ReconciliationConfig, SelectionConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── engine.yaml   # Engine metadata, server, selection and reconciliation settings
/// └── seed.yaml     # Optional draft rows, attendance and official times
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/payroll").unwrap();
/// println!("Loaded: {}", config.engine().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    seed: Option<SeedData>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if `engine.yaml` is missing
    /// - `ConfigParseError` if any present file is invalid YAML or the
    ///   settings fail validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let config = Self::load_yaml::<EngineConfig>(&engine_path)?;

        let problems = config.problems();
        if !problems.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: problems.join("; "),
            });
        }

        let seed_path = path.join("seed.yaml");
        let seed = if seed_path.exists() {
            Some(Self::load_yaml::<SeedData>(&seed_path)?)
        } else {
            None
        };

        Ok(Self { config, seed })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine metadata.
    pub fn engine(&self) -> &EngineMetadata {
        &self.config.engine
    }

    /// Returns the selection settings.
    pub fn selection(&self) -> &SelectionConfig {
        &self.config.selection
    }

    /// Returns the reconciliation settings.
    pub fn reconciliation(&self) -> &ReconciliationConfig {
        &self.config.reconciliation
    }

    /// Returns the seed data, if `seed.yaml` was present.
    pub fn seed(&self) -> Option<&SeedData> {
        self.seed.as_ref()
    }

    /// Takes the seed data out of the loader.
    pub fn take_seed(&mut self) -> Option<SeedData> {
        self.seed.take()
    }
}
