//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `engine.yaml`.

use serde::Deserialize;

/// Metadata about the engine deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable name of the deployment.
    pub name: String,
    /// The configuration version.
    pub version: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "127.0.0.1:3000".
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// Batch selection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// Rows per page of the draft listing.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

/// Attendance reconciliation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Text shown in place of values whose lookup failed.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Upper bound on concurrent per-employee lookups in one pass.
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
        }
    }
}

fn default_placeholder() -> String {
    "—".to_string()
}

fn default_max_concurrent_lookups() -> usize {
    8
}

/// The complete engine configuration from `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Deployment metadata.
    pub engine: EngineMetadata,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Batch selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Reconciliation settings.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

impl EngineConfig {
    /// Returns a list of problems with the configured values.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.selection.page_size == 0 {
            problems.push("selection.page_size must be at least 1".to_string());
        }
        if self.reconciliation.max_concurrent_lookups == 0 {
            problems.push("reconciliation.max_concurrent_lookups must be at least 1".to_string());
        }
        problems
    }
}
