//! Configuration loading and management for the Payroll Engine.
//!
//! This module loads engine settings from YAML files, plus optional seed
//! data for running the engine against an in-memory store.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll").unwrap();
//! println!("Page size: {}", config.selection().page_size);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, EngineMetadata, ReconciliationConfig, SelectionConfig, ServerConfig,
};
