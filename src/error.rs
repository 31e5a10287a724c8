//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while reconciling, computing and
//! finalizing payroll.
//!
//! Only [`EngineError::BatchWrite`], [`EngineError::BatchInProgress`] and the
//! configuration variants are ever returned as `Err` from batch operations.
//! The row-level variants are rendered into batch results instead.

use thiserror::Error;

use crate::models::PayrollIdentity;

/// The main error type for the Payroll Engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or contained invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Attendance or official-time lookup failed for one employee.
    #[error("Lookup failed for employee '{employee_number}': {message}")]
    TransientFetch {
        /// The employee whose lookup failed.
        employee_number: String,
        /// A description of the failure.
        message: String,
    },

    /// The payroll identity has already been finalized.
    #[error("Payroll already finalized for {identity}")]
    DuplicateFinalization {
        /// The identity that already has a finalized record.
        identity: PayrollIdentity,
    },

    /// The finalized payroll store failed for the whole batch.
    #[error("Batch write failed: {message}")]
    BatchWrite {
        /// A description of the store failure.
        message: String,
    },

    /// Another export batch is already running.
    #[error("An export batch is already in progress")]
    BatchInProgress,

    /// A draft row is malformed.
    #[error("Invalid payroll row '{row_id}': {message}")]
    Validation {
        /// The ID of the malformed row.
        row_id: String,
        /// A description of what made the row invalid.
        message: String,
    },

    /// A draft row ID did not resolve to a row.
    #[error("Payroll row not found: {row_id}")]
    RowNotFound {
        /// The ID that was not found.
        row_id: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
