//! Batch export result model.

use serde::{Deserialize, Serialize};

/// Category of a row-level export failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    /// The row was malformed or could not be resolved.
    Validation,
    /// The store refused the write for this row.
    Write,
}

/// A row-level failure recorded in an [`ExportOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// The failed row ID.
    pub id: String,
    /// The failure category.
    pub kind: RowErrorKind,
    /// A human-readable description.
    pub message: String,
}

/// The result of one `export_batch` invocation.
///
/// `skipped_duplicate` rows are already finalized and need nothing further;
/// `failed` rows still need attention, so re-submitting the same selection is
/// always safe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Rows finalized by this invocation.
    pub succeeded: Vec<String>,
    /// Rows whose identity was already finalized.
    pub skipped_duplicate: Vec<String>,
    /// Rows that could not be finalized.
    pub failed: Vec<String>,
    /// Details for each failed row.
    pub errors: Vec<RowError>,
}

impl ExportOutcome {
    /// Records a row failure.
    pub fn fail(&mut self, id: impl Into<String>, kind: RowErrorKind, message: impl Into<String>) {
        let id = id.into();
        self.errors.push(RowError {
            id: id.clone(),
            kind,
            message: message.into(),
        });
        self.failed.push(id);
    }

    /// Total number of rows accounted for.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped_duplicate.len() + self.failed.len()
    }
}
