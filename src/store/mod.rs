//! Persistence seam for the Payroll Engine.
//!
//! The engine treats every backing system as an opaque store behind one of
//! four traits. Attendance and official-time lookups are owned by other
//! subsystems; the draft store is owned by the payroll source system; the
//! finalized store is append-only and must enforce a unique constraint on
//! [`PayrollIdentity`] so that even a race past the engine's duplicate check
//! cannot produce two records for one identity.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AttendanceEntry, FinalizedPayrollRecord, OfficialTime, PayPeriod, PayrollDraftRow,
    PayrollIdentity,
};

pub use memory::{InMemoryStore, SeedData};

/// Errors reported by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// A description of the transport failure.
        message: String,
    },

    /// The unique identity constraint rejected an insert.
    #[error("Duplicate payroll identity: {identity}")]
    DuplicateIdentity {
        /// The identity that already exists.
        identity: PayrollIdentity,
    },

    /// The requested key does not exist.
    #[error("Not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// The store refused the write.
    #[error("Write rejected: {message}")]
    Rejected {
        /// Why the write was refused.
        message: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Attendance query owned by the timekeeping subsystem.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Returns the attendance entries of one employee within the period.
    async fn attendance(
        &self,
        employee_number: &str,
        period: PayPeriod,
    ) -> StoreResult<Vec<AttendanceEntry>>;
}

/// Official-time lookup owned by the scheduling subsystem.
#[async_trait]
pub trait OfficialTimeSource: Send + Sync {
    /// Returns the official time of one employee.
    async fn official_time(&self, employee_number: &str) -> StoreResult<OfficialTime>;
}

/// Draft payroll rows owned by the payroll source system.
#[async_trait]
pub trait DraftPayrollStore: Send + Sync {
    /// Lists all draft rows.
    async fn list_drafts(&self) -> StoreResult<Vec<PayrollDraftRow>>;

    /// Reads one draft row.
    async fn get_draft(&self, id: &str) -> StoreResult<Option<PayrollDraftRow>>;

    /// Moves a row to `Processed`. Never moves a row backward.
    async fn mark_processed(&self, id: &str) -> StoreResult<()>;

    /// Deletes a row. Returns false if no such row existed.
    async fn delete_draft(&self, id: &str) -> StoreResult<bool>;
}

/// Append-only store of finalized payroll records.
#[async_trait]
pub trait FinalizedPayrollStore: Send + Sync {
    /// Returns true if a record exists for the identity.
    async fn contains(&self, identity: &PayrollIdentity) -> StoreResult<bool>;

    /// Inserts a record.
    ///
    /// Must fail with [`StoreError::DuplicateIdentity`] if a record with the
    /// same identity already exists.
    async fn insert(&self, record: FinalizedPayrollRecord) -> StoreResult<()>;

    /// Reads the record for an identity.
    async fn find(&self, identity: &PayrollIdentity) -> StoreResult<Option<FinalizedPayrollRecord>>;

    /// Lists all records.
    async fn list_finalized(&self) -> StoreResult<Vec<FinalizedPayrollRecord>>;
}
