//! The finalization gate.
//!
//! Moves draft rows from `Unprocessed` to `Processed` by freezing each into
//! a [`FinalizedPayrollRecord`]. At most one record ever exists per
//! [`PayrollIdentity`]: the gate checks the finalized store first, and the
//! store's unique constraint catches anything that races past the check.
//!
//! The record insert and the status flip are two writes. The gate always
//! inserts first, so a row is never `Processed` without a record. If the
//! flip fails after the insert, the row is reported failed and is healed by
//! the duplicate path of the next export or by [`FinalizationGate::repair_statuses`].

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::compute_row;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ExportOutcome, FinalizedPayrollRecord, PayrollDraftRow, PayrollIdentity, RowErrorKind,
};
use crate::store::{DraftPayrollStore, FinalizedPayrollStore, StoreError};

/// The engine version stamped on every finalized record.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Governs the `Unprocessed` to `Processed` transition.
///
/// Only one batch runs at a time; a second concurrent call is rejected with
/// [`EngineError::BatchInProgress`]. Each batch runs on its own task that
/// holds the batch lock, so a caller that goes away mid-batch never leaves
/// a row between its insert and its status flip.
pub struct FinalizationGate {
    writer: BatchWriter,
    in_flight: Arc<Mutex<()>>,
}

/// The stores a batch writes to, owned by the batch task.
#[derive(Clone)]
struct BatchWriter {
    drafts: Arc<dyn DraftPayrollStore>,
    finalized: Arc<dyn FinalizedPayrollStore>,
}

/// What happened to one row.
enum RowOutcome {
    Succeeded,
    Skipped,
    Failed(RowErrorKind, String),
}

impl FinalizationGate {
    /// Creates a gate over the draft and finalized stores.
    pub fn new(
        drafts: Arc<dyn DraftPayrollStore>,
        finalized: Arc<dyn FinalizedPayrollStore>,
    ) -> Self {
        Self {
            writer: BatchWriter { drafts, finalized },
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Finalizes a batch of rows.
    ///
    /// Rows whose identity is already finalized are reported in
    /// `skipped_duplicate`, so re-submitting the same selection is safe.
    /// Malformed rows and rows the store refused are reported in `failed`.
    ///
    /// # Errors
    ///
    /// - `BatchInProgress` if another batch is running
    /// - `BatchWrite` if a store becomes unreachable mid-batch; records
    ///   committed before the failure stay committed
    pub async fn export_batch(&self, rows: &[PayrollDraftRow]) -> EngineResult<ExportOutcome> {
        let rows = rows.to_vec();
        self.detached(move |writer| async move {
            let mut outcome = ExportOutcome::default();
            writer.run_batch(&rows, &mut outcome).await?;
            Ok(outcome)
        })
        .await
    }

    /// Resolves row ids through the draft store, then finalizes them.
    ///
    /// Unknown ids are reported in `failed`.
    pub async fn export_selection(&self, ids: &[String]) -> EngineResult<ExportOutcome> {
        let ids = ids.to_vec();
        self.detached(move |writer| async move {
            let mut outcome = ExportOutcome::default();
            let rows = writer.resolve(&ids, &mut outcome).await?;
            writer.run_batch(&rows, &mut outcome).await?;
            Ok(outcome)
        })
        .await
    }

    /// Flips every `Unprocessed` row whose identity is already finalized.
    ///
    /// Returns the ids that were repaired.
    pub async fn repair_statuses(&self) -> EngineResult<Vec<String>> {
        self.detached(|writer| async move { writer.repair().await })
            .await
    }

    /// Takes the batch lock and runs `work` on a task that keeps the lock
    /// until the work is done, whether or not the caller is still waiting.
    async fn detached<T, F, Fut>(&self, work: F) -> EngineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(BatchWriter) -> Fut,
        Fut: Future<Output = EngineResult<T>> + Send + 'static,
    {
        let guard = self
            .in_flight
            .clone()
            .try_lock_owned()
            .map_err(|_| EngineError::BatchInProgress)?;

        let task = work(self.writer.clone());
        tokio::spawn(async move {
            let _guard = guard;
            task.await
        })
        .await
        .map_err(|err| EngineError::BatchWrite {
            message: format!("batch task ended early: {}", err),
        })?
    }
}

impl BatchWriter {
    async fn resolve(
        &self,
        ids: &[String],
        outcome: &mut ExportOutcome,
    ) -> EngineResult<Vec<PayrollDraftRow>> {
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            match self.drafts.get_draft(id).await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => outcome.fail(
                    id.clone(),
                    RowErrorKind::Validation,
                    EngineError::RowNotFound {
                        row_id: id.clone(),
                    }
                    .to_string(),
                ),
                Err(err) => return Err(batch_write(err)),
            }
        }
        Ok(rows)
    }

    async fn repair(&self) -> EngineResult<Vec<String>> {
        let drafts = self.drafts.list_drafts().await.map_err(batch_write)?;
        let mut repaired = Vec::new();
        for row in drafts.iter().filter(|r| !r.is_processed()) {
            let Ok(identity) = row.identity() else {
                continue;
            };
            if self.finalized.contains(&identity).await.map_err(batch_write)? {
                self.drafts
                    .mark_processed(&row.id)
                    .await
                    .map_err(batch_write)?;
                repaired.push(row.id.clone());
            }
        }

        if !repaired.is_empty() {
            info!(repaired = repaired.len(), "Repaired stale draft statuses");
        }
        Ok(repaired)
    }

    async fn run_batch(
        &self,
        rows: &[PayrollDraftRow],
        outcome: &mut ExportOutcome,
    ) -> EngineResult<()> {
        let batch_id = Uuid::new_v4();
        info!(%batch_id, rows = rows.len(), "Export batch started");

        for row in rows {
            match self.finalize_row(row).await {
                Ok(RowOutcome::Succeeded) => outcome.succeeded.push(row.id.clone()),
                Ok(RowOutcome::Skipped) => outcome.skipped_duplicate.push(row.id.clone()),
                Ok(RowOutcome::Failed(kind, message)) => {
                    warn!(%batch_id, row_id = %row.id, error = %message, "Row not finalized");
                    outcome.fail(row.id.clone(), kind, message);
                }
                Err(err) => {
                    warn!(
                        %batch_id,
                        error = %err,
                        committed = outcome.succeeded.len(),
                        "Export batch aborted"
                    );
                    return Err(err);
                }
            }
        }

        info!(
            %batch_id,
            succeeded = outcome.succeeded.len(),
            skipped = outcome.skipped_duplicate.len(),
            failed = outcome.failed.len(),
            "Export batch finished"
        );
        Ok(())
    }

    async fn finalize_row(&self, row: &PayrollDraftRow) -> EngineResult<RowOutcome> {
        let identity = match row.identity() {
            Ok(identity) => identity,
            Err(err) => return Ok(RowOutcome::Failed(RowErrorKind::Validation, err.to_string())),
        };

        if self.finalized.contains(&identity).await.map_err(batch_write)? {
            debug!(row_id = %row.id, %identity, "Identity already finalized");
            self.heal_status(row).await?;
            return Ok(RowOutcome::Skipped);
        }

        match self.finalized.insert(build_record(row, identity)).await {
            Ok(()) => {}
            Err(StoreError::DuplicateIdentity { identity }) => {
                debug!(row_id = %row.id, %identity, "Insert lost a race on identity");
                self.heal_status(row).await?;
                return Ok(RowOutcome::Skipped);
            }
            Err(err @ StoreError::Unavailable { .. }) => return Err(batch_write(err)),
            Err(err) => return Ok(RowOutcome::Failed(RowErrorKind::Write, err.to_string())),
        }

        match self.drafts.mark_processed(&row.id).await {
            Ok(()) => Ok(RowOutcome::Succeeded),
            Err(err @ StoreError::Unavailable { .. }) => Err(batch_write(err)),
            Err(err) => Ok(RowOutcome::Failed(
                RowErrorKind::Write,
                format!("record finalized but status not updated: {}", err),
            )),
        }
    }

    /// Flips a stale `Unprocessed` row whose identity is already finalized.
    ///
    /// A refused flip is logged and left for the next repair pass; an
    /// unreachable store aborts the batch.
    async fn heal_status(&self, row: &PayrollDraftRow) -> EngineResult<()> {
        if row.is_processed() {
            return Ok(());
        }
        match self.drafts.mark_processed(&row.id).await {
            Ok(()) => Ok(()),
            Err(err @ StoreError::Unavailable { .. }) => Err(batch_write(err)),
            Err(err) => {
                warn!(row_id = %row.id, error = %err, "Could not repair stale status");
                Ok(())
            }
        }
    }
}

fn build_record(row: &PayrollDraftRow, identity: PayrollIdentity) -> FinalizedPayrollRecord {
    FinalizedPayrollRecord {
        record_id: Uuid::new_v4(),
        identity,
        source_row_id: row.id.clone(),
        department: row.department.clone(),
        rate_per_day: row.rate_per_day.unwrap_or_default(),
        rh: row.rh.unwrap_or_default(),
        pay: compute_row(row),
        finalized_at: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
    }
}

fn batch_write(err: StoreError) -> EngineError {
    EngineError::BatchWrite {
        message: err.to_string(),
    }
}
