//! In-memory store implementing every persistence trait.
//!
//! Used by the standalone server (seeded from `seed.yaml`) and by tests.
//! The finalized map is keyed by [`PayrollIdentity`], which gives the unique
//! constraint the finalization gate relies on.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    AttendanceSource, DraftPayrollStore, FinalizedPayrollStore, OfficialTimeSource, StoreError,
    StoreResult,
};
use crate::models::{
    AttendanceEntry, FinalizedPayrollRecord, OfficialTime, PayPeriod, PayrollDraftRow,
    PayrollIdentity, PayrollStatus,
};

/// Initial contents for an [`InMemoryStore`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Draft payroll rows.
    #[serde(default)]
    pub drafts: Vec<PayrollDraftRow>,
    /// Attendance entries by employee number.
    #[serde(default)]
    pub attendance: HashMap<String, Vec<AttendanceEntry>>,
    /// Official times by employee number.
    #[serde(default)]
    pub official_times: HashMap<String, OfficialTime>,
}

/// An in-memory store.
///
/// # Example
///
/// ```
/// use payroll_engine::store::{InMemoryStore, SeedData};
///
/// let store = InMemoryStore::from_seed(SeedData::default());
/// store.set_available(false);
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    drafts: RwLock<BTreeMap<String, PayrollDraftRow>>,
    finalized: RwLock<HashMap<PayrollIdentity, FinalizedPayrollRecord>>,
    attendance: RwLock<HashMap<String, Vec<AttendanceEntry>>>,
    official_times: RwLock<HashMap<String, OfficialTime>>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::from_seed(SeedData::default())
    }

    /// Creates a store populated from seed data.
    pub fn from_seed(seed: SeedData) -> Self {
        let drafts = seed
            .drafts
            .into_iter()
            .map(|row| (row.id.clone(), row))
            .collect();

        Self {
            drafts: RwLock::new(drafts),
            finalized: RwLock::new(HashMap::new()),
            attendance: RwLock::new(seed.attendance),
            official_times: RwLock::new(seed.official_times),
            available: AtomicBool::new(true),
        }
    }

    /// Adds or replaces a draft row.
    pub async fn put_draft(&self, row: PayrollDraftRow) {
        self.drafts.write().await.insert(row.id.clone(), row);
    }

    /// Appends attendance entries for an employee.
    pub async fn record_attendance(&self, employee_number: &str, entries: Vec<AttendanceEntry>) {
        self.attendance
            .write()
            .await
            .entry(employee_number.to_string())
            .or_default()
            .extend(entries);
    }

    /// Sets the official time for an employee.
    pub async fn set_official_time(&self, employee_number: &str, official_time: OfficialTime) {
        self.official_times
            .write()
            .await
            .insert(employee_number.to_string(), official_time);
    }

    /// Simulates the store going offline or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                message: "in-memory store is offline".to_string(),
            })
        }
    }
}

#[async_trait]
impl AttendanceSource for InMemoryStore {
    async fn attendance(
        &self,
        employee_number: &str,
        period: PayPeriod,
    ) -> StoreResult<Vec<AttendanceEntry>> {
        self.ensure_available()?;
        let attendance = self.attendance.read().await;
        Ok(attendance
            .get(employee_number)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| period.contains_date(e.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl OfficialTimeSource for InMemoryStore {
    async fn official_time(&self, employee_number: &str) -> StoreResult<OfficialTime> {
        self.ensure_available()?;
        self.official_times
            .read()
            .await
            .get(employee_number)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: format!("official time for {}", employee_number),
            })
    }
}

#[async_trait]
impl DraftPayrollStore for InMemoryStore {
    async fn list_drafts(&self) -> StoreResult<Vec<PayrollDraftRow>> {
        self.ensure_available()?;
        Ok(self.drafts.read().await.values().cloned().collect())
    }

    async fn get_draft(&self, id: &str) -> StoreResult<Option<PayrollDraftRow>> {
        self.ensure_available()?;
        Ok(self.drafts.read().await.get(id).cloned())
    }

    async fn mark_processed(&self, id: &str) -> StoreResult<()> {
        self.ensure_available()?;
        let mut drafts = self.drafts.write().await;
        let row = drafts.get_mut(id).ok_or_else(|| StoreError::NotFound {
            key: id.to_string(),
        })?;
        row.status = PayrollStatus::Processed;
        Ok(())
    }

    async fn delete_draft(&self, id: &str) -> StoreResult<bool> {
        self.ensure_available()?;
        let mut drafts = self.drafts.write().await;
        match drafts.get(id) {
            None => Ok(false),
            Some(row) if row.is_processed() => Err(StoreError::Rejected {
                message: format!("row '{}' is processed and cannot be deleted", id),
            }),
            Some(_) => {
                drafts.remove(id);
                Ok(true)
            }
        }
    }
}

#[async_trait]
impl FinalizedPayrollStore for InMemoryStore {
    async fn contains(&self, identity: &PayrollIdentity) -> StoreResult<bool> {
        self.ensure_available()?;
        Ok(self.finalized.read().await.contains_key(identity))
    }

    async fn insert(&self, record: FinalizedPayrollRecord) -> StoreResult<()> {
        self.ensure_available()?;
        match self.finalized.write().await.entry(record.identity.clone()) {
            Entry::Occupied(existing) => Err(StoreError::DuplicateIdentity {
                identity: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                debug!(identity = %record.identity, "Inserted finalized record");
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn find(&self, identity: &PayrollIdentity) -> StoreResult<Option<FinalizedPayrollRecord>> {
        self.ensure_available()?;
        Ok(self.finalized.read().await.get(identity).cloned())
    }

    async fn list_finalized(&self) -> StoreResult<Vec<FinalizedPayrollRecord>> {
        self.ensure_available()?;
        let mut records: Vec<_> = self.finalized.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(records)
    }
}
