//! Application state for the Payroll Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::finalization::FinalizationGate;
use crate::store::{
    AttendanceSource, DraftPayrollStore, FinalizedPayrollStore, InMemoryStore, OfficialTimeSource,
};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the four stores and the finalization gate.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    attendance: Arc<dyn AttendanceSource>,
    official: Arc<dyn OfficialTimeSource>,
    drafts: Arc<dyn DraftPayrollStore>,
    finalized: Arc<dyn FinalizedPayrollStore>,
    gate: Arc<FinalizationGate>,
}

impl AppState {
    /// Creates a state over one store that serves every role.
    pub fn new<S>(config: ConfigLoader, store: Arc<S>) -> Self
    where
        S: AttendanceSource + OfficialTimeSource + DraftPayrollStore + FinalizedPayrollStore + 'static,
    {
        let gate = FinalizationGate::new(store.clone(), store.clone());
        Self {
            config: Arc::new(config),
            attendance: store.clone(),
            official: store.clone(),
            drafts: store.clone(),
            finalized: store,
            gate: Arc::new(gate),
        }
    }

    /// Creates a state over an in-memory store filled from the loader's
    /// seed data, if any.
    pub fn in_memory(mut config: ConfigLoader) -> Self {
        let seed = config.take_seed().unwrap_or_default();
        Self::new(config, Arc::new(InMemoryStore::from_seed(seed)))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the attendance source.
    pub fn attendance(&self) -> &dyn AttendanceSource {
        self.attendance.as_ref()
    }

    /// Returns the official-time source.
    pub fn official(&self) -> &dyn OfficialTimeSource {
        self.official.as_ref()
    }

    /// Returns the draft store.
    pub fn drafts(&self) -> &dyn DraftPayrollStore {
        self.drafts.as_ref()
    }

    /// Returns the finalized store.
    pub fn finalized(&self) -> &dyn FinalizedPayrollStore {
        self.finalized.as_ref()
    }

    /// Returns the finalization gate.
    pub fn gate(&self) -> &FinalizationGate {
        &self.gate
    }
}
