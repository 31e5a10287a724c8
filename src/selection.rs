//! Batch selection.
//!
//! Decides which draft rows may be exported and tracks one selection set
//! that spans every page of the draft listing.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{FinalizedPayrollRecord, PayrollDraftRow, PayrollIdentity};

/// Identities that already have a finalized record.
#[derive(Debug, Clone, Default)]
pub struct FinalizedIndex {
    identities: HashSet<PayrollIdentity>,
}

impl FinalizedIndex {
    /// Builds the index from finalized records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FinalizedPayrollRecord>,
    {
        records.into_iter().map(|r| r.identity.clone()).collect()
    }

    /// Returns true if the identity is finalized.
    pub fn contains(&self, identity: &PayrollIdentity) -> bool {
        self.identities.contains(identity)
    }

    /// Number of finalized identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns true if nothing is finalized.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl FromIterator<PayrollIdentity> for FinalizedIndex {
    fn from_iter<I: IntoIterator<Item = PayrollIdentity>>(iter: I) -> Self {
        Self {
            identities: iter.into_iter().collect(),
        }
    }
}

/// Returns true if the row may be selected for export.
///
/// A row is selectable when it is not processed, its identity is valid, and
/// that identity is not in the index. The index wins over a stale status.
pub fn is_selectable(row: &PayrollDraftRow, index: &FinalizedIndex) -> bool {
    if row.is_processed() {
        return false;
    }
    match row.identity() {
        Ok(identity) => !index.contains(&identity),
        Err(_) => false,
    }
}

/// Returns the ids of every selectable row.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollDraftRow, PayrollStatus};
/// use payroll_engine::selection::{FinalizedIndex, selectable_rows};
/// use chrono::NaiveDate;
///
/// let row = PayrollDraftRow {
///     id: "row_001".to_string(),
///     employee_number: "EMP-001".to_string(),
///     department: "Finance".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 15),
///     rate_per_day: None,
///     rh: None,
///     deduction_hours: None,
///     deduction_minutes: None,
///     sss_contribution: None,
///     status: PayrollStatus::Unprocessed,
/// };
///
/// let ids = selectable_rows(&[row.clone()], &FinalizedIndex::default());
/// assert!(ids.contains("row_001"));
///
/// let index: FinalizedIndex = [row.identity().unwrap()].into_iter().collect();
/// assert!(selectable_rows(&[row], &index).is_empty());
/// ```
pub fn selectable_rows(rows: &[PayrollDraftRow], index: &FinalizedIndex) -> HashSet<String> {
    rows.iter()
        .filter(|row| is_selectable(row, index))
        .map(|row| row.id.clone())
        .collect()
}

/// State of a "select all on this page" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxState {
    /// No visible selectable row is selected.
    None,
    /// Some, but not all, visible selectable rows are selected.
    Some,
    /// Every visible selectable row is selected.
    All,
}

/// Derives the page checkbox state.
///
/// A page with no selectable rows reports `None`.
pub fn tristate<'a, V, S>(visible_selectable: V, selected: &S) -> CheckboxState
where
    V: IntoIterator<Item = &'a String>,
    S: SelectedIds + ?Sized,
{
    let (mut visible, mut hits) = (0usize, 0usize);
    for id in visible_selectable {
        visible += 1;
        if selected.is_selected(id) {
            hits += 1;
        }
    }

    if hits == 0 {
        CheckboxState::None
    } else if hits == visible {
        CheckboxState::All
    } else {
        CheckboxState::Some
    }
}

/// Membership test over a set of selected ids.
pub trait SelectedIds {
    /// Returns true if the id is selected.
    fn is_selected(&self, id: &str) -> bool;
}

impl SelectedIds for HashSet<String> {
    fn is_selected(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl SelectedIds for BTreeSet<String> {
    fn is_selected(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl SelectedIds for SelectionSet {
    fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// The cross-page selection.
///
/// Page operations take the page's ids plus the current selectable set and
/// only ever touch ids in both, so ineligible rows never enter the selection
/// and selections made on other pages are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles one id if it is selectable. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str, selectable: &HashSet<String>) -> bool {
        if self.ids.remove(id) {
            return false;
        }
        if selectable.contains(id) {
            self.ids.insert(id.to_string());
            true
        } else {
            false
        }
    }

    /// Selects every id on the page that is currently selectable.
    pub fn select_page<'a, I>(&mut self, page_ids: I, selectable: &HashSet<String>)
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.ids.extend(
            page_ids
                .into_iter()
                .filter(|id| selectable.contains(id.as_str()))
                .cloned(),
        );
    }

    /// Deselects every id on the page that is currently selectable.
    pub fn deselect_page<'a, I>(&mut self, page_ids: I, selectable: &HashSet<String>)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for id in page_ids {
            if selectable.contains(id.as_str()) {
                self.ids.remove(id);
            }
        }
    }

    /// Applies the page checkbox over the page's selectable subset: `All`
    /// deselects it, anything else selects it. Returns the new state.
    pub fn toggle_page(
        &mut self,
        page_ids: &[String],
        selectable: &HashSet<String>,
    ) -> CheckboxState {
        let page_selectable: Vec<&String> = page_ids
            .iter()
            .filter(|id| selectable.contains(id.as_str()))
            .collect();
        match tristate(page_selectable.iter().copied(), &*self) {
            CheckboxState::All => self.deselect_page(page_selectable.iter().copied(), selectable),
            CheckboxState::None | CheckboxState::Some => {
                self.select_page(page_selectable.iter().copied(), selectable)
            }
        }
        tristate(page_selectable.iter().copied(), &*self)
    }

    /// Drops ids that are no longer selectable, e.g. after an export.
    pub fn prune(&mut self, selectable: &HashSet<String>) {
        self.ids.retain(|id| selectable.contains(id));
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Returns true if the id is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Returns the number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Returns one 1-based page of `items`.
///
/// Page 0 is treated as page 1. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
