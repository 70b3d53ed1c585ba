//! Overdue work detection.
//!
//! Scans the allocation history for work dated strictly before today that
//! was never marked complete. The result is always a projection over the
//! allocation map and completion state -- it is computed on demand and
//! never stored as its own source of truth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::alloc::{AllocationEntry, DayAllocation};
use crate::task::derived_task_id;

/// Explicitly-toggled set of completed task ids.
///
/// Completion is never inferred; the only mutations are the toggles below,
/// each driven by a user action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionState {
    done: BTreeSet<String>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_complete(&mut self, task_id: impl Into<String>) {
        self.done.insert(task_id.into());
    }

    pub fn mark_incomplete(&mut self, task_id: &str) {
        self.done.remove(task_id);
    }

    pub fn is_complete(&self, task_id: &str) -> bool {
        self.done.contains(task_id)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}

/// A past-dated allocation entry not yet marked complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueEntry {
    /// The day the work was originally planned for
    pub date: NaiveDate,
    pub entry: AllocationEntry,
}

impl OverdueEntry {
    /// Identity of the task this entry would materialize into.
    pub fn task_id(&self) -> String {
        derived_task_id(self.date, &self.entry)
    }
}

/// Collect every incomplete entry dated strictly before `today`.
///
/// Date-level comparison only: work dated `today` is never overdue,
/// whatever the time of day. Pure; neither input is mutated.
pub fn detect(
    allocations: &DayAllocation,
    completion: &CompletionState,
    today: NaiveDate,
) -> Vec<OverdueEntry> {
    let mut found = Vec::new();
    for (date, entries) in allocations.range(..today) {
        for entry in entries {
            if !completion.is_complete(&derived_task_id(*date, entry)) {
                found.push(OverdueEntry {
                    date: *date,
                    entry: entry.clone(),
                });
            }
        }
    }
    found
}

/// Rank overdue entries: oldest date first, higher priority first within a
/// date. The sort is stable, so same-date same-priority entries keep their
/// detection order.
pub fn rank(entries: &mut [OverdueEntry]) {
    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| b.entry.priority.cmp(&a.entry.priority))
    });
}
