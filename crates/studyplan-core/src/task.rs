//! Task materialization.
//!
//! A task is a displayable projection of an allocation entry. Tasks are
//! never a source of truth: their identity is derived deterministically
//! from the entry they mirror, so re-materializing an unchanged allocation
//! yields byte-equal tasks instead of minting new ones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::alloc::AllocationEntry;
use crate::calendar;
use crate::material::{Priority, UnitKind};

/// Why a task exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Added by hand
    Manual,
    /// Derived from a calendar allocation
    Calendar,
    /// Suggested by an assistant
    Ai,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Calendar => "calendar",
            Self::Ai => "ai",
        }
    }
}

/// Work payload, selected by an explicit discriminant.
///
/// Page-range and problem-range tasks carry their unit span; manually
/// added tasks carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TaskWork {
    Pages { start: u32, end: u32 },
    Problems { start: u32, end: u32 },
    Manual,
}

impl TaskWork {
    pub fn from_entry(entry: &AllocationEntry) -> Self {
        match entry.unit_kind {
            UnitKind::Pages => TaskWork::Pages {
                start: entry.start_unit,
                end: entry.end_unit,
            },
            UnitKind::Problems => TaskWork::Problems {
                start: entry.start_unit,
                end: entry.end_unit,
            },
        }
    }

    /// Inclusive unit span, when the task carries one.
    pub fn range(&self) -> Option<(u32, u32)> {
        match *self {
            TaskWork::Pages { start, end } | TaskWork::Problems { start, end } => {
                Some((start, end))
            }
            TaskWork::Manual => None,
        }
    }
}

/// A materialized, displayable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identity; derived for allocation-backed tasks, caller-chosen for
    /// manual ones
    pub id: String,
    /// Owning material, absent for manual tasks
    pub material_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub provenance: Provenance,
    pub work: TaskWork,
}

impl Task {
    /// Create a manually added task with no unit range.
    pub fn manual(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            material_id: None,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            priority: Priority::default(),
            completed: false,
            provenance: Provenance::Manual,
            work: TaskWork::Manual,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Whether this task still mirrors `entry` field-for-field.
    ///
    /// Tasks and entries must never diverge; this is the check callers use
    /// to assert that rather than trusting creation-time state.
    pub fn mirrors(&self, date: NaiveDate, entry: &AllocationEntry) -> bool {
        self.id == derived_task_id(date, entry)
            && self.material_id.as_deref() == Some(entry.material_id.as_str())
            && self.title == entry.title
            && self.priority == entry.priority
            && self.work == TaskWork::from_entry(entry)
    }
}

/// Deterministic identity for the task derived from `entry` on `date`.
///
/// Equal entries on equal dates always map to the same id; this is also
/// the identity completion state and the overdue detector key on.
pub fn derived_task_id(date: NaiveDate, entry: &AllocationEntry) -> String {
    format!(
        "{}:{}:{}-{}",
        entry.material_id,
        calendar::date_key(date),
        entry.start_unit,
        entry.end_unit
    )
}

fn describe(entry: &AllocationEntry) -> String {
    match entry.unit_kind {
        UnitKind::Pages => format!(
            "pp. {}-{} ({} pages)",
            entry.start_unit, entry.end_unit, entry.unit_count
        ),
        UnitKind::Problems => format!(
            "problems {}-{} ({} total)",
            entry.start_unit, entry.end_unit, entry.unit_count
        ),
    }
}

/// Project one allocation entry into a task.
pub fn task_from_entry(date: NaiveDate, entry: &AllocationEntry, provenance: Provenance) -> Task {
    Task {
        id: derived_task_id(date, entry),
        material_id: Some(entry.material_id.clone()),
        title: entry.title.clone(),
        description: describe(entry),
        category: entry.category.clone(),
        priority: entry.priority,
        completed: false,
        provenance,
        work: TaskWork::from_entry(entry),
    }
}

/// Materialize one day's allocation entries into displayable tasks.
///
/// Pure and referentially stable: equal input yields element-wise equal
/// tasks, ids included.
pub fn materialize(
    date: NaiveDate,
    entries: &[AllocationEntry],
    provenance: Provenance,
) -> Vec<Task> {
    entries
        .iter()
        .map(|entry| task_from_entry(date, entry, provenance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_test_entry(start: u32, end: u32) -> AllocationEntry {
        AllocationEntry {
            material_id: "mat-1".to_string(),
            title: "Analysis I".to_string(),
            category: "math".to_string(),
            priority: Priority::High,
            unit_kind: UnitKind::Pages,
            start_unit: start,
            end_unit: end,
            unit_count: end - start + 1,
        }
    }

    #[test]
    fn materialization_is_idempotent() {
        let entries = vec![make_test_entry(1, 10), make_test_entry(11, 20)];
        let date = d(2025, 1, 6);

        let first = materialize(date, &entries, Provenance::Calendar);
        let second = materialize(date, &entries, Provenance::Calendar);
        assert_eq!(first, second);
    }

    #[test]
    fn derived_ids_are_deterministic_and_distinct() {
        let entry = make_test_entry(1, 10);
        let id = derived_task_id(d(2025, 1, 6), &entry);
        assert_eq!(id, "mat-1:2025-01-06:1-10");

        // Same entry on a different date is a different task.
        assert_ne!(id, derived_task_id(d(2025, 1, 7), &entry));
        // Different range on the same date is a different task.
        assert_ne!(id, derived_task_id(d(2025, 1, 6), &make_test_entry(11, 20)));
    }

    #[test]
    fn task_mirrors_its_entry() {
        let entry = make_test_entry(31, 45);
        let date = d(2025, 1, 6);
        let task = task_from_entry(date, &entry, Provenance::Calendar);

        assert!(task.mirrors(date, &entry));
        assert_eq!(task.work, TaskWork::Pages { start: 31, end: 45 });
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);
        assert_eq!(task.description, "pp. 31-45 (15 pages)");

        // A drifted copy no longer mirrors.
        let mut drifted = task.clone();
        drifted.work = TaskWork::Pages { start: 31, end: 44 };
        assert!(!drifted.mirrors(date, &entry));
    }

    #[test]
    fn problem_entries_describe_problems() {
        let mut entry = make_test_entry(1, 12);
        entry.unit_kind = UnitKind::Problems;
        let task = task_from_entry(d(2025, 1, 6), &entry, Provenance::Calendar);
        assert_eq!(task.description, "problems 1-12 (12 total)");
        assert_eq!(task.work.range(), Some((1, 12)));
    }

    #[test]
    fn manual_tasks_carry_no_range() {
        let task = Task::manual("manual-1", "Review flashcards")
            .with_priority(Priority::Low)
            .with_category("memory");
        assert_eq!(task.work, TaskWork::Manual);
        assert_eq!(task.work.range(), None);
        assert_eq!(task.provenance, Provenance::Manual);
        assert_eq!(task.material_id, None);
    }
}
