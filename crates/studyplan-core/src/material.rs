//! Study material definitions.
//!
//! A material is a registered reference work (book, problem set) with a
//! total workload. Materials are one of the two sources of truth in the
//! crate: allocations, tasks and overdue entries are all derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a material's units count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Pages,
    Problems,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Problems => "problems",
        }
    }
}

/// Priority for surfacing work, ranked `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A registered study material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Free-form category tag (e.g. "math", "reading")
    #[serde(default)]
    pub category: String,
    /// Whether units are pages or problems
    pub unit_kind: UnitKind,
    /// Total units of work in the material
    pub total_units: u32,
    /// Units already worked through
    #[serde(default)]
    pub completed_units: u32,
    /// Units to assign per eligible study day (open-ended allocation)
    pub daily_target: u32,
    /// Priority inherited by every allocation entry and task
    #[serde(default)]
    pub priority: Priority,
    /// First day of study; allocation falls back to the reference date
    /// when unset
    pub start_date: Option<NaiveDate>,
    /// Weekdays never studied, 0=Sunday .. 6=Saturday
    #[serde(default)]
    pub excluded_weekdays: BTreeSet<u8>,
}

impl Material {
    /// Units not yet worked through.
    pub fn remaining_units(&self) -> u32 {
        self.total_units.saturating_sub(self.completed_units)
    }

    /// First unit the allocator will hand out (1-based, inclusive).
    pub fn first_pending_unit(&self) -> u32 {
        self.completed_units + 1
    }

    /// Allocation requires a positive daily target and remaining work.
    pub fn is_allocatable(&self) -> bool {
        self.daily_target > 0 && self.total_units > self.completed_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_material() -> Material {
        Material {
            id: "mat-1".to_string(),
            title: "Linear Algebra".to_string(),
            category: "math".to_string(),
            unit_kind: UnitKind::Problems,
            total_units: 120,
            completed_units: 20,
            daily_target: 10,
            priority: Priority::default(),
            start_date: None,
            excluded_weekdays: BTreeSet::new(),
        }
    }

    #[test]
    fn remaining_and_first_pending() {
        let material = make_test_material();
        assert_eq!(material.remaining_units(), 100);
        assert_eq!(material.first_pending_unit(), 21);
    }

    #[test]
    fn allocatable_requires_target_and_remaining_work() {
        let mut material = make_test_material();
        assert!(material.is_allocatable());

        material.daily_target = 0;
        assert!(!material.is_allocatable());

        material.daily_target = 10;
        material.completed_units = material.total_units;
        assert!(!material.is_allocatable());
    }

    #[test]
    fn priority_ordering_ranks_high_above_low() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn material_serialization_round_trip() {
        let material = make_test_material();
        let json = serde_json::to_string(&material).unwrap();
        let decoded: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, material);
    }
}
