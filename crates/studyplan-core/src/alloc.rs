//! Work allocation across calendar days.
//!
//! Converts a material plus a date window into a day-by-day breakdown of
//! unit ranges. Two forms:
//! - open-ended: a fixed `daily_target` of units per eligible day until the
//!   material runs out
//! - fixed-window: the remaining units spread uniformly across the eligible
//!   days of `[start, end]`
//!
//! Both forms conserve units exactly: the ranges across all produced days
//! union to `[completed_units + 1, total_units]` with no gap or overlap.
//! Allocations are regenerated wholesale whenever the owning material
//! changes; they are never patched in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar;
use crate::error::AllocationError;
use crate::material::{Material, Priority, UnitKind};

/// One day's slice of a material's remaining workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Owning material
    pub material_id: String,
    /// Material title, copied for display
    pub title: String,
    /// Material category tag
    #[serde(default)]
    pub category: String,
    /// Priority derived from the owning material
    #[serde(default)]
    pub priority: Priority,
    /// Whether the range counts pages or problems
    pub unit_kind: UnitKind,
    /// First unit covered by this day, inclusive
    pub start_unit: u32,
    /// Last unit covered by this day, inclusive
    pub end_unit: u32,
    /// Units assigned to this day
    pub unit_count: u32,
}

/// Day-keyed allocation map. Entries from several materials may share a
/// date; within one material the day order follows the unit order.
pub type DayAllocation = BTreeMap<NaiveDate, Vec<AllocationEntry>>;

fn entry_for(material: &Material, start_unit: u32, count: u32) -> AllocationEntry {
    AllocationEntry {
        material_id: material.id.clone(),
        title: material.title.clone(),
        category: material.category.clone(),
        priority: material.priority,
        unit_kind: material.unit_kind,
        start_unit,
        end_unit: start_unit + count - 1,
        unit_count: count,
    }
}

/// Open-ended allocation: walk forward from the material's start date (or
/// `reference` when unset), skipping excluded weekdays, assigning
/// `min(daily_target, remaining)` units per eligible day until nothing
/// remains.
///
/// A material that is not allocatable (zero daily target or no remaining
/// work) yields an empty map, as does one that excludes all seven weekdays.
pub fn allocate_daily(material: &Material, reference: NaiveDate) -> DayAllocation {
    let mut out = DayAllocation::new();
    if !material.is_allocatable() {
        return out;
    }

    let start = material.start_date.unwrap_or(reference);
    let mut day = match calendar::next_eligible(start, &material.excluded_weekdays) {
        Some(day) => day,
        None => return out,
    };

    let mut cursor = material.first_pending_unit();
    let mut remaining = material.remaining_units();
    loop {
        let count = material.daily_target.min(remaining);
        out.entry(day).or_default().push(entry_for(material, cursor, count));
        cursor += count;
        remaining -= count;
        if remaining == 0 {
            break;
        }
        day = match day
            .succ_opt()
            .and_then(|next| calendar::next_eligible(next, &material.excluded_weekdays))
        {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// Fixed-window allocation: spread the remaining units uniformly over the
/// eligible days of `[start, end]`.
///
/// Each day receives `ceil(remaining / eligible_count)` units except the
/// last, which is capped so the total is exact. A window with no eligible
/// days is a configuration error.
pub fn allocate_window(
    material: &Material,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DayAllocation, AllocationError> {
    let days = calendar::eligible_days(start, end, &material.excluded_weekdays);
    if days.is_empty() {
        return Err(AllocationError::NoEligibleDays { start, end });
    }

    let mut out = DayAllocation::new();
    let remaining = material.remaining_units();
    if remaining == 0 {
        return Ok(out);
    }

    let per_day = remaining.div_ceil(days.len() as u32);
    let mut cursor = material.first_pending_unit();
    let mut left = remaining;
    for day in days {
        if left == 0 {
            break;
        }
        let count = per_day.min(left);
        out.entry(day).or_default().push(entry_for(material, cursor, count));
        cursor += count;
        left -= count;
    }
    Ok(out)
}

/// Append `extra`'s entries into `base`, preserving day order.
pub fn merge_allocations(base: &mut DayAllocation, extra: DayAllocation) {
    for (day, entries) in extra {
        base.entry(day).or_default().extend(entries);
    }
}

/// Drop every entry owned by `material_id`, removing days left empty.
///
/// Used when a material's parameters change: its old breakdown is removed
/// and a freshly generated one merged back in.
pub fn remove_material(allocations: &mut DayAllocation, material_id: &str) {
    for entries in allocations.values_mut() {
        entries.retain(|entry| entry.material_id != material_id);
    }
    allocations.retain(|_, entries| !entries.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_test_material(total: u32, completed: u32, target: u32) -> Material {
        Material {
            id: "mat-1".to_string(),
            title: "Analysis I".to_string(),
            category: "math".to_string(),
            unit_kind: UnitKind::Pages,
            total_units: total,
            completed_units: completed,
            daily_target: target,
            priority: Priority::Medium,
            start_date: None,
            excluded_weekdays: BTreeSet::new(),
        }
    }

    /// Flatten a material's entries in day order and assert the ranges are
    /// contiguous and union to exactly `[first, last]`.
    fn assert_conserved(allocation: &DayAllocation, material_id: &str, first: u32, last: u32) {
        let mut expected_start = first;
        let mut end = 0;
        for entries in allocation.values() {
            for entry in entries.iter().filter(|e| e.material_id == material_id) {
                assert_eq!(entry.start_unit, expected_start, "range gap or overlap");
                assert_eq!(entry.unit_count, entry.end_unit - entry.start_unit + 1);
                expected_start = entry.end_unit + 1;
                end = entry.end_unit;
            }
        }
        assert_eq!(end, last, "allocation does not cover the full range");
    }

    #[test]
    fn daily_allocation_spreads_ten_days() {
        // 100 units at 10/day from a Monday: ten consecutive days.
        let material = make_test_material(100, 0, 10);
        let allocation = allocate_daily(&material, d(2025, 1, 6));

        assert_eq!(allocation.len(), 10);
        let first = allocation.get(&d(2025, 1, 6)).unwrap();
        assert_eq!((first[0].start_unit, first[0].end_unit), (1, 10));
        let last = allocation.get(&d(2025, 1, 15)).unwrap();
        assert_eq!((last[0].start_unit, last[0].end_unit), (91, 100));
        assert_conserved(&allocation, "mat-1", 1, 100);
    }

    #[test]
    fn daily_allocation_starts_after_excluded_weekend() {
        let mut material = make_test_material(20, 0, 10);
        material.excluded_weekdays = [0, 6].into_iter().collect();
        material.start_date = Some(d(2025, 1, 4)); // a Saturday

        let allocation = allocate_daily(&material, d(2025, 1, 1));
        let mut days = allocation.keys();
        assert_eq!(days.next(), Some(&d(2025, 1, 6))); // following Monday
        assert_eq!(days.next(), Some(&d(2025, 1, 7)));
        assert_conserved(&allocation, "mat-1", 1, 20);
    }

    #[test]
    fn daily_allocation_resumes_after_completed_units() {
        let material = make_test_material(50, 30, 15);
        let allocation = allocate_daily(&material, d(2025, 1, 6));

        let first = allocation.get(&d(2025, 1, 6)).unwrap();
        assert_eq!((first[0].start_unit, first[0].end_unit), (31, 45));
        let second = allocation.get(&d(2025, 1, 7)).unwrap();
        assert_eq!((second[0].start_unit, second[0].end_unit), (46, 50));
        assert_eq!(second[0].unit_count, 5);
        assert_conserved(&allocation, "mat-1", 31, 50);
    }

    #[test]
    fn unallocatable_material_yields_nothing() {
        let exhausted = make_test_material(40, 40, 10);
        assert!(allocate_daily(&exhausted, d(2025, 1, 6)).is_empty());

        let no_target = make_test_material(40, 0, 0);
        assert!(allocate_daily(&no_target, d(2025, 1, 6)).is_empty());

        let mut shut_in = make_test_material(40, 0, 10);
        shut_in.excluded_weekdays = (0..7).collect();
        assert!(allocate_daily(&shut_in, d(2025, 1, 6)).is_empty());
    }

    #[test]
    fn window_allocation_caps_final_day() {
        // 23 pages over 5 eligible days: 5,5,5,5,3.
        let material = make_test_material(23, 0, 1);
        let allocation = allocate_window(&material, d(2025, 1, 6), d(2025, 1, 10)).unwrap();

        let counts: Vec<u32> = allocation
            .values()
            .map(|entries| entries[0].unit_count)
            .collect();
        assert_eq!(counts, vec![5, 5, 5, 5, 3]);
        assert_eq!(counts.iter().sum::<u32>(), 23);
        assert_conserved(&allocation, "mat-1", 1, 23);
    }

    #[test]
    fn window_allocation_respects_exclusions() {
        let mut material = make_test_material(12, 0, 1);
        material.excluded_weekdays = [0, 6].into_iter().collect();
        // Sat Jan 4 .. Fri Jan 10 leaves Mon-Fri.
        let allocation = allocate_window(&material, d(2025, 1, 4), d(2025, 1, 10)).unwrap();

        assert_eq!(allocation.len(), 5);
        assert!(allocation
            .keys()
            .all(|day| !calendar::is_excluded(*day, &material.excluded_weekdays)));
        assert_conserved(&allocation, "mat-1", 1, 12);
    }

    #[test]
    fn window_with_no_eligible_days_is_an_error() {
        let mut material = make_test_material(10, 0, 1);
        material.excluded_weekdays = [0, 6].into_iter().collect();
        // Sat Jan 4 .. Sun Jan 5 only.
        let err = allocate_window(&material, d(2025, 1, 4), d(2025, 1, 5)).unwrap_err();
        assert_eq!(
            err,
            AllocationError::NoEligibleDays {
                start: d(2025, 1, 4),
                end: d(2025, 1, 5),
            }
        );
    }

    #[test]
    fn merge_and_remove_round_trip() {
        let first = make_test_material(10, 0, 5);
        let mut second = make_test_material(8, 0, 4);
        second.id = "mat-2".to_string();

        let mut combined = allocate_daily(&first, d(2025, 1, 6));
        merge_allocations(&mut combined, allocate_daily(&second, d(2025, 1, 6)));
        assert_eq!(combined.get(&d(2025, 1, 6)).unwrap().len(), 2);

        remove_material(&mut combined, "mat-1");
        assert!(combined
            .values()
            .flatten()
            .all(|entry| entry.material_id == "mat-2"));
        assert_conserved(&combined, "mat-2", 1, 8);
    }

    proptest! {
        #[test]
        fn daily_allocation_conserves_units(
            (total, completed) in (1u32..400).prop_flat_map(|t| (Just(t), 0..t)),
            target in 1u32..40,
            excluded in proptest::collection::btree_set(0u8..7, 0..6),
            day_offset in 0u32..366,
        ) {
            let mut material = make_test_material(total, completed, target);
            material.excluded_weekdays = excluded.clone();
            let reference = d(2025, 1, 1) + chrono::Duration::days(day_offset as i64);

            let allocation = allocate_daily(&material, reference);

            prop_assert!(allocation
                .keys()
                .all(|day| !calendar::is_excluded(*day, &excluded)));
            prop_assert!(allocation
                .values()
                .flatten()
                .all(|entry| entry.unit_count <= target));

            let mut expected_start = completed + 1;
            let mut end = completed;
            for entries in allocation.values() {
                for entry in entries {
                    prop_assert_eq!(entry.start_unit, expected_start);
                    expected_start = entry.end_unit + 1;
                    end = entry.end_unit;
                }
            }
            prop_assert_eq!(end, total);
        }

        #[test]
        fn window_allocation_conserves_units(
            (total, completed) in (1u32..400).prop_flat_map(|t| (Just(t), 0..t)),
            excluded in proptest::collection::btree_set(0u8..7, 0..6),
            window_days in 6u32..45,
        ) {
            let mut material = make_test_material(total, completed, 1);
            material.excluded_weekdays = excluded;
            let start = d(2025, 3, 1);
            let end = start + chrono::Duration::days(window_days as i64);

            // Any window of 7+ days keeps at least one weekday eligible.
            let allocation = allocate_window(&material, start, end).unwrap();

            let assigned: u32 = allocation
                .values()
                .flatten()
                .map(|entry| entry.unit_count)
                .sum();
            prop_assert_eq!(assigned, total - completed);

            let mut expected_start = completed + 1;
            for entries in allocation.values() {
                for entry in entries {
                    prop_assert_eq!(entry.start_unit, expected_start);
                    expected_start = entry.end_unit + 1;
                }
            }
        }
    }
}
