//! Hour-slot placement grid.
//!
//! A keyed store from (date, hour) to a scheduled task. A task occupies its
//! anchor slot plus the following `duration - 1` hours; an hour counts as
//! occupied if any same-date anchor's `[hour, hour + duration)` span covers
//! it. The grid guarantees that no two anchors on one date overlap after
//! every public operation, including failed ones -- a failed operation never
//! mutates.
//!
//! All call sites (drag commit, bulk scheduling, manual slot edits) go
//! through the public operations here, so the overlap invariant is enforced
//! in exactly one place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::calendar;
use crate::error::GridError;
use crate::task::Task;

/// Grid key: one calendar date plus an hour of day.
///
/// The canonical string form is `YYYY-MM-DD:HH`, which is also how keys
/// serialize, keeping snapshot slot maps plain string-keyed objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SlotKey {
    pub date: NaiveDate,
    pub hour: u8,
}

impl SlotKey {
    pub fn new(date: NaiveDate, hour: u8) -> Self {
        Self { date, hour }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", calendar::date_key(self.date), self.hour)
    }
}

/// Error parsing a slot key string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot key '{0}', expected YYYY-MM-DD:HH")]
pub struct ParseSlotKeyError(pub String);

impl FromStr for SlotKey {
    type Err = ParseSlotKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || ParseSlotKeyError(raw.to_string());
        let (date_part, hour_part) = raw.rsplit_once(':').ok_or_else(err)?;
        let date = calendar::parse_date_key(date_part).ok_or_else(err)?;
        let hour: u8 = hour_part.parse().map_err(|_| err())?;
        if hour > 23 {
            return Err(err());
        }
        Ok(Self { date, hour })
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SlotKey {
    type Error = ParseSlotKeyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// A task anchored at a slot, spanning `duration` whole hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    pub task: Task,
    /// Whole hours occupied from the anchor, always >= 1
    pub duration: u32,
}

impl ScheduledSlot {
    /// Exclusive end hour of the occupied span.
    fn span_end(&self, anchor_hour: u8) -> u32 {
        anchor_hour as u32 + self.duration
    }
}

/// Mutable keyed store of scheduled slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementGrid {
    slots: BTreeMap<SlotKey, ScheduledSlot>,
}

impl PlacementGrid {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Whether `hour` on `date` is covered by any anchor's span.
    pub fn is_occupied(&self, date: NaiveDate, hour: u8) -> bool {
        self.span_conflict(date, hour, 1, None).is_some()
    }

    /// The anchor whose span covers `hour` on `date`, if any.
    pub fn anchor_covering(&self, date: NaiveDate, hour: u8) -> Option<(SlotKey, &ScheduledSlot)> {
        self.day_anchors(date)
            .find(|(key, slot)| key.hour <= hour && slot.span_end(key.hour) > hour as u32)
    }

    pub fn get(&self, key: SlotKey) -> Option<&ScheduledSlot> {
        self.slots.get(&key)
    }

    /// Anchors on `date` in hour order.
    pub fn day_slots(&self, date: NaiveDate) -> Vec<(SlotKey, &ScheduledSlot)> {
        self.day_anchors(date).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &ScheduledSlot)> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn day_anchors(&self, date: NaiveDate) -> impl Iterator<Item = (SlotKey, &ScheduledSlot)> {
        self.slots
            .range(SlotKey::new(date, 0)..=SlotKey::new(date, 23))
            .map(|(key, slot)| (*key, slot))
    }

    /// First anchor on `date` whose span intersects `[hour, hour + duration)`,
    /// skipping `exclude` (used when an anchor is being moved over itself).
    fn span_conflict(
        &self,
        date: NaiveDate,
        hour: u8,
        duration: u32,
        exclude: Option<SlotKey>,
    ) -> Option<SlotKey> {
        let start = hour as u32;
        let end = start + duration;
        self.day_anchors(date)
            .filter(|(key, _)| Some(*key) != exclude)
            .find(|(key, slot)| (key.hour as u32) < end && slot.span_end(key.hour) > start)
            .map(|(key, _)| key)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Insert `task` at `key`, occupying `duration` hours.
    pub fn place(&mut self, key: SlotKey, task: Task, duration: u32) -> Result<(), GridError> {
        if duration == 0 {
            return Err(GridError::InvalidDuration { value: duration });
        }
        if let Some(conflict) = self.span_conflict(key.date, key.hour, duration, None) {
            return Err(GridError::SlotOccupied { key: conflict });
        }
        self.slots.insert(key, ScheduledSlot { task, duration });
        Ok(())
    }

    /// Remove the anchor at `key` and return its task.
    pub fn remove(&mut self, key: SlotKey) -> Option<Task> {
        self.slots.remove(&key).map(|slot| slot.task)
    }

    /// Atomic remove-then-place. A destination conflict fails the whole
    /// operation and leaves the source anchor in place.
    ///
    /// The moving anchor itself never blocks the destination, so shifting a
    /// multi-hour task by less than its own span is allowed.
    pub fn move_task(&mut self, from: SlotKey, to: SlotKey) -> Result<(), GridError> {
        let slot = match self.slots.get(&from) {
            Some(slot) => slot.clone(),
            None => return Err(GridError::EmptySlot { key: from }),
        };
        if let Some(conflict) = self.span_conflict(to.date, to.hour, slot.duration, Some(from)) {
            return Err(GridError::SlotOccupied { key: conflict });
        }
        self.slots.remove(&from);
        self.slots.insert(to, slot);
        Ok(())
    }

    /// Change the anchor's duration, returning the duration actually
    /// applied.
    ///
    /// Growth is auto-capped at the next same-date anchor's start hour, so
    /// a resize can never create an overlap. Shrinking always applies as
    /// requested.
    pub fn resize(&mut self, key: SlotKey, new_duration: u32) -> Result<u32, GridError> {
        if new_duration == 0 {
            return Err(GridError::InvalidDuration { value: new_duration });
        }
        let next_start = self
            .day_anchors(key.date)
            .map(|(anchor, _)| anchor.hour)
            .find(|hour| *hour > key.hour);
        let applied = match next_start {
            Some(hour) => new_duration.min((hour - key.hour) as u32),
            None => new_duration,
        };
        match self.slots.get_mut(&key) {
            Some(slot) => {
                slot.duration = applied;
                Ok(applied)
            }
            None => Err(GridError::EmptySlot { key }),
        }
    }
}
