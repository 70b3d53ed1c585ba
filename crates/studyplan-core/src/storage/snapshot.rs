//! Owner-namespaced snapshot persistence.
//!
//! The snapshot tuple (materials, allocations, grid, completion) is the
//! only persisted-state contract the core defines. Tasks, pools and
//! overdue lists are projections and are re-derived on load, never stored.
//!
//! The core never waits on a store: a mutation is complete the moment the
//! in-memory structures are updated, and a [`SnapshotStore`] only ever
//! sees the result. Whether a store writes locally, remotely, now or
//! later is its own business.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::alloc::DayAllocation;
use crate::error::StorageError;
use crate::grid::PlacementGrid;
use crate::material::Material;
use crate::overdue::CompletionState;

/// Serializable world state for one owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Combined day-keyed allocation across all materials
    #[serde(default)]
    pub allocations: DayAllocation,
    #[serde(default)]
    pub grid: PlacementGrid,
    #[serde(default)]
    pub completion: CompletionState,
}

/// Persistence collaborator.
///
/// `owner_id` is an opaque namespace string; the core has no other
/// dependency on identity or session state.
pub trait SnapshotStore {
    fn save(&self, owner_id: &str, snapshot: &Snapshot) -> Result<(), StorageError>;
    fn load(&self, owner_id: &str) -> Result<Option<Snapshot>, StorageError>;
}

/// One pretty-printed JSON document per owner under a base directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self {
            dir: super::data_dir()?,
        })
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, owner_id: &str) -> PathBuf {
        // Owner ids are opaque; keep the filename safe.
        let safe: String = owner_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.snapshot.json"))
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, owner_id: &str, snapshot: &Snapshot) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.path_for(owner_id), json)?;
        Ok(())
    }

    fn load(&self, owner_id: &str) -> Result<Option<Snapshot>, StorageError> {
        let path = self.path_for(owner_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SlotKey;
    use crate::material::{Priority, UnitKind};
    use crate::task::Task;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn make_test_snapshot() -> Snapshot {
        let material = Material {
            id: "mat-1".to_string(),
            title: "Kanji workbook".to_string(),
            category: "language".to_string(),
            unit_kind: UnitKind::Pages,
            total_units: 60,
            completed_units: 0,
            daily_target: 6,
            priority: Priority::High,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6),
            excluded_weekdays: BTreeSet::new(),
        };
        let allocations = crate::alloc::allocate_daily(
            &material,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        );

        let mut snapshot = Snapshot {
            materials: vec![material],
            allocations,
            ..Snapshot::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        snapshot
            .grid
            .place(SlotKey::new(date, 9), Task::manual("m-1", "Warmup"), 2)
            .unwrap();
        snapshot.completion.mark_complete("mat-1:2025-01-06:1-6");
        snapshot
    }

    #[test]
    fn snapshot_round_trips_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at(dir.path());
        let snapshot = make_test_snapshot();

        store.save("alice", &snapshot).unwrap();
        let loaded = store.load("alice").unwrap().unwrap();

        assert_eq!(loaded.materials, snapshot.materials);
        assert_eq!(loaded.allocations, snapshot.allocations);
        assert_eq!(loaded.grid, snapshot.grid);
        assert_eq!(loaded.completion, snapshot.completion);
    }

    #[test]
    fn missing_owner_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at(dir.path());
        assert!(store.load("nobody").unwrap().is_none());
    }

    #[test]
    fn owners_do_not_share_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at(dir.path());

        store.save("alice", &make_test_snapshot()).unwrap();
        store.save("bob", &Snapshot::default()).unwrap();

        let bob = store.load("bob").unwrap().unwrap();
        assert!(bob.materials.is_empty());
        let alice = store.load("alice").unwrap().unwrap();
        assert_eq!(alice.materials.len(), 1);
    }

    #[test]
    fn hostile_owner_ids_become_safe_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at(dir.path());

        store.save("../escape/attempt", &Snapshot::default()).unwrap();
        // The document stays inside the store directory.
        assert!(store.load("../escape/attempt").unwrap().is_some());
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
