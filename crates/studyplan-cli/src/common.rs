//! Shared snapshot plumbing for CLI commands.

use chrono::NaiveDate;
use studyplan_core::{JsonFileStore, Snapshot, SnapshotStore};

pub fn load_snapshot(owner: &str) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let store = JsonFileStore::open()?;
    Ok(store.load(owner)?.unwrap_or_default())
}

pub fn save_snapshot(owner: &str, snapshot: &Snapshot) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open()?;
    store.save(owner, snapshot)?;
    Ok(())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    studyplan_core::calendar::parse_date_key(raw)
        .ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD").into())
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Rebuild one material's slice of the combined allocation map.
///
/// Allocations are regenerated wholesale on any parameter change, never
/// patched, so the old entries are dropped before the fresh ones merge in.
pub fn regenerate_material(snapshot: &mut Snapshot, material_id: &str, reference: NaiveDate) {
    studyplan_core::remove_material(&mut snapshot.allocations, material_id);
    if let Some(material) = snapshot.materials.iter().find(|m| m.id == material_id) {
        if material.is_allocatable() {
            let fresh = studyplan_core::allocate_daily(material, reference);
            studyplan_core::merge_allocations(&mut snapshot.allocations, fresh);
        }
    }
}
