//! Core error types for studyplan-core.
//!
//! Grid and drag errors are recoverable and local: a failed operation
//! leaves prior state intact and only the attempted operation is lost.
//! [`AllocationError`] is the one kind intended to surface to the user.

use chrono::NaiveDate;
use thiserror::Error;

use crate::grid::SlotKey;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Allocation configuration errors
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Placement grid errors
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Drag session errors
    #[error("Drag error: {0}")]
    Drag(#[from] DragError),

    /// Snapshot/config storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Allocation configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The requested window contains no eligible study days
    #[error("no eligible study days between {start} and {end}")]
    NoEligibleDays { start: NaiveDate, end: NaiveDate },
}

/// Placement grid operation errors.
///
/// Every failed grid operation is a no-op; the grid's no-overlap invariant
/// holds before and after.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The target hour span collides with an existing anchor
    #[error("slot {key} is already occupied")]
    SlotOccupied { key: SlotKey },

    /// Durations are whole hours and must be at least 1
    #[error("invalid duration {value}: must be at least 1 hour")]
    InvalidDuration { value: u32 },

    /// The addressed slot holds no anchor
    #[error("slot {key} is empty")]
    EmptySlot { key: SlotKey },
}

/// Drag session errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DragError {
    /// A second pick was attempted while a payload is already held
    #[error("a drag is already in progress")]
    AlreadyPicked,

    /// Hover/commit/cancel was attempted from the idle state
    #[error("no drag in progress")]
    NotPicked,

    /// Commit failed at the destination; the task stays at its source
    #[error("placement failed: {0}")]
    PlacementFailed(#[from] GridError),
}

/// Snapshot and configuration storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO failure while reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Failed to save configuration
    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
