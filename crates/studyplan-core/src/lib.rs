//! # Studyplan Core Library
//!
//! Core scheduling logic for Studyplan, a personal study-planning tool.
//! Registered reference materials (books, problem sets) carry a total
//! workload in pages or problems; this library spreads that workload
//! across calendar days, materializes each day's share into displayable
//! tasks, places tasks into an hourly calendar grid, and resurfaces
//! past-dated work that was never completed.
//!
//! ## Architecture
//!
//! - **Allocator**: converts a material plus a date window into a
//!   day-by-day breakdown of unit ranges, conserving units exactly
//! - **Materializer**: pure projection from allocation entries to task
//!   records with deterministic identity
//! - **Placement Grid**: keyed (date, hour) store with at-most-one-anchor
//!   occupancy and multi-hour spans
//! - **Overdue Detector**: projection of incomplete past-dated work
//! - **Drag Session**: explicit state machine coordinating pick, hover and
//!   atomic commit across pool, backlog and grid
//! - **Storage**: snapshot persistence behind a collaborator trait, plus
//!   TOML configuration
//!
//! The core is synchronous and single-threaded: every mutation runs to
//! completion before yielding, and persistence is fire-and-forget from the
//! core's perspective.
//!
//! ## Key Components
//!
//! - [`Material`]: source-of-truth study material
//! - [`allocate_daily`] / [`allocate_window`]: the two allocation forms
//! - [`PlacementGrid`]: hour-slot store enforcing the no-overlap invariant
//! - [`DragSession`]: pick/hover/commit interaction state
//! - [`SnapshotStore`]: persistence collaborator interface

pub mod alloc;
pub mod calendar;
pub mod dragdrop;
pub mod error;
pub mod grid;
pub mod material;
pub mod overdue;
pub mod storage;
pub mod task;

pub use alloc::{
    allocate_daily, allocate_window, merge_allocations, remove_material, AllocationEntry,
    DayAllocation,
};
pub use dragdrop::{Board, DragSession, DragSource, DragState};
pub use error::{AllocationError, CoreError, DragError, GridError, StorageError};
pub use grid::{PlacementGrid, ScheduledSlot, SlotKey};
pub use material::{Material, Priority, UnitKind};
pub use overdue::{detect, rank, CompletionState, OverdueEntry};
pub use storage::{Config, JsonFileStore, PlannerConfig, Snapshot, SnapshotStore};
pub use task::{derived_task_id, materialize, task_from_entry, Provenance, Task, TaskWork};
