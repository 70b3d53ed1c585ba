//! Drag-and-drop interaction state machine.
//!
//! Transient session state for moving tasks between the holding pool, the
//! overdue backlog and the placement grid:
//!
//! ```text
//! Idle -> Picked -> Hovering -> (commit | cancel) -> Idle
//! ```
//!
//! Hovering is display feedback only and never touches the grid. All
//! mutation happens in [`DragSession::commit`], which is all-or-nothing:
//! when the destination is occupied the task stays exactly where it came
//! from and the session returns to `Picked`.

use chrono::NaiveDate;

use crate::error::{DragError, GridError};
use crate::grid::{PlacementGrid, SlotKey};
use crate::task::Task;

/// Where a picked task came from; commit removes it from exactly this
/// place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// The holding pool of not-yet-scheduled tasks
    Pool,
    /// The overdue backlog
    Overdue,
    /// An existing grid anchor
    Scheduled(SlotKey),
}

/// Session state as a tagged union; invalid flag combinations cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Picked {
        task: Task,
        source: DragSource,
    },
    Hovering {
        task: Task,
        source: DragSource,
        dest: SlotKey,
    },
}

/// Session-level bundle of the collections a drag can touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    /// Tasks materialized but not yet placed
    pub pool: Vec<Task>,
    /// Overdue tasks surfaced for rescheduling
    pub overdue: Vec<Task>,
    pub grid: PlacementGrid,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill free hours of `date` in `[start_hour, end_hour)` with `tasks`,
    /// one hour each, in order. Tasks that found no free hour are returned.
    ///
    /// Every placement goes through [`PlacementGrid::place`], so existing
    /// anchors (and their spans) are skipped, never displaced.
    pub fn bulk_schedule(
        &mut self,
        date: NaiveDate,
        start_hour: u8,
        end_hour: u8,
        tasks: Vec<Task>,
    ) -> Vec<Task> {
        let mut leftover = Vec::new();
        let mut hour = start_hour;
        for task in tasks {
            let mut placed = false;
            while hour < end_hour {
                let slot = SlotKey::new(date, hour);
                hour += 1;
                if self.grid.place(slot, task.clone(), 1).is_ok() {
                    placed = true;
                    break;
                }
            }
            if !placed {
                leftover.push(task);
            }
        }
        leftover
    }

    fn splice(list: &mut Vec<Task>, task_id: &str) {
        if let Some(index) = list.iter().position(|task| task.id == task_id) {
            list.remove(index);
        }
    }
}

/// One in-flight drag. At most one payload is held at a time; a second
/// pick while one is active is an error, never a silent overwrite.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Begin dragging `task` out of `source`.
    pub fn pick(&mut self, task: Task, source: DragSource) -> Result<(), DragError> {
        match self.state {
            DragState::Idle => {
                self.state = DragState::Picked { task, source };
                Ok(())
            }
            _ => Err(DragError::AlreadyPicked),
        }
    }

    /// Track the slot under the pointer. Feedback only; the grid is not
    /// consulted or mutated.
    pub fn hover(&mut self, dest: SlotKey) -> Result<(), DragError> {
        match std::mem::take(&mut self.state) {
            DragState::Picked { task, source } | DragState::Hovering { task, source, .. } => {
                self.state = DragState::Hovering { task, source, dest };
                Ok(())
            }
            DragState::Idle => Err(DragError::NotPicked),
        }
    }

    /// Drop back to `Picked` when the pointer leaves every valid
    /// destination.
    pub fn clear_hover(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            DragState::Hovering { task, source, .. } => DragState::Picked { task, source },
            other => other,
        };
    }

    /// Abort the drag. Nothing was removed at pick time, so nothing needs
    /// restoring.
    pub fn cancel(&mut self) -> Result<(), DragError> {
        match self.state {
            DragState::Idle => Err(DragError::NotPicked),
            _ => {
                self.state = DragState::Idle;
                Ok(())
            }
        }
    }

    /// Release over `dest`: place the payload there and remove it from its
    /// source, atomically.
    ///
    /// The grid mutation runs first; the source list is spliced only after
    /// it succeeds, so a failure leaves pool, backlog and grid untouched
    /// and the session back in `Picked`. Scheduled sources go through the
    /// grid's own atomic move.
    pub fn commit(
        &mut self,
        board: &mut Board,
        dest: SlotKey,
        duration: u32,
    ) -> Result<(), DragError> {
        let (task, source) = match std::mem::take(&mut self.state) {
            DragState::Picked { task, source } | DragState::Hovering { task, source, .. } => {
                (task, source)
            }
            DragState::Idle => return Err(DragError::NotPicked),
        };

        let result: Result<(), GridError> = match source {
            DragSource::Scheduled(from) => board.grid.move_task(from, dest),
            DragSource::Pool | DragSource::Overdue => {
                board.grid.place(dest, task.clone(), duration)
            }
        };

        match result {
            Ok(()) => {
                match source {
                    DragSource::Pool => Board::splice(&mut board.pool, &task.id),
                    DragSource::Overdue => Board::splice(&mut board.overdue, &task.id),
                    DragSource::Scheduled(_) => {}
                }
                Ok(())
            }
            Err(err) => {
                self.state = DragState::Picked { task, source };
                Err(DragError::PlacementFailed(err))
            }
        }
    }
}
