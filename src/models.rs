//! Core data types for scheduling and layout.

use serde::{Deserialize, Serialize};

/// Task identifier, unique within a task collection.
///
/// Ids are caller-assigned and need not be dense or ordered.
pub type TaskId = u32;

/// A cell in the layout grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
}

impl GridPosition {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A task in the dependency graph.
///
/// `dependencies` lists the ids this task must wait on. Duplicate entries are
/// harmless; ids that resolve to no task in the collection are tolerated by
/// every algorithm in this crate (see the `schedule` and `layout` modules).
/// `position` is only ever written by the layout engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display label, may be empty.
    pub name: String,
    /// Duration in abstract time units, >= 1 by caller contract.
    pub duration: u32,
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub position: GridPosition,
}

impl Task {
    /// Creates a task with an empty name, no dependencies, and a zeroed position.
    pub fn new(id: TaskId, duration: u32) -> Self {
        Self {
            id,
            name: String::new(),
            duration,
            dependencies: Vec::new(),
            position: GridPosition::default(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the dependency list.
    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// Per-task timing computed by the schedule engine.
///
/// All six fields are recomputed in full on every `calculate_schedule` call;
/// none is ever updated incrementally. Values are meaningful only for acyclic
/// input; under the cycle fallback the floats can go negative, which is why
/// the fields are signed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTiming {
    /// Earliest start (forward pass).
    pub earliest_start: i64,
    /// Earliest finish (forward pass).
    pub earliest_finish: i64,
    /// Latest start without delaying the project (backward pass).
    pub latest_start: i64,
    /// Latest finish without delaying the project (backward pass).
    pub latest_finish: i64,
    /// Total float: `latest_finish - earliest_finish`.
    pub total_float: i64,
    /// Free float: delay tolerated without moving any successor's earliest
    /// start. Never exceeds `total_float`.
    pub free_float: i64,
}

impl TaskTiming {
    /// A task is critical when it has no total float. Times are integers, so
    /// the comparison is exact.
    pub fn is_critical(&self) -> bool {
        self.total_float == 0
    }
}

/// A task together with its computed schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task: Task,
    pub timing: TaskTiming,
    pub is_critical: bool,
}
