//! Structural validation for task collections.
//!
//! The schedule and layout engines never reject input; they degrade
//! silently on dangling ids, self-dependencies, and cycles. Callers that
//! want hard failures instead (typically an editing layer deciding whether
//! to accept a mutation) run these checks before invoking the engines.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::graph::{has_path, kahn_partition};
use crate::models::{Task, TaskId};

/// Structural defects in a task collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),
    #[error("task {0} has zero duration")]
    ZeroDuration(TaskId),
    #[error("task {0} depends on itself")]
    SelfDependency(TaskId),
    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: TaskId, dependency: TaskId },
    #[error("circular dependency among tasks {0:?}")]
    CircularDependency(Vec<TaskId>),
}

/// Check a task collection for structural defects, reporting the first one
/// found.
///
/// Checks run in order of locality: per-task defects (duplicate id, zero
/// duration), then per-edge defects (self-dependency, unknown dependency),
/// then the whole-graph cycle check. The ids reported for a cycle are the
/// ones a topological sort cannot reach, in input order; that set includes
/// every task downstream of the cycle, not only its members.
pub fn validate(tasks: &[Task]) -> Result<(), ValidationError> {
    let mut seen: FxHashSet<TaskId> =
        FxHashSet::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(ValidationError::DuplicateId(task.id));
        }
        if task.duration == 0 {
            return Err(ValidationError::ZeroDuration(task.id));
        }
    }

    for task in tasks {
        for &dep in &task.dependencies {
            if dep == task.id {
                return Err(ValidationError::SelfDependency(task.id));
            }
            if !seen.contains(&dep) {
                return Err(ValidationError::UnknownDependency {
                    task: task.id,
                    dependency: dep,
                });
            }
        }
    }

    let (_, unordered) = kahn_partition(tasks);
    if !unordered.is_empty() {
        return Err(ValidationError::CircularDependency(unordered));
    }
    Ok(())
}

/// Check whether adding `dep_id` to `task_id`'s dependencies would create a
/// cycle: either a self-dependency, or a back-edge along an existing
/// dependency path from `dep_id` to `task_id`.
pub fn would_create_cycle(tasks: &[Task], task_id: TaskId, dep_id: TaskId) -> bool {
    task_id == dep_id || has_path(tasks, dep_id, task_id)
}
