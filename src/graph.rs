//! Dependency-graph primitives shared by the schedule and layout engines.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::debug;

use crate::models::{Task, TaskId};

/// Reverse dependency map: task id -> ids of the tasks that depend on it,
/// in first-seen declaration order.
pub type SuccessorMap = FxHashMap<TaskId, Vec<TaskId>>;

/// Build the successor map for a task collection.
///
/// Every task id in the input is guaranteed a (possibly empty) entry.
/// Dependency ids that resolve to no task in the collection still receive an
/// entry, keyed by the referenced id. Duplicate dependency declarations
/// produce duplicate successor entries; downstream passes count them the
/// same way on both sides, so they cancel out.
pub fn build_successors(tasks: &[Task]) -> SuccessorMap {
    let mut successors: SuccessorMap =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        successors.entry(task.id).or_default();
    }
    for task in tasks {
        for &dep in &task.dependencies {
            successors.entry(dep).or_default().push(task.id);
        }
    }
    successors
}

/// Compute a topological order of the task ids using Kahn's algorithm.
///
/// In-degrees count only dependencies that resolve to a task in the
/// collection. Ties among simultaneously-ready tasks are broken by input
/// order (stable FIFO), so the result is reproducible for identical input.
///
/// If the graph contains a cycle, the ids that never reach zero in-degree
/// are appended in input order. The result is therefore always a
/// permutation of all task ids, but timing derived for the cyclic subset is
/// not a meaningful schedule.
pub fn topo_order(tasks: &[Task]) -> Vec<TaskId> {
    let (mut order, unordered) = kahn_partition(tasks);
    if !unordered.is_empty() {
        debug!(
            remaining = unordered.len(),
            "dependency graph contains a cycle; appending unordered tasks in input order"
        );
        order.extend(unordered);
    }
    order
}

/// Kahn's algorithm, split into the properly ordered prefix and the ids left
/// over by a cycle (empty for acyclic input). Both halves preserve input
/// order among ties.
pub(crate) fn kahn_partition(tasks: &[Task]) -> (Vec<TaskId>, Vec<TaskId>) {
    let known: FxHashSet<TaskId> = tasks.iter().map(|t| t.id).collect();

    let mut in_degree: FxHashMap<TaskId, usize> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        let count = task
            .dependencies
            .iter()
            .filter(|dep| known.contains(*dep))
            .count();
        in_degree.insert(task.id, count);
    }

    let mut queue: VecDeque<TaskId> = tasks
        .iter()
        .filter(|t| in_degree.get(&t.id) == Some(&0))
        .map(|t| t.id)
        .collect();

    let successors = build_successors(tasks);
    let mut order: Vec<TaskId> = Vec::with_capacity(tasks.len());

    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(succs) = successors.get(&id) {
            for &succ in succs {
                if let Some(degree) = in_degree.get_mut(&succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(succ);
                    }
                }
            }
        }
    }

    if order.len() == tasks.len() {
        return (order, Vec::new());
    }

    let emitted: FxHashSet<TaskId> = order.iter().copied().collect();
    let unordered: Vec<TaskId> = tasks
        .iter()
        .map(|t| t.id)
        .filter(|id| !emitted.contains(id))
        .collect();
    (order, unordered)
}

/// Check whether a dependency path leads from `from` to `to`.
///
/// Iterative depth-first search along dependency edges. Ids absent from the
/// collection dead-end; cycles are handled by the visited set.
pub fn has_path(tasks: &[Task], from: TaskId, to: TaskId) -> bool {
    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
    let mut visited: FxHashSet<TaskId> = FxHashSet::default();
    let mut stack = vec![from];

    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(task) = by_id.get(&current) {
            stack.extend(task.dependencies.iter().copied());
        }
    }
    false
}
