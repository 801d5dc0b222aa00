//! Critical path computation: forward and backward passes, floats, and
//! critical-path marking.
//!
//! Everything here is a pure function of the input task list. Malformed
//! input (dangling dependency ids, cycles, self-dependencies) never fails;
//! it degrades as described on each function. Timing computed for tasks
//! inside or downstream of a cycle is not a meaningful schedule.

use rustc_hash::FxHashMap;

use crate::graph::{build_successors, topo_order, SuccessorMap};
use crate::models::{ScheduledTask, Task, TaskId, TaskTiming};

/// Compute the full CPM schedule for a task collection.
///
/// Returns one `ScheduledTask` per input task, in input order. All timing
/// fields are recomputed from scratch; the input is never mutated.
pub fn calculate_schedule(tasks: &[Task]) -> Vec<ScheduledTask> {
    let order = topo_order(tasks);
    let successors = build_successors(tasks);
    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();

    let earliest = forward_pass(&by_id, &order);

    // Project duration is the latest earliest-finish over the whole set.
    let project_end = tasks
        .iter()
        .filter_map(|t| earliest.get(&t.id))
        .map(|&(_, finish)| finish)
        .max()
        .unwrap_or(0);

    let latest = backward_pass(&by_id, &order, &successors, project_end);

    tasks
        .iter()
        .map(|task| {
            let (earliest_start, earliest_finish) =
                earliest.get(&task.id).copied().unwrap_or((0, 0));
            let (latest_start, latest_finish) = latest.get(&task.id).copied().unwrap_or((0, 0));
            let total_float = latest_finish - earliest_finish;
            let free_float =
                compute_free_float(task, &successors, &earliest, earliest_finish, total_float);

            let timing = TaskTiming {
                earliest_start,
                earliest_finish,
                latest_start,
                latest_finish,
                total_float,
                free_float,
            };
            ScheduledTask {
                task: task.clone(),
                is_critical: timing.is_critical(),
                timing,
            }
        })
        .collect()
}

/// Project duration of a computed schedule: the latest earliest-finish, or 0
/// for an empty schedule.
pub fn project_duration(scheduled: &[ScheduledTask]) -> i64 {
    scheduled
        .iter()
        .map(|s| s.timing.earliest_finish)
        .max()
        .unwrap_or(0)
}

/// Forward pass: earliest (start, finish) per task, in topological order.
///
/// A dependency without a finalized finish time (absent from the collection,
/// or ordered after this task by the cycle fallback) contributes 0.
fn forward_pass(
    by_id: &FxHashMap<TaskId, &Task>,
    order: &[TaskId],
) -> FxHashMap<TaskId, (i64, i64)> {
    let mut earliest: FxHashMap<TaskId, (i64, i64)> =
        FxHashMap::with_capacity_and_hasher(order.len(), Default::default());

    for id in order {
        let Some(task) = by_id.get(id) else { continue };
        let mut start = 0;
        for dep in &task.dependencies {
            if let Some(&(_, dep_finish)) = earliest.get(dep) {
                start = start.max(dep_finish);
            }
        }
        earliest.insert(*id, (start, start + i64::from(task.duration)));
    }
    earliest
}

/// Backward pass: latest (start, finish) per task, in reverse topological
/// order.
///
/// A task whose successors all lack a finalized latest start (only possible
/// under a cycle), like a task with no successors at all, finishes at the
/// project end.
fn backward_pass(
    by_id: &FxHashMap<TaskId, &Task>,
    order: &[TaskId],
    successors: &SuccessorMap,
    project_end: i64,
) -> FxHashMap<TaskId, (i64, i64)> {
    let mut latest: FxHashMap<TaskId, (i64, i64)> =
        FxHashMap::with_capacity_and_hasher(order.len(), Default::default());

    for id in order.iter().rev() {
        let Some(task) = by_id.get(id) else { continue };
        let finish = successors
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|succ| latest.get(succ).map(|&(succ_start, _)| succ_start))
            .min()
            .unwrap_or(project_end);
        latest.insert(*id, (finish - i64::from(task.duration), finish));
    }
    latest
}

/// Free float: the delay a task tolerates without moving any immediate
/// successor's earliest start, clamped to the total float. Tasks without
/// successors inherit their total float.
fn compute_free_float(
    task: &Task,
    successors: &SuccessorMap,
    earliest: &FxHashMap<TaskId, (i64, i64)>,
    earliest_finish: i64,
    total_float: i64,
) -> i64 {
    let succs = successors
        .get(&task.id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if succs.is_empty() {
        return total_float;
    }
    succs
        .iter()
        .filter_map(|succ| earliest.get(succ))
        .map(|&(succ_start, _)| succ_start - earliest_finish)
        .min()
        .map_or(total_float, |gap| gap.min(total_float))
}
