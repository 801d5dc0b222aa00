//! Grid layout for dependency graphs.
//!
//! Columns grow with dependency depth; rows are chosen so that two tasks
//! share a horizontal lane only when one is a transitive ancestor of the
//! other. Independent subgraphs are placed one after another in a
//! deterministic order, so identical input always yields identical cells.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::trace;

use crate::graph::topo_order;
use crate::models::{GridPosition, Task, TaskId};

/// Transitive dependency closure: task id -> all ancestor ids.
pub type AncestorMap = FxHashMap<TaskId, FxHashSet<TaskId>>;

/// Layout parameters.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Column distance between a task and its nearest dependency. The
    /// default of 2 keeps an intermediate lane free for routing dependency
    /// arrows between node boxes.
    pub column_stride: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { column_stride: 2 }
    }
}

/// Assign every task a grid cell, with the default layout parameters.
///
/// Returns the tasks in input order with only `position` replaced. No two
/// tasks occupy the same cell, and tasks sharing a row are always
/// ancestor-related.
pub fn auto_layout(tasks: &[Task]) -> Vec<Task> {
    auto_layout_with(tasks, &LayoutConfig::default())
}

/// Assign every task a grid cell.
///
/// Tasks are visited per connected component, in global topological order
/// filtered to the component. A dependency-free task starts at column 0;
/// any other sits one stride right of its leftmost placed dependency
/// (dependencies not yet placed, which only happens under a cycle,
/// contribute column 0). The row is the lowest one whose cell is free and
/// whose occupants are all related to the task; the search always
/// terminates because an empty row is eventually reached.
pub fn auto_layout_with(tasks: &[Task], config: &LayoutConfig) -> Vec<Task> {
    let order = topo_order(tasks);
    let ancestors = ancestor_sets(tasks);
    let components = connected_components(tasks);
    trace!(
        tasks = tasks.len(),
        components = components.len(),
        "computing grid placement"
    );

    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
    let mut placed: FxHashMap<TaskId, GridPosition> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    let mut grid = PlacementGrid::default();

    for component in &components {
        let members: FxHashSet<TaskId> = component.iter().copied().collect();
        for id in order.iter().filter(|id| members.contains(*id)) {
            let Some(task) = by_id.get(id) else { continue };

            let col = if task.dependencies.is_empty() {
                0
            } else {
                let min_dep_col = task
                    .dependencies
                    .iter()
                    .map(|dep| placed.get(dep).map_or(0, |pos| pos.col))
                    .min()
                    .unwrap_or(0);
                min_dep_col + config.column_stride
            };
            let row = grid.find_row(*id, col, &ancestors);

            grid.occupy(*id, row, col);
            placed.insert(*id, GridPosition { row, col });
        }
    }

    tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            task.position = placed.get(&task.id).copied().unwrap_or_default();
            task
        })
        .collect()
}

/// Compute the transitive ancestor set of every task.
///
/// Memoized depth-first search along dependency edges. An id already on the
/// active search path contributes no further ancestors from that branch,
/// which keeps the traversal finite on cyclic input without repairing the
/// cycle. Dependency ids absent from the collection still appear inside the
/// sets that reach them.
pub fn ancestor_sets(tasks: &[Task]) -> AncestorMap {
    let by_id: FxHashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
    let mut memo: AncestorMap =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    let mut in_progress: FxHashSet<TaskId> = FxHashSet::default();

    for task in tasks {
        collect_ancestors(task.id, &by_id, &mut memo, &mut in_progress);
    }

    memo.retain(|id, _| by_id.contains_key(id));
    memo
}

/// Two tasks are related when either one's ancestor set contains the other.
pub fn related(ancestors: &AncestorMap, a: TaskId, b: TaskId) -> bool {
    ancestors.get(&a).map_or(false, |set| set.contains(&b))
        || ancestors.get(&b).map_or(false, |set| set.contains(&a))
}

fn collect_ancestors(
    id: TaskId,
    by_id: &FxHashMap<TaskId, &Task>,
    memo: &mut AncestorMap,
    in_progress: &mut FxHashSet<TaskId>,
) -> FxHashSet<TaskId> {
    if let Some(done) = memo.get(&id) {
        return done.clone();
    }
    if !in_progress.insert(id) {
        // Already on the active search path: a cycle.
        return FxHashSet::default();
    }

    let mut ancestors: FxHashSet<TaskId> = FxHashSet::default();
    if let Some(task) = by_id.get(&id) {
        for &dep in &task.dependencies {
            ancestors.insert(dep);
            ancestors.extend(collect_ancestors(dep, by_id, memo, in_progress));
        }
    }

    in_progress.remove(&id);
    memo.insert(id, ancestors.clone());
    ancestors
}

/// Partition the task ids into connected components of the undirected
/// dependency graph.
///
/// Dependency ids absent from the collection conduct adjacency (two tasks
/// sharing such an id land in one component) but are never members. Members
/// are sorted by id; components are ordered by the smallest id among their
/// zero-in-degree members, falling back to the smallest member id for
/// components that have none (only possible inside a cycle).
pub fn connected_components(tasks: &[Task]) -> Vec<Vec<TaskId>> {
    let known: FxHashSet<TaskId> = tasks.iter().map(|t| t.id).collect();

    let mut adjacency: FxHashMap<TaskId, Vec<TaskId>> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        adjacency.entry(task.id).or_default();
        for &dep in &task.dependencies {
            adjacency.entry(task.id).or_default().push(dep);
            adjacency.entry(dep).or_default().push(task.id);
        }
    }

    let mut visited: FxHashSet<TaskId> = FxHashSet::default();
    let mut components: Vec<Vec<TaskId>> = Vec::new();

    for task in tasks {
        if visited.contains(&task.id) {
            continue;
        }
        let mut members: Vec<TaskId> = Vec::new();
        let mut queue: VecDeque<TaskId> = VecDeque::from([task.id]);
        visited.insert(task.id);

        while let Some(current) = queue.pop_front() {
            if known.contains(&current) {
                members.push(current);
            }
            if let Some(neighbors) = adjacency.get(&current) {
                for &next in neighbors {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

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

    components.sort_by_key(|members| component_key(members, &in_degree));
    components
}

/// Ordering key for a component: smallest root id, else smallest member id.
fn component_key(members: &[TaskId], in_degree: &FxHashMap<TaskId, usize>) -> TaskId {
    members
        .iter()
        .copied()
        .filter(|id| in_degree.get(id) == Some(&0))
        .min()
        .or_else(|| members.iter().copied().min())
        .unwrap_or(TaskId::MAX)
}

/// Occupancy accumulator threaded through the placement loop.
#[derive(Default)]
struct PlacementGrid {
    occupied: FxHashSet<(u32, u32)>,
    row_members: FxHashMap<u32, Vec<TaskId>>,
}

impl PlacementGrid {
    /// Smallest row whose cell at `col` is free and whose occupants are all
    /// related to `id`.
    fn find_row(&self, id: TaskId, col: u32, ancestors: &AncestorMap) -> u32 {
        let mut row = 0;
        loop {
            let cell_free = !self.occupied.contains(&(row, col));
            let lane_compatible = self.row_members.get(&row).map_or(true, |members| {
                members.iter().all(|&other| related(ancestors, id, other))
            });
            if cell_free && lane_compatible {
                return row;
            }
            row += 1;
        }
    }

    fn occupy(&mut self, id: TaskId, row: u32, col: u32) {
        self.occupied.insert((row, col));
        self.row_members.entry(row).or_default().push(id);
    }
}
