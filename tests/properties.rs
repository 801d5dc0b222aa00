//! Property tests over generated acyclic task graphs.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use netzplan::{
    ancestor_sets, auto_layout, calculate_schedule, project_duration, related, topo_order, Task,
    TaskId,
};

// Strategy to generate a valid DAG: acyclicity is guaranteed by construction,
// since task n may only depend on tasks 0..n-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let durations = proptest::collection::vec(1u32..=20, num_tasks);
        let raw_deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        );
        (durations, raw_deps).prop_map(|(durations, raw_deps)| {
            durations
                .into_iter()
                .zip(raw_deps)
                .enumerate()
                .map(|(i, (duration, potential_deps))| {
                    // Sanitize dependencies: only allow deps < i.
                    let mut deps: Vec<TaskId> = potential_deps
                        .into_iter()
                        .filter(|_| i > 0)
                        .map(|d| (d % i) as TaskId)
                        .collect();
                    deps.sort_unstable();
                    deps.dedup();
                    Task::new(i as TaskId, duration).with_dependencies(deps)
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn topological_order_respects_dependencies(tasks in dag_strategy(12)) {
        let order = topo_order(&tasks);
        prop_assert_eq!(order.len(), tasks.len());

        let position: HashMap<TaskId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        for task in &tasks {
            for dep in &task.dependencies {
                prop_assert!(
                    position[dep] < position[&task.id],
                    "dependency {} of task {} is ordered after it", dep, task.id
                );
            }
        }
    }

    #[test]
    fn forward_pass_is_consistent(tasks in dag_strategy(12)) {
        let scheduled = calculate_schedule(&tasks);
        let finish: HashMap<TaskId, i64> = scheduled
            .iter()
            .map(|s| (s.task.id, s.timing.earliest_finish))
            .collect();

        for s in &scheduled {
            let timing = s.timing;
            prop_assert_eq!(
                timing.earliest_finish,
                timing.earliest_start + i64::from(s.task.duration)
            );
            let expected_start = s
                .task
                .dependencies
                .iter()
                .map(|dep| finish[dep])
                .max()
                .unwrap_or(0);
            prop_assert_eq!(timing.earliest_start, expected_start);
        }
    }

    #[test]
    fn backward_pass_is_consistent(tasks in dag_strategy(12)) {
        let scheduled = calculate_schedule(&tasks);
        let end = project_duration(&scheduled);

        let mut has_successor: HashSet<TaskId> = HashSet::new();
        for task in &tasks {
            has_successor.extend(task.dependencies.iter().copied());
        }

        for s in &scheduled {
            let timing = s.timing;
            prop_assert_eq!(
                timing.latest_start,
                timing.latest_finish - i64::from(s.task.duration)
            );
            if !has_successor.contains(&s.task.id) {
                prop_assert_eq!(timing.latest_finish, end);
            }
        }
    }

    #[test]
    fn floats_are_bounded(tasks in dag_strategy(12)) {
        for s in calculate_schedule(&tasks) {
            prop_assert!(s.timing.total_float >= 0, "negative total float on {}", s.task.id);
            prop_assert!(s.timing.free_float >= 0, "negative free float on {}", s.task.id);
            prop_assert!(
                s.timing.free_float <= s.timing.total_float,
                "free float exceeds total float on {}", s.task.id
            );
        }
    }

    #[test]
    fn critical_iff_zero_total_float(tasks in dag_strategy(12)) {
        let scheduled = calculate_schedule(&tasks);
        prop_assert!(scheduled.iter().any(|s| s.is_critical));
        for s in &scheduled {
            prop_assert_eq!(s.is_critical, s.timing.total_float == 0);
        }
    }

    #[test]
    fn schedule_is_idempotent(tasks in dag_strategy(12)) {
        let first = calculate_schedule(&tasks);
        let raw_again: Vec<Task> = first.iter().map(|s| s.task.clone()).collect();
        prop_assert_eq!(calculate_schedule(&raw_again), first);
    }

    #[test]
    fn layout_cells_never_overlap(tasks in dag_strategy(12)) {
        let placed = auto_layout(&tasks);
        prop_assert_eq!(placed.len(), tasks.len());

        let mut cells: HashSet<(u32, u32)> = HashSet::new();
        for task in &placed {
            prop_assert!(
                cells.insert((task.position.row, task.position.col)),
                "cell ({}, {}) assigned twice", task.position.row, task.position.col
            );
        }
    }

    #[test]
    fn layout_row_mates_are_related(tasks in dag_strategy(12)) {
        let placed = auto_layout(&tasks);
        let ancestors = ancestor_sets(&placed);
        for a in &placed {
            for b in &placed {
                if a.id != b.id && a.position.row == b.position.row {
                    prop_assert!(
                        related(&ancestors, a.id, b.id),
                        "unrelated tasks {} and {} share row {}", a.id, b.id, a.position.row
                    );
                }
            }
        }
    }
}
