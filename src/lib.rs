//! Critical path scheduling and grid layout for task dependency graphs.
//!
//! Two independent engines over the same task collection:
//!
//! - [`calculate_schedule`] runs the Critical Path Method: a topological
//!   sort, forward and backward passes, float computation, and critical-path
//!   marking. It returns one [`ScheduledTask`] per input task.
//! - [`auto_layout`] assigns every task a deterministic, non-overlapping
//!   grid cell, with columns reflecting dependency depth and rows shared
//!   only between ancestor-related tasks.
//!
//! Both are pure, synchronous functions: they take a snapshot of the input,
//! return freshly allocated output in input order, and retain no references
//! across calls. Repeated invocation with identical input yields identical
//! output, and concurrent invocation on independent snapshots is safe.
//!
//! Malformed input never fails. Dependencies on ids absent from the
//! collection contribute zero to timing, and cycles degrade into a
//! best-effort order (see [`graph::topo_order`]) whose timing is not a
//! meaningful schedule. Callers that want hard rejection run [`validate()`]
//! before the engines, and [`would_create_cycle`] before accepting a new
//! dependency edge.

pub mod graph;
pub mod layout;
pub mod models;
pub mod schedule;
pub mod validate;

pub use graph::{build_successors, has_path, topo_order, SuccessorMap};
pub use layout::{
    ancestor_sets, auto_layout, auto_layout_with, connected_components, related, AncestorMap,
    LayoutConfig,
};
pub use models::{GridPosition, ScheduledTask, Task, TaskId, TaskTiming};
pub use schedule::{calculate_schedule, project_duration};
pub use validate::{validate, would_create_cycle, ValidationError};
