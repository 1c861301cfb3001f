//! Critical path method over the dependency graph.
//!
//! Two Kahn-ordered passes. The forward pass pushes earliest start and
//! finish times with the edges; the backward pass pulls latest times
//! against them, walking the transposed graph from the final tasks. The
//! gap between a task's latest and earliest start is its slack, and the
//! tasks with no slack to spend form the critical path.
//!
//! All times are hours from project start, not calendar timestamps;
//! turning them into dates is the forecasting module's job.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::metrics::MetricsTracker;
use crate::task::{Task, TaskId};

/// Slack at or below this counts as critical. Summing hour estimates
/// accumulates floating-point error, so slack is never compared to an
/// exact zero.
pub const SLACK_EPSILON: f64 = 0.001;

/// Per-task schedule bounds, in hours from project start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskTiming {
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    /// How far the start can slip without moving the project finish.
    pub slack: f64,
}

/// Output of one critical-path run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmResult {
    /// Critical task ids ordered by earliest start; ties keep plan
    /// order.
    pub critical_path: Vec<TaskId>,
    /// Length of the longest dependency chain, in hours.
    pub total_duration: f64,
    pub timing: HashMap<TaskId, TaskTiming>,
}

impl CpmResult {
    /// Slack for `id`, if the task was part of the run.
    pub fn slack(&self, id: TaskId) -> Option<f64> {
        self.timing.get(&id).map(|timing| timing.slack)
    }

    /// Whether `id` is on the critical path.
    pub fn is_critical(&self, id: TaskId) -> bool {
        self.slack(id).is_some_and(|slack| slack <= SLACK_EPSILON)
    }
}

/// Run both passes and assemble the schedule.
///
/// Callers gate on [`DependencyGraph::has_cycle`] first: over a cyclic
/// graph the queues drain early and the bounds are meaningless. An
/// empty task set yields an empty path and zero duration.
pub fn critical_path(
    tasks: &[Task],
    graph: &DependencyGraph,
    metrics: &MetricsTracker,
) -> CpmResult {
    metrics.increment("cpm_runs");
    let started = Instant::now();

    let hours: HashMap<TaskId, f64> = tasks
        .iter()
        .map(|task| (task.id, task.estimated_hours))
        .collect();
    let hours_of = |id: TaskId| hours.get(&id).copied().unwrap_or(0.0);

    // Forward pass: earliest times flow with the edges.
    let mut earliest_start: HashMap<TaskId, f64> =
        tasks.iter().map(|task| (task.id, 0.0)).collect();
    let mut earliest_finish: HashMap<TaskId, f64> = tasks
        .iter()
        .map(|task| (task.id, task.estimated_hours))
        .collect();

    let mut degrees = graph.in_degrees();
    let mut queue: VecDeque<TaskId> = graph
        .task_ids()
        .iter()
        .copied()
        .filter(|id| degrees.get(id) == Some(&0))
        .collect();

    while let Some(current) = queue.pop_front() {
        let finish = earliest_start.get(&current).copied().unwrap_or(0.0) + hours_of(current);
        earliest_finish.insert(current, finish);

        for &dependent in graph.dependents_of(current) {
            let start = earliest_start.entry(dependent).or_insert(0.0);
            if finish > *start {
                *start = finish;
            }
            if let Some(degree) = degrees.get_mut(&dependent) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    let total_duration = earliest_finish.values().copied().fold(0.0_f64, f64::max);

    // Backward pass: latest times flow against the edges, so walk the
    // transposed graph starting from the tasks nothing depends on.
    let mut latest_start: HashMap<TaskId, f64> = tasks
        .iter()
        .map(|task| (task.id, total_duration - task.estimated_hours))
        .collect();
    let mut latest_finish: HashMap<TaskId, f64> =
        tasks.iter().map(|task| (task.id, total_duration)).collect();

    let reversed = graph.reversed();
    let mut degrees = reversed.in_degrees();
    let mut queue: VecDeque<TaskId> = reversed
        .task_ids()
        .iter()
        .copied()
        .filter(|id| degrees.get(id) == Some(&0))
        .collect();

    while let Some(current) = queue.pop_front() {
        let start = latest_finish.get(&current).copied().unwrap_or(total_duration)
            - hours_of(current);
        latest_start.insert(current, start);

        for &prerequisite in reversed.dependents_of(current) {
            let finish = latest_finish.entry(prerequisite).or_insert(total_duration);
            if start < *finish {
                *finish = start;
            }
            if let Some(degree) = degrees.get_mut(&prerequisite) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(prerequisite);
                }
            }
        }
    }

    // Slack and path assembly iterate the plan's task order, which is
    // what keeps equal-start criticals in a stable order.
    let mut timing: HashMap<TaskId, TaskTiming> = HashMap::with_capacity(tasks.len());
    let mut critical: Vec<(TaskId, f64)> = Vec::new();

    for task in tasks {
        let es = earliest_start.get(&task.id).copied().unwrap_or(0.0);
        let ef = earliest_finish.get(&task.id).copied().unwrap_or(0.0);
        let ls = latest_start.get(&task.id).copied().unwrap_or(0.0);
        let lf = latest_finish.get(&task.id).copied().unwrap_or(total_duration);
        let slack = ls - es;

        timing.insert(
            task.id,
            TaskTiming {
                earliest_start: es,
                earliest_finish: ef,
                latest_start: ls,
                latest_finish: lf,
                slack,
            },
        );

        if slack <= SLACK_EPSILON {
            critical.push((task.id, es));
        }
    }

    critical.sort_by(|a, b| a.1.total_cmp(&b.1));
    let critical_path: Vec<TaskId> = critical.into_iter().map(|(id, _)| id).collect();

    tracing::info!(
        tasks = tasks.len(),
        duration_hours = total_duration,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "critical path computed"
    );

    CpmResult {
        critical_path,
        total_duration,
        timing,
    }
}
