//! Bottleneck detection: dependency hubs and critical milestone tasks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cpm::CpmResult;
use crate::graph::DependencyGraph;
use crate::task::{Task, TaskId};

/// Fan-out at or above this marks a task as a hub.
const HUB_FAN_OUT: usize = 3;

/// Severity points per downstream task a hub is blocking.
const HUB_SEVERITY_PER_DEPENDENT: usize = 20;

/// Fixed severity for critical-path tasks attached to a milestone.
const MILESTONE_SEVERITY: u8 = 90;

/// One flagged task with a 0-100 severity and a display-ready reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub task_id: TaskId,
    pub severity: u8,
    pub reason: String,
}

/// Flag tasks that disproportionately constrain the rest of the plan.
///
/// Two signals, scanned in plan order: hubs first (fan-out of
/// [`HUB_FAN_OUT`] or more, severity scaled by downstream count), then
/// critical-path tasks attached to a milestone at fixed severity. A
/// task tripping both keeps only its hub entry.
pub fn detect_bottlenecks(
    tasks: &[Task],
    graph: &DependencyGraph,
    schedule: &CpmResult,
) -> Vec<Bottleneck> {
    let mut found: Vec<Bottleneck> = Vec::new();

    for task in tasks {
        let fan_out = graph.fan_out(task.id);
        if fan_out >= HUB_FAN_OUT {
            found.push(Bottleneck {
                task_id: task.id,
                severity: (fan_out * HUB_SEVERITY_PER_DEPENDENT).min(100) as u8,
                reason: format!("Blocking {fan_out} downstream tasks."),
            });
        }
    }

    for task in tasks {
        if task.milestone_id.is_some() && schedule.is_critical(task.id) {
            found.push(Bottleneck {
                task_id: task.id,
                severity: MILESTONE_SEVERITY,
                reason: "Critical path task linked to milestone.".to_string(),
            });
        }
    }

    let mut seen: HashSet<TaskId> = HashSet::new();
    found.retain(|bottleneck| seen.insert(bottleneck.task_id));
    found
}
