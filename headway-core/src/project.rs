//! Project-level input records: the time window, milestones, dependency
//! edges and the full plan the engine is handed.
//!
//! These are wire types. The surrounding tracker serializes a plan, the
//! engine reads it, and nothing flows back. Structural problems are
//! surfaced by [`ProjectPlan::validate`]; the analytics modules
//! themselves stay tolerant of imperfect input.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{MilestoneId, Task, TaskId};

/// A strategic checkpoint tasks can attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,

    /// 1-5, higher is more strategic.
    pub weight: i32,

    pub completed: bool,
}

impl Milestone {
    pub fn new(id: MilestoneId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            weight: 3,
            completed: false,
        }
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight.clamp(1, 5);
        self
    }

    pub fn done(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// One dependency edge: `task_id` cannot start before `depends_on_id`
/// finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub task_id: TaskId,
    pub depends_on_id: TaskId,
}

impl Dependency {
    pub fn new(task_id: TaskId, depends_on_id: TaskId) -> Self {
        Self {
            task_id,
            depends_on_id,
        }
    }
}

/// Project time window. The engine never reads the wall clock; "now" is
/// always supplied by the caller so runs stay reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectWindow {
    pub start: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

impl ProjectWindow {
    pub fn new(start: DateTime<Utc>, deadline: DateTime<Utc>) -> Self {
        Self { start, deadline }
    }
}

/// Everything one analysis run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub window: ProjectWindow,
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub milestones: Vec<Milestone>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl ProjectPlan {
    /// Structural checks for callers that want hard failures up front.
    ///
    /// The analytics modules tolerate most of what this rejects (the
    /// graph builder drops edges with unknown endpoints, the scorer
    /// treats an unknown milestone as no milestone), so validation is
    /// opt-in rather than a precondition of [`crate::analyze`].
    pub fn validate(&self) -> Result<(), String> {
        let mut task_ids: HashSet<TaskId> = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if !task_ids.insert(task.id) {
                return Err(format!("duplicate task id {}", task.id));
            }
            if !task.estimated_hours.is_finite() || task.estimated_hours < 0.0 {
                return Err(format!(
                    "task {}: estimated_hours must be a non-negative number",
                    task.id
                ));
            }
            if !(1..=5).contains(&task.impact) {
                return Err(format!("task {}: impact must be within 1-5", task.id));
            }
            if !(1..=5).contains(&task.effort) {
                return Err(format!("task {}: effort must be within 1-5", task.id));
            }
        }

        let mut milestone_ids: HashSet<MilestoneId> = HashSet::with_capacity(self.milestones.len());
        for milestone in &self.milestones {
            if !milestone_ids.insert(milestone.id) {
                return Err(format!("duplicate milestone id {}", milestone.id));
            }
            if !(1..=5).contains(&milestone.weight) {
                return Err(format!(
                    "milestone {}: weight must be within 1-5",
                    milestone.id
                ));
            }
        }

        for task in &self.tasks {
            if let Some(milestone_id) = task.milestone_id {
                if !milestone_ids.contains(&milestone_id) {
                    return Err(format!(
                        "task {} references unknown milestone {}",
                        task.id, milestone_id
                    ));
                }
            }
        }

        for dep in &self.dependencies {
            if !task_ids.contains(&dep.task_id) || !task_ids.contains(&dep.depends_on_id) {
                return Err(format!(
                    "dependency ({} depends on {}) references an unknown task",
                    dep.task_id, dep.depends_on_id
                ));
            }
        }

        Ok(())
    }
}
