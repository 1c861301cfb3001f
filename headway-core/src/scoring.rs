//! Multi-factor task priority scoring with an itemized breakdown.
//!
//! Every term is additive and carries its own sign, so a task's total is
//! exactly the sum of its breakdown and a user can see which lever moved
//! a recommendation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsTracker;
use crate::project::Milestone;
use crate::task::{Task, TaskId};
use crate::time::days_between;

const IMPACT_WEIGHT: f64 = 10.0;
const EFFORT_WEIGHT: f64 = 5.0;
const MILESTONE_WEIGHT: f64 = 15.0;
const URGENCY_WEIGHT: f64 = 20.0;
const TIME_FIT_BONUS: f64 = 30.0;

/// Signed score terms. Penalties are stored negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreBreakdown {
    pub impact: f64,
    pub effort: f64,
    pub milestone: f64,
    pub urgency: f64,
    pub time_fit: f64,
    pub delay_penalty: f64,
}

impl ScoreBreakdown {
    /// Sum of all terms; equals the task's total score.
    pub fn total(&self) -> f64 {
        self.impact
            + self.effort
            + self.milestone
            + self.urgency
            + self.time_fit
            + self.delay_penalty
    }
}

/// One scored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskScore {
    pub task_id: TaskId,
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

/// Score one task against the current project state.
///
/// `risk_score` is the project-level risk, computed once per run and
/// shared by every task; `available_hours` is the caller's next working
/// session.
pub fn score_task(
    task: &Task,
    milestones: &[Milestone],
    risk_score: u8,
    available_hours: f64,
    now: DateTime<Utc>,
    metrics: &MetricsTracker,
) -> TaskScore {
    metrics.increment("tasks_scored");

    let impact = IMPACT_WEIGHT * f64::from(task.impact);
    let effort = EFFORT_WEIGHT * f64::from(task.effort);

    // Only open milestones pull work forward.
    let milestone = task
        .milestone_id
        .and_then(|id| milestones.iter().find(|m| m.id == id))
        .filter(|m| !m.completed)
        .map(|m| MILESTONE_WEIGHT * f64::from(m.weight))
        .unwrap_or(0.0);

    let urgency = match task.deadline {
        Some(deadline) => urgency_bonus(deadline, now),
        None => 0.0,
    };

    let time_fit = if task.estimated_hours <= available_hours {
        TIME_FIT_BONUS
    } else {
        0.0
    };

    let delay_penalty = f64::from(risk_score) / 10.0 * 5.0;

    let breakdown = ScoreBreakdown {
        impact,
        effort: -effort,
        milestone,
        urgency,
        time_fit,
        delay_penalty: -delay_penalty,
    };

    TaskScore {
        task_id: task.id,
        total: breakdown.total(),
        breakdown,
    }
}

/// Urgency tiers by days until the deadline: overdue scores five times
/// the weight, within two days three times, within a week once.
///
/// Overdue is a direct timestamp comparison, not a whole-day one, so a
/// deadline missed by an hour already counts.
fn urgency_bonus(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if deadline < now {
        return URGENCY_WEIGHT * 5.0;
    }
    match days_between(now, deadline) {
        d if d <= 2 => URGENCY_WEIGHT * 3.0,
        d if d <= 7 => URGENCY_WEIGHT,
        _ => 0.0,
    }
}

/// Score every pending task and rank best-first.
///
/// Completed tasks are skipped entirely (they bump no counter). The
/// sort is stable and nothing breaks ties, so equal totals keep plan
/// order; the head of the result is the recommendation.
pub fn rank_tasks(
    tasks: &[Task],
    milestones: &[Milestone],
    risk_score: u8,
    available_hours: f64,
    now: DateTime<Utc>,
    metrics: &MetricsTracker,
) -> Vec<TaskScore> {
    let mut scores: Vec<TaskScore> = tasks
        .iter()
        .filter(|task| task.is_pending())
        .map(|task| score_task(task, milestones, risk_score, available_hours, now, metrics))
        .collect();

    scores.sort_by(|a, b| b.total.total_cmp(&a.total));
    scores
}
