//! Task model for the analytics engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable task identifier issued by the surrounding tracker.
pub type TaskId = i64;

/// Stable milestone identifier.
pub type MilestoneId = i64;

/// One unit of work as the engine sees it.
///
/// Tasks are immutable input for the duration of an analysis run; the
/// engine never mutates or persists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    /// Estimated effort in hours. Non-negative.
    pub estimated_hours: f64,

    /// 1-5 expected payoff.
    pub impact: i32,

    /// 1-5 expected friction.
    pub effort: i32,

    pub completed: bool,

    /// Optional hard deadline.
    pub deadline: Option<DateTime<Utc>>,

    /// At most one milestone per task.
    pub milestone_id: Option<MilestoneId>,

    /// When the task was marked complete, if it ever was.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            estimated_hours: 1.0,
            impact: 3,
            effort: 3,
            completed: false,
            deadline: None,
            milestone_id: None,
            completed_at: None,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours.max(0.0);
        self
    }

    pub fn with_impact(mut self, impact: i32) -> Self {
        self.impact = impact.clamp(1, 5);
        self
    }

    pub fn with_effort(mut self, effort: i32) -> Self {
        self.effort = effort.clamp(1, 5);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_milestone(mut self, milestone_id: MilestoneId) -> Self {
        self.milestone_id = Some(milestone_id);
        self
    }

    /// Mark the task complete as of `at`.
    pub fn done_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed = true;
        self.completed_at = Some(at);
        self
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_defaults() {
        let task = Task::new(7, "Write onboarding copy");

        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Write onboarding copy");
        assert_eq!(task.estimated_hours, 1.0);
        assert_eq!(task.impact, 3);
        assert_eq!(task.effort, 3);
        assert!(task.is_pending());
        assert_eq!(task.deadline, None);
        assert_eq!(task.milestone_id, None);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_score_inputs_clamp_to_range() {
        let task = Task::new(1, "overclocked").with_impact(9).with_effort(-2);
        assert_eq!(task.impact, 5);
        assert_eq!(task.effort, 1);

        let task = Task::new(2, "underclocked").with_impact(0).with_effort(11);
        assert_eq!(task.impact, 1);
        assert_eq!(task.effort, 5);
    }

    #[test]
    fn test_negative_hours_clamp_to_zero() {
        let task = Task::new(3, "time travel").with_hours(-4.5);
        assert_eq!(task.estimated_hours, 0.0);
    }

    #[test]
    fn test_done_at_sets_flag_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 2, 21, 8, 25, 0).unwrap();
        let task = Task::new(4, "Ship password reset").done_at(at);

        assert!(task.completed);
        assert!(!task.is_pending());
        assert_eq!(task.completed_at, Some(at));
    }
}
