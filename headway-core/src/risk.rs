//! Composite delivery risk: velocity gap, timeline burn and backlog
//! size, folded into a 0-100 score with a three-level classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsTracker;
use crate::project::ProjectWindow;
use crate::task::Task;
use crate::time::{days_between, days_elapsed_min1};

/// Velocity ratio charged to a project with zero completions. Penalizes
/// a stalled project without dividing by zero.
const STALLED_VELOCITY_RATIO: f64 = 2.0;

/// Timeline share assumed when the window itself is degenerate
/// (deadline at or before start).
const DEGENERATE_TIMELINE_SHARE: f64 = 0.5;

const VELOCITY_WEIGHT: f64 = 40.0;
const TIMELINE_WEIGHT: f64 = 20.0;
const BACKLOG_WEIGHT: f64 = 2.0;

/// Classification bands over the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Below 30 is low, below 70 moderate, the rest high.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s < 30 => RiskLevel::Low,
            s if s < 70 => RiskLevel::Moderate,
            _ => RiskLevel::High,
        }
    }
}

/// Composite score with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0-100.
    pub score: u8,
    pub level: RiskLevel,
}

/// Score how likely the project is to miss its deadline.
///
/// Past the deadline the answer is terminal: 100/high with work still
/// remaining, 0/low once everything is done. Inside the window the
/// score blends three signals:
///
/// 1. how far the required completion rate outruns the observed one
/// 2. how much of the window is already burned
/// 3. the raw size of the remaining backlog
pub fn assess_risk(
    tasks: &[Task],
    window: &ProjectWindow,
    now: DateTime<Utc>,
    metrics: &MetricsTracker,
) -> RiskAssessment {
    metrics.increment("risk_evaluations");

    if tasks.is_empty() {
        return RiskAssessment {
            score: 0,
            level: RiskLevel::Low,
        };
    }

    let completed = tasks.iter().filter(|task| task.completed).count();
    let remaining = tasks.len() - completed;

    let days_left = days_between(now, window.deadline);
    if days_left <= 0 {
        return if remaining > 0 {
            RiskAssessment {
                score: 100,
                level: RiskLevel::High,
            }
        } else {
            RiskAssessment {
                score: 0,
                level: RiskLevel::Low,
            }
        };
    }

    let days_passed = days_elapsed_min1(window.start, now);
    let days_total = days_between(window.start, window.deadline);

    let current_velocity = completed as f64 / days_passed as f64;
    let required_velocity = remaining as f64 / days_left as f64;

    let velocity_ratio = if current_velocity > 0.0 {
        required_velocity / current_velocity
    } else {
        STALLED_VELOCITY_RATIO
    };
    let timeline_share = if days_total > 0 {
        days_passed as f64 / days_total as f64
    } else {
        DEGENERATE_TIMELINE_SHARE
    };

    let score = (velocity_ratio * VELOCITY_WEIGHT
        + timeline_share * TIMELINE_WEIGHT
        + remaining as f64 * BACKLOG_WEIGHT)
        .clamp(0.0, 100.0) as u8;

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 8, 25, 0).unwrap()
    }

    fn window_around(now: DateTime<Utc>, passed: i64, left: i64) -> ProjectWindow {
        ProjectWindow::new(now - Duration::days(passed), now + Duration::days(left))
    }

    fn batch(total: usize, completed: usize, at: DateTime<Utc>) -> Vec<Task> {
        (0..total)
            .map(|i| {
                let task = Task::new(i as i64 + 1, format!("task {i}"));
                if i < completed { task.done_at(at) } else { task }
            })
            .collect()
    }

    #[test]
    fn test_level_bands() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_empty_project_is_low_risk() {
        let now = now();
        let assessment = assess_risk(&[], &window_around(now, 5, 10), now, &MetricsTracker::new());

        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_missed_deadline_with_backlog_is_terminal() {
        let now = now();
        let tasks = batch(6, 2, now);
        let assessment =
            assess_risk(&tasks, &window_around(now, 20, -1), now, &MetricsTracker::new());

        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_missed_deadline_with_nothing_left_is_clear() {
        let now = now();
        let tasks = batch(6, 6, now);
        let assessment =
            assess_risk(&tasks, &window_around(now, 20, -1), now, &MetricsTracker::new());

        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_stalled_project_scores_high() {
        let now = now();
        // 2 tasks, none done, halfway through a 20-day window:
        // 2.0 * 40 + 0.5 * 20 + 2 * 2 = 94
        let tasks = batch(2, 0, now);
        let assessment =
            assess_risk(&tasks, &window_around(now, 10, 10), now, &MetricsTracker::new());

        assert_eq!(assessment.score, 94);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_steady_progress_scores_low() {
        let now = now();
        // 5 of 10 done in 10 of 40 days: required/current is a third,
        // so 40/3 + 5 + 10 truncates to 28.
        let tasks = batch(10, 5, now);
        let assessment =
            assess_risk(&tasks, &window_around(now, 10, 30), now, &MetricsTracker::new());

        assert_eq!(assessment.score, 28);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_stalled_outranks_steady() {
        let now = now();
        let metrics = MetricsTracker::new();

        let stalled = assess_risk(&batch(2, 0, now), &window_around(now, 10, 10), now, &metrics);
        let steady = assess_risk(&batch(10, 5, now), &window_around(now, 10, 30), now, &metrics);

        assert!(stalled.score > steady.score);
        assert_eq!(metrics.snapshot().get("risk_evaluations"), Some(&2));
    }

    #[test]
    fn test_degenerate_window_uses_fixed_timeline_share() {
        let now = now();
        // Start after the deadline: days_total is negative, days_passed
        // floors at 1, and the timeline term falls back to 0.5.
        // (1/10)/1 * 40 + 0.5 * 20 + 1 * 2 = 16
        let window = ProjectWindow::new(now + Duration::days(20), now + Duration::days(10));
        let tasks = batch(2, 1, now);

        let assessment = assess_risk(&tasks, &window, now, &MetricsTracker::new());
        assert_eq!(assessment.score, 16);
        assert_eq!(assessment.level, RiskLevel::Low);
    }
}
