//! Descriptive project statistics: headline numbers, pace, and
//! completion-activity analytics for the dashboard.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::project::ProjectWindow;
use crate::task::Task;
use crate::time::{days_between, days_elapsed_min1};

/// Fraction of the required pace that still counts as on track.
const ON_TRACK_PACE_RATIO: f64 = 0.8;

/// Days of completion history the trend covers, today included.
const TREND_DAYS: i64 = 7;

/// Whether the observed completion rate keeps the deadline reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaceStatus {
    Ahead,
    OnTrack,
    Behind,
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaceStatus::Ahead => "Ahead",
            PaceStatus::OnTrack => "On Track",
            PaceStatus::Behind => "Behind",
        };
        f.write_str(label)
    }
}

/// Headline numbers for one project at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,

    /// 0-100, two decimals.
    pub completion_percentage: f64,

    /// Whole days until the deadline, floored at zero for display.
    pub days_left: i64,

    pub pace: PaceStatus,

    /// Completions per elapsed day, two decimals.
    pub avg_tasks_per_day: f64,
}

/// Compute the headline stats.
pub fn project_stats(tasks: &[Task], window: &ProjectWindow, now: DateTime<Utc>) -> ProjectStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let remaining = total - completed;

    let completion_percentage = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let days_left = days_between(now, window.deadline);
    let days_passed = days_elapsed_min1(window.start, now);
    let avg_tasks_per_day = completed as f64 / days_passed as f64;

    let required_pace = if days_left > 0 {
        remaining as f64 / days_left as f64
    } else {
        remaining as f64
    };

    let pace = if remaining == 0 {
        PaceStatus::OnTrack
    } else if days_left <= 0 {
        PaceStatus::Behind
    } else if avg_tasks_per_day >= required_pace {
        PaceStatus::Ahead
    } else if avg_tasks_per_day >= required_pace * ON_TRACK_PACE_RATIO {
        PaceStatus::OnTrack
    } else {
        PaceStatus::Behind
    };

    ProjectStats {
        total_tasks: total,
        completed_tasks: completed,
        completion_percentage: round2(completion_percentage),
        days_left: days_left.max(0),
        pace,
        avg_tasks_per_day: round2(avg_tasks_per_day),
    }
}

/// Completions on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCompletions {
    pub date: NaiveDate,
    pub count: usize,
}

/// Completion-rate analytics over the task history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Completions per elapsed day, two decimals.
    pub current_velocity: f64,

    /// 0-100: share of elapsed days with at least one completion.
    pub consistency_score: u8,

    /// The last seven calendar days, oldest first.
    pub completion_trend: Vec<DailyCompletions>,
}

/// Velocity, consistency and the recent completion trend.
///
/// The completion flag alone feeds velocity; consistency and the trend
/// additionally need a completion timestamp, so flag-only history
/// contributes to the former and not the latter.
pub fn completion_activity(
    tasks: &[Task],
    window: &ProjectWindow,
    now: DateTime<Utc>,
) -> ActivityStats {
    let days_passed = days_elapsed_min1(window.start, now);
    let completed: Vec<&Task> = tasks.iter().filter(|task| task.completed).collect();

    let current_velocity = completed.len() as f64 / days_passed as f64;

    let distinct_days: HashSet<NaiveDate> = completed
        .iter()
        .filter_map(|task| task.completed_at)
        .map(|at| at.date_naive())
        .collect();
    let consistency_score =
        ((distinct_days.len() as f64 / days_passed as f64) * 100.0).min(100.0) as u8;

    let mut completion_trend = Vec::with_capacity(TREND_DAYS as usize);
    for offset in (0..TREND_DAYS).rev() {
        let date = (now - Duration::days(offset)).date_naive();
        let count = completed
            .iter()
            .filter(|task| task.completed_at.is_some_and(|at| at.date_naive() == date))
            .count();
        completion_trend.push(DailyCompletions { date, count });
    }

    ActivityStats {
        current_velocity: round2(current_velocity),
        consistency_score,
        completion_trend,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
