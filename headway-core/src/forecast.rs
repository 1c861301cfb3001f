//! Completion forecasting from the critical path and the project window.
//!
//! Heuristic scaling, not a calibrated statistical model. The delay
//! probability maps schedule pressure onto 0-100 and the confidence
//! score is the plain completion ratio; both are display numbers for a
//! dashboard, not probabilities anyone should bet on.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::project::ProjectWindow;
use crate::task::Task;
use crate::time::{days_between, days_elapsed_min1};

/// Assumed productive hours per working day. A fixed policy constant;
/// remaining critical-path hours divide by this to become days.
pub const PRODUCTIVE_HOURS_PER_DAY: f64 = 6.0;

/// Direction delivery risk is moving in across forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTrend {
    Increasing,
    Stable,
    Decreasing,
}

/// Completion estimate for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub estimated_completion: DateTime<Utc>,

    /// 0-100, two decimals.
    pub delay_probability: f64,

    /// 0-100, two decimals: share of tasks already done.
    pub confidence: f64,

    /// Always [`RiskTrend::Stable`] for now. Movement would need a
    /// persisted forecast history, which this layer does not keep.
    pub trend: RiskTrend,
}

/// Estimate when the remaining critical-path work lands.
///
/// `critical_hours` is the schedule's total duration. An empty task set
/// forecasts the deadline itself with full confidence; a deadline
/// already passed pins the delay probability to 100 while anything is
/// still pending.
pub fn completion_forecast(
    tasks: &[Task],
    window: &ProjectWindow,
    critical_hours: f64,
    now: DateTime<Utc>,
) -> Forecast {
    if tasks.is_empty() {
        return Forecast {
            estimated_completion: window.deadline,
            delay_probability: 0.0,
            confidence: 100.0,
            trend: RiskTrend::Stable,
        };
    }

    let completed = tasks.iter().filter(|task| task.completed).count();
    let pending = tasks.len() - completed;

    let days_passed = days_elapsed_min1(window.start, now);
    let velocity = completed as f64 / days_passed as f64;

    let days_needed = critical_hours / PRODUCTIVE_HOURS_PER_DAY;
    let estimated_completion =
        now + Duration::seconds((days_needed * 86_400.0).round() as i64);

    let days_left = days_between(now, window.deadline);
    let delay_probability = if days_left <= 0 {
        if pending > 0 { 100.0 } else { 0.0 }
    } else {
        ((days_needed / days_left as f64) * 50.0).clamp(0.0, 100.0)
    };

    let confidence = completed as f64 / tasks.len() as f64 * 100.0;

    tracing::debug!(velocity, days_needed, days_left, "forecast inputs");

    Forecast {
        estimated_completion,
        delay_probability: round2(delay_probability),
        confidence: round2(confidence),
        trend: RiskTrend::Stable,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
