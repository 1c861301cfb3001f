//! headway-core: analytics engine for the Headway task tracker
//!
//! Pure computation over a caller-supplied plan: dependency graph
//! verification, critical-path scheduling, bottleneck detection,
//! forecasting, delivery risk and task prioritization, stitched together
//! by [`analyze`]. No I/O, no stored state beyond the injected metrics
//! counters; "now" is always a parameter, never the wall clock.

pub mod task;
pub mod project;
pub mod graph;
pub mod cpm;
pub mod bottleneck;
pub mod forecast;
pub mod risk;
pub mod scoring;
pub mod stats;
pub mod metrics;
pub mod engine;
pub mod time;

pub use task::{Task, TaskId, MilestoneId};
pub use project::{Milestone, Dependency, ProjectWindow, ProjectPlan};
pub use graph::DependencyGraph;
pub use cpm::{critical_path, CpmResult, TaskTiming, SLACK_EPSILON};
pub use bottleneck::{detect_bottlenecks, Bottleneck};
pub use forecast::{completion_forecast, Forecast, RiskTrend, PRODUCTIVE_HOURS_PER_DAY};
pub use risk::{assess_risk, RiskAssessment, RiskLevel};
pub use scoring::{score_task, rank_tasks, TaskScore, ScoreBreakdown};
pub use stats::{
    project_stats, completion_activity, ProjectStats, PaceStatus, ActivityStats, DailyCompletions,
};
pub use metrics::MetricsTracker;
pub use engine::{analyze, AnalysisError, ProjectReport};
