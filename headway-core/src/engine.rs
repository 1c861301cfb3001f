//! One-call orchestration: graph, cycle gate, schedule, then every
//! downstream analytic over the same inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bottleneck::{Bottleneck, detect_bottlenecks};
use crate::cpm::{CpmResult, critical_path};
use crate::forecast::{Forecast, completion_forecast};
use crate::graph::DependencyGraph;
use crate::metrics::MetricsTracker;
use crate::project::ProjectPlan;
use crate::risk::{RiskAssessment, assess_risk};
use crate::scoring::{TaskScore, rank_tasks};
use crate::stats::{ActivityStats, ProjectStats, completion_activity, project_stats};

/// Conditions that stop a run before any result exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Schedule bounds are meaningless over a cyclic graph, so nothing
    /// downstream of the gate runs either.
    #[error("dependency graph contains a cycle; no valid work order exists")]
    CyclicDependencies,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub stats: ProjectStats,
    pub schedule: CpmResult,
    pub bottlenecks: Vec<Bottleneck>,
    pub forecast: Forecast,
    pub risk: RiskAssessment,
    pub activity: ActivityStats,

    /// Pending tasks ranked best-first; the head is the recommendation.
    pub recommendations: Vec<TaskScore>,
}

/// Run the full analytics pipeline over one plan.
///
/// Pure except for counter increments on `metrics`: the same plan,
/// `now` and `available_hours` always produce the same report. Risk is
/// assessed once and its score feeds every task's delay penalty.
pub fn analyze(
    plan: &ProjectPlan,
    now: DateTime<Utc>,
    available_hours: f64,
    metrics: &MetricsTracker,
) -> Result<ProjectReport, AnalysisError> {
    let graph = DependencyGraph::build(&plan.tasks, &plan.dependencies);
    if graph.has_cycle() {
        tracing::warn!(tasks = plan.tasks.len(), "analysis rejected: cyclic dependencies");
        return Err(AnalysisError::CyclicDependencies);
    }

    let schedule = critical_path(&plan.tasks, &graph, metrics);
    let bottlenecks = detect_bottlenecks(&plan.tasks, &graph, &schedule);
    let risk = assess_risk(&plan.tasks, &plan.window, now, metrics);
    let forecast = completion_forecast(&plan.tasks, &plan.window, schedule.total_duration, now);
    let stats = project_stats(&plan.tasks, &plan.window, now);
    let activity = completion_activity(&plan.tasks, &plan.window, now);
    let recommendations = rank_tasks(
        &plan.tasks,
        &plan.milestones,
        risk.score,
        available_hours,
        now,
        metrics,
    );

    Ok(ProjectReport {
        stats,
        schedule,
        bottlenecks,
        forecast,
        risk,
        activity,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Dependency, Milestone, ProjectWindow};
    use crate::task::Task;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 8, 25, 0).unwrap()
    }

    fn sprint_plan(now: DateTime<Utc>) -> ProjectPlan {
        let window = ProjectWindow::new(now - Duration::days(7), now + Duration::days(21));
        ProjectPlan {
            window,
            tasks: vec![
                Task::new(1, "Design schema")
                    .with_hours(4.0)
                    .with_impact(4)
                    .done_at(now - Duration::days(2)),
                Task::new(2, "Build API")
                    .with_hours(10.0)
                    .with_impact(5)
                    .with_effort(4)
                    .with_milestone(10),
                Task::new(3, "Write docs").with_hours(3.0).with_impact(2),
                Task::new(4, "Ship beta")
                    .with_hours(2.0)
                    .with_impact(5)
                    .with_milestone(10)
                    .with_deadline(now + Duration::days(5)),
            ],
            milestones: vec![Milestone::new(10, "Public beta").with_weight(5)],
            dependencies: vec![
                Dependency::new(2, 1),
                Dependency::new(3, 1),
                Dependency::new(4, 2),
            ],
        }
    }

    #[test]
    fn test_cyclic_plan_is_rejected_before_any_work() {
        let now = now();
        let mut plan = sprint_plan(now);
        plan.dependencies.push(Dependency::new(1, 4));
        let metrics = MetricsTracker::new();

        let err = analyze(&plan, now, 4.0, &metrics).unwrap_err();

        assert_eq!(err, AnalysisError::CyclicDependencies);
        // The gate sits in front of the schedule, so nothing counted.
        assert_eq!(metrics.snapshot().get("cpm_runs"), Some(&0));
        assert_eq!(metrics.snapshot().get("tasks_scored"), Some(&0));
    }

    #[test]
    fn test_report_sections_agree_with_each_other() {
        let now = now();
        let plan = sprint_plan(now);
        let metrics = MetricsTracker::new();

        let report = analyze(&plan, now, 4.0, &metrics).unwrap();

        // 4 + 10 + 2 on the long chain.
        assert_eq!(report.schedule.total_duration, 16.0);
        assert_eq!(report.schedule.critical_path, vec![1, 2, 4]);

        // Task 4 is critical and attached to a milestone.
        assert!(report.bottlenecks.iter().any(|b| b.task_id == 4 && b.severity == 90));

        // The risk score the scorer saw is the one in the report.
        let expected_penalty = -(f64::from(report.risk.score) / 10.0 * 5.0);
        for scored in &report.recommendations {
            assert_eq!(scored.breakdown.delay_penalty, expected_penalty);
        }

        // High-impact milestone work with a near deadline leads.
        assert_eq!(report.recommendations[0].task_id, 4);
        assert_eq!(report.stats.total_tasks, 4);
        assert_eq!(report.stats.completed_tasks, 1);
    }

    #[test]
    fn test_counters_reflect_one_run() {
        let now = now();
        let plan = sprint_plan(now);
        let metrics = MetricsTracker::new();

        analyze(&plan, now, 4.0, &metrics).unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.get("cpm_runs"), Some(&1));
        assert_eq!(snapshot.get("risk_evaluations"), Some(&1));
        // Three of the four tasks are still pending.
        assert_eq!(snapshot.get("tasks_scored"), Some(&3));
    }

    #[test]
    fn test_same_inputs_same_report() {
        let now = now();
        let plan = sprint_plan(now);

        let first = analyze(&plan, now, 4.0, &MetricsTracker::new()).unwrap();
        let second = analyze(&plan, now, 4.0, &MetricsTracker::new()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let now = now();
        let plan = sprint_plan(now);

        let report = analyze(&plan, now, 4.0, &MetricsTracker::new()).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"critical_path\""));
        assert!(json.contains("\"delay_probability\""));
        assert!(json.contains("\"recommendations\""));

        let back: ProjectReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_empty_plan_produces_a_quiet_report() {
        let now = now();
        let plan = ProjectPlan {
            window: ProjectWindow::new(now - Duration::days(1), now + Duration::days(10)),
            tasks: vec![],
            milestones: vec![],
            dependencies: vec![],
        };

        let report = analyze(&plan, now, 4.0, &MetricsTracker::new()).unwrap();

        assert!(report.schedule.critical_path.is_empty());
        assert!(report.bottlenecks.is_empty());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.risk.score, 0);
        assert_eq!(report.forecast.confidence, 100.0);
    }
}
