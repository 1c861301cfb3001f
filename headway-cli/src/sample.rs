//! Starter plan written by `headway init`.

use chrono::{DateTime, Duration, Utc};
use headway_core::{Dependency, Milestone, ProjectPlan, ProjectWindow, Task};

/// A three-week starter project, small enough to edit by hand but wired
/// so the very first report already shows a critical path, a dependency
/// hub and a deadline.
pub fn starter_plan(now: DateTime<Utc>) -> ProjectPlan {
    ProjectPlan {
        window: ProjectWindow::new(now, now + Duration::days(21)),
        tasks: vec![
            Task::new(1, "Sketch the feature list")
                .with_hours(2.0)
                .with_impact(4)
                .with_effort(1),
            Task::new(2, "Set up repo and CI")
                .with_hours(3.0)
                .with_impact(3)
                .with_effort(2),
            Task::new(3, "Build the data layer")
                .with_hours(6.0)
                .with_impact(5)
                .with_effort(3)
                .with_milestone(1),
            Task::new(4, "Draft the UI")
                .with_hours(5.0)
                .with_impact(4)
                .with_effort(3)
                .with_milestone(1),
            Task::new(5, "Write the landing page")
                .with_hours(4.0)
                .with_impact(3)
                .with_effort(2),
            Task::new(6, "Ship v0.1")
                .with_hours(2.0)
                .with_impact(5)
                .with_effort(2)
                .with_milestone(2)
                .with_deadline(now + Duration::days(14)),
        ],
        milestones: vec![
            Milestone::new(1, "Working prototype").with_weight(4),
            Milestone::new(2, "First release").with_weight(5),
        ],
        dependencies: vec![
            Dependency::new(2, 1),
            Dependency::new(3, 2),
            Dependency::new(4, 2),
            Dependency::new(5, 2),
            Dependency::new(6, 3),
            Dependency::new(6, 4),
            Dependency::new(6, 5),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headway_core::{MetricsTracker, analyze};

    #[test]
    fn test_starter_plan_is_valid_and_analyzable() {
        let now = Utc::now();
        let plan = starter_plan(now);

        assert!(plan.validate().is_ok());

        let report = analyze(&plan, now, 4.0, &MetricsTracker::new()).unwrap();
        // 2 + 3 + 6 + 2 through the data layer.
        assert_eq!(report.schedule.total_duration, 13.0);
        assert!(!report.bottlenecks.is_empty());
        assert!(!report.recommendations.is_empty());
    }
}
