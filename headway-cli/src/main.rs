use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use headway_core::{analyze, MetricsTracker, ProjectPlan, ProjectReport, TaskId};
use std::fs;
use std::path::{Path, PathBuf};

mod logging;
mod sample;

#[derive(Parser, Debug)]
#[command(name = "headway", version, about = "Project analytics: critical path, risk, next task")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter plan file to edit by hand
    Init {
        /// Where to write the plan (default: plan.json)
        #[arg(long, default_value = "plan.json")]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Analyze a plan file and print the report
    Analyze {
        /// Path to the plan JSON
        #[arg(long)]
        plan: PathBuf,

        /// Hours available in the next working session
        #[arg(long, default_value_t = 4.0)]
        hours: f64,

        /// Analyze as of this instant (RFC 3339) instead of the wall
        /// clock; useful for reproducible output
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Refuse structurally broken plans instead of analyzing around
        /// them
        #[arg(long)]
        strict: bool,

        /// Limit printed recommendations (default: 5)
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    match cli.command {
        Command::Init { out, force } => init_plan(&out, force),

        Command::Analyze {
            plan,
            hours,
            now,
            json,
            strict,
            top,
        } => run_analyze(&plan, hours, now, json, strict, top),
    }
}

fn init_plan(out: &Path, force: bool) -> Result<()> {
    if out.exists() && !force {
        bail!("{} already exists (pass --force to overwrite)", out.display());
    }

    let plan = sample::starter_plan(Utc::now());
    let json = serde_json::to_string_pretty(&plan)?;
    fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;

    println!("Wrote starter plan to {}", out.display());
    println!("Edit it, then run: headway analyze --plan {}", out.display());
    Ok(())
}

fn run_analyze(
    path: &Path,
    hours: f64,
    now: Option<DateTime<Utc>>,
    json: bool,
    strict: bool,
    top: usize,
) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let plan: ProjectPlan =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    if strict {
        if let Err(problem) = plan.validate() {
            bail!("invalid plan {}: {}", path.display(), problem);
        }
    }

    let now = now.unwrap_or_else(Utc::now);
    let metrics = MetricsTracker::new();
    let report = analyze(&plan, now, hours, &metrics)
        .with_context(|| format!("analyzing {}", path.display()))?;

    tracing::debug!(counters = ?metrics.snapshot(), "analysis complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&plan, &report, top);
    }
    Ok(())
}

fn print_summary(plan: &ProjectPlan, report: &ProjectReport, top: usize) {
    println!(
        "Tasks: {} total, {} done ({:.2}%) | {} days left | pace: {}",
        report.stats.total_tasks,
        report.stats.completed_tasks,
        report.stats.completion_percentage,
        report.stats.days_left,
        report.stats.pace,
    );
    println!(
        "Risk: {}/100 ({:?}) | delay probability {:.2}% | confidence {:.2}%",
        report.risk.score,
        report.risk.level,
        report.forecast.delay_probability,
        report.forecast.confidence,
    );
    println!(
        "Estimated completion: {} | velocity {:.2} tasks/day",
        report.forecast.estimated_completion.format("%Y-%m-%d %H:%M UTC"),
        report.activity.current_velocity,
    );

    println!("\nCritical path ({:.1}h):", report.schedule.total_duration);
    for &id in &report.schedule.critical_path {
        println!("  - [{}] {}", id, title_of(plan, id));
    }

    if !report.bottlenecks.is_empty() {
        println!("\nBottlenecks:");
        for bottleneck in &report.bottlenecks {
            println!(
                "  - [{}] {} | severity={} | {}",
                bottleneck.task_id,
                title_of(plan, bottleneck.task_id),
                bottleneck.severity,
                bottleneck.reason,
            );
        }
    }

    println!("\nNext up:");
    for scored in report.recommendations.iter().take(top) {
        let b = &scored.breakdown;
        println!(
            "  {:>7.1}  {}",
            scored.total,
            title_of(plan, scored.task_id)
        );
        println!(
            "           impact {:+.1} | effort {:+.1} | milestone {:+.1} | urgency {:+.1} | fit {:+.1} | risk {:+.1}",
            b.impact, b.effort, b.milestone, b.urgency, b.time_fit, b.delay_penalty,
        );
    }
    if report.recommendations.is_empty() {
        println!("  (nothing pending)");
    }
}

fn title_of(plan: &ProjectPlan, id: TaskId) -> &str {
    plan.tasks
        .iter()
        .find(|task| task.id == id)
        .map(|task| task.title.as_str())
        .unwrap_or("unknown task")
}
