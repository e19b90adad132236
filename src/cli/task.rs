//! lazytask task command implementations.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::cli::CliContext;
use crate::error::{Error, Result};
use crate::output::{emit_success, format_timestamp, Report};
use crate::task::{now_ms, Task};

#[derive(Serialize)]
struct AddReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
    added: bool,
}

#[derive(Serialize)]
struct ToggleReport {
    id: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

#[derive(Serialize)]
struct RemoveReport {
    id: String,
    removed: usize,
}

#[derive(Serialize)]
struct ClearReport {
    cleared: usize,
}

pub(crate) async fn run_add(ctx: &CliContext, title: &str, deadline: Option<&str>) -> Result<()> {
    let deadline = deadline.map(parse_deadline).transpose()?;
    let task = ctx.session.tasks().add(title, deadline).await?;

    let mut report = match &task {
        Some(task) => {
            let mut report = Report::new(format!("lazytask add: {}", task.title));
            report.field("id", &task.id);
            if let Some(due) = task.deadline {
                report.field("deadline", format_timestamp(due));
            }
            report
        }
        None => {
            let mut report = Report::new("lazytask add: nothing added");
            report.warn("title is empty");
            report
        }
    };
    report.hint("lazytask list");

    emit_success(
        ctx.output,
        "add",
        &AddReport {
            added: task.is_some(),
            task,
        },
        &report,
    )
}

pub(crate) async fn run_list(ctx: &CliContext) -> Result<()> {
    let snapshot = ctx.session.snapshot().await;
    let view = &snapshot.view;
    let now = now_ms();

    let mut report = Report::new(format!(
        "lazytask list: {} shown, sorted by {}",
        view.display.len(),
        snapshot.settings.sort_by
    ));
    report.counts(&view.counts);
    for task in &view.display {
        report.task(task, now);
    }

    let overdue = view.display.iter().filter(|task| task.is_overdue(now)).count();
    if overdue > 0 {
        report.warn(format!("{overdue} overdue"));
    }
    if view.counts.total == 0 {
        report.hint("lazytask add \"...\"");
    } else if view.display.is_empty() {
        report.hint("lazytask settings set showCompletedTasks true");
    }

    emit_success(ctx.output, "list", view, &report)
}

pub(crate) async fn run_toggle(ctx: &CliContext, id: &str) -> Result<()> {
    let tasks = ctx.session.tasks();
    let found = tasks.toggle(id).await?;
    let completed = if found {
        tasks.find(id).await.map(|task| task.completed)
    } else {
        None
    };

    let mut report = match completed {
        Some(true) => Report::new(format!("lazytask toggle: {id} done")),
        Some(false) => Report::new(format!("lazytask toggle: {id} reopened")),
        None => {
            let mut report = Report::new(format!("lazytask toggle: {id} unchanged"));
            report.warn(format!("no task with id {id}"));
            report
        }
    };
    report.hint("lazytask list");

    emit_success(
        ctx.output,
        "toggle",
        &ToggleReport {
            id: id.to_string(),
            found,
            completed,
        },
        &report,
    )
}

pub(crate) async fn run_rm(ctx: &CliContext, id: &str) -> Result<()> {
    let removed = ctx.session.tasks().delete(id).await?;

    let mut report = Report::new(format!("lazytask rm: {removed} removed"));
    if removed == 0 {
        report.warn(format!("no task with id {id}"));
    }

    emit_success(
        ctx.output,
        "rm",
        &RemoveReport {
            id: id.to_string(),
            removed,
        },
        &report,
    )
}

pub(crate) async fn run_clear(ctx: &CliContext) -> Result<()> {
    let tasks = ctx.session.tasks();
    let cleared = tasks.get_all().await.len();
    tasks.clear_all().await?;

    let report = Report::new(format!("lazytask clear: {cleared} removed"));
    emit_success(ctx.output, "clear", &ClearReport { cleared }, &report)
}

pub(crate) async fn run_stats(ctx: &CliContext) -> Result<()> {
    let counts = ctx.session.snapshot().await.view.counts;

    let mut report = Report::new(format!(
        "lazytask stats: {}% complete",
        counts.completion_rate_percent
    ));
    report.counts(&counts);

    emit_success(ctx.output, "stats", &counts, &report)
}

/// Parse a deadline given as epoch milliseconds, an RFC 3339 timestamp, or a
/// calendar date (end of that day, UTC).
pub(crate) fn parse_deadline(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if let Ok(ms) = trimmed.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at.timestamp_millis());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
        .map(|at| at.and_utc().timestamp_millis())
        .ok_or_else(|| Error::InvalidDeadline(raw.to_string()))
}
