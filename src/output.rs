//! Terminal and JSON rendering of command results.
//!
//! Every command hands back a serializable payload plus a [`Report`] for
//! people. With `--json` the payload goes out inside a versioned envelope
//! together with the report's warnings and hints; otherwise the report is
//! printed as text.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{exit_codes, Error, Result};
use crate::task::Task;
use crate::view::TaskCounts;

pub const SCHEMA_VERSION: &str = "lazytask.v1";

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable result of one command
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    fields: Vec<(String, String)>,
    tasks: Vec<String>,
    warnings: Vec<String>,
    hints: Vec<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(&mut self, key: &str, value: impl ToString) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    pub fn counts(&mut self, counts: &TaskCounts) {
        self.field("total", counts.total);
        self.field("pending", counts.pending);
        self.field("completed", counts.completed);
        self.field("rate", format!("{}%", counts.completion_rate_percent));
    }

    pub fn task(&mut self, task: &Task, now_ms: i64) {
        self.tasks.push(task_line(task, now_ms));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Command worth running next
    pub fn hint(&mut self, command: impl Into<String>) {
        self.hints.push(command.into());
    }

    pub fn render(&self) -> String {
        let mut out = self.title.clone();
        for (key, value) in &self.fields {
            out.push_str(&format!("\n  {key}: {value}"));
        }
        if !self.tasks.is_empty() {
            out.push('\n');
            for line in &self.tasks {
                out.push_str(&format!("\n  {line}"));
            }
        }
        for warning in &self.warnings {
            out.push_str(&format!("\nwarning: {warning}"));
        }
        for hint in &self.hints {
            out.push_str(&format!("\nhint: {hint}"));
        }
        out
    }
}

/// One-line rendering: `[x] title (id) due 2024-01-01 00:00 UTC OVERDUE`
pub fn task_line(task: &Task, now_ms: i64) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let mut line = format!("[{mark}] {} ({})", task.title, task.id);
    if let Some(due) = task.deadline {
        line.push_str(" due ");
        line.push_str(&format_timestamp(due));
        if task.is_overdue(now_ms) {
            line.push_str(" OVERDUE");
        }
    }
    line
}

/// Epoch milliseconds as `YYYY-MM-DD HH:MM UTC`
pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    #[serde(flatten)]
    outcome: Outcome<'a, T>,
    #[serde(skip_serializing_if = "is_empty")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    next_steps: &'a [String],
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Outcome<'a, T: Serialize> {
    Success { data: &'a T },
    Error { error: ErrorBody },
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: &Report,
) -> Result<()> {
    if options.json {
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            outcome: Outcome::Success { data },
            warnings: &report.warnings,
            next_steps: &report.hints,
        });
    }
    if !options.quiet {
        println!("{}", report.render());
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hints = error_hints(err);
    if json {
        let code = err.exit_code();
        return print_json(&Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command,
            outcome: Outcome::Error {
                error: ErrorBody {
                    message: err.to_string(),
                    code,
                    kind: if code == exit_codes::USER_ERROR {
                        "user_error"
                    } else {
                        "operation_failed"
                    },
                    details: err.details(),
                },
            },
            warnings: &[],
            next_steps: &hints,
        });
    }

    eprintln!("error: {err}");
    for hint in &hints {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn print_json(payload: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

fn error_hints(err: &Error) -> Vec<String> {
    let hint = match err {
        Error::UnknownSetting(_) => "lazytask settings show",
        Error::InvalidConfig(_) | Error::TomlParse(_) => {
            "fix lazytask.toml in the data directory then retry"
        }
        Error::InvalidDeadline(_) => "lazytask add \"...\" --deadline 2030-01-31",
        Error::Store { .. } | Error::DataDir(_) => {
            "check permissions on the data directory (--data-dir)"
        }
        _ => return Vec::new(),
    };
    vec![hint.to_string()]
}

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

/// Command label for error envelopes, taken from raw args since parsing may
/// be what failed. Settings and theme include their subcommand.
fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter().filter(|arg| !arg.starts_with('-'));

    let Some(command) = args.next() else {
        return "lazytask".to_string();
    };

    if matches!(command.as_str(), "settings" | "theme") {
        if let Some(sub) = args.next() {
            return format!("{command} {sub}");
        }
    }

    command
}
