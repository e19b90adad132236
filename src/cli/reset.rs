//! lazytask reset command implementation

use serde::Serialize;

use crate::cli::CliContext;
use crate::error::Result;
use crate::output::{emit_success, Report};

#[derive(Serialize)]
struct ResetReport {
    tasks_removed: usize,
    data_dir: String,
}

pub(crate) async fn run(ctx: &CliContext) -> Result<()> {
    let tasks_removed = ctx.session.tasks().get_all().await.len();
    ctx.session.reset_app().await?;

    let data_dir = ctx.data_dir.display().to_string();
    let mut report = Report::new("lazytask reset: app has been reset");
    report.field("tasks removed", tasks_removed);
    report.field("data dir", &data_dir);

    emit_success(
        ctx.output,
        "reset",
        &ResetReport {
            tasks_removed,
            data_dir,
        },
        &report,
    )
}
