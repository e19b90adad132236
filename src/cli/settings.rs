//! lazytask settings command implementations.

use crate::cli::CliContext;
use crate::error::Result;
use crate::output::{emit_success, Report};
use crate::settings::{AppSettings, Setting, SETTING_KEYS};

pub(crate) async fn run_show(ctx: &CliContext) -> Result<()> {
    let settings = ctx.session.settings().get_all().await;
    let report = settings_output("lazytask settings", &settings);
    emit_success(ctx.output, "settings show", &settings, &report)
}

pub(crate) async fn run_set(ctx: &CliContext, key: &str, value: &str) -> Result<()> {
    let setting = Setting::parse(key, value)?;
    let settings = ctx.session.settings().update_one(setting).await?;

    let current = settings.value_of(setting.key()).unwrap_or_default();
    let mut report = Report::new(format!(
        "lazytask settings set: {} = {current}",
        setting.key()
    ));
    if matches!(setting, Setting::AutoDeleteCompleted(true)) {
        report.warn("autoDeleteCompleted is stored but nothing acts on it yet");
    }

    emit_success(ctx.output, "settings set", &settings, &report)
}

pub(crate) async fn run_reset(ctx: &CliContext) -> Result<()> {
    let settings = ctx.session.settings().reset().await?;
    let report = settings_output("lazytask settings reset: defaults restored", &settings);
    emit_success(ctx.output, "settings reset", &settings, &report)
}

fn settings_output(header: &str, settings: &AppSettings) -> Report {
    let mut report = Report::new(header);
    for key in SETTING_KEYS {
        report.field(key, settings.value_of(key).unwrap_or_default());
    }
    report
}
