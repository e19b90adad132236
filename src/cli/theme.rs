//! lazytask theme command implementations.

use crate::cli::CliContext;
use crate::error::Result;
use crate::output::{emit_success, Report};
use crate::theme::{ThemeName, ThemePreferences, TintColor};

pub(crate) async fn run_show(ctx: &CliContext) -> Result<()> {
    let prefs = ctx.session.theme().get().await;
    let report = theme_output("lazytask theme", &prefs);
    emit_success(ctx.output, "theme show", &prefs, &report)
}

pub(crate) async fn run_set(ctx: &CliContext, name: &str) -> Result<()> {
    let theme: ThemeName = name.parse()?;
    let prefs = ctx.session.theme().set_theme(theme).await?;
    let report = theme_output(&format!("lazytask theme set: {theme}"), &prefs);
    emit_success(ctx.output, "theme set", &prefs, &report)
}

pub(crate) async fn run_tint(ctx: &CliContext, color: &str) -> Result<()> {
    let tint: TintColor = color.parse()?;
    let prefs = ctx.session.theme().set_tint_color(tint).await?;
    let report = theme_output(&format!("lazytask theme tint: {tint}"), &prefs);
    emit_success(ctx.output, "theme tint", &prefs, &report)
}

fn theme_output(header: &str, prefs: &ThemePreferences) -> Report {
    let mut report = Report::new(header);
    report.field("theme", prefs.theme);
    report.field("tintColor", prefs.tint_color);
    report
}
