//! Terminal rendering of dialogs and validation errors

use colored::*;
use std::io::Write;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::forms::{Dialog, DialogKind, SubmitControl, ValidationErrors};

/// How often the progress ticker checks the submit control
pub const PROGRESS_PERIOD: Duration = Duration::from_millis(500);

/// Render a dialog as it is printed to stdout
pub fn format_dialog(dialog: &Dialog) -> String {
    let (marker, title) = match dialog.kind {
        DialogKind::Success => ("✓".bright_green().bold(), dialog.title.bright_green().bold()),
        DialogKind::Error => ("✗".bright_red().bold(), dialog.title.bright_red().bold()),
    };

    let mut out = format!("{} {}\n  {}", marker, title, dialog.message);
    if let Some(follow_up) = dialog.follow_up {
        out.push_str(&format!(
            "\n  {} {}",
            "Next:".dimmed(),
            follow_up.label().cyan()
        ));
    }
    out.push_str(&format!("\n  [{}]", dialog.dismiss_label().dimmed()));
    out
}

pub fn print_dialog(dialog: &Dialog) {
    println!();
    println!("{}", format_dialog(dialog));
}

/// Dialog shown for a failure outside the API call itself (I/O, prompts)
pub fn unexpected_dialog(error: &anyhow::Error) -> Dialog {
    log::error!("{:#}", error);
    Dialog::unexpected()
}

/// Print a dot every `period` while the submit control is disabled.
///
/// Resolves to the number of dots printed once the control is enabled again.
/// The line is left open; [`print_dialog`] ends it.
pub fn spawn_progress(control: SubmitControl, period: Duration) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;

        let mut ticks = 0;
        loop {
            interval.tick().await;
            if control.is_enabled() {
                break;
            }
            print!(".");
            std::io::stdout().flush().ok();
            ticks += 1;
        }
        ticks
    })
}

pub fn print_validation_errors(errors: &ValidationErrors) {
    println!("{}", "Please correct the following:".bright_red().bold());
    for (field, message) in errors.iter() {
        println!("  {} {}", format!("{}:", field.label()).bold(), message);
    }
}
