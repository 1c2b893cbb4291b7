//! `upload` command: preview a spreadsheet, confirm, post it

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input};
use dialoguer::theme::ColorfulTheme;
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{MerchantApi, MerchantClient, UploadFile};
use crate::cli::output::{PROGRESS_PERIOD, print_dialog, spawn_progress, unexpected_dialog};
use crate::config::Config;
use crate::forms::{BulkUploadForm, Dialog, DialogKind};
use crate::sheet::preview;

/// Read a spreadsheet from disk as an upload
pub fn read_upload_file(path: &Path) -> Result<UploadFile> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(file_name, bytes))
}

/// Handle the upload command. Returns whether the last upload succeeded.
pub async fn handle_upload_command(
    path: &Path,
    yes: bool,
    rows: Option<usize>,
    config: &Config,
) -> Result<bool> {
    let interactive = std::io::stdin().is_terminal();
    if !yes && !interactive {
        anyhow::bail!("Refusing to upload without confirmation; pass --yes when stdin is not a terminal");
    }

    let theme = ColorfulTheme::default();
    let client = Arc::new(MerchantClient::new(&config.api)?);
    let mut form = BulkUploadForm::new(client, rows.unwrap_or(config.preview_rows));
    let mut path = path.to_path_buf();

    loop {
        let dialog = match attempt_upload(&mut form, &path, yes, &theme).await {
            Some(dialog) => dialog,
            None => {
                println!("Upload cancelled.");
                return Ok(false);
            }
        };
        print_dialog(&dialog);

        if !interactive {
            return Ok(dialog.is_success());
        }
        let prompt = match (dialog.kind, dialog.follow_up) {
            (DialogKind::Success, Some(follow_up)) => format!("{}?", follow_up.label()),
            (DialogKind::Success, None) => return Ok(true),
            (DialogKind::Error, _) => format!("{} with another file?", dialog.dismiss_label()),
        };
        let again = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        if !again {
            return Ok(dialog.is_success());
        }

        let next: String = Input::with_theme(&theme)
            .with_prompt("Spreadsheet path")
            .with_initial_text(path.display().to_string())
            .interact_text()?;
        path = PathBuf::from(next.trim());
    }
}

/// One pass through [`upload_once`]; errors outside the API call become the generic dialog
async fn attempt_upload<A: MerchantApi>(
    form: &mut BulkUploadForm<A>,
    path: &Path,
    yes: bool,
    theme: &ColorfulTheme,
) -> Option<Dialog> {
    match upload_once(form, path, yes, theme).await {
        Ok(dialog) => dialog,
        Err(e) => Some(unexpected_dialog(&e)),
    }
}

/// Select, preview, confirm and submit one file. None when the user declines.
async fn upload_once<A: MerchantApi>(
    form: &mut BulkUploadForm<A>,
    path: &Path,
    yes: bool,
    theme: &ColorfulTheme,
) -> Result<Option<Dialog>> {
    let file = read_upload_file(path)?;
    let sample = match form.select_file(file) {
        Ok(sample) => sample,
        Err(dialog) => return Ok(Some(dialog)),
    };

    println!("{}", "Data Preview".bold());
    println!("{}", preview::render_table(sample));
    println!("{}", preview::footer(form.preview().len(), form.row_count()).dimmed());

    if !yes {
        let confirmed = Confirm::with_theme(theme)
            .with_prompt(format!("Upload {} row(s)?", form.row_count()))
            .default(true)
            .interact()?;
        if !confirmed {
            form.reset();
            return Ok(None);
        }
    }

    print!("Uploading {}", path.display().to_string().cyan());
    let ticker = spawn_progress(form.control(), PROGRESS_PERIOD);
    let dialog = form.submit().await;
    ticker.await.ok();
    Ok(Some(dialog))
}
