//! `template` command: save the bulk upload template

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::sheet::write_template;

pub fn handle_template_command(output: &Path) -> Result<()> {
    write_template(output)?;
    println!(
        "Template saved to: {}",
        output.display().to_string().bright_green()
    );
    println!("Fill in one merchant per row, then run `merchant-cli upload <FILE>`.");
    Ok(())
}
