//! Export and import command handlers

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use quotebook_core::QuoteWidget;

use crate::output::Output;

/// Write the collection to `path`
pub async fn export(widget: &QuoteWidget, path: &Path, output: &Output) -> Result<()> {
    let document = widget.export().await?;
    fs::write(path, document).with_context(|| format!("Failed to write {}", path.display()))?;

    output.success(&format!("Exported quotes to {}", path.display()));
    Ok(())
}

/// Append every quote in the file at `path`
pub async fn import(widget: &QuoteWidget, path: &Path, output: &Output) -> Result<()> {
    let document = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let count = widget.import(&document).await?;
    output.success("Quotes imported successfully!");
    output.message(&format!("  {} quote(s) added", count));
    Ok(())
}
