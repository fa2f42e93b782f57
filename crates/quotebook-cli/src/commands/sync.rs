//! Sync command handler

use anyhow::{bail, Result};

use quotebook_core::{Config, QuoteWidget};

use crate::output::Output;

/// Reconcile with the remote server now
pub async fn sync(widget: &QuoteWidget, config: &Config, output: &Output) -> Result<()> {
    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotebook config set sync_enabled true"
        );
    }

    output.message(&format!("Fetching quotes from {}...", config.remote_url));

    let merged = widget.sync_quotes().await?;
    if merged.is_empty() {
        output.success("Sync complete - already up to date");
    } else {
        output.success(&format!("Sync complete - {} new quote(s)", merged.len()));
    }

    Ok(())
}

/// Startup reconciliation before read commands; failures never block the command
pub async fn sync_quiet(widget: &QuoteWidget, config: &Config, output: &Output) {
    if !config.sync_enabled {
        return;
    }

    match widget.sync_quotes().await {
        Ok(merged) if !merged.is_empty() => output.notice("Quotes synced from server!"),
        Ok(_) => {}
        Err(e) => {
            if !output.is_quiet() {
                eprintln!("⚠ Auto-sync failed: {}", e);
            }
        }
    }
}
