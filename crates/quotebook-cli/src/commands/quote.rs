//! Quote command handlers

use anyhow::Result;

use quotebook_core::{CategoryFilter, QuoteWidget};

use crate::output::Output;

/// Show a random quote from the saved filter
pub async fn show(widget: &QuoteWidget, output: &Output) -> Result<()> {
    let quote = widget.show_random().await;
    output.print_quote(quote.as_ref());
    Ok(())
}

/// Add a quote and wait for the remote push to settle
pub async fn add(widget: &QuoteWidget, text: &str, category: &str, output: &Output) -> Result<()> {
    let added = widget.add_quote(text, category).await?;
    output.success("New quote added!");

    if let Some(push) = added.push {
        match push.await {
            Ok(Some(_)) => output.message("Quote posted to server"),
            Ok(None) => output.message("Could not reach the server; the quote is saved locally"),
            Err(e) => tracing::warn!("Push task failed: {}", e),
        }
    }

    Ok(())
}

/// List quotes, optionally restricted to one category
pub async fn list(widget: &QuoteWidget, category: Option<String>, output: &Output) -> Result<()> {
    let filter = category
        .as_deref()
        .map(CategoryFilter::parse)
        .unwrap_or_else(|| widget.selected_category().clone());

    output.print_quotes(&widget.quotes(&filter).await);
    Ok(())
}

/// List the filter choices
pub async fn categories(widget: &QuoteWidget, output: &Output) -> Result<()> {
    let choices = widget.categories().await;
    output.print_categories(&choices, widget.selected_category());
    Ok(())
}

/// Persist a new filter and show a quote from it
pub async fn filter(widget: &mut QuoteWidget, category: &str, output: &Output) -> Result<()> {
    let quote = widget.set_filter(CategoryFilter::parse(category)).await?;
    output.print_quote(quote.as_ref());
    Ok(())
}
