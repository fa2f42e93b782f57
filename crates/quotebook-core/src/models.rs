//! Data models for Quotebook
//!
//! A quote is a `(text, category)` pair. It has no identifier of its own;
//! the text is what makes two quotes "the same" during reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};

/// A single quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote itself
    pub text: String,
    /// Category used for filtering
    pub category: String,
}

impl Quote {
    /// Create a quote from user input
    ///
    /// Both fields are trimmed and must be non-empty afterwards.
    pub fn new(text: &str, category: &str) -> QuoteResult<Self> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(QuoteError::EmptyText);
        }
        if category.is_empty() {
            return Err(QuoteError::EmptyCategory);
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }
}

/// The collection used when nothing has been persisted yet
pub fn default_quotes() -> Vec<Quote> {
    [
        (
            "The day ended doesn't mean it's the the end",
            "Motivation",
        ),
        ("To be or not to be.", "Philosophy"),
        ("Think different, Work smart", "Inspiration"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}
