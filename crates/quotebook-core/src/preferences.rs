//! UI preferences
//!
//! The selected category is durable; the last viewed quote only lives in
//! session storage. Both are best-effort: a failed read restores nothing.

use std::sync::Arc;

use tracing::warn;

use crate::categories::CategoryFilter;
use crate::models::Quote;
use crate::storage::{
    KeyValueStore, StorageError, StorageResult, LAST_QUOTE_KEY, SELECTED_CATEGORY_KEY,
};

/// Selected category and last viewed quote
pub struct Preferences {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// The persisted filter, `All` if none was saved
    pub fn selected_category(&self) -> CategoryFilter {
        match self.durable.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(value)) if !value.is_empty() => CategoryFilter::parse(&value),
            Ok(_) => CategoryFilter::All,
            Err(e) => {
                warn!("Failed to read selected category: {}", e);
                CategoryFilter::All
            }
        }
    }

    pub fn set_selected_category(&self, filter: &CategoryFilter) -> StorageResult<()> {
        self.durable.set(SELECTED_CATEGORY_KEY, filter.as_str())
    }

    /// The quote shown most recently in this session
    pub fn last_viewed(&self) -> Option<Quote> {
        let json = match self.session.get(LAST_QUOTE_KEY) {
            Ok(json) => json?,
            Err(e) => {
                warn!("Failed to read last viewed quote: {}", e);
                return None;
            }
        };

        serde_json::from_str(&json)
            .map_err(|e| warn!("Ignoring unreadable last viewed quote: {}", e))
            .ok()
    }

    pub fn remember_viewed(&self, quote: &Quote) -> StorageResult<()> {
        let json = serde_json::to_string(quote).map_err(StorageError::from)?;
        self.session.set(LAST_QUOTE_KEY, &json)
    }
}
