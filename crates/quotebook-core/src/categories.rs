//! Category index
//!
//! Categories are never stored on their own. They are derived from the
//! current collection every time they are needed.

use std::collections::HashSet;
use std::fmt;

use crate::models::Quote;

/// Sentinel value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// The category filter selected in the UI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote matches
    #[default]
    All,
    /// Only quotes whose category equals this value exactly
    Only(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied filter value
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    /// The persisted form of this filter
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    /// Check whether a quote passes this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => quote.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct categories in first-occurrence order
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|q| seen.insert(q.category.as_str()))
        .map(|q| q.category.clone())
        .collect()
}

/// Categories as offered to the user: the "all" sentinel first
pub fn category_choices(quotes: &[Quote]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(categories(quotes))
        .collect()
}
