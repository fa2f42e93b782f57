//! JSON export and import
//!
//! Export is the collection as a pretty-printed JSON array. Import accepts
//! any JSON array of quote objects and appends it as-is: no deduplication,
//! no emptiness checks. Reading and writing the actual files is left to
//! the caller.

use serde_json::Value;

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;

/// Default file name for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Serialize quotes for download
pub fn export_quotes(quotes: &[Quote]) -> QuoteResult<String> {
    serde_json::to_string_pretty(quotes).map_err(QuoteError::Serialization)
}

/// Parse an import document
///
/// The document must be a JSON array. Every element must have string
/// `text` and `category` fields; their contents are not checked.
pub fn parse_import(document: &str) -> QuoteResult<Vec<Quote>> {
    let value: Value = serde_json::from_str(document).map_err(QuoteError::InvalidImport)?;

    let Value::Array(items) = value else {
        return Err(QuoteError::ImportNotSequence);
    };

    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Quote>, _>>()
        .map_err(QuoteError::InvalidImport)
}
