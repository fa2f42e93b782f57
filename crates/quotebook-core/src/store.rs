//! Quote store
//!
//! The `QuoteStore` owns the in-memory collection and writes all of it to
//! durable storage after every mutation. There are no partial writes: the
//! `quotes` key always holds the complete collection.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::load(storage);  // defaults if nothing stored
//!
//! store.add("Know thyself", "Wisdom")?;
//!
//! let wisdom = store.by_category(&CategoryFilter::parse("Wisdom"));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::categories::{self, CategoryFilter};
use crate::error::{QuoteError, QuoteResult};
use crate::models::{default_quotes, Quote};
use crate::storage::{KeyValueStore, QUOTES_KEY};

/// Store handle shared between the UI and the sync tasks
pub type SharedQuoteStore = Arc<Mutex<QuoteStore>>;

/// Ordered quote collection backed by key-value persistence
pub struct QuoteStore {
    /// Insertion order is display and export order
    quotes: Vec<Quote>,
    /// Durable storage
    storage: Arc<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Load the persisted collection
    ///
    /// Falls back to the default quotes when nothing is stored, the stored
    /// value cannot be parsed, or the read fails. Never writes.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let quotes = match storage.get(QUOTES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Quote>>(&json) {
                Ok(quotes) => quotes,
                Err(e) => {
                    warn!("Stored quotes are unreadable, using defaults: {}", e);
                    default_quotes()
                }
            },
            Ok(None) => default_quotes(),
            Err(e) => {
                warn!("Failed to read stored quotes, using defaults: {}", e);
                default_quotes()
            }
        };

        debug!("Loaded {} quotes", quotes.len());
        Self { quotes, storage }
    }

    /// Wrap the store for sharing across tasks
    pub fn into_shared(self) -> SharedQuoteStore {
        Arc::new(Mutex::new(self))
    }

    /// Add a quote from user input
    ///
    /// Rejects blank text or category without touching the collection or
    /// storage. On success the full collection is persisted.
    pub fn add(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        let quote = Quote::new(text, category)?;

        let previous_len = self.quotes.len();
        self.quotes.push(quote.clone());
        self.commit(previous_len)?;

        Ok(quote)
    }

    /// Append the quotes whose text is not already in the collection
    ///
    /// Presence is checked against the collection as it is right now, not
    /// against the other incoming quotes. Returns what was appended; storage
    /// is only written when that is non-empty.
    pub fn merge_new(&mut self, incoming: Vec<Quote>) -> QuoteResult<Vec<Quote>> {
        let fresh: Vec<Quote> = {
            let existing: HashSet<&str> = self.quotes.iter().map(|q| q.text.as_str()).collect();
            incoming
                .into_iter()
                .filter(|q| !existing.contains(q.text.as_str()))
                .collect()
        };

        if fresh.is_empty() {
            return Ok(fresh);
        }

        let previous_len = self.quotes.len();
        self.quotes.extend(fresh.iter().cloned());
        self.commit(previous_len)?;

        Ok(fresh)
    }

    /// Append quotes verbatim, without deduplication or validation
    pub fn extend_unchecked(&mut self, quotes: Vec<Quote>) -> QuoteResult<usize> {
        let count = quotes.len();
        let previous_len = self.quotes.len();
        self.quotes.extend(quotes);
        self.commit(previous_len)?;
        Ok(count)
    }

    /// The whole collection
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quotes passing `filter`, in collection order
    pub fn by_category(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    /// Pick a random quote passing `filter`
    pub fn random<R: Rng + ?Sized>(&self, filter: &CategoryFilter, rng: &mut R) -> Option<Quote> {
        let candidates: Vec<&Quote> = self.quotes.iter().filter(|q| filter.matches(q)).collect();
        candidates.choose(rng).map(|q| (*q).clone())
    }

    /// Distinct categories in first-occurrence order
    pub fn categories(&self) -> Vec<String> {
        categories::categories(&self.quotes)
    }

    /// Check whether a quote with exactly this text exists
    pub fn contains_text(&self, text: &str) -> bool {
        self.quotes.iter().any(|q| q.text == text)
    }

    /// Number of quotes
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Write the whole collection to storage
    pub fn persist(&self) -> QuoteResult<()> {
        let json = serde_json::to_string(&self.quotes).map_err(QuoteError::Serialization)?;
        self.storage.set(QUOTES_KEY, &json)?;
        Ok(())
    }

    /// Persist, or roll the collection back to `previous_len` on failure
    fn commit(&mut self, previous_len: usize) -> QuoteResult<()> {
        if let Err(e) = self.persist() {
            self.quotes.truncate(previous_len);
            return Err(e);
        }
        Ok(())
    }
}
