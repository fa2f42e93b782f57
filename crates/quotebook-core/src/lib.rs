//! Quotebook Core Library
//!
//! This crate provides the core functionality for Quotebook, a local quote
//! collection that is periodically reconciled against a remote source.
//!
//! # Architecture
//!
//! - **Key-value storage**: durable state (`quotes`, `selectedCategory`)
//!   and session state (`lastQuote`) live behind [`KeyValueStore`]
//! - **Quote store**: the in-memory collection, persisted in full after
//!   every mutation
//! - **Sync**: HTTP fetch/push plus a reconciliation loop that merges
//!   remote quotes by exact text
//!
//! # Quick Start
//!
//! ```text
//! let mut widget = QuoteWidget::from_config(&config, Arc::new(MemoryStore::new()))?;
//!
//! // Add a quote (pushed to the remote in the background)
//! let added = widget.add_quote("Stay hungry", "Motivation").await?;
//!
//! // Pull remote quotes on demand
//! let merged = widget.sync_quotes().await?;
//! ```
//!
//! # Modules
//!
//! - `widget`: UI-facing facade (main entry point)
//! - `store`: the quote collection and its persistence
//! - `models`: the `Quote` record and default set
//! - `categories`: category derivation and filters
//! - `preferences`: selected category and last viewed quote
//! - `transfer`: JSON export/import
//! - `storage`: key-value persistence backends
//! - `sync`: remote client and reconciliation
//! - `config`: application configuration

pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod preferences;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod widget;

pub use categories::{categories, category_choices, CategoryFilter, ALL_CATEGORIES};
pub use config::Config;
pub use error::{QuoteError, QuoteResult};
pub use models::{default_quotes, Quote};
pub use preferences::Preferences;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{QuoteStore, SharedQuoteStore};
pub use widget::{AddedQuote, QuoteWidget, ViewModel};
