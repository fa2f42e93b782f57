//! Storage layer
//!
//! Key-value persistence behind a small trait so the quote store does not
//! care where its bytes end up.
//!
//! ## Backends
//!
//! - **FileStore**: durable, one JSON file per data directory, atomic writes
//! - **MemoryStore**: process-lifetime only; used for session state and tests
//!
//! ## Keys
//!
//! | key                | backend | value                      |
//! |--------------------|---------|----------------------------|
//! | `quotes`           | durable | JSON array of quotes       |
//! | `selectedCategory` | durable | plain string               |
//! | `lastQuote`        | session | JSON quote                 |

pub mod error;
pub mod file;
pub mod memory;

pub use error::{IoOp, StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the serialized quote collection
pub const QUOTES_KEY: &str = "quotes";

/// Key holding the selected category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Key holding the last displayed quote (session storage)
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// String key-value persistence
///
/// Implementations must be safe to share between tasks; every write
/// replaces the previous value for that key.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
