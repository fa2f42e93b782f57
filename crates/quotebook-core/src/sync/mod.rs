//! Remote sync
//!
//! Keeps the local collection in step with a remote quote endpoint.
//!
//! ## Flow
//!
//! 1. `GET` the remote collection, keep the first `fetch_limit` records
//! 2. Map each record to a quote (`title` → text, `userId` → `Server-<id>`)
//! 3. Append the ones whose text is not already stored
//! 4. Notify the UI when anything was merged
//!
//! Locally added quotes are pushed with a single `POST` each. Network
//! failures are logged and otherwise ignored; the next tick retries.
//!
//! ## Usage
//!
//! ```ignore
//! let reconciler = Reconciler::new(store, Arc::new(HttpRemote::from_config(&config)?));
//! let handle = spawn_sync_loop(reconciler, config.sync_interval());
//! handle.sync_now().await;
//! ```

mod client;
mod poller;
mod reconcile;

pub use client::{HttpRemote, RemoteAck, RemoteGroupId, RemoteRecord, RemoteSource};
pub use poller::{spawn_sync_loop, SyncCommand, SyncHandle};
pub use reconcile::{Reconciler, SyncEvent};

#[cfg(test)]
pub(crate) use reconcile::tests::FakeRemote;
