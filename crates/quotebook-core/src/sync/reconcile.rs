//! Reconciliation
//!
//! Merges remote quotes into the local store, skipping any whose text is
//! already present. Runs are not serialized against each other: two
//! overlapping runs both fetch, then merge one after the other under the
//! store lock, and the second merge sees what the first one appended.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::client::RemoteSource;
use crate::error::QuoteResult;
use crate::models::Quote;
use crate::store::SharedQuoteStore;

/// Events emitted by the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Remote quotes were appended to the store
    QuotesMerged { count: usize },
}

impl SyncEvent {
    /// Text shown in the notification region
    pub fn notice(&self) -> &'static str {
        match self {
            SyncEvent::QuotesMerged { .. } => "Quotes synced from server!",
        }
    }
}

/// Pulls the remote collection into the local store
#[derive(Clone)]
pub struct Reconciler {
    store: SharedQuoteStore,
    remote: Arc<dyn RemoteSource>,
    event_tx: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl Reconciler {
    pub fn new(store: SharedQuoteStore, remote: Arc<dyn RemoteSource>) -> Self {
        Self {
            store,
            remote,
            event_tx: None,
        }
    }

    /// Send notifications to `event_tx`
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Fetch, merge and notify once
    ///
    /// Returns the quotes that were appended. Only a failed persistence
    /// write is an error; an unreachable remote just merges nothing.
    pub async fn reconcile(&self) -> QuoteResult<Vec<Quote>> {
        // The store lock is not held across the fetch
        let remote = self.remote.fetch_remote().await;
        if remote.is_empty() {
            debug!("Remote returned no quotes");
            return Ok(Vec::new());
        }

        let merged = {
            let mut store = self.store.lock().await;
            store.merge_new(remote)?
        };

        if merged.is_empty() {
            debug!("Remote quotes already present locally");
        } else {
            info!("Quotes synced with server: {} new", merged.len());
            self.emit(SyncEvent::QuotesMerged {
                count: merged.len(),
            });
        }

        Ok(merged)
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}
