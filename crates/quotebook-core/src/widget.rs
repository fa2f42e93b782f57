//! Quote widget
//!
//! The UI-facing facade. It owns the shared store handle, the preferences,
//! the remote client and the reconciler, and hands plain values back to
//! whatever renders them.
//!
//! ## Usage
//!
//! ```ignore
//! let mut widget = QuoteWidget::from_config(&config, session)?;
//!
//! if let Some(quote) = widget.restore_last_viewed() {
//!     render(&quote);
//! }
//!
//! widget.set_filter(CategoryFilter::parse("Philosophy")).await?;
//! let shown = widget.show_random().await;
//! ```

use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::categories::{category_choices, CategoryFilter};
use crate::config::Config;
use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;
use crate::preferences::Preferences;
use crate::storage::{FileStore, KeyValueStore};
use crate::store::{QuoteStore, SharedQuoteStore};
use crate::sync::{HttpRemote, Reconciler, RemoteAck, RemoteSource, SyncEvent};
use crate::transfer;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// The quote on display, `None` when the filter matches nothing
    pub quote: Option<Quote>,
    /// Filter choices, "all" first
    pub categories: Vec<String>,
    /// The active filter
    pub selected: CategoryFilter,
}

/// Result of adding a quote
pub struct AddedQuote {
    pub quote: Quote,
    /// Background push to the remote, if pushing is enabled
    pub push: Option<JoinHandle<Option<RemoteAck>>>,
}

/// Quote collection plus the state around it
pub struct QuoteWidget {
    store: SharedQuoteStore,
    preferences: Preferences,
    remote: Arc<dyn RemoteSource>,
    reconciler: Reconciler,
    selected: CategoryFilter,
    push_enabled: bool,
}

impl QuoteWidget {
    /// Load the collection and restore the saved filter
    ///
    /// A saved filter naming a category that no longer exists restores as
    /// "all".
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteSource>,
    ) -> Self {
        let store = QuoteStore::load(durable.clone());
        let preferences = Preferences::new(durable, session);

        let selected = match preferences.selected_category() {
            CategoryFilter::Only(category) if !store.categories().contains(&category) => {
                debug!("Saved category {:?} no longer exists", category);
                CategoryFilter::All
            }
            filter => filter,
        };

        let store = store.into_shared();
        let reconciler = Reconciler::new(store.clone(), remote.clone());

        Self {
            store,
            preferences,
            remote,
            reconciler,
            selected,
            push_enabled: true,
        }
    }

    /// Build a widget on the configured data directory and remote
    pub fn from_config(config: &Config, session: Arc<dyn KeyValueStore>) -> Result<Self> {
        let durable = Arc::new(FileStore::open(config.storage_path()));
        let remote = Arc::new(HttpRemote::from_config(config)?);

        let mut widget = Self::new(durable, session, remote);
        widget.push_enabled = config.sync_enabled;
        Ok(widget)
    }

    /// Deliver sync notifications to `event_tx`
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        self.reconciler = self.reconciler.with_events(event_tx);
        self
    }

    /// Enable or disable pushing newly added quotes
    pub fn with_push(mut self, enabled: bool) -> Self {
        self.push_enabled = enabled;
        self
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> SharedQuoteStore {
        self.store.clone()
    }

    /// A reconciler over this widget's store, for the background loop
    pub fn reconciler(&self) -> Reconciler {
        self.reconciler.clone()
    }

    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    /// The quote shown last in this session, if any
    pub fn restore_last_viewed(&self) -> Option<Quote> {
        self.preferences.last_viewed()
    }

    /// Pick and display a random quote from the current filter
    pub async fn show_random(&self) -> Option<Quote> {
        let store = self.store.lock().await;
        let quote = {
            let mut rng = rand::rng();
            store.random(&self.selected, &mut rng)
        };
        drop(store);
        self.displayed(quote)
    }

    /// Like `show_random`, with a caller-supplied RNG
    pub async fn show_random_with<R: Rng + Send>(&self, rng: &mut R) -> Option<Quote> {
        let quote = self.store.lock().await.random(&self.selected, rng);
        self.displayed(quote)
    }

    /// Change and persist the filter, then display a quote from it
    ///
    /// Only "all" and categories present in the collection are accepted.
    pub async fn set_filter(&mut self, filter: CategoryFilter) -> QuoteResult<Option<Quote>> {
        if let CategoryFilter::Only(category) = &filter {
            let known = self.store.lock().await.categories().contains(category);
            if !known {
                return Err(QuoteError::UnknownCategory(category.clone()));
            }
        }

        self.preferences.set_selected_category(&filter)?;
        self.selected = filter;
        Ok(self.show_random().await)
    }

    /// Add a quote and push it to the remote in the background
    ///
    /// The push never delays or undoes the local add.
    pub async fn add_quote(&self, text: &str, category: &str) -> QuoteResult<AddedQuote> {
        let quote = self.store.lock().await.add(text, category)?;

        let push = self.push_enabled.then(|| {
            let remote = self.remote.clone();
            let pushed = quote.clone();
            tokio::spawn(async move { remote.push_quote(&pushed).await })
        });

        Ok(AddedQuote { quote, push })
    }

    /// Append every quote from an import document, duplicates included
    pub async fn import(&self, document: &str) -> QuoteResult<usize> {
        let quotes = transfer::parse_import(document)?;
        self.store.lock().await.extend_unchecked(quotes)
    }

    /// The whole collection as a pretty-printed JSON document
    pub async fn export(&self) -> QuoteResult<String> {
        let store = self.store.lock().await;
        transfer::export_quotes(store.all())
    }

    /// Filter choices, "all" first
    pub async fn categories(&self) -> Vec<String> {
        category_choices(self.store.lock().await.all())
    }

    /// Quotes passing `filter`
    pub async fn quotes(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.store.lock().await.by_category(filter)
    }

    /// Reconcile with the remote now
    pub async fn sync_quotes(&self) -> QuoteResult<Vec<Quote>> {
        self.reconciler.reconcile().await
    }

    /// Assemble the view for `quote`
    pub async fn view(&self, quote: Option<Quote>) -> ViewModel {
        ViewModel {
            quote,
            categories: self.categories().await,
            selected: self.selected.clone(),
        }
    }

    fn displayed(&self, quote: Option<Quote>) -> Option<Quote> {
        if let Some(ref quote) = quote {
            if let Err(e) = self.preferences.remember_viewed(quote) {
                warn!("Failed to remember last viewed quote: {}", e);
            }
        }
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, QUOTES_KEY, SELECTED_CATEGORY_KEY};
    use crate::sync::FakeRemote;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Harness {
        widget: QuoteWidget,
        durable: Arc<MemoryStore>,
        session: Arc<MemoryStore>,
        remote: Arc<FakeRemote>,
    }

    fn harness_with(durable: MemoryStore, remote: FakeRemote) -> Harness {
        let durable = Arc::new(durable);
        let session = Arc::new(MemoryStore::new());
        let remote = Arc::new(remote);
        let widget = QuoteWidget::new(durable.clone(), session.clone(), remote.clone());
        Harness {
            widget,
            durable,
            session,
            remote,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new(), FakeRemote::default())
    }

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[tokio::test]
    async fn test_add_pushes_in_background() {
        let h = harness();

        let added = h.widget.add_quote("Stay curious", "Wisdom").await.unwrap();
        let ack = added.push.unwrap().await.unwrap();

        assert_eq!(ack.and_then(|a| a.id), Some(101));
        assert_eq!(
            *h.remote.pushed.lock().unwrap(),
            vec![quote("Stay curious", "Wisdom")]
        );
        assert_eq!(h.widget.quotes(&CategoryFilter::All).await.len(), 4);
    }

    #[tokio::test]
    async fn test_add_without_push() {
        let h = harness();
        let widget = h.widget.with_push(false);

        let added = widget.add_quote("Quiet", "Local").await.unwrap();
        assert!(added.push.is_none());
        assert!(h.remote.pushed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_add_is_not_pushed_or_persisted() {
        let h = harness();

        let err = h.widget.add_quote("", "X").await.err().unwrap();
        assert!(err.is_validation());
        assert_eq!(h.durable.write_count(), 0);
        assert!(h.remote.pushed.lock().unwrap().is_empty());
        assert_eq!(h.widget.store().lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_filter_persists_and_restores() {
        let mut h = harness();

        let shown = h
            .widget
            .set_filter(CategoryFilter::parse("Philosophy"))
            .await
            .unwrap();
        assert_eq!(shown, Some(quote("To be or not to be.", "Philosophy")));
        assert_eq!(
            h.durable.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("Philosophy")
        );

        let reopened = QuoteWidget::new(h.durable.clone(), h.session.clone(), h.remote.clone());
        assert_eq!(
            reopened.selected_category(),
            &CategoryFilter::Only("Philosophy".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_filter_is_rejected() {
        let mut h = harness();

        let err = h
            .widget
            .set_filter(CategoryFilter::parse("Gardening"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, QuoteError::UnknownCategory(ref c) if c == "Gardening"));
        assert!(err.is_validation());
        assert_eq!(h.durable.write_count(), 0);
        assert_eq!(h.widget.selected_category(), &CategoryFilter::All);

        assert!(h.widget.set_filter(CategoryFilter::All).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stale_filter_restores_as_all() {
        let durable = MemoryStore::new().with_entry(SELECTED_CATEGORY_KEY, "Gone");
        let h = harness_with(durable, FakeRemote::default());

        assert_eq!(h.widget.selected_category(), &CategoryFilter::All);
    }

    #[tokio::test]
    async fn test_empty_filter_shows_nothing() {
        let durable = MemoryStore::new().with_entry(QUOTES_KEY, "[]");
        let h = harness_with(durable, FakeRemote::default());

        assert!(h.widget.show_random().await.is_none());
        assert!(h.widget.restore_last_viewed().is_none());
        assert_eq!(h.session.write_count(), 0);
    }

    #[tokio::test]
    async fn test_displayed_quote_is_remembered_for_session() {
        let h = harness();
        let mut rng = StdRng::seed_from_u64(42);

        let shown = h.widget.show_random_with(&mut rng).await.unwrap();
        assert_eq!(h.widget.restore_last_viewed(), Some(shown));
        assert_eq!(h.durable.write_count(), 0);
    }

    #[tokio::test]
    async fn test_import_appends_without_dedup() {
        let h = harness();

        let count = h
            .widget
            .import(r#"[{"text":"B","category":"C"},{"text":"To be or not to be.","category":"Philosophy"}]"#)
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(h.widget.store().lock().await.len(), 5);
    }

    #[tokio::test]
    async fn test_bad_import_changes_nothing() {
        let h = harness();

        assert!(h.widget.import("not json").await.is_err());
        assert!(h.widget.import(r#"{"text":"B"}"#).await.is_err());
        assert_eq!(h.widget.store().lock().await.len(), 3);
        assert_eq!(h.durable.write_count(), 0);
    }

    #[tokio::test]
    async fn test_export_round_trips_through_import() {
        let source = harness();
        source.widget.add_quote("Exported", "Archive").await.unwrap();
        let document = source.widget.export().await.unwrap();

        let target = harness_with(
            MemoryStore::new().with_entry(QUOTES_KEY, "[]"),
            FakeRemote::default(),
        );
        target.widget.import(&document).await.unwrap();

        assert_eq!(
            target.widget.quotes(&CategoryFilter::All).await,
            source.widget.quotes(&CategoryFilter::All).await
        );
    }

    #[tokio::test]
    async fn test_sync_quotes_scenario() {
        let h = harness_with(
            MemoryStore::new(),
            FakeRemote::serving(vec![
                quote("A", "Server-1"),
                quote("The day ended doesn't mean it's the the end", "Server-2"),
            ]),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let widget = h.widget.with_events(tx);

        let merged = widget.sync_quotes().await.unwrap();
        assert_eq!(merged, vec![quote("A", "Server-1")]);
        assert!(widget.sync_quotes().await.unwrap().is_empty());

        assert_eq!(rx.try_recv().unwrap().notice(), "Quotes synced from server!");
        assert!(rx.try_recv().is_err());

        let view = widget.view(None).await;
        assert_eq!(
            view.categories,
            vec!["all", "Motivation", "Philosophy", "Inspiration", "Server-1"]
        );
        assert_eq!(view.selected, CategoryFilter::All);
    }
}
