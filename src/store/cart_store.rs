use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::models::{
    normalize_snapshot, validate_item_id, CartFailure, CartItem, CartLine, CartPhase, CartState,
    CartSummary, SourceError,
};
use crate::sources::CartSource;

/// Owner of cart state.
///
/// Holds the single authoritative [`CartState`] and exposes snapshot queries
/// plus the two mutations, `refresh` and `remove_item`. All mutation results
/// are applied under one write lock, which is never held across a data source
/// await, so readers always observe one of the three phases with items and
/// aggregates consistent.
///
/// Failures never escape as panics or error returns; they land in the state's
/// phase where every consumer finds them in one place.
pub struct CartStore {
    store_id: Uuid,
    source: Arc<dyn CartSource>,
    config: StoreConfig,
    inner: RwLock<Inner>,
    /// Monotonically increasing refresh token; the newest issued refresh is
    /// the only one allowed to apply its result
    refresh_seq: AtomicU64,
}

struct Inner {
    state: CartState,
    /// Bumped per applied snapshot; guards removal rollback against
    /// reinserting into a newer snapshot
    snapshot_generation: u64,
}

impl CartStore {
    /// Create a store over the given source with default settings
    pub fn new(source: Arc<dyn CartSource>) -> Self {
        Self::with_config(source, StoreConfig::default())
    }

    /// Create a store over the given source with explicit settings
    pub fn with_config(source: Arc<dyn CartSource>, config: StoreConfig) -> Self {
        Self {
            store_id: Uuid::new_v4(),
            source,
            config,
            inner: RwLock::new(Inner {
                state: CartState::new(),
                snapshot_generation: 0,
            }),
            refresh_seq: AtomicU64::new(0),
        }
    }

    /// Instance id carried in this store's tracing spans
    pub fn store_id(&self) -> Uuid {
        self.store_id
    }

    /// Current state: items plus phase
    pub async fn snapshot(&self) -> CartState {
        self.inner.read().await.state.clone()
    }

    /// Current line items in display order
    pub async fn items(&self) -> Vec<CartItem> {
        self.inner.read().await.state.items.clone()
    }

    /// Number of lines in the cart
    pub async fn total_items(&self) -> u32 {
        self.inner.read().await.state.total_items()
    }

    /// Sum of line prices, missing prices counting as zero
    pub async fn total_price(&self) -> Decimal {
        self.inner.read().await.state.total_price()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.state.is_loading()
    }

    /// Failure message from the last operation, if any
    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.state.error()
    }

    /// Presentation-ready view with the configured name and image fallbacks
    /// applied and totals precomputed
    pub async fn summary(&self) -> CartSummary {
        let inner = self.inner.read().await;
        let state = &inner.state;

        let items = state
            .items
            .iter()
            .map(|item| CartLine {
                id: item.id.clone(),
                name: item
                    .name
                    .clone()
                    .unwrap_or_else(|| self.config.fallback_item_label.clone()),
                price: item.effective_price(),
                time: item.time.clone(),
                store_name: item.store_name.clone(),
                image: item
                    .image
                    .clone()
                    .unwrap_or_else(|| self.config.default_image_asset.clone()),
            })
            .collect();

        CartSummary {
            items,
            total_items: state.total_items(),
            total_price: state.total_price(),
            loading: state.is_loading(),
            error: state.error(),
            updated_at: state.updated_at,
        }
    }

    /// Reload the cart from the data source.
    ///
    /// Enters the loading phase, fetches the authoritative list, normalizes
    /// it, and applies it. A refresh issued while another is in flight
    /// supersedes it: the older refresh's result, success or failure, is
    /// discarded when it lands. On failure the previous items are kept so
    /// callers can render the last known-good snapshot alongside the error.
    #[instrument(skip(self), fields(store_id = %self.store_id))]
    pub async fn refresh(&self) {
        let token = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        info!(token, "Refreshing cart");

        {
            let mut inner = self.inner.write().await;
            inner.state.phase = CartPhase::Loading;
            inner.state.updated_at = Utc::now();
        }

        let result = self.source.load_cart().await;

        let mut inner = self.inner.write().await;
        if self.refresh_seq.load(Ordering::SeqCst) != token {
            debug!(token, "Refresh superseded, discarding result");
            return;
        }

        match result {
            Ok(snapshot) => {
                let items = normalize_snapshot(snapshot, self.config.max_snapshot_items);
                info!(token, item_count = items.len(), "Cart refreshed");
                inner.state.items = items;
                inner.state.phase = CartPhase::Ready;
                inner.snapshot_generation += 1;
            }
            Err(source_error) => {
                warn!(token, %source_error, "Cart refresh failed, keeping last known items");
                inner.state.phase = CartPhase::Failed {
                    failure: CartFailure::load(&source_error),
                };
            }
        }
        inner.state.updated_at = Utc::now();
    }

    /// Remove one line item and persist the removal.
    ///
    /// Absent ids are a no-op, so the operation is idempotent. The item is
    /// removed locally first; if the source then fails to persist, the item
    /// is restored at its original position and the failure recorded in
    /// state. A source reporting the item already gone counts as committed.
    ///
    /// Callers are expected to have confirmed the removal with the user
    /// before invoking this; once committed it is irreversible.
    #[instrument(skip(self), fields(store_id = %self.store_id, item_id = %item_id))]
    pub async fn remove_item(&self, item_id: &str) {
        if let Err(validation_error) = validate_item_id(item_id) {
            warn!(%validation_error, "Ignoring removal with invalid item id");
            return;
        }

        let (index, removed, generation) = {
            let mut inner = self.inner.write().await;
            match inner.state.remove_item(item_id) {
                Some((index, item)) => (index, item, inner.snapshot_generation),
                None => {
                    debug!("Item not in cart, nothing to remove");
                    return;
                }
            }
        };

        match self.source.persist_removal(item_id).await {
            Ok(()) => {
                self.commit_removal().await;
            }
            Err(SourceError::NotFound) => {
                // The source no longer had the item; the cart and the source
                // agree, so the removal stands.
                warn!("Source reported item already absent");
                self.commit_removal().await;
            }
            Err(source_error) => {
                warn!(%source_error, "Failed to persist removal, rolling back");
                let mut inner = self.inner.write().await;
                if inner.snapshot_generation == generation {
                    inner.state.restore_item(index, removed);
                } else {
                    debug!("Newer snapshot applied during removal, skipping rollback");
                }
                inner.state.phase = CartPhase::Failed {
                    failure: CartFailure::removal(item_id, &source_error),
                };
                inner.state.updated_at = Utc::now();
            }
        }
    }

    async fn commit_removal(&self) {
        let mut inner = self.inner.write().await;
        // A committed removal proves the source reachable, so any stale
        // failure is cleared along with it.
        inner.state.phase = CartPhase::Ready;
        inner.state.updated_at = Utc::now();
        info!(remaining = inner.state.items.len(), "Item removed from cart");
    }
}
