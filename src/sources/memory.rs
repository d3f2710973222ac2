use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::models::{CartItem, SourceError, SourceResult};
use crate::sources::CartSource;

/// In-memory implementation of the [`CartSource`] trait.
///
/// Backs offline and demo sessions, and serves as the integration-test
/// source. Items can be replaced wholesale with [`set_items`] to emulate a
/// backend whose cart changed underneath the store.
///
/// [`set_items`]: InMemoryCartSource::set_items
pub struct InMemoryCartSource {
    items: RwLock<Vec<CartItem>>,
}

impl InMemoryCartSource {
    /// Create an empty in-memory cart source
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Create a source seeded with the given items
    pub fn with_items(items: Vec<CartItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Replace the authoritative item list
    pub async fn set_items(&self, items: Vec<CartItem>) {
        let mut guard = self.items.write().await;
        *guard = items;
    }

    /// Current authoritative item list
    pub async fn items(&self) -> Vec<CartItem> {
        self.items.read().await.clone()
    }
}

impl Default for InMemoryCartSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartSource for InMemoryCartSource {
    #[instrument(skip(self))]
    async fn load_cart(&self) -> SourceResult<Vec<CartItem>> {
        let items = self.items.read().await.clone();
        info!(item_count = items.len(), "Loaded cart items");
        Ok(items)
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn persist_removal(&self, item_id: &str) -> SourceResult<()> {
        let mut items = self.items.write().await;

        let original_len = items.len();
        items.retain(|item| item.id != item_id);

        if items.len() == original_len {
            return Err(SourceError::NotFound);
        }

        info!(remaining = items.len(), "Persisted item removal");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_load_returns_seeded_items() {
        let source = InMemoryCartSource::with_items(vec![
            CartItem::priced("a", dec!(100000)),
            CartItem::priced("b", dec!(50000)),
        ]);

        let items = source.load_cart().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
    }

    #[tokio::test]
    async fn test_persist_removal_deletes_item() {
        let source = InMemoryCartSource::with_items(vec![
            CartItem::priced("a", dec!(100000)),
            CartItem::priced("b", dec!(50000)),
        ]);

        source.persist_removal("a").await.unwrap();

        let items = source.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
    }

    #[tokio::test]
    async fn test_persist_removal_of_absent_item() {
        let source = InMemoryCartSource::new();

        let result = source.persist_removal("ghost").await;

        match result {
            Err(SourceError::NotFound) => {}
            other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_set_items_replaces_list() {
        let source = InMemoryCartSource::with_items(vec![CartItem::new("a")]);

        source.set_items(vec![CartItem::new("x"), CartItem::new("y")]).await;

        let items = source.load_cart().await.unwrap();
        let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}
