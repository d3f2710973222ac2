use async_trait::async_trait;

use crate::models::{CartItem, SourceResult};

/// Trait defining the interface for cart data access operations.
///
/// The store depends only on these two contracts; transport and storage are
/// the implementor's concern.
#[async_trait]
pub trait CartSource: Send + Sync {
    /// Fetch the authoritative list of cart line items
    async fn load_cart(&self) -> SourceResult<Vec<CartItem>>;

    /// Persist the removal of a single line item
    async fn persist_removal(&self, item_id: &str) -> SourceResult<()>;
}
