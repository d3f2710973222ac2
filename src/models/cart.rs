use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CartFailure;

/// One line in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Stable identity, used as the removal key
    pub id: String,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    /// Opaque scheduling label, not interpreted by the store
    pub time: Option<String>,
    pub store_name: Option<String>,
    pub image: Option<String>,
}

/// Phase of the cart lifecycle; exactly one holds at any observed instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CartPhase {
    /// An initial load or refresh is in flight
    Loading,
    /// Items are valid and no failure is pending
    Ready,
    /// The last operation failed; items hold the last known-good snapshot
    Failed { failure: CartFailure },
}

/// The aggregate held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Insertion-ordered line items, no duplicate ids
    pub items: Vec<CartItem>,
    pub phase: CartPhase,
    pub updated_at: DateTime<Utc>,
}

/// Presentation-ready view of a cart with fallbacks resolved and totals precomputed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub total_items: u32,
    pub total_price: Decimal,
    pub loading: bool,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A single line in a [`CartSummary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub time: Option<String>,
    pub store_name: Option<String>,
    pub image: String,
}

impl CartItem {
    /// Create a bare item with only an identity
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            price: None,
            time: None,
            store_name: None,
            image: None,
        }
    }

    /// Create an item with an identity and a price
    pub fn priced(id: impl Into<String>, price: Decimal) -> Self {
        let mut item = Self::new(id);
        item.price = Some(price);
        item
    }

    /// Price used for aggregates: absent or negative amounts count as zero
    pub fn effective_price(&self) -> Decimal {
        match self.price {
            Some(price) if price >= Decimal::ZERO => price,
            _ => Decimal::ZERO,
        }
    }
}

impl CartState {
    /// Create the initial state: empty and loading
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            phase: CartPhase::Loading,
            updated_at: Utc::now(),
        }
    }

    /// Create a ready state holding the given items
    pub fn with_items(items: Vec<CartItem>) -> Self {
        Self {
            items,
            phase: CartPhase::Ready,
            updated_at: Utc::now(),
        }
    }

    /// Number of lines in the cart; each line is one unit
    pub fn total_items(&self) -> u32 {
        self.items.len() as u32
    }

    /// Sum of line prices, missing or malformed prices counting as zero
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::effective_price).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, CartPhase::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, CartPhase::Ready)
    }

    /// Human-readable failure message, if the last operation failed
    pub fn error(&self) -> Option<String> {
        match &self.phase {
            CartPhase::Failed { failure } => Some(failure.to_string()),
            _ => None,
        }
    }

    /// Get a specific item from the cart
    pub fn get_item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }

    /// Remove the item with the given id, returning it with its original
    /// position so a failed persist can roll it back in place
    pub fn remove_item(&mut self, item_id: &str) -> Option<(usize, CartItem)> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        let item = self.items.remove(index);
        self.updated_at = Utc::now();
        Some((index, item))
    }

    /// Reinsert a removed item at its original position (clamped to the
    /// current length), used to roll back a removal whose persist failed
    pub fn restore_item(&mut self, index: usize, item: CartItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.updated_at = Utc::now();
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}
