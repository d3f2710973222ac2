use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::warn;

use super::{CartItem, ValidationError, ValidationResult};

/// Validation constants
pub const MAX_ITEM_ID_LENGTH: usize = 100;
pub const DEFAULT_MAX_SNAPSHOT_ITEMS: usize = 100;

/// Validate a cart item id used as a removal key
pub fn validate_item_id(item_id: &str) -> ValidationResult<()> {
    let trimmed = item_id.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "item_id".to_string(),
        });
    }

    if trimmed.len() > MAX_ITEM_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "item_id".to_string(),
            max_length: MAX_ITEM_ID_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidValue {
            field: "item_id".to_string(),
            value: item_id.to_string(),
            reason: "Contains control characters".to_string(),
        });
    }

    Ok(())
}

/// Normalize a snapshot fetched from a source before it becomes cart state.
///
/// Entries with empty ids are dropped, duplicate ids collapse to the first
/// occurrence keeping insertion order, and negative prices are cleared so
/// aggregates coerce them to zero. Snapshots larger than `max_items` are
/// truncated.
pub fn normalize_snapshot(items: Vec<CartItem>, max_items: usize) -> Vec<CartItem> {
    let mut seen_ids = HashSet::new();
    let mut normalized = Vec::with_capacity(items.len().min(max_items));

    for mut item in items {
        if item.id.trim().is_empty() {
            warn!("Dropping cart item with empty id");
            continue;
        }

        if !seen_ids.insert(item.id.clone()) {
            warn!(item_id = %item.id, "Dropping cart item with duplicate id");
            continue;
        }

        if let Some(price) = item.price {
            if price < Decimal::ZERO {
                warn!(item_id = %item.id, %price, "Clearing negative price");
                item.price = None;
            }
        }

        if normalized.len() == max_items {
            warn!(max_items, "Snapshot exceeds item limit, truncating");
            break;
        }

        normalized.push(item);
    }

    normalized
}
