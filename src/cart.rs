//! Cart resolution: turn a client-supplied list of cart item ids into
//! the owning user's cart rows.
//!
//! A requested id that is missing, duplicated, or that belongs to
//! another user makes the whole resolution fail. The cases are
//! deliberately not distinguished, so a caller cannot probe for other
//! users' cart ids.

use crate::models::CartItem;
use crate::storage::{Storage, StorageError};
use redb::WriteTransaction;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("One or more cart items were not found for this user")]
    Mismatch,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Loads and ownership-checks cart rows within an open transaction.
#[derive(Clone)]
pub struct CartResolver {
    storage: Storage,
}

impl CartResolver {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Resolve the requested ids to cart rows owned by `user_id`.
    ///
    /// Each row can satisfy at most one requested id, so the resolved
    /// count is checked against the raw request length and a duplicated
    /// id fails like a missing one.
    pub fn resolve(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        cart_item_ids: &[String],
    ) -> Result<Vec<CartItem>, CartError> {
        let distinct: HashSet<&str> = cart_item_ids.iter().map(String::as_str).collect();

        let mut items = Vec::with_capacity(distinct.len());
        for id in &distinct {
            match self.storage.get_cart_item_txn(txn, id)? {
                Some(item) if item.user_id == user_id => items.push(item),
                _ => {}
            }
        }

        if items.len() != cart_item_ids.len() {
            return Err(CartError::Mismatch);
        }

        Ok(items)
    }
}
