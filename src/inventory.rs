//! Inventory ledger: the only code allowed to change product stock
//! after seeding.
//!
//! Both operations run inside a caller-owned `WriteTransaction`, so a
//! debit only becomes visible together with the order that caused it.

use crate::models::Product;
use crate::storage::{Storage, StorageError};
use redb::WriteTransaction;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Insufficient stock for product '{product_name}' ({product_id})")]
    InsufficientStock {
        product_id: String,
        product_name: String,
    },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Stock debit/credit over the product table.
#[derive(Clone)]
pub struct InventoryLedger {
    storage: Storage,
}

impl InventoryLedger {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Verify availability and debit stock in one step.
    ///
    /// Fails without writing when `quantity` exceeds the on-hand stock.
    /// Returns the product as read, so callers can snapshot its name and
    /// price from the same state the debit saw.
    pub fn check_and_debit(
        &self,
        txn: &WriteTransaction,
        product_id: &str,
        quantity: u32,
    ) -> Result<Product, LedgerError> {
        let mut product = self
            .storage
            .get_product_txn(txn, product_id)?
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.to_string()))?;

        if quantity > product.stock {
            return Err(LedgerError::InsufficientStock {
                product_id: product.id,
                product_name: product.name,
            });
        }

        let snapshot = product.clone();
        product.stock -= quantity;
        self.storage.put_product_txn(txn, &product)?;

        Ok(snapshot)
    }

    /// Credit stock back, e.g. when an order is canceled.
    ///
    /// A dangling product reference (product deleted since the order was
    /// placed) is skipped with a warning rather than failing the
    /// cancellation.
    pub fn credit(
        &self,
        txn: &WriteTransaction,
        product_id: &str,
        quantity: u32,
    ) -> Result<Option<Product>, LedgerError> {
        let Some(mut product) = self.storage.get_product_txn(txn, product_id)? else {
            warn!(
                product_id = %product_id,
                quantity = quantity,
                "Skipping stock credit: product no longer exists"
            );
            return Ok(None);
        };

        product.stock = product.stock.saturating_add(quantity);
        self.storage.put_product_txn(txn, &product)?;

        Ok(Some(product))
    }
}
