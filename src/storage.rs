//! redb-backed store for users, products, cart items and orders.
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `users` | `user_id` | JSON-serialized `User` |
//! | `products` | `product_id` | JSON-serialized `Product` |
//! | `cart_items` | `cart_item_id` | JSON-serialized `CartItem` |
//! | `orders` | `order_id` | JSON-serialized `Order` |
//!
//! # Transactions
//!
//! All order/inventory mutations run inside one `WriteTransaction`: the
//! stock delta, the order row and the cart deletions commit together or
//! not at all. A transaction dropped without `commit()` discards every
//! staged change. redb admits a single writer at a time, so concurrent
//! stock checks always observe committed state.

use crate::models::{CartItem, Order, Product, User};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const CART_ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart_items");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Entity store backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open or create the database at the given path.
    ///
    /// redb commits with `Durability::Immediate`: once `commit()` returns
    /// the data survives power loss, and the file is always in a
    /// consistent state.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an ephemeral in-memory database (tests, demos).
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables up front so read transactions never race a
        // missing table.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(CART_ITEMS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction. Blocks until any other writer finishes.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Users ==========

    /// Insert or replace a user.
    pub fn put_user(&self, user: &User) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(USERS_TABLE)?;
            let value = serde_json::to_vec(user)?;
            table.insert(user.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up a user within a write transaction.
    pub fn get_user_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Option<User>> {
        let table = txn.open_table(USERS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Products ==========

    /// Insert or replace a product (seeding and catalog maintenance).
    pub fn put_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.put_product_txn(&txn, product)?;
        txn.commit()?;
        Ok(())
    }

    /// Write a product within an open transaction (ledger debit/credit).
    pub fn put_product_txn(
        &self,
        txn: &WriteTransaction,
        product: &Product,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let value = serde_json::to_vec(product)?;
        table.insert(product.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Look up a product within a write transaction.
    pub fn get_product_txn(
        &self,
        txn: &WriteTransaction,
        product_id: &str,
    ) -> StorageResult<Option<Product>> {
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a product (read-only).
    pub fn get_product(&self, product_id: &str) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a product from the catalog. Returns whether it existed.
    ///
    /// Catalog maintenance, paired with [`Storage::put_product`].
    /// Existing orders keep their line snapshots; canceling one skips
    /// the stock credit for the removed product.
    pub fn delete_product(&self, product_id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            table.remove(product_id)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    // ========== Cart items ==========

    /// Insert or replace a cart row.
    pub fn put_cart_item(&self, item: &CartItem) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_ITEMS_TABLE)?;
            let value = serde_json::to_vec(item)?;
            table.insert(item.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Look up a cart row within a write transaction.
    pub fn get_cart_item_txn(
        &self,
        txn: &WriteTransaction,
        cart_item_id: &str,
    ) -> StorageResult<Option<CartItem>> {
        let table = txn.open_table(CART_ITEMS_TABLE)?;
        match table.get(cart_item_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Delete a consumed cart row within an open transaction.
    pub fn delete_cart_item_txn(
        &self,
        txn: &WriteTransaction,
        cart_item_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(CART_ITEMS_TABLE)?;
        table.remove(cart_item_id)?;
        Ok(())
    }

    /// All cart rows owned by a user (read-only).
    pub fn get_cart_items_for_user(&self, user_id: &str) -> StorageResult<Vec<CartItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_ITEMS_TABLE)?;

        let mut items = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let item: CartItem = serde_json::from_slice(value.value())?;
            if item.user_id == user_id {
                items.push(item);
            }
        }
        Ok(items)
    }

    // ========== Orders ==========

    /// Write an order (insert or status update) within an open transaction.
    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Look up an order within a write transaction.
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an order (read-only).
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All orders, oldest first.
    pub fn get_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// All orders owned by a user, oldest first.
    pub fn get_orders_for_user(&self, user_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.user_id == user_id {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Administrative removal of an order. Returns whether it existed.
    pub fn delete_order(&self, order_id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            table.remove(order_id)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }
}
