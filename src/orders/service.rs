//! Order assembly and status transitions.
//!
//! Both mutating operations run inside a single `WriteTransaction`:
//! create debits stock, inserts the order and deletes the consumed cart
//! rows together; cancel credits stock and writes the status together.
//! Notifications go out only after the commit succeeds.

use crate::cart::CartResolver;
use crate::inventory::InventoryLedger;
use crate::models::{Order, OrderLine, OrderStatus};
use crate::notify::{Notifier, NotifyEvent};
use crate::orders::error::{OrderError, OrderResult};
use crate::storage::{Storage, StorageError};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderService {
    storage: Storage,
    ledger: InventoryLedger,
    carts: CartResolver,
    notifier: Notifier,
}

impl OrderService {
    pub fn new(storage: Storage, notifier: Notifier) -> Self {
        let ledger = InventoryLedger::new(storage.clone());
        let carts = CartResolver::new(storage.clone());
        Self {
            storage,
            ledger,
            carts,
            notifier,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Turn a user's cart items into a `Pending` order.
    ///
    /// Stock debits, the order insert and the cart row deletions commit
    /// atomically. Any failure leaves the store exactly as it was.
    pub fn create_order(&self, user_id: &str, cart_item_ids: &[String]) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;

        if self.storage.get_user_txn(&txn, user_id)?.is_none() {
            return Err(OrderError::UserNotFound(user_id.to_string()));
        }

        let items = self.carts.resolve(&txn, user_id, cart_item_ids)?;

        let mut lines = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;
        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    cart_item_id: item.id.clone(),
                });
            }

            let product = self
                .ledger
                .check_and_debit(&txn, &item.product_id, item.quantity)?;

            let subtotal = product.unit_price * Decimal::from(item.quantity);
            total += subtotal;
            lines.push(OrderLine {
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                unit_price: product.unit_price,
                subtotal,
            });
        }

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            lines,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        self.storage.put_order_txn(&txn, &order)?;
        for item in &items {
            self.storage.delete_cart_item_txn(&txn, &item.id)?;
        }

        txn.commit().map_err(StorageError::from)?;

        info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total,
            lines = order.lines.len(),
            "Order created"
        );

        self.notifier.broadcast(NotifyEvent::OrderCreated {
            order_id: order.id.clone(),
            total: order.total,
            created_at: order.created_at,
        });

        Ok(order)
    }

    /// Transition an order out of `Pending`.
    ///
    /// The raw status string is parsed case-insensitively before any
    /// store access. Cancellation credits every line's stock back in the
    /// same transaction as the status write; a finalized order rejects
    /// further transitions, so stock cannot be credited twice.
    pub fn change_status(&self, order_id: &str, new_status: &str) -> OrderResult<Order> {
        let status: OrderStatus =
            new_status
                .parse()
                .map_err(|_| OrderError::InvalidStatus {
                    given: new_status.to_string(),
                    valid: OrderStatus::VALID_VALUES,
                })?;

        let txn = self.storage.begin_write()?;

        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if order.status.is_terminal() {
            return Err(OrderError::OrderFinalized {
                order_id: order.id,
                status: order.status,
            });
        }

        if status == OrderStatus::Canceled {
            for line in &order.lines {
                self.ledger.credit(&txn, &line.product_id, line.quantity)?;
            }
        }

        order.status = status;
        self.storage.put_order_txn(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        info!(
            order_id = %order.id,
            status = %order.status,
            "Order status changed"
        );

        if matches!(status, OrderStatus::Completed | OrderStatus::Delivered) {
            self.notifier.broadcast(NotifyEvent::StatusChanged {
                order_id: order.id.clone(),
                status,
            });
        }

        Ok(order)
    }

    pub fn get_order(&self, order_id: &str) -> OrderResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    pub fn list_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.storage.get_all_orders()?)
    }

    pub fn list_orders_by_user(&self, user_id: &str) -> OrderResult<Vec<Order>> {
        Ok(self.storage.get_orders_for_user(user_id)?)
    }

    /// Administrative removal. Does not compensate inventory; cancel the
    /// order first if its stock should return.
    pub fn delete_order(&self, order_id: &str) -> OrderResult<()> {
        if !self.storage.delete_order(order_id)? {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }
        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }
}
