//! Domain entities for the order lifecycle core.
//!
//! Monetary values use `rust_decimal::Decimal`; stock and quantities are
//! unsigned so a negative balance is unrepresentable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Customer account. Read-only for this core; order creation only checks
/// existence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Product with its live stock balance.
///
/// After seeding, `stock` is mutated only by the inventory ledger inside
/// an order transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in currency units (non-negative).
    pub unit_price: Decimal,
    /// On-hand stock.
    pub stock: u32,
}

/// A cart row. Ephemeral: deleted in the same transaction that turns it
/// into an order line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: String,
    /// Owning user; rows belonging to another user never resolve.
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
}

/// An order line frozen at creation time.
///
/// `unit_price` and `subtotal` are snapshots; later price changes on the
/// product must not alter them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Order status. `Pending` is the only state with outgoing transitions;
/// the other three are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Canceled,
    Completed,
    Delivered,
}

impl OrderStatus {
    /// Canonical spellings accepted (case-insensitively) at the boundary.
    pub const VALID_VALUES: &'static [&'static str] =
        &["Pending", "Canceled", "Completed", "Delivered"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Completed => "Completed",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Terminal statuses accept no further transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    /// Case-insensitive, matching what clients already send over the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "canceled" => Ok(OrderStatus::Canceled),
            "completed" => Ok(OrderStatus::Completed),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(()),
        }
    }
}

/// Customer order aggregate. Created atomically with its lines; after
/// creation only the status transition engine mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub lines: Vec<OrderLine>,
    /// Sum of line subtotals, frozen at creation.
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
