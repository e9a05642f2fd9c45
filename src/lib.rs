//! Order lifecycle and inventory consistency core.
//!
//! Turns a user's cart items into orders with frozen prices, keeps
//! product stock consistent under concurrency, and drives the order
//! status state machine with compensating stock credits on cancel.
//!
//! # Modules
//!
//! - [`models`] - domain entities and the [`models::OrderStatus`] enum
//! - [`storage`] - redb-backed transactional store
//! - [`inventory`] - stock debit/credit ledger
//! - [`cart`] - cart item resolution with ownership checks
//! - [`orders`] - order assembly and status transitions
//! - [`notify`] - post-commit broadcast notifications
//! - [`config`] / [`logger`] - runtime configuration and tracing setup
//!
//! # Example
//!
//! ```no_run
//! use order_engine::{Notifier, OrderService, Storage};
//!
//! # fn main() -> anyhow::Result<()> {
//! let storage = Storage::open("orders.redb")?;
//! let service = OrderService::new(storage, Notifier::new());
//!
//! let order = service.create_order("user-1", &["cart-1".to_string()])?;
//! service.change_status(&order.id, "Completed")?;
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod config;
pub mod inventory;
pub mod logger;
pub mod models;
pub mod notify;
pub mod orders;
pub mod storage;

pub use config::Config;
pub use models::{CartItem, Order, OrderLine, OrderStatus, Product, User};
pub use notify::{Notifier, NotifyEvent};
pub use orders::{OrderError, OrderResult, OrderService};
pub use storage::{Storage, StorageError, StorageResult};
