use crate::cart::CartError;
use crate::inventory::LedgerError;
use crate::models::OrderStatus;
use crate::storage::StorageError;
use thiserror::Error;

/// Failures surfaced by the order service. Every business failure is
/// detected before commit, so a returned error means nothing was
/// persisted by that call.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("One or more cart items were not found for this user")]
    CartMismatch,

    #[error("Insufficient stock for product '{product_name}' ({product_id})")]
    InsufficientStock {
        product_id: String,
        product_name: String,
    },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Cart item '{cart_item_id}' has an invalid quantity")]
    InvalidQuantity { cart_item_id: String },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid status '{given}'. Valid statuses are: {}", .valid.join(", "))]
    InvalidStatus {
        given: String,
        valid: &'static [&'static str],
    },

    #[error("Order '{order_id}' is already {status} and cannot change status")]
    OrderFinalized {
        order_id: String,
        status: OrderStatus,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<LedgerError> for OrderError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock {
                product_id,
                product_name,
            } => OrderError::InsufficientStock {
                product_id,
                product_name,
            },
            LedgerError::ProductNotFound(id) => OrderError::ProductNotFound(id),
            LedgerError::Storage(e) => OrderError::Storage(e),
        }
    }
}

impl From<CartError> for OrderError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Mismatch => OrderError::CartMismatch,
            CartError::Storage(e) => OrderError::Storage(e),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
