//! Order lifecycle: creation from cart items and guarded status
//! transitions with inventory compensation.

pub mod error;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use service::OrderService;

#[cfg(test)]
mod tests;
