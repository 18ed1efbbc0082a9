//! Error types for the Stock actor.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during stock operations.
///
/// A failed operation never records a movement and leaves the stock untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    #[error("Stock not found: {0}")]
    NotFound(String),

    /// Zero or negative quantity, or a negative absolute level.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        requested: Decimal,
        available: Decimal,
    },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
