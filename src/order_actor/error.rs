//! Error types for the Order actor.

use crate::model::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Cannot move order from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order has no group items")]
    EmptyOrder,

    #[error("Not every group item is ready")]
    GroupsNotReady,

    #[error("Only delivery orders can be shipped")]
    NotDelivery,

    #[error("Delivery order must be shipped before it is finished")]
    DeliveryNotShipped,

    #[error("Order can only be edited while staging, status is {0:?}")]
    NotStaging(OrderStatus),

    /// Group items can only join an order that has not left the kitchen.
    #[error("Order does not accept group items in status {0:?}")]
    NotOpen(OrderStatus),

    #[error("Invalid payment amount: {0}")]
    InvalidPaymentAmount(Decimal),

    #[error("Order is closed ({0:?})")]
    Closed(OrderStatus),

    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
