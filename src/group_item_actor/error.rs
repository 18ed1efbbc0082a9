//! Error types for the GroupItem actor.

use crate::model::{CatalogError, CategoryId, GroupItemStatus, ItemId, ProcessId, ProductId};
use crate::order_actor::OrderError;
use crate::stock_actor::StockError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during group item operations.
///
/// The `#[from]` variants carry failures of the catalog, order and stock calls
/// a group item makes while mutating.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GroupItemError {
    #[error("Group item not found: {0}")]
    NotFound(String),

    #[error("Category mismatch: group is {expected}, got {got}")]
    CategoryMismatch { expected: CategoryId, got: CategoryId },

    #[error("Size mismatch: group is {expected:?}, got {got:?}")]
    SizeMismatch {
        expected: Option<String>,
        got: Option<String>,
    },

    #[error("Group item no longer accepts items (status {0:?})")]
    NotStaging(GroupItemStatus),

    #[error("Group item must be staging or pending, status is {0:?}")]
    NotStagingOrPending(GroupItemStatus),

    #[error("Quantity {0} is not a whole number")]
    QuantityNotInteger(Decimal),

    #[error("Group item must be pending, status is {0:?}")]
    NotPending(GroupItemStatus),

    #[error("Group item must be started, status is {0:?}")]
    NotStarted(GroupItemStatus),

    #[error("Group item is already ready")]
    AlreadyReady,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Additional item {product} not found on item {item}")]
    AdditionalItemNotFound { item: ItemId, product: ProductId },

    #[error("Group item still has items")]
    NotEmpty,

    #[error("Group item is not in production (status {0:?})")]
    NotInProduction(GroupItemStatus),

    #[error("Stage held by process {0} is still in progress")]
    StageInProgress(ProcessId),

    #[error("Stage out of order: expected {expected:?}, got {got}")]
    StageOutOfOrder { expected: Option<u32>, got: u32 },

    #[error("Process {0} does not hold a started stage of this group item")]
    StageNotActive(ProcessId),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
