//! Error types for the Process actor.

use crate::group_item_actor::GroupItemError;
use crate::model::{CatalogError, ProcessStatus};
use crate::queue_actor::QueueError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProcessError {
    #[error("Process not found: {0}")]
    NotFound(String),

    #[error("Process must be pending, status is {0:?}")]
    NotPending(ProcessStatus),

    #[error("Process must be started, status is {0:?}")]
    NotStarted(ProcessStatus),

    #[error("Process must be paused, status is {0:?}")]
    NotPaused(ProcessStatus),

    #[error("Process already {0:?}")]
    AlreadyTerminal(ProcessStatus),

    #[error("A cancel reason is required")]
    MissingCancelReason,

    #[error(transparent)]
    GroupItem(#[from] GroupItemError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
