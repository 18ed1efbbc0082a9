//! Error types for the Queue actor.

use crate::model::QueueId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueueError {
    #[error("Queue not found: {0}")]
    NotFound(String),

    #[error("Queue {0} is already closed")]
    AlreadyClosed(QueueId),

    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
