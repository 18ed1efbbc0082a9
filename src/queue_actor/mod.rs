//! # Queue Actor
//!
//! Owns the [`OrderQueue`] records written between consecutive production stages.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::QueueClient;
use crate::model::OrderQueue;
use actor_framework::ResourceActor;

/// Creates a new Queue actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderQueue>, QueueClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, QueueClient::new(client))
}
