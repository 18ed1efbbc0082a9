//! # Process Actor
//!
//! Owns every [`OrderProcess`]: one employee working one stage of one group item.
//!
//! ## Dependencies
//!
//! - [`GroupItemClient`]: stage entry, start, finish and abandon
//! - [`QueueClient`]: opens the wait record toward the next stage, closes it on start
//!
//! Finishing a stage does not create the next process; that is left to the
//! caller so that this actor never sends to its own mailbox.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{GroupItemClient, ProcessClient, QueueClient};
use crate::model::{Catalog, OrderProcess};
use crate::notify::Notifier;
use actor_framework::ResourceActor;

#[derive(Clone)]
pub struct ProcessContext {
    pub group_items: GroupItemClient,
    pub queues: QueueClient,
    pub catalog: Catalog,
    pub notifier: Notifier,
    pub default_printer: String,
}

/// Creates a new Process actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderProcess>, ProcessClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, ProcessClient::new(client))
}
