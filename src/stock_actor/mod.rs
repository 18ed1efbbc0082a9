//! # Stock Actor
//!
//! Owns every [`Stock`] row and its movement ledger. Has no dependencies.
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Stock`]
//! - [`error`] - [`StockError`]
//! - [`actions`] - [`StockAction`] and [`StockActionResult`]

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::StockClient;
use crate::model::Stock;
use actor_framework::ResourceActor;

/// Creates a new Stock actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Stock>, StockClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, StockClient::new(client))
}
