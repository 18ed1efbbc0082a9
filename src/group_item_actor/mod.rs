//! # GroupItem Actor
//!
//! Owns every [`GroupItem`] and the [`Item`](crate::model::Item)s inside it.
//!
//! A group item is the only writer of its own totals and stage progress, so
//! concurrent adds against the same group are serialized and a stage can only
//! be entered after the previous one finished.
//!
//! ## Dependencies
//!
//! Calls the order actor (summary sync) and the stock actor (reserve/restore).
//! Neither calls back, which keeps the actor graph acyclic.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::{GroupItemClient, OrderClient, StockClient};
use crate::model::{Catalog, GroupItem, ItemId};
use crate::notify::Notifier;
use actor_framework::ResourceActor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Dependencies injected into the GroupItem actor at `run`.
#[derive(Clone)]
pub struct GroupItemContext {
    pub orders: OrderClient,
    pub stocks: StockClient,
    pub catalog: Catalog,
    pub notifier: Notifier,
    pub default_printer: String,
    item_ids: Arc<AtomicU32>,
}

impl GroupItemContext {
    pub fn new(
        orders: OrderClient,
        stocks: StockClient,
        catalog: Catalog,
        notifier: Notifier,
        default_printer: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            stocks,
            catalog,
            notifier,
            default_printer: default_printer.into(),
            item_ids: Arc::new(AtomicU32::new(1)),
        }
    }

    fn next_item_id(&self) -> ItemId {
        ItemId(self.item_ids.fetch_add(1, Ordering::SeqCst))
    }
}

/// Creates a new GroupItem actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<GroupItem>, GroupItemClient) {
    let (actor, client) = ResourceActor::new(buffer_size);
    (actor, GroupItemClient::new(client))
}
