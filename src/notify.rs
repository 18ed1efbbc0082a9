//! Operator-display notifications.
//!
//! Fired when a group item is created and when a production stage finishes.
//! Delivery is best effort: with no subscriber the event is dropped.

use crate::model::{GroupItemId, OrderId, ProcessId};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum KitchenEvent {
    GroupItemCreated {
        group_item_id: GroupItemId,
        order_id: OrderId,
        /// First stage name, or the category printer when there is no stage.
        destination: String,
    },
    StageFinished {
        group_item_id: GroupItemId,
        process_id: ProcessId,
        /// Next stage name, or the category printer after the last stage.
        destination: String,
        group_ready: bool,
    },
}

impl KitchenEvent {
    pub fn group_item_id(&self) -> GroupItemId {
        match self {
            KitchenEvent::GroupItemCreated { group_item_id, .. }
            | KitchenEvent::StageFinished { group_item_id, .. } => *group_item_id,
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            KitchenEvent::GroupItemCreated { destination, .. }
            | KitchenEvent::StageFinished { destination, .. } => destination,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<KitchenEvent>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: KitchenEvent) {
        let group_item_id = event.group_item_id();
        let destination = event.destination().to_string();
        match self.tx.send(event) {
            Ok(receivers) => info!(%group_item_id, %destination, receivers, "Notified"),
            Err(_) => debug!(%group_item_id, %destination, "No subscribers"),
        }
    }
}
