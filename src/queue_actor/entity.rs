//! [`ActorEntity`] implementation for [`OrderQueue`].

use super::actions::{QueueAction, QueueActionResult};
use super::error::QueueError;
use crate::model::{NoUpdate, OrderQueue, QueueCreate, QueueId};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for OrderQueue {
    type Id = QueueId;
    type Create = QueueCreate;
    type Update = NoUpdate;
    type Action = QueueAction;
    type ActionResult = QueueActionResult;
    type Context = ();
    type Error = QueueError;

    fn from_create_params(id: QueueId, params: QueueCreate) -> Result<Self, Self::Error> {
        Ok(OrderQueue::new(id, params))
    }

    async fn on_update(&mut self, update: NoUpdate, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: QueueAction,
        _ctx: &(),
    ) -> Result<QueueActionResult, Self::Error> {
        match action {
            QueueAction::Close => self.close(Utc::now()).map(QueueActionResult::Close),
        }
    }
}
