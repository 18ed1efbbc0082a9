//! [`ActorEntity`] implementation for [`Order`].

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Order::new(id, params, Utc::now()))
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.apply_update(update)
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<OrderActionResult, Self::Error> {
        let now = Utc::now();
        match action {
            OrderAction::AttachGroup(summary) => {
                self.attach_group(summary)?;
                Ok(OrderActionResult::AttachGroup)
            }
            OrderAction::SyncGroup(summary) => Ok(OrderActionResult::SyncGroup {
                order_ready: self.sync_group(summary, now),
            }),
            OrderAction::DetachGroup(id) => Ok(OrderActionResult::DetachGroup(self.detach_group(id))),
            OrderAction::Launch => {
                self.launch(now)?;
                Ok(OrderActionResult::Launch)
            }
            OrderAction::Ready => self.ready(now).map(OrderActionResult::Ready),
            OrderAction::Ship => {
                self.ship(now)?;
                Ok(OrderActionResult::Ship)
            }
            OrderAction::Finish => {
                self.finish(now)?;
                Ok(OrderActionResult::Finish)
            }
            OrderAction::Cancel => self.cancel(now).map(OrderActionResult::Cancel),
            OrderAction::Archive => self.archive(now).map(OrderActionResult::Archive),
            OrderAction::AddPayment { amount, method } => self
                .add_payment(amount, method, now)
                .map(OrderActionResult::AddPayment),
            OrderAction::UpdateTotal => Ok(OrderActionResult::UpdateTotal(self.update_total())),
        }
    }
}
