//! [`ActorEntity`] implementation for [`Stock`].
//!
//! The stock actor's mailbox is the per-row FIFO: movements are applied in the
//! order their requests were accepted.

use super::actions::{StockAction, StockActionResult};
use super::error::StockError;
use crate::model::{Stock, StockCreate, StockId, StockUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Stock {
    type Id = StockId;
    type Create = StockCreate;
    type Update = StockUpdate;
    type Action = StockAction;
    type ActionResult = StockActionResult;
    type Context = ();
    type Error = StockError;

    fn from_create_params(id: StockId, params: StockCreate) -> Result<Self, Self::Error> {
        Stock::new(id, params, Utc::now())
    }

    async fn on_update(&mut self, update: StockUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.apply_update(update, Utc::now())
    }

    async fn handle_action(
        &mut self,
        action: StockAction,
        _ctx: &(),
    ) -> Result<StockActionResult, Self::Error> {
        let now = Utc::now();
        match action {
            StockAction::Reserve(r) => self.reserve(r, now).map(StockActionResult::Reserve),
            StockAction::Restore(r) => self.restore(r, now).map(StockActionResult::Restore),
            StockAction::AddMovement(m) => {
                self.add_movement(m, now).map(StockActionResult::AddMovement)
            }
            StockAction::RemoveMovement(m) => self
                .remove_movement(m, now)
                .map(StockActionResult::RemoveMovement),
            StockAction::Adjust {
                new_stock,
                reason,
                employee_id,
            } => self
                .adjust(new_stock, reason, employee_id, now)
                .map(StockActionResult::Adjust),
            StockAction::CheckAlerts => Ok(StockActionResult::CheckAlerts(self.check_alerts())),
            StockAction::StockLevel => Ok(StockActionResult::StockLevel(self.stock_level())),
        }
    }
}
