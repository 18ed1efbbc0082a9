//! [`ActorEntity`] implementation for [`OrderProcess`].
//!
//! Every transition that touches the group item goes through the group item
//! actor before the process commits its own status. A queue opened ahead of a
//! finish is discarded when the group item rejects the finish.

use super::actions::{FinishOutcome, ProcessAction, ProcessActionResult};
use super::error::ProcessError;
use super::ProcessContext;
use crate::model::{NoUpdate, OrderProcess, ProcessCreate, ProcessId, ProcessStatus, QueueCreate, QueueId};
use crate::notify::KitchenEvent;
use actor_framework::{ActorClient, ActorEntity};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

impl OrderProcess {
    /// Drops a queue opened for a finish that did not go through.
    async fn discard_queue(&self, ctx: &ProcessContext, queue_id: Option<QueueId>) {
        let Some(queue_id) = queue_id else { return };
        if let Err(e) = ctx.queues.delete(queue_id).await {
            warn!(process_id = %self.id, %queue_id, error = %e, "Queue discard failed");
        }
    }
}

#[async_trait]
impl ActorEntity for OrderProcess {
    type Id = ProcessId;
    type Create = ProcessCreate;
    type Update = NoUpdate;
    type Action = ProcessAction;
    type ActionResult = ProcessActionResult;
    type Context = ProcessContext;
    type Error = ProcessError;

    fn from_create_params(id: ProcessId, params: ProcessCreate) -> Result<Self, Self::Error> {
        Ok(OrderProcess::new(id, params, Utc::now()))
    }

    /// Binds the stage on the group item; rejected when out of order.
    async fn on_create(&mut self, ctx: &ProcessContext) -> Result<(), Self::Error> {
        self.product_ids = ctx
            .group_items
            .enter_stage(self.group_item_id, self.rule_id, self.id)
            .await?;
        Ok(())
    }

    async fn on_update(&mut self, update: NoUpdate, _ctx: &ProcessContext) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: ProcessAction,
        ctx: &ProcessContext,
    ) -> Result<ProcessActionResult, Self::Error> {
        let now = Utc::now();
        match action {
            ProcessAction::Start { employee_id } => {
                self.ensure_pending()?;
                ctx.group_items.start_stage(self.group_item_id, self.id).await?;
                if let Some(queue_id) = self.queue_id {
                    let waited = ctx.queues.close(queue_id).await?;
                    info!(process_id = %self.id, %queue_id, waited_secs = waited.num_seconds(), "Left queue");
                }
                self.start(employee_id, now)?;
                Ok(ProcessActionResult::Start)
            }
            ProcessAction::Pause => {
                self.pause(now)?;
                Ok(ProcessActionResult::Pause)
            }
            ProcessAction::Continue => self.resume(now).map(ProcessActionResult::Continue),
            ProcessAction::Finish => {
                let duration = self.finish(now)?;

                // The queue toward the next stage opens first, so a rejected
                // open leaves the group's stage untouched.
                let queue_id = match ctx.catalog.next_rule(self.category_id, self.rule_order) {
                    Some(next) => Some(
                        ctx.queues
                            .open(QueueCreate {
                                group_item_id: self.group_item_id,
                                category_id: self.category_id,
                                from_rule: self.rule_id,
                                to_rule: next.id,
                                joined_at: now,
                            })
                            .await?,
                    ),
                    None => None,
                };
                let stage = match ctx
                    .group_items
                    .finish_stage(self.group_item_id, self.id)
                    .await
                {
                    Ok(stage) => stage,
                    Err(e) => {
                        self.discard_queue(ctx, queue_id).await;
                        return Err(e.into());
                    }
                };
                let queue_id = match &stage.next_rule {
                    Some(_) => queue_id,
                    None => {
                        self.discard_queue(ctx, queue_id).await;
                        None
                    }
                };

                ctx.notifier.emit(KitchenEvent::StageFinished {
                    group_item_id: self.group_item_id,
                    process_id: self.id,
                    destination: ctx.catalog.destination_after(
                        self.category_id,
                        self.rule_order,
                        &ctx.default_printer,
                    ),
                    group_ready: stage.group_ready,
                });

                Ok(ProcessActionResult::Finish(FinishOutcome {
                    group_item_id: self.group_item_id,
                    next_rule: stage.next_rule,
                    queue_id,
                    group_ready: stage.group_ready,
                    order_ready: stage.order_ready,
                    duration,
                }))
            }
            ProcessAction::Cancel { reason } => {
                let waiting = self.status == ProcessStatus::Pending;
                self.cancel(&reason, now)?;
                ctx.group_items
                    .abandon_stage(self.group_item_id, self.id)
                    .await?;
                if let Some(queue_id) = self.queue_id.filter(|_| waiting) {
                    ctx.queues.close(queue_id).await?;
                    info!(process_id = %self.id, %queue_id, "Queue closed by cancel");
                }
                Ok(ProcessActionResult::Cancel)
            }
        }
    }
}
