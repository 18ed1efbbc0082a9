//! [`ActorEntity`] implementation for [`GroupItem`].
//!
//! Side effects on other actors run after local validation and before the
//! local change is committed. When a later step fails, the framework restores
//! the group from its snapshot and stock taken in an earlier step is released
//! with a compensating movement.

use super::actions::{GroupItemAction, GroupItemActionResult};
use super::error::GroupItemError;
use super::GroupItemContext;
use crate::clients::StockClient;
use crate::model::{
    AdditionalItem, EmployeeId, GroupItem, GroupItemCreate, GroupItemId, Item, NoUpdate,
    ProductId, Reservation, StockId,
};
use crate::notify::KitchenEvent;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;

/// One stock-tracked line: the item's own product or one of its additional items.
#[derive(Debug, Clone)]
struct StockLine {
    stock_id: StockId,
    quantity: Decimal,
    unit_price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Reserve,
    Restore,
}

impl Direction {
    fn reverse(self) -> Self {
        match self {
            Direction::Reserve => Direction::Restore,
            Direction::Restore => Direction::Reserve,
        }
    }
}

fn additional_line(additional: &AdditionalItem) -> Option<StockLine> {
    additional.stock_id.map(|stock_id| StockLine {
        stock_id,
        quantity: additional.quantity,
        unit_price: additional.price,
    })
}

fn item_lines(item: &Item) -> Vec<StockLine> {
    let own = item.stock_id.map(|stock_id| StockLine {
        stock_id,
        quantity: item.quantity,
        unit_price: item.price,
    });
    own.into_iter()
        .chain(item.additional_items.iter().filter_map(additional_line))
        .collect()
}

impl GroupItem {
    async fn sync_order(&self, ctx: &GroupItemContext) -> Result<bool, GroupItemError> {
        Ok(ctx.orders.sync_group(self.order_id, self.summary()).await?)
    }

    async fn move_stock(
        &self,
        stocks: &StockClient,
        lines: &[StockLine],
        direction: Direction,
        employee_id: Option<EmployeeId>,
    ) -> Result<(), GroupItemError> {
        for line in lines {
            let reservation = Reservation {
                quantity: line.quantity,
                order_id: Some(self.order_id),
                employee_id,
                unit_price: line.unit_price,
                total_price: line.unit_price * line.quantity,
            };
            match direction {
                Direction::Reserve => stocks.reserve(line.stock_id, reservation).await?,
                Direction::Restore => stocks.restore(line.stock_id, reservation).await?,
            };
        }
        Ok(())
    }

    /// Reverts stock moved by a step whose follow-up failed.
    async fn compensate(
        &self,
        ctx: &GroupItemContext,
        lines: &[StockLine],
        done: Direction,
        employee_id: Option<EmployeeId>,
    ) {
        if let Err(e) = self
            .move_stock(&ctx.stocks, lines, done.reverse(), employee_id)
            .await
        {
            warn!(group_item_id = %self.id, error = %e, "Stock compensation failed");
        }
    }

    /// Pushes the summary to the order; on failure, undoes `lines` moved in `done` direction.
    async fn commit(
        &self,
        ctx: &GroupItemContext,
        lines: &[StockLine],
        done: Direction,
        employee_id: Option<EmployeeId>,
    ) -> Result<bool, GroupItemError> {
        match self.sync_order(ctx).await {
            Ok(order_ready) => Ok(order_ready),
            Err(e) => {
                self.compensate(ctx, lines, done, employee_id).await;
                Err(e)
            }
        }
    }

    fn distinct_products(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.items.iter().map(|i| i.product_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[async_trait]
impl ActorEntity for GroupItem {
    type Id = GroupItemId;
    type Create = GroupItemCreate;
    type Update = NoUpdate;
    type Action = GroupItemAction;
    type ActionResult = GroupItemActionResult;
    type Context = GroupItemContext;
    type Error = GroupItemError;

    fn from_create_params(id: GroupItemId, params: GroupItemCreate) -> Result<Self, Self::Error> {
        Ok(GroupItem::new(id, params, Utc::now()))
    }

    /// Registers the group with its order and announces it to the first stage.
    async fn on_create(&mut self, ctx: &GroupItemContext) -> Result<(), Self::Error> {
        ctx.catalog.category(self.category_id)?;
        ctx.orders.attach_group(self.order_id, self.summary()).await?;
        ctx.notifier.emit(KitchenEvent::GroupItemCreated {
            group_item_id: self.id,
            order_id: self.order_id,
            destination: ctx
                .catalog
                .destination_after(self.category_id, 0, &ctx.default_printer),
        });
        Ok(())
    }

    async fn on_update(&mut self, update: NoUpdate, _ctx: &GroupItemContext) -> Result<(), Self::Error> {
        match update {}
    }

    /// Only empty groups are deleted; their summary is removed from the order.
    async fn on_delete(&self, ctx: &GroupItemContext) -> Result<(), Self::Error> {
        if !self.items.is_empty() {
            return Err(GroupItemError::NotEmpty);
        }
        ctx.orders.detach_group(self.order_id, self.id).await?;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: GroupItemAction,
        ctx: &GroupItemContext,
    ) -> Result<GroupItemActionResult, Self::Error> {
        let now = Utc::now();
        match action {
            GroupItemAction::AddItem(new) => {
                let product = ctx.catalog.product(new.product_id)?;
                let item = Item::from_product(ctx.next_item_id(), &product, new.quantity, new.observation);
                self.check_item(&item)?;

                let lines = item_lines(&item);
                self.move_stock(&ctx.stocks, &lines, Direction::Reserve, new.employee_id)
                    .await?;
                let item_id = item.id;
                self.add_item(item)?;
                self.commit(ctx, &lines, Direction::Reserve, new.employee_id)
                    .await?;
                Ok(GroupItemActionResult::AddItem(item_id))
            }
            GroupItemAction::RemoveItem {
                item_id,
                employee_id,
            } => {
                let (removed, group_empty) = self.remove_item(item_id)?;
                let lines = item_lines(&removed);
                self.move_stock(&ctx.stocks, &lines, Direction::Restore, employee_id)
                    .await?;
                self.commit(ctx, &lines, Direction::Restore, employee_id)
                    .await?;
                Ok(GroupItemActionResult::RemoveItem {
                    removed,
                    group_empty,
                })
            }
            GroupItemAction::AddAdditionalItem {
                item_id,
                product_id,
                quantity,
            } => {
                if quantity <= Decimal::ZERO {
                    return Err(GroupItemError::InvalidQuantity(quantity));
                }
                let product = ctx.catalog.product(product_id)?;
                let additional = AdditionalItem::from_product(&product, quantity);
                self.item_mut(item_id)?;

                let lines: Vec<StockLine> = additional_line(&additional).into_iter().collect();
                self.move_stock(&ctx.stocks, &lines, Direction::Reserve, None)
                    .await?;
                self.item_mut(item_id)?.add_additional(additional);
                self.calculate_total_price();
                self.commit(ctx, &lines, Direction::Reserve, None).await?;
                Ok(GroupItemActionResult::AddAdditionalItem)
            }
            GroupItemAction::RemoveAdditionalItem {
                item_id,
                product_id,
            } => {
                let removed = self
                    .item_mut(item_id)?
                    .remove_additional(product_id)
                    .ok_or(GroupItemError::AdditionalItemNotFound {
                        item: item_id,
                        product: product_id,
                    })?;
                self.calculate_total_price();

                let lines: Vec<StockLine> = additional_line(&removed).into_iter().collect();
                self.move_stock(&ctx.stocks, &lines, Direction::Restore, None)
                    .await?;
                self.commit(ctx, &lines, Direction::Restore, None).await?;
                Ok(GroupItemActionResult::RemoveAdditionalItem)
            }
            GroupItemAction::AddRemovedIngredient { item_id, name } => Ok(
                GroupItemActionResult::AddRemovedIngredient(
                    self.item_mut(item_id)?.add_removed_ingredient(&name),
                ),
            ),
            GroupItemAction::RemoveRemovedIngredient { item_id, name } => Ok(
                GroupItemActionResult::RemoveRemovedIngredient(
                    self.item_mut(item_id)?.remove_removed_ingredient(&name),
                ),
            ),
            GroupItemAction::SetComplement { product_id } => {
                let product = ctx.catalog.product(product_id)?;
                let complement =
                    Item::from_product(ctx.next_item_id(), &product, Decimal::ZERO, None);
                self.set_complement(complement)?;
                self.sync_order(ctx).await?;
                Ok(GroupItemActionResult::SetComplement)
            }
            GroupItemAction::RemoveComplement => {
                if self.remove_complement()?.is_some() {
                    self.sync_order(ctx).await?;
                }
                Ok(GroupItemActionResult::RemoveComplement)
            }
            GroupItemAction::Pend => {
                let category = ctx.catalog.category(self.category_id)?;
                let changed = self.pend(category.allow_fractional_quantity, now)?;
                if changed {
                    self.sync_order(ctx).await?;
                }
                Ok(GroupItemActionResult::Pend(changed))
            }
            GroupItemAction::Start => {
                let changed = self.start(now)?;
                if changed {
                    self.sync_order(ctx).await?;
                }
                Ok(GroupItemActionResult::Start(changed))
            }
            GroupItemAction::Ready => {
                let changed = self.ready(now)?;
                let order_ready = changed && self.sync_order(ctx).await?;
                Ok(GroupItemActionResult::Ready {
                    changed,
                    order_ready,
                })
            }
            GroupItemAction::Cancel => {
                let lines: Vec<StockLine> = self.items.iter().flat_map(item_lines).collect();
                if !self.cancel(now)? {
                    return Ok(GroupItemActionResult::Cancel(false));
                }
                self.move_stock(&ctx.stocks, &lines, Direction::Restore, None)
                    .await?;
                self.commit(ctx, &lines, Direction::Restore, None).await?;
                Ok(GroupItemActionResult::Cancel(true))
            }
            GroupItemAction::CalculateTotalPrice => {
                let (quantity, total_price) = self.calculate_total_price();
                Ok(GroupItemActionResult::CalculateTotalPrice {
                    quantity,
                    total_price,
                })
            }
            GroupItemAction::CanAddItems => {
                Ok(GroupItemActionResult::CanAddItems(self.can_add_items()))
            }
            GroupItemAction::EnterStage {
                rule_id,
                process_id,
            } => {
                let rule = ctx.catalog.rule(rule_id)?;
                let expected = ctx
                    .catalog
                    .next_rule(self.category_id, self.last_finished_order);
                self.enter_stage(&rule, expected.as_ref(), process_id)?;
                Ok(GroupItemActionResult::EnterStage(self.distinct_products()))
            }
            GroupItemAction::StartStage(process_id) => {
                let before = self.status;
                self.start_stage(process_id, now)?;
                if self.status != before {
                    self.sync_order(ctx).await?;
                }
                Ok(GroupItemActionResult::StartStage)
            }
            GroupItemAction::FinishStage(process_id) => {
                let current = self
                    .active_stage
                    .as_ref()
                    .filter(|a| a.process_id == process_id)
                    .map(|a| a.order)
                    .ok_or(GroupItemError::StageNotActive(process_id))?;
                let next = ctx.catalog.next_rule(self.category_id, current);
                let mut outcome = self.finish_stage(process_id, next, now)?;
                if outcome.group_ready {
                    outcome.order_ready = self.sync_order(ctx).await?;
                }
                Ok(GroupItemActionResult::FinishStage(outcome))
            }
            GroupItemAction::AbandonStage(process_id) => Ok(GroupItemActionResult::AbandonStage(
                self.abandon_stage(process_id),
            )),
        }
    }
}
