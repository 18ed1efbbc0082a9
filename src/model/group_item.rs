//! The unit of production: line items sharing a category and size, moving
//! through `Staging → Pending → Started → Ready` (or `Canceled`).

use crate::group_item_actor::GroupItemError;
use crate::model::catalog::ProcessRule;
use crate::model::ids::{CategoryId, GroupItemId, ItemId, OrderId, ProcessId, RuleId};
use crate::model::item::Item;
use crate::model::order::GroupSummary;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupItemStatus {
    Staging,
    Pending,
    Started,
    Ready,
    Canceled,
}

/// The stage a group item is currently in. Set when the stage's process is
/// created, marked started when that process starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStage {
    pub rule_id: RuleId,
    pub order: u32,
    pub process_id: ProcessId,
    pub started: bool,
}

/// Result of finishing the active stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    /// The stage to create next, `None` when the finished stage was the last one.
    pub next_rule: Option<ProcessRule>,
    pub group_ready: bool,
    pub order_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    pub id: GroupItemId,
    pub order_id: OrderId,
    pub category_id: CategoryId,
    pub size: Option<String>,
    pub status: GroupItemStatus,
    pub quantity: Decimal,
    /// Set on pend when the category does not allow fractional quantities;
    /// later adds and removes must keep the quantity whole.
    #[serde(default)]
    pub whole_quantity: bool,
    pub total_price: Decimal,
    pub items: Vec<Item>,
    pub complement: Option<Item>,
    /// Order index of the last finished stage, 0 before the first one.
    pub last_finished_order: u32,
    pub active_stage: Option<ActiveStage>,
    pub created_at: DateTime<Utc>,
    pub pending_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct GroupItemCreate {
    pub order_id: OrderId,
    pub category_id: CategoryId,
    pub size: Option<String>,
}

impl GroupItem {
    pub fn new(id: GroupItemId, params: GroupItemCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_id: params.order_id,
            category_id: params.category_id,
            size: params.size,
            status: GroupItemStatus::Staging,
            quantity: Decimal::ZERO,
            whole_quantity: false,
            total_price: Decimal::ZERO,
            items: Vec::new(),
            complement: None,
            last_finished_order: 0,
            active_stage: None,
            created_at: now,
            pending_at: None,
            started_at: None,
            ready_at: None,
            canceled_at: None,
        }
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            id: self.id,
            category_id: self.category_id,
            size: self.size.clone(),
            status: self.status,
            quantity: self.quantity,
            total_price: self.total_price,
        }
    }

    pub fn can_add_items(&self) -> bool {
        matches!(
            self.status,
            GroupItemStatus::Staging | GroupItemStatus::Pending
        )
    }

    fn items_quantity(&self) -> Decimal {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Recomputes every item total, then the group quantity and total.
    /// Idempotent; canceled groups report zero.
    pub fn calculate_total_price(&mut self) -> (Decimal, Decimal) {
        if self.status == GroupItemStatus::Canceled {
            self.quantity = Decimal::ZERO;
            self.total_price = Decimal::ZERO;
            return (self.quantity, self.total_price);
        }
        let mut total: Decimal = self.items.iter_mut().map(Item::calculate_total).sum();
        if let Some(complement) = self.complement.as_mut() {
            total += complement.calculate_total();
        }
        self.quantity = self.items_quantity();
        self.total_price = total;
        (self.quantity, self.total_price)
    }

    /// Validation half of [`add_item`](Self::add_item); never mutates.
    pub fn check_item(&self, item: &Item) -> Result<(), GroupItemError> {
        if item.quantity <= Decimal::ZERO {
            return Err(GroupItemError::InvalidQuantity(item.quantity));
        }
        if item.category_id != self.category_id {
            return Err(GroupItemError::CategoryMismatch {
                expected: self.category_id,
                got: item.category_id,
            });
        }
        if item.size != self.size {
            return Err(GroupItemError::SizeMismatch {
                expected: self.size.clone(),
                got: item.size.clone(),
            });
        }
        if !self.can_add_items() {
            return Err(GroupItemError::NotStaging(self.status));
        }
        self.ensure_whole(self.items_quantity() + item.quantity)
    }

    fn ensure_whole(&self, quantity_after: Decimal) -> Result<(), GroupItemError> {
        if self.status == GroupItemStatus::Pending
            && self.whole_quantity
            && !quantity_after.fract().is_zero()
        {
            return Err(GroupItemError::QuantityNotInteger(quantity_after));
        }
        Ok(())
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), GroupItemError> {
        self.check_item(&item)?;
        if let Some(complement) = self.complement.as_mut() {
            complement.quantity += item.quantity;
        }
        self.items.push(item);
        self.calculate_total_price();
        Ok(())
    }

    /// Returns the removed item and whether the group is now empty (and should be deleted).
    pub fn remove_item(&mut self, item_id: ItemId) -> Result<(Item, bool), GroupItemError> {
        if !self.can_add_items() {
            return Err(GroupItemError::NotStagingOrPending(self.status));
        }
        let position = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or(GroupItemError::ItemNotFound(item_id))?;
        self.ensure_whole(self.items_quantity() - self.items[position].quantity)?;
        let removed = self.items.remove(position);
        if let Some(complement) = self.complement.as_mut() {
            complement.quantity -= removed.quantity;
        }
        if self.items.is_empty() {
            self.complement = None;
        }
        self.calculate_total_price();
        Ok((removed, self.items.is_empty()))
    }

    /// Mutable access to an item for additional-item and ingredient edits.
    pub fn item_mut(&mut self, item_id: ItemId) -> Result<&mut Item, GroupItemError> {
        if !self.can_add_items() {
            return Err(GroupItemError::NotStagingOrPending(self.status));
        }
        self.items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(GroupItemError::ItemNotFound(item_id))
    }

    /// The complement follows the group quantity; the previous one is returned.
    pub fn set_complement(&mut self, mut complement: Item) -> Result<Option<Item>, GroupItemError> {
        if !self.can_add_items() {
            return Err(GroupItemError::NotStagingOrPending(self.status));
        }
        complement.quantity = self.items_quantity();
        let previous = self.complement.replace(complement);
        self.calculate_total_price();
        Ok(previous)
    }

    pub fn remove_complement(&mut self) -> Result<Option<Item>, GroupItemError> {
        if !self.can_add_items() {
            return Err(GroupItemError::NotStagingOrPending(self.status));
        }
        let previous = self.complement.take();
        self.calculate_total_price();
        Ok(previous)
    }

    /// `Staging → Pending`. Returns `false` if the group was already pending.
    pub fn pend(&mut self, allow_fractional: bool, now: DateTime<Utc>) -> Result<bool, GroupItemError> {
        match self.status {
            GroupItemStatus::Pending => return Ok(false),
            GroupItemStatus::Staging => {}
            other => return Err(GroupItemError::NotStaging(other)),
        }
        self.calculate_total_price();
        if !allow_fractional && !self.quantity.fract().is_zero() {
            return Err(GroupItemError::QuantityNotInteger(self.quantity));
        }
        self.status = GroupItemStatus::Pending;
        self.whole_quantity = !allow_fractional;
        self.pending_at = Some(now);
        Ok(true)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<bool, GroupItemError> {
        match self.status {
            GroupItemStatus::Started => return Ok(false),
            GroupItemStatus::Pending => {}
            other => return Err(GroupItemError::NotPending(other)),
        }
        self.status = GroupItemStatus::Started;
        self.started_at = Some(now);
        Ok(true)
    }

    pub fn ready(&mut self, now: DateTime<Utc>) -> Result<bool, GroupItemError> {
        match self.status {
            GroupItemStatus::Ready => return Ok(false),
            GroupItemStatus::Started => {}
            other => return Err(GroupItemError::NotStarted(other)),
        }
        self.status = GroupItemStatus::Ready;
        self.ready_at = Some(now);
        self.active_stage = None;
        Ok(true)
    }

    /// Returns `false` if the group was already canceled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<bool, GroupItemError> {
        match self.status {
            GroupItemStatus::Canceled => return Ok(false),
            GroupItemStatus::Ready => return Err(GroupItemError::AlreadyReady),
            _ => {}
        }
        self.status = GroupItemStatus::Canceled;
        self.canceled_at = Some(now);
        self.active_stage = None;
        self.calculate_total_price();
        Ok(true)
    }

    /// Binds the stage `rule` to `process_id`. `expected` is the stage that
    /// follows the last finished one; anything else is out of order.
    pub fn enter_stage(
        &mut self,
        rule: &ProcessRule,
        expected: Option<&ProcessRule>,
        process_id: ProcessId,
    ) -> Result<(), GroupItemError> {
        if !matches!(
            self.status,
            GroupItemStatus::Pending | GroupItemStatus::Started
        ) {
            return Err(GroupItemError::NotInProduction(self.status));
        }
        if rule.category_id != self.category_id {
            return Err(GroupItemError::CategoryMismatch {
                expected: self.category_id,
                got: rule.category_id,
            });
        }
        if let Some(active) = &self.active_stage {
            return Err(GroupItemError::StageInProgress(active.process_id));
        }
        if expected.map(|e| e.id) != Some(rule.id) {
            return Err(GroupItemError::StageOutOfOrder {
                expected: expected.map(|e| e.order),
                got: rule.order,
            });
        }
        self.active_stage = Some(ActiveStage {
            rule_id: rule.id,
            order: rule.order,
            process_id,
            started: false,
        });
        Ok(())
    }

    /// Marks the active stage started. The first stage also starts the group.
    pub fn start_stage(&mut self, process_id: ProcessId, now: DateTime<Utc>) -> Result<(), GroupItemError> {
        let status = self.status;
        let active = self
            .active_stage
            .as_mut()
            .filter(|a| a.process_id == process_id)
            .ok_or(GroupItemError::StageNotActive(process_id))?;
        active.started = true;
        if status == GroupItemStatus::Pending {
            self.start(now)?;
        }
        Ok(())
    }

    /// Closes the active stage. With no `next` stage the group becomes ready.
    pub fn finish_stage(
        &mut self,
        process_id: ProcessId,
        next: Option<ProcessRule>,
        now: DateTime<Utc>,
    ) -> Result<StageOutcome, GroupItemError> {
        let order = match &self.active_stage {
            Some(active) if active.process_id == process_id && active.started => active.order,
            _ => return Err(GroupItemError::StageNotActive(process_id)),
        };
        self.active_stage = None;
        self.last_finished_order = order;
        let group_ready = match next {
            Some(_) => false,
            None => self.ready(now)?,
        };
        Ok(StageOutcome {
            next_rule: next,
            group_ready,
            order_ready: false,
        })
    }

    /// Frees the stage held by a canceled process so it can be re-created.
    pub fn abandon_stage(&mut self, process_id: ProcessId) -> bool {
        match &self.active_stage {
            Some(active) if active.process_id == process_id => {
                self.active_stage = None;
                true
            }
            _ => false,
        }
    }
}
