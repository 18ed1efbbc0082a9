//! Custom actions for the GroupItem actor.
//!
//! Every mutating action recomputes the group's totals and pushes the new
//! summary to the owning order before replying.

use crate::model::{
    EmployeeId, Item, ItemId, ProcessId, ProductId, RuleId, StageOutcome,
};
use rust_decimal::Decimal;

/// A product line to add to a group item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub observation: Option<String>,
    pub employee_id: Option<EmployeeId>,
}

#[derive(Debug, Clone)]
pub enum GroupItemAction {
    /// Reserves stock for the product (if tracked), then adds the line.
    AddItem(NewItem),
    /// Removes the line and restores its stock.
    RemoveItem {
        item_id: ItemId,
        employee_id: Option<EmployeeId>,
    },
    AddAdditionalItem {
        item_id: ItemId,
        product_id: ProductId,
        quantity: Decimal,
    },
    RemoveAdditionalItem {
        item_id: ItemId,
        product_id: ProductId,
    },
    AddRemovedIngredient {
        item_id: ItemId,
        name: String,
    },
    RemoveRemovedIngredient {
        item_id: ItemId,
        name: String,
    },
    SetComplement {
        product_id: ProductId,
    },
    RemoveComplement,
    Pend,
    Start,
    Ready,
    /// Restores the stock of every line. Refused once ready.
    Cancel,
    CalculateTotalPrice,
    CanAddItems,
    /// Binds the stage `rule_id` to a newly created process.
    EnterStage {
        rule_id: RuleId,
        process_id: ProcessId,
    },
    StartStage(ProcessId),
    FinishStage(ProcessId),
    AbandonStage(ProcessId),
}

/// Results from GroupItemActions - variants match 1:1 with GroupItemAction
#[derive(Debug, Clone)]
pub enum GroupItemActionResult {
    AddItem(ItemId),
    /// The caller deletes the group when `group_empty` is set.
    RemoveItem { removed: Item, group_empty: bool },
    AddAdditionalItem,
    RemoveAdditionalItem,
    AddRemovedIngredient(bool),
    RemoveRemovedIngredient(bool),
    SetComplement,
    RemoveComplement,
    Pend(bool),
    Start(bool),
    Ready { changed: bool, order_ready: bool },
    Cancel(bool),
    CalculateTotalPrice { quantity: Decimal, total_price: Decimal },
    CanAddItems(bool),
    /// Distinct products of the group, for reporting.
    EnterStage(Vec<ProductId>),
    StartStage,
    FinishStage(StageOutcome),
    AbandonStage(bool),
}
