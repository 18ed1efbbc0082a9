//! Custom actions for the Order actor.

use crate::model::{GroupItemId, GroupSummary, PaymentMethod};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Registers a new group item. Only while staging or pending.
    AttachGroup(GroupSummary),
    /// Replaces a group's summary and recomputes totals; may ready the order.
    SyncGroup(GroupSummary),
    DetachGroup(GroupItemId),
    Launch,
    Ready,
    Ship,
    Finish,
    Cancel,
    Archive,
    AddPayment {
        amount: Decimal,
        method: PaymentMethod,
    },
    UpdateTotal,
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    AttachGroup,
    /// `order_ready` is true when this sync made the order ready.
    SyncGroup { order_ready: bool },
    DetachGroup(bool),
    Launch,
    Ready(bool),
    Ship,
    Finish,
    Cancel(bool),
    Archive(bool),
    /// Total paid so far.
    AddPayment(Decimal),
    UpdateTotal(Decimal),
}
