//! Custom actions for the Stock actor.

use crate::model::{EmployeeId, ManualMovement, Reservation, StockAlert, StockMovement};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum StockAction {
    /// Takes stock out for an order line. Fails with `InsufficientStock` rather than going negative.
    Reserve(Reservation),
    /// Compensating movement for a removed or canceled line.
    Restore(Reservation),
    AddMovement(ManualMovement),
    RemoveMovement(ManualMovement),
    /// Sets an absolute level; the difference is recorded as `adjust_in`/`adjust_out`.
    Adjust {
        new_stock: Decimal,
        reason: Option<String>,
        employee_id: Option<EmployeeId>,
    },
    CheckAlerts,
    StockLevel,
}

/// Results from StockActions - variants match 1:1 with StockAction
#[derive(Debug, Clone)]
pub enum StockActionResult {
    Reserve(StockMovement),
    Restore(StockMovement),
    AddMovement(StockMovement),
    RemoveMovement(StockMovement),
    /// `None` when the level already matched.
    Adjust(Option<StockMovement>),
    CheckAlerts(Vec<StockAlert>),
    StockLevel(Decimal),
}
