//! Inventory level for one product/variation and its append-only movement ledger.

use crate::model::ids::{EmployeeId, OrderId, ProductId, StockId};
use crate::stock_actor::StockError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    In,
    Out,
    AdjustIn,
    AdjustOut,
}

impl MovementKind {
    pub fn is_inbound(self) -> bool {
        matches!(self, MovementKind::In | MovementKind::AdjustIn)
    }
}

/// Immutable ledger entry. Never edited once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub order_id: Option<OrderId>,
    pub employee_id: Option<EmployeeId>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn signed_quantity(&self) -> Decimal {
        if self.kind.is_inbound() {
            self.quantity
        } else {
            -self.quantity
        }
    }
}

/// Order-driven movement: item add (reserve) or item removal/cancellation (restore).
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub quantity: Decimal,
    pub order_id: Option<OrderId>,
    pub employee_id: Option<EmployeeId>,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Manual stock entry or withdrawal, not tied to an order.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualMovement {
    pub quantity: Decimal,
    pub employee_id: Option<EmployeeId>,
    pub unit_price: Decimal,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAlertKind {
    LowStock,
    OutOfStock,
    OverStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    pub kind: StockAlertKind,
    pub current: Decimal,
    pub threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,
    pub product_id: ProductId,
    pub variation: Option<String>,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    /// Zero means "no maximum".
    pub max_stock: Decimal,
    pub unit: String,
    pub is_active: bool,
    pub movements: Vec<StockMovement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StockCreate {
    pub product_id: ProductId,
    pub variation: Option<String>,
    pub initial_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Decimal,
    pub unit: String,
}

#[derive(Debug, Clone, Default)]
pub struct StockUpdate {
    pub min_stock: Option<Decimal>,
    pub max_stock: Option<Decimal>,
    pub unit: Option<String>,
    pub is_active: Option<bool>,
}

fn positive(quantity: Decimal) -> Result<Decimal, StockError> {
    if quantity <= Decimal::ZERO {
        return Err(StockError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

fn non_negative(quantity: Decimal) -> Result<Decimal, StockError> {
    if quantity < Decimal::ZERO {
        return Err(StockError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

impl Stock {
    /// A positive initial quantity is recorded as the first `in` movement so the
    /// ledger balances from creation.
    pub fn new(id: StockId, params: StockCreate, now: DateTime<Utc>) -> Result<Self, StockError> {
        let initial = non_negative(params.initial_stock)?;
        let mut stock = Self {
            id,
            product_id: params.product_id,
            variation: params.variation,
            current_stock: Decimal::ZERO,
            min_stock: non_negative(params.min_stock)?,
            max_stock: non_negative(params.max_stock)?,
            unit: params.unit,
            is_active: true,
            movements: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        if initial > Decimal::ZERO {
            stock.record(
                MovementKind::In,
                initial,
                Decimal::ZERO,
                Decimal::ZERO,
                None,
                None,
                Some("initial stock".into()),
                now,
            );
        }
        Ok(stock)
    }

    pub fn apply_update(&mut self, update: StockUpdate, now: DateTime<Utc>) -> Result<(), StockError> {
        if let Some(min) = update.min_stock {
            self.min_stock = non_negative(min)?;
        }
        if let Some(max) = update.max_stock {
            self.max_stock = non_negative(max)?;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Takes `quantity` out for an order. Never drives stock negative.
    pub fn reserve(&mut self, r: Reservation, now: DateTime<Utc>) -> Result<StockMovement, StockError> {
        let quantity = positive(r.quantity)?;
        self.ensure_available(quantity)?;
        Ok(self.record(
            MovementKind::Out,
            quantity,
            r.unit_price,
            r.total_price,
            r.order_id,
            r.employee_id,
            None,
            now,
        ))
    }

    pub fn restore(&mut self, r: Reservation, now: DateTime<Utc>) -> Result<StockMovement, StockError> {
        let quantity = positive(r.quantity)?;
        Ok(self.record(
            MovementKind::In,
            quantity,
            r.unit_price,
            r.total_price,
            r.order_id,
            r.employee_id,
            None,
            now,
        ))
    }

    pub fn add_movement(&mut self, m: ManualMovement, now: DateTime<Utc>) -> Result<StockMovement, StockError> {
        let quantity = positive(m.quantity)?;
        Ok(self.record(
            MovementKind::In,
            quantity,
            m.unit_price,
            m.unit_price * quantity,
            None,
            m.employee_id,
            m.reason,
            now,
        ))
    }

    pub fn remove_movement(&mut self, m: ManualMovement, now: DateTime<Utc>) -> Result<StockMovement, StockError> {
        let quantity = positive(m.quantity)?;
        self.ensure_available(quantity)?;
        Ok(self.record(
            MovementKind::Out,
            quantity,
            m.unit_price,
            m.unit_price * quantity,
            None,
            m.employee_id,
            m.reason,
            now,
        ))
    }

    /// Sets the stock to an absolute value. Returns `None` when nothing changed.
    pub fn adjust(
        &mut self,
        new_stock: Decimal,
        reason: Option<String>,
        employee_id: Option<EmployeeId>,
        now: DateTime<Utc>,
    ) -> Result<Option<StockMovement>, StockError> {
        let target = non_negative(new_stock)?;
        let difference = target - self.current_stock;
        if difference.is_zero() {
            return Ok(None);
        }
        let kind = if difference > Decimal::ZERO {
            MovementKind::AdjustIn
        } else {
            MovementKind::AdjustOut
        };
        Ok(Some(self.record(
            kind,
            difference.abs(),
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            employee_id,
            reason,
            now,
        )))
    }

    pub fn check_alerts(&self) -> Vec<StockAlert> {
        let mut alerts = Vec::new();
        if !self.is_active {
            return alerts;
        }
        let current = self.current_stock;
        if current <= Decimal::ZERO {
            alerts.push(StockAlert {
                kind: StockAlertKind::OutOfStock,
                current,
                threshold: Decimal::ZERO,
            });
        } else if current <= self.min_stock {
            alerts.push(StockAlert {
                kind: StockAlertKind::LowStock,
                current,
                threshold: self.min_stock,
            });
        }
        if self.max_stock > Decimal::ZERO && current > self.max_stock {
            alerts.push(StockAlert {
                kind: StockAlertKind::OverStock,
                current,
                threshold: self.max_stock,
            });
        }
        alerts
    }

    /// Current stock as a percentage of the maximum; zero when no maximum is set.
    pub fn stock_level(&self) -> Decimal {
        if self.max_stock <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.current_stock / self.max_stock * Decimal::ONE_HUNDRED
    }

    /// Running sum of the ledger. Always equals `current_stock`.
    pub fn ledger_balance(&self) -> Decimal {
        self.movements.iter().map(StockMovement::signed_quantity).sum()
    }

    fn ensure_available(&self, quantity: Decimal) -> Result<(), StockError> {
        if self.current_stock < quantity {
            return Err(StockError::InsufficientStock {
                requested: quantity,
                available: self.current_stock,
            });
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        kind: MovementKind,
        quantity: Decimal,
        unit_price: Decimal,
        total_price: Decimal,
        order_id: Option<OrderId>,
        employee_id: Option<EmployeeId>,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> StockMovement {
        let movement = StockMovement {
            kind,
            quantity,
            unit_price,
            total_price,
            order_id,
            employee_id,
            reason,
            created_at: now,
        };
        self.current_stock += movement.signed_quantity();
        self.updated_at = now;
        self.movements.push(movement.clone());
        movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stock(current: Decimal, min: Decimal, max: Decimal) -> Stock {
        Stock::new(
            StockId(1),
            StockCreate {
                product_id: ProductId(1),
                variation: None,
                initial_stock: current,
                min_stock: min,
                max_stock: max,
                unit: "un".into(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn reservation(quantity: Decimal) -> Reservation {
        Reservation {
            quantity,
            order_id: Some(OrderId(1)),
            employee_id: None,
            unit_price: dec!(2),
            total_price: dec!(2) * quantity,
        }
    }

    #[test]
    fn reserving_everything_leaves_only_out_of_stock() {
        let mut s = stock(dec!(10), dec!(2), dec!(20));
        let movement = s.reserve(reservation(dec!(10)), Utc::now()).unwrap();

        assert_eq!(movement.kind, MovementKind::Out);
        assert_eq!(movement.order_id, Some(OrderId(1)));
        assert_eq!(s.current_stock, dec!(0));
        let kinds: Vec<_> = s.check_alerts().into_iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![StockAlertKind::OutOfStock]);
    }

    #[test]
    fn reserve_boundary() {
        let mut s = stock(dec!(3), dec!(0), dec!(0));
        s.reserve(reservation(dec!(3)), Utc::now()).unwrap();
        assert_eq!(s.current_stock, dec!(0));

        let before = s.clone();
        let err = s.reserve(reservation(dec!(1)), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                requested: dec!(1),
                available: dec!(0)
            }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn non_positive_quantities_are_rejected_without_movement() {
        let mut s = stock(dec!(5), dec!(1), dec!(10));
        assert_eq!(
            s.reserve(reservation(dec!(0)), Utc::now()),
            Err(StockError::InvalidQuantity(dec!(0)))
        );
        assert_eq!(
            s.restore(reservation(dec!(-1)), Utc::now()),
            Err(StockError::InvalidQuantity(dec!(-1)))
        );
        assert_eq!(s.movements.len(), 1);
        assert_eq!(s.current_stock, dec!(5));
    }

    #[test]
    fn adjust_records_signed_difference() {
        let mut s = stock(dec!(5), dec!(1), dec!(10));

        let up = s.adjust(dec!(8), Some("count".into()), None, Utc::now()).unwrap().unwrap();
        assert_eq!(up.kind, MovementKind::AdjustIn);
        assert_eq!(up.quantity, dec!(3));

        let down = s.adjust(dec!(6.5), None, None, Utc::now()).unwrap().unwrap();
        assert_eq!(down.kind, MovementKind::AdjustOut);
        assert_eq!(down.quantity, dec!(1.5));

        assert_eq!(s.adjust(dec!(6.5), None, None, Utc::now()).unwrap(), None);
        assert_eq!(s.current_stock, dec!(6.5));
        assert_eq!(s.ledger_balance(), s.current_stock);
    }

    #[test]
    fn manual_withdrawal_cannot_overdraw() {
        let mut s = stock(dec!(2), dec!(0), dec!(0));
        let m = ManualMovement {
            quantity: dec!(3),
            employee_id: Some(EmployeeId(4)),
            unit_price: dec!(1),
            reason: Some("spoiled".into()),
        };
        assert!(matches!(
            s.remove_movement(m.clone(), Utc::now()),
            Err(StockError::InsufficientStock { .. })
        ));

        let added = s.add_movement(m, Utc::now()).unwrap();
        assert_eq!(added.total_price, dec!(3));
        assert_eq!(added.order_id, None);
        assert_eq!(s.current_stock, dec!(5));
    }

    #[test]
    fn alerts_follow_thresholds() {
        assert_eq!(
            stock(dec!(2), dec!(2), dec!(20)).check_alerts()[0].kind,
            StockAlertKind::LowStock
        );
        assert_eq!(
            stock(dec!(25), dec!(2), dec!(20)).check_alerts()[0].kind,
            StockAlertKind::OverStock
        );
        assert!(stock(dec!(25), dec!(2), dec!(0)).check_alerts().is_empty());

        let mut inactive = stock(dec!(0), dec!(2), dec!(20));
        inactive
            .apply_update(
                StockUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(inactive.check_alerts().is_empty());
    }

    #[test]
    fn stock_level_is_percentage_of_max() {
        assert_eq!(stock(dec!(5), dec!(0), dec!(20)).stock_level(), dec!(25));
        assert_eq!(stock(dec!(5), dec!(0), dec!(0)).stock_level(), dec!(0));
    }

    #[test]
    fn initial_stock_is_first_movement() {
        let s = stock(dec!(7), dec!(0), dec!(0));
        assert_eq!(s.movements.len(), 1);
        assert_eq!(s.movements[0].kind, MovementKind::In);
        assert_eq!(s.ledger_balance(), dec!(7));

        assert!(stock(dec!(0), dec!(0), dec!(0)).movements.is_empty());
    }
}
