//! Order aggregate: fulfillment variant, group summaries, payments and totals.

use crate::model::group_item::GroupItemStatus;
use crate::model::ids::{CategoryId, GroupItemId, OrderId};
use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Staging,
    Pending,
    Ready,
    Shipped,
    Finished,
    Canceled,
    Archived,
}

/// How the order reaches the customer. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fulfillment {
    Delivery {
        address: String,
        contact: String,
        delivery_fee: Decimal,
    },
    Pickup {
        name: String,
        contact: Option<String>,
    },
    Table {
        table_number: u32,
        service_fee: Decimal,
    },
}

impl Fulfillment {
    pub fn surcharge(&self) -> Decimal {
        match self {
            Fulfillment::Delivery { delivery_fee, .. } => *delivery_fee,
            Fulfillment::Pickup { .. } => Decimal::ZERO,
            Fulfillment::Table { service_fee, .. } => *service_fee,
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, Fulfillment::Delivery { .. })
    }
}

/// The order's copy of a group item's derived state, pushed by the group item
/// after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: GroupItemId,
    pub category_id: CategoryId,
    pub size: Option<String>,
    pub status: GroupItemStatus,
    pub quantity: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub fulfillment: Fulfillment,
    pub observation: Option<String>,
    pub groups: Vec<GroupSummary>,
    pub payments: Vec<Payment>,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub total_paid: Decimal,
    pub created_at: DateTime<Utc>,
    pub pending_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub fulfillment: Fulfillment,
    pub observation: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub fulfillment: Option<Fulfillment>,
    pub observation: Option<String>,
}

impl Order {
    pub fn new(id: OrderId, params: OrderCreate, now: DateTime<Utc>) -> Self {
        let mut order = Self {
            id,
            status: OrderStatus::Staging,
            fulfillment: params.fulfillment,
            observation: params.observation,
            groups: Vec::new(),
            payments: Vec::new(),
            subtotal: Decimal::ZERO,
            total: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            created_at: now,
            pending_at: None,
            ready_at: None,
            shipped_at: None,
            finished_at: None,
            canceled_at: None,
            archived_at: None,
        };
        order.update_total();
        order
    }

    fn transition_error(&self, to: OrderStatus) -> OrderError {
        OrderError::InvalidTransition {
            from: self.status,
            to,
        }
    }

    pub fn apply_update(&mut self, update: OrderUpdate) -> Result<(), OrderError> {
        if self.status != OrderStatus::Staging {
            return Err(OrderError::NotStaging(self.status));
        }
        if let Some(fulfillment) = update.fulfillment {
            self.fulfillment = fulfillment;
        }
        if let Some(observation) = update.observation {
            self.observation = Some(observation);
        }
        self.update_total();
        Ok(())
    }

    /// Subtotal of all groups plus the fulfillment surcharge. Returns the new total.
    pub fn update_total(&mut self) -> Decimal {
        self.subtotal = self.groups.iter().map(|g| g.total_price).sum();
        self.total = self.subtotal + self.fulfillment.surcharge();
        self.total
    }

    fn live_groups(&self) -> impl Iterator<Item = &GroupSummary> {
        self.groups
            .iter()
            .filter(|g| g.status != GroupItemStatus::Canceled)
    }

    /// Every non-canceled group is ready, and there is at least one.
    pub fn all_groups_ready(&self) -> bool {
        let mut live = self.live_groups().peekable();
        live.peek().is_some() && live.all(|g| g.status == GroupItemStatus::Ready)
    }

    pub fn attach_group(&mut self, summary: GroupSummary) -> Result<(), OrderError> {
        if !matches!(self.status, OrderStatus::Staging | OrderStatus::Pending) {
            return Err(OrderError::NotOpen(self.status));
        }
        self.upsert(summary);
        Ok(())
    }

    /// Always accepted. Readies a pending order once every live group is ready.
    pub fn sync_group(&mut self, summary: GroupSummary, now: DateTime<Utc>) -> bool {
        self.upsert(summary);
        if self.status == OrderStatus::Pending && self.all_groups_ready() {
            self.status = OrderStatus::Ready;
            self.ready_at = Some(now);
            return true;
        }
        false
    }

    pub fn detach_group(&mut self, id: GroupItemId) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        self.update_total();
        before != self.groups.len()
    }

    fn upsert(&mut self, summary: GroupSummary) {
        match self.groups.iter_mut().find(|g| g.id == summary.id) {
            Some(existing) => *existing = summary,
            None => self.groups.push(summary),
        }
        self.update_total();
    }

    pub fn launch(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        if self.status != OrderStatus::Staging {
            return Err(self.transition_error(OrderStatus::Pending));
        }
        if self.live_groups().next().is_none() {
            return Err(OrderError::EmptyOrder);
        }
        self.status = OrderStatus::Pending;
        self.pending_at = Some(now);
        Ok(())
    }

    /// Returns `false` if the order was already ready.
    pub fn ready(&mut self, now: DateTime<Utc>) -> Result<bool, OrderError> {
        match self.status {
            OrderStatus::Ready => return Ok(false),
            OrderStatus::Pending => {}
            _ => return Err(self.transition_error(OrderStatus::Ready)),
        }
        if !self.all_groups_ready() {
            return Err(OrderError::GroupsNotReady);
        }
        self.status = OrderStatus::Ready;
        self.ready_at = Some(now);
        Ok(true)
    }

    pub fn ship(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        if !self.fulfillment.is_delivery() {
            return Err(OrderError::NotDelivery);
        }
        if self.status != OrderStatus::Ready {
            return Err(self.transition_error(OrderStatus::Shipped));
        }
        self.status = OrderStatus::Shipped;
        self.shipped_at = Some(now);
        Ok(())
    }

    /// Delivery orders finish from `Shipped`, the others from `Ready`.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        match (self.status, self.fulfillment.is_delivery()) {
            (OrderStatus::Shipped, true) | (OrderStatus::Ready, false) => {}
            (OrderStatus::Ready, true) => return Err(OrderError::DeliveryNotShipped),
            _ => return Err(self.transition_error(OrderStatus::Finished)),
        }
        self.status = OrderStatus::Finished;
        self.finished_at = Some(now);
        Ok(())
    }

    /// Allowed from any non-terminal state. Returns `false` if already canceled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<bool, OrderError> {
        match self.status {
            OrderStatus::Canceled => return Ok(false),
            OrderStatus::Finished | OrderStatus::Archived => {
                return Err(self.transition_error(OrderStatus::Canceled))
            }
            _ => {}
        }
        self.status = OrderStatus::Canceled;
        self.canceled_at = Some(now);
        Ok(true)
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<bool, OrderError> {
        match self.status {
            OrderStatus::Archived => return Ok(false),
            OrderStatus::Finished | OrderStatus::Canceled => {}
            _ => return Err(self.transition_error(OrderStatus::Archived)),
        }
        self.status = OrderStatus::Archived;
        self.archived_at = Some(now);
        Ok(true)
    }

    /// Records a payment and returns the total paid so far.
    pub fn add_payment(
        &mut self,
        amount: Decimal,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Decimal, OrderError> {
        if amount <= Decimal::ZERO {
            return Err(OrderError::InvalidPaymentAmount(amount));
        }
        if matches!(self.status, OrderStatus::Canceled | OrderStatus::Archived) {
            return Err(OrderError::Closed(self.status));
        }
        self.payments.push(Payment {
            amount,
            method,
            paid_at: now,
        });
        self.total_paid += amount;
        Ok(self.total_paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(fulfillment: Fulfillment) -> Order {
        Order::new(
            OrderId(1),
            OrderCreate {
                fulfillment,
                observation: None,
            },
            Utc::now(),
        )
    }

    fn table() -> Fulfillment {
        Fulfillment::Table {
            table_number: 4,
            service_fee: dec!(5),
        }
    }

    fn delivery() -> Fulfillment {
        Fulfillment::Delivery {
            address: "Rua A, 1".into(),
            contact: "555-0101".into(),
            delivery_fee: dec!(7),
        }
    }

    fn summary(id: u32, status: GroupItemStatus, total: Decimal) -> GroupSummary {
        GroupSummary {
            id: GroupItemId(id),
            category_id: CategoryId(1),
            size: None,
            status,
            quantity: dec!(1),
            total_price: total,
        }
    }

    #[test]
    fn totals_include_surcharge() {
        let mut o = order(table());
        o.attach_group(summary(1, GroupItemStatus::Staging, dec!(20))).unwrap();
        o.attach_group(summary(2, GroupItemStatus::Staging, dec!(12.5))).unwrap();
        assert_eq!(o.subtotal, dec!(32.5));
        assert_eq!(o.total, dec!(37.5));

        o.sync_group(summary(2, GroupItemStatus::Canceled, dec!(0)), Utc::now());
        assert_eq!(o.total, dec!(25));

        assert!(o.detach_group(GroupItemId(1)));
        assert_eq!(o.total, dec!(5));
    }

    #[test]
    fn order_readies_when_last_group_readies() {
        let mut o = order(table());
        o.attach_group(summary(1, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.attach_group(summary(2, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.launch(Utc::now()).unwrap();

        assert!(!o.sync_group(summary(1, GroupItemStatus::Ready, dec!(1)), Utc::now()));
        assert_eq!(o.status, OrderStatus::Pending);
        assert_eq!(o.ready(Utc::now()), Err(OrderError::GroupsNotReady));

        assert!(o.sync_group(summary(2, GroupItemStatus::Ready, dec!(1)), Utc::now()));
        assert_eq!(o.status, OrderStatus::Ready);
    }

    #[test]
    fn canceled_groups_do_not_block_readiness() {
        let mut o = order(table());
        o.attach_group(summary(1, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.attach_group(summary(2, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.launch(Utc::now()).unwrap();

        o.sync_group(summary(2, GroupItemStatus::Canceled, dec!(0)), Utc::now());
        assert!(o.sync_group(summary(1, GroupItemStatus::Ready, dec!(1)), Utc::now()));
    }

    #[test]
    fn launch_requires_groups() {
        let mut o = order(table());
        assert_eq!(o.launch(Utc::now()), Err(OrderError::EmptyOrder));
        o.attach_group(summary(1, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.launch(Utc::now()).unwrap();
        assert!(matches!(
            o.launch(Utc::now()),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn delivery_ships_before_finishing() {
        let mut o = order(delivery());
        o.attach_group(summary(1, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.launch(Utc::now()).unwrap();
        o.sync_group(summary(1, GroupItemStatus::Ready, dec!(1)), Utc::now());

        assert_eq!(o.finish(Utc::now()), Err(OrderError::DeliveryNotShipped));
        o.ship(Utc::now()).unwrap();
        o.finish(Utc::now()).unwrap();
        assert!(o.archive(Utc::now()).unwrap());
        assert_eq!(o.status, OrderStatus::Archived);
    }

    #[test]
    fn only_delivery_ships() {
        let mut o = order(table());
        o.attach_group(summary(1, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.launch(Utc::now()).unwrap();
        o.sync_group(summary(1, GroupItemStatus::Ready, dec!(1)), Utc::now());

        assert_eq!(o.ship(Utc::now()), Err(OrderError::NotDelivery));
        o.finish(Utc::now()).unwrap();
        assert!(matches!(
            o.cancel(Utc::now()),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn closed_orders_reject_group_attach_and_payments() {
        let mut o = order(table());
        assert!(o.cancel(Utc::now()).unwrap());
        assert!(!o.cancel(Utc::now()).unwrap());

        assert_eq!(
            o.attach_group(summary(1, GroupItemStatus::Staging, dec!(1))),
            Err(OrderError::NotOpen(OrderStatus::Canceled))
        );
        assert_eq!(
            o.add_payment(dec!(10), PaymentMethod::Cash, Utc::now()),
            Err(OrderError::Closed(OrderStatus::Canceled))
        );
    }

    #[test]
    fn payments_accumulate() {
        let mut o = order(table());
        assert_eq!(
            o.add_payment(dec!(0), PaymentMethod::Card, Utc::now()),
            Err(OrderError::InvalidPaymentAmount(dec!(0)))
        );
        o.add_payment(dec!(10), PaymentMethod::Card, Utc::now()).unwrap();
        let paid = o.add_payment(dec!(2.5), PaymentMethod::Cash, Utc::now()).unwrap();
        assert_eq!(paid, dec!(12.5));
        assert_eq!(o.payments.len(), 2);
    }

    #[test]
    fn fulfillment_can_change_only_while_staging() {
        let mut o = order(table());
        o.apply_update(OrderUpdate {
            fulfillment: Some(delivery()),
            observation: Some("ring twice".into()),
        })
        .unwrap();
        assert_eq!(o.total, dec!(7));

        o.attach_group(summary(1, GroupItemStatus::Pending, dec!(1))).unwrap();
        o.launch(Utc::now()).unwrap();
        assert_eq!(
            o.apply_update(OrderUpdate::default()),
            Err(OrderError::NotStaging(OrderStatus::Pending))
        );
    }
}
