//! # Kitchen
//!
//! Use-case layer over the actor clients. Each method is one counter or
//! station interaction; the invariants themselves live in the actors.

use crate::analytics::{self, PerformanceReport};
use crate::clients::{
    FinishedProcess, GroupItemClient, OrderClient, ProcessClient, QueueClient, RemovedItem,
    StockClient,
};
use crate::group_item_actor::{GroupItemError, NewItem};
use crate::model::{
    Catalog, CatalogError, CategoryId, EmployeeId, GroupItemCreate, GroupItemId, GroupItemStatus, ItemId,
    Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, PaymentMethod, ProcessCreate,
    ProcessId, ProductId, StockCreate, StockId,
};
use crate::order_actor::OrderError;
use crate::process_actor::ProcessError;
use crate::queue_actor::QueueError;
use crate::stock_actor::StockError;
use actor_framework::ActorClient;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KitchenError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    GroupItem(#[from] GroupItemError),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Where an added item landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedItem {
    pub group_item_id: GroupItemId,
    pub item_id: ItemId,
}

/// What launching did with one group item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchedGroup {
    /// The first stage's process was created.
    Queued {
        group_item_id: GroupItemId,
        process_id: ProcessId,
    },
    /// Nothing to produce: the group went straight to ready.
    FastTracked { group_item_id: GroupItemId },
}

#[derive(Clone)]
pub struct Kitchen {
    orders: OrderClient,
    group_items: GroupItemClient,
    stocks: StockClient,
    processes: ProcessClient,
    queues: QueueClient,
    catalog: Catalog,
}

impl Kitchen {
    pub fn new(
        orders: OrderClient,
        group_items: GroupItemClient,
        stocks: StockClient,
        processes: ProcessClient,
        queues: QueueClient,
        catalog: Catalog,
    ) -> Self {
        Self {
            orders,
            group_items,
            stocks,
            processes,
            queues,
            catalog,
        }
    }

    pub fn orders(&self) -> &OrderClient {
        &self.orders
    }

    pub fn group_items(&self) -> &GroupItemClient {
        &self.group_items
    }

    pub fn stocks(&self) -> &StockClient {
        &self.stocks
    }

    pub fn processes(&self) -> &ProcessClient {
        &self.processes
    }

    pub fn queues(&self) -> &QueueClient {
        &self.queues
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, KitchenError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()).into())
    }

    // ---------------------------------------------------------------------
    // Counter
    // ---------------------------------------------------------------------

    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, KitchenError> {
        Ok(self.orders.create_order(params).await?)
    }

    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, KitchenError> {
        Ok(self.orders.update_order(id, update).await?)
    }

    /// Creates a stock row for `product_id` and makes item adds reserve from it.
    #[instrument(skip(self, params))]
    pub async fn track_stock(
        &self,
        product_id: ProductId,
        mut params: StockCreate,
    ) -> Result<StockId, KitchenError> {
        self.catalog.product(product_id)?;
        params.product_id = product_id;
        let stock_id = self.stocks.create_stock(params).await?;
        self.catalog.link_stock(product_id, stock_id)?;
        Ok(stock_id)
    }

    /// Adds a product line to the order, batching it with the open group item of
    /// the same category and size or starting a new one.
    #[instrument(skip(self))]
    pub async fn add_item(&self, order_id: OrderId, item: NewItem) -> Result<PlacedItem, KitchenError> {
        let product = self.catalog.product(item.product_id)?;
        let order = self.get_order(order_id).await?;
        if order.status != OrderStatus::Staging {
            return Err(OrderError::NotStaging(order.status).into());
        }

        // A pending group on a staging order is left over from a rejected launch.
        let open = order.groups.iter().find(|g| {
            matches!(g.status, GroupItemStatus::Staging | GroupItemStatus::Pending)
                && g.category_id == product.category_id
                && g.size == product.size
        });
        let (group_item_id, created) = match open {
            Some(group) => (group.id, false),
            None => {
                let id = self
                    .group_items
                    .create_group_item(GroupItemCreate {
                        order_id,
                        category_id: product.category_id,
                        size: product.size.clone(),
                    })
                    .await?;
                (id, true)
            }
        };

        match self.group_items.add_item(group_item_id, item).await {
            Ok(item_id) => Ok(PlacedItem {
                group_item_id,
                item_id,
            }),
            Err(e) => {
                if created {
                    if let Err(cleanup) = self.group_items.delete(group_item_id).await {
                        warn!(%group_item_id, error = %cleanup, "Empty group item left behind");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Removes a line; a group item left without items is deleted.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        group_item_id: GroupItemId,
        item_id: ItemId,
        employee_id: Option<EmployeeId>,
    ) -> Result<RemovedItem, KitchenError> {
        let removed = self
            .group_items
            .remove_item(group_item_id, item_id, employee_id)
            .await?;
        if removed.group_empty {
            self.group_items.delete(group_item_id).await?;
            info!(%group_item_id, "Deleted empty group item");
        }
        Ok(removed)
    }

    /// Sends the order to the kitchen: every group item becomes pending, the
    /// order is launched, then each group enters its first stage.
    #[instrument(skip(self))]
    pub async fn launch_order(&self, order_id: OrderId) -> Result<Vec<LaunchedGroup>, KitchenError> {
        let order = self.get_order(order_id).await?;
        if order.status != OrderStatus::Staging {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Pending,
            }
            .into());
        }

        let groups: Vec<(GroupItemId, CategoryId)> = order
            .groups
            .iter()
            .filter(|g| g.status != GroupItemStatus::Canceled)
            .map(|g| (g.id, g.category_id))
            .collect();

        // Every group must be able to pend before any of them does.
        for &(group_item_id, category_id) in &groups {
            let category = self.catalog.category(category_id)?;
            let (quantity, _) = self.group_items.calculate_total_price(group_item_id).await?;
            if !category.allow_fractional_quantity && !quantity.fract().is_zero() {
                warn!(%order_id, %group_item_id, %quantity, "Launch rejected");
                return Err(GroupItemError::QuantityNotInteger(quantity).into());
            }
        }
        for &(group_item_id, _) in &groups {
            self.group_items.pend(group_item_id).await?;
        }
        self.orders.launch(order_id).await?;

        let mut launched = Vec::with_capacity(groups.len());
        for (group_item_id, category_id) in groups {
            let category = self.catalog.category(category_id)?;
            let first = category
                .needs_production
                .then(|| self.catalog.first_rule(category_id))
                .flatten();

            match first {
                Some(rule) => {
                    let process_id = self
                        .processes
                        .create_process(ProcessCreate {
                            group_item_id,
                            rule,
                            queue_id: None,
                        })
                        .await?;
                    launched.push(LaunchedGroup::Queued {
                        group_item_id,
                        process_id,
                    });
                }
                None => {
                    self.group_items.start(group_item_id).await?;
                    self.group_items.ready(group_item_id).await?;
                    launched.push(LaunchedGroup::FastTracked { group_item_id });
                }
            }
        }
        info!(%order_id, groups = launched.len(), "Order launched");
        Ok(launched)
    }

    // ---------------------------------------------------------------------
    // Stations
    // ---------------------------------------------------------------------

    pub async fn start_process(&self, id: ProcessId, employee_id: EmployeeId) -> Result<(), KitchenError> {
        Ok(self.processes.start_process(id, employee_id).await?)
    }

    pub async fn pause_process(&self, id: ProcessId) -> Result<(), KitchenError> {
        Ok(self.processes.pause_process(id).await?)
    }

    pub async fn continue_process(&self, id: ProcessId) -> Result<Duration, KitchenError> {
        Ok(self.processes.continue_process(id).await?)
    }

    pub async fn finish_process(&self, id: ProcessId) -> Result<FinishedProcess, KitchenError> {
        Ok(self.processes.finish_process(id).await?)
    }

    pub async fn cancel_process(&self, id: ProcessId, reason: &str) -> Result<(), KitchenError> {
        Ok(self.processes.cancel_process(id, reason.to_string()).await?)
    }

    /// Cancels the group's live processes, then the group itself (restoring its stock).
    #[instrument(skip(self))]
    pub async fn cancel_group_item(&self, group_item_id: GroupItemId, reason: &str) -> Result<bool, KitchenError> {
        if reason.trim().is_empty() {
            return Err(ProcessError::MissingCancelReason.into());
        }
        let live: Vec<ProcessId> = self
            .processes
            .list()
            .await?
            .into_iter()
            .filter(|p| p.group_item_id == group_item_id && p.is_live())
            .map(|p| p.id)
            .collect();
        for process_id in live {
            self.processes
                .cancel_process(process_id, reason.to_string())
                .await?;
        }
        Ok(self.group_items.cancel(group_item_id).await?)
    }

    /// Cancels the order and every group item that has not been produced yet.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId, reason: &str) -> Result<bool, KitchenError> {
        if reason.trim().is_empty() {
            return Err(ProcessError::MissingCancelReason.into());
        }
        let order = self.get_order(order_id).await?;
        if !self.orders.cancel(order_id).await? {
            return Ok(false);
        }
        for group in order.groups.iter().filter(|g| {
            !matches!(
                g.status,
                GroupItemStatus::Ready | GroupItemStatus::Canceled
            )
        }) {
            self.cancel_group_item(group.id, reason).await?;
        }
        Ok(true)
    }

    pub async fn ship_order(&self, id: OrderId) -> Result<(), KitchenError> {
        Ok(self.orders.ship(id).await?)
    }

    pub async fn finish_order(&self, id: OrderId) -> Result<(), KitchenError> {
        Ok(self.orders.finish(id).await?)
    }

    pub async fn archive_order(&self, id: OrderId) -> Result<bool, KitchenError> {
        Ok(self.orders.archive(id).await?)
    }

    pub async fn add_payment(
        &self,
        id: OrderId,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Decimal, KitchenError> {
        Ok(self.orders.add_payment(id, amount, method).await?)
    }

    /// Snapshot of production performance as of `now`.
    pub async fn performance_report(&self, now: DateTime<Utc>) -> Result<PerformanceReport, KitchenError> {
        let processes = self.processes.list().await?;
        let queues = self.queues.list().await?;
        Ok(analytics::performance_report(
            &processes,
            &queues,
            &self.catalog,
            now,
        ))
    }
}
