use crate::clients::{GroupItemClient, OrderClient, ProcessClient, QueueClient, StockClient};
use crate::config::KitchenConfig;
use crate::group_item_actor::GroupItemContext;
use crate::kitchen::Kitchen;
use crate::model::Catalog;
use crate::notify::{KitchenEvent, Notifier};
use crate::process_actor::ProcessContext;
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Owns the running actors and hands out the [`Kitchen`] facade.
///
/// Actors are spawned leaves first (stock, order, queue), then the actors
/// that depend on them (group item, then process), each with its dependencies
/// injected through `run()`.
///
/// # Example
///
/// ```ignore
/// let system = KitchenSystem::new(&KitchenConfig::default(), catalog);
/// let kitchen = system.kitchen();
/// let order_id = kitchen.create_order(params).await?;
/// // ...
/// drop(kitchen);
/// system.shutdown().await?;
/// ```
pub struct KitchenSystem {
    orders: OrderClient,
    group_items: GroupItemClient,
    stocks: StockClient,
    processes: ProcessClient,
    queues: QueueClient,
    catalog: Catalog,
    notifier: Notifier,
    // Dependents first so shutdown can await them in order.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl KitchenSystem {
    /// Spawns every actor. Must be called inside a tokio runtime.
    pub fn new(config: &KitchenConfig, catalog: Catalog) -> Self {
        let buffer = config.actor_buffer;
        let notifier = Notifier::new(config.event_capacity);

        let (stock_actor, stocks) = crate::stock_actor::new(buffer);
        let (order_actor, orders) = crate::order_actor::new(buffer);
        let (queue_actor, queues) = crate::queue_actor::new(buffer);
        let (group_item_actor, group_items) = crate::group_item_actor::new(buffer);
        let (process_actor, processes) = crate::process_actor::new(buffer);

        let stock_handle = tokio::spawn(stock_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(()));
        let queue_handle = tokio::spawn(queue_actor.run(()));
        let group_item_handle = tokio::spawn(group_item_actor.run(GroupItemContext::new(
            orders.clone(),
            stocks.clone(),
            catalog.clone(),
            notifier.clone(),
            config.default_printer.clone(),
        )));
        let process_handle = tokio::spawn(process_actor.run(ProcessContext {
            group_items: group_items.clone(),
            queues: queues.clone(),
            catalog: catalog.clone(),
            notifier: notifier.clone(),
            default_printer: config.default_printer.clone(),
        }));

        info!(buffer, "Kitchen system started");
        Self {
            orders,
            group_items,
            stocks,
            processes,
            queues,
            catalog,
            notifier,
            handles: vec![
                ("process", process_handle),
                ("queue", queue_handle),
                ("group_item", group_item_handle),
                ("order", order_handle),
                ("stock", stock_handle),
            ],
        }
    }

    pub fn kitchen(&self) -> Kitchen {
        Kitchen::new(
            self.orders.clone(),
            self.group_items.clone(),
            self.stocks.clone(),
            self.processes.clone(),
            self.queues.clone(),
            self.catalog.clone(),
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.notifier.subscribe()
    }

    /// Stops every actor once all outstanding [`Kitchen`] handles are dropped.
    ///
    /// Dropping the system's clients closes the process mailbox; the process
    /// actor then drops its group item and queue clients, and so on down to
    /// the stock actor.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down kitchen...");
        drop(self.orders);
        drop(self.group_items);
        drop(self.stocks);
        drop(self.processes);
        drop(self.queues);

        for (actor, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(actor, error = %e, "Actor task failed");
                return Err(e);
            }
        }
        info!("Kitchen shutdown complete.");
        Ok(())
    }
}
