//! End-to-end tests over a fully wired [`KitchenSystem`].

use actor_framework::ActorClient;
use chrono::{Duration, Utc};
use kitchen_pipeline::config::KitchenConfig;
use kitchen_pipeline::group_item_actor::{GroupItemError, NewItem};
use kitchen_pipeline::kitchen::{Kitchen, LaunchedGroup};
use kitchen_pipeline::model::{
    Catalog, CategoryId, EmployeeId, Fulfillment, GroupItemStatus, NewCategory, NewProduct,
    NewRule, OrderCreate, OrderId, OrderStatus, ProcessCreate, ProcessId, ProcessStatus,
    ProductId, RuleId, StockCreate, StockId,
};
use kitchen_pipeline::notify::KitchenEvent;
use kitchen_pipeline::order_actor::OrderError;
use kitchen_pipeline::process_actor::ProcessError;
use kitchen_pipeline::stock_actor::StockError;
use kitchen_pipeline::{KitchenError, KitchenSystem};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Menu {
    catalog: Catalog,
    burgers: CategoryId,
    prep: RuleId,
    grill: RuleId,
    burger: ProductId,
    double: ProductId,
    large_burger: ProductId,
    pizza: ProductId,
    cola: ProductId,
}

fn menu() -> Menu {
    let catalog = Catalog::new();
    let burgers = catalog.add_category(NewCategory {
        name: "burgers".into(),
        allow_fractional_quantity: false,
        needs_production: true,
        printer: Some("pass".into()),
    });
    let pizzas = catalog.add_category(NewCategory {
        name: "pizzas".into(),
        allow_fractional_quantity: true,
        needs_production: true,
        printer: None,
    });
    let drinks = catalog.add_category(NewCategory {
        name: "drinks".into(),
        allow_fractional_quantity: false,
        needs_production: false,
        printer: Some("bar".into()),
    });
    let prep = catalog
        .add_rule(NewRule {
            name: "prep".into(),
            order: 1,
            category_id: burgers,
            ideal_time: Duration::minutes(3),
        })
        .unwrap();
    let grill = catalog
        .add_rule(NewRule {
            name: "grill".into(),
            order: 2,
            category_id: burgers,
            ideal_time: Duration::minutes(8),
        })
        .unwrap();
    catalog
        .add_rule(NewRule {
            name: "oven".into(),
            order: 1,
            category_id: pizzas,
            ideal_time: Duration::minutes(12),
        })
        .unwrap();

    let product = |name: &str, price: Decimal, category_id, size: Option<&str>| {
        catalog
            .add_product(NewProduct {
                name: name.into(),
                price,
                category_id,
                size: size.map(str::to_string),
            })
            .unwrap()
    };
    let burger = product("cheeseburger", dec!(12.50), burgers, None);
    let double = product("double burger", dec!(15.00), burgers, None);
    let large_burger = product("cheeseburger xl", dec!(16.00), burgers, Some("xl"));
    let pizza = product("margherita", dec!(20.00), pizzas, None);
    let cola = product("cola", dec!(3.00), drinks, None);

    Menu {
        catalog,
        burgers,
        prep,
        grill,
        burger,
        double,
        large_burger,
        pizza,
        cola,
    }
}

fn start(menu: &Menu) -> (KitchenSystem, Kitchen) {
    let system = KitchenSystem::new(&KitchenConfig::default(), menu.catalog.clone());
    let kitchen = system.kitchen();
    (system, kitchen)
}

fn table() -> OrderCreate {
    OrderCreate {
        fulfillment: Fulfillment::Table {
            table_number: 4,
            service_fee: dec!(0),
        },
        observation: None,
    }
}

fn line(product_id: ProductId, quantity: Decimal) -> NewItem {
    NewItem {
        product_id,
        quantity,
        observation: None,
        employee_id: None,
    }
}

async fn stock(kitchen: &Kitchen, product_id: ProductId, initial: Decimal) -> StockId {
    kitchen
        .track_stock(
            product_id,
            StockCreate {
                product_id,
                variation: None,
                initial_stock: initial,
                min_stock: dec!(2),
                max_stock: dec!(0),
                unit: "unit".into(),
            },
        )
        .await
        .unwrap()
}

async fn on_hand(kitchen: &Kitchen, id: StockId) -> Decimal {
    kitchen.stocks().get(id).await.unwrap().unwrap().current_stock
}

fn queued(launched: &[LaunchedGroup]) -> Vec<ProcessId> {
    launched
        .iter()
        .filter_map(|g| match g {
            LaunchedGroup::Queued { process_id, .. } => Some(*process_id),
            LaunchedGroup::FastTracked { .. } => None,
        })
        .collect()
}

async fn shutdown(system: KitchenSystem, kitchen: Kitchen) {
    drop(kitchen);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_items_batch_by_category_and_size() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    let a = kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    let b = kitchen.add_item(order_id, line(menu.double, dec!(2))).await.unwrap();
    let c = kitchen
        .add_item(order_id, line(menu.large_burger, dec!(1)))
        .await
        .unwrap();

    assert_eq!(a.group_item_id, b.group_item_id);
    assert_ne!(a.group_item_id, c.group_item_id);

    let order = kitchen.get_order(order_id).await.unwrap();
    assert_eq!(order.groups.len(), 2);
    assert_eq!(order.subtotal, dec!(12.50) + dec!(30.00) + dec!(16.00));

    let group = kitchen.group_items().get(a.group_item_id).await.unwrap().unwrap();
    assert_eq!(group.quantity, dec!(3));
    assert_eq!(group.total_price, dec!(42.50));

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_finishing_a_stage_queues_the_next_one() {
    let menu = menu();
    let (system, kitchen) = start(&menu);
    let mut events = system.subscribe();

    let order_id = kitchen.create_order(table()).await.unwrap();
    kitchen.add_item(order_id, line(menu.burger, dec!(2))).await.unwrap();
    let launched = kitchen.launch_order(order_id).await.unwrap();
    let first = queued(&launched)[0];

    kitchen.start_process(first, EmployeeId(1)).await.unwrap();
    let finished = kitchen.finish_process(first).await.unwrap();
    assert!(!finished.group_ready);
    let second = finished.next_process.unwrap();

    let next = kitchen.processes().get(second).await.unwrap().unwrap();
    assert_eq!(next.status, ProcessStatus::Pending);
    assert_eq!(next.rule_id, menu.grill);
    let queue_id = next.queue_id.unwrap();

    let queue = kitchen.queues().get(queue_id).await.unwrap().unwrap();
    assert_eq!(queue.from_rule, menu.prep);
    assert_eq!(queue.to_rule, menu.grill);
    assert!(queue.left_at.is_none());

    kitchen.start_process(second, EmployeeId(2)).await.unwrap();
    let queue = kitchen.queues().get(queue_id).await.unwrap().unwrap();
    assert!(queue.left_at.is_some());
    assert!(queue.duration.is_some());

    let done = kitchen.finish_process(second).await.unwrap();
    assert!(done.group_ready && done.order_ready);
    assert_eq!(done.next_process, None);
    assert_eq!(
        kitchen.get_order(order_id).await.unwrap().status,
        OrderStatus::Ready
    );

    let mut destinations = Vec::new();
    while let Ok(event) = events.try_recv() {
        destinations.push(event.destination().to_string());
        if let KitchenEvent::StageFinished { group_ready, .. } = event {
            assert_eq!(group_ready, destinations.len() == 3);
        }
    }
    assert_eq!(destinations, ["prep", "grill", "pass"]);

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_order_ready_only_when_every_group_is() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    kitchen.add_item(order_id, line(menu.pizza, dec!(1))).await.unwrap();
    kitchen.add_item(order_id, line(menu.cola, dec!(2))).await.unwrap();
    kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();

    let launched = kitchen.launch_order(order_id).await.unwrap();
    assert_eq!(launched.len(), 3);
    assert!(launched
        .iter()
        .any(|g| matches!(g, LaunchedGroup::FastTracked { .. })));

    let processes = queued(&launched);
    let pizza = processes[0];
    kitchen.start_process(pizza, EmployeeId(1)).await.unwrap();
    let finished = kitchen.finish_process(pizza).await.unwrap();
    assert!(finished.group_ready);
    assert!(!finished.order_ready);
    assert_eq!(
        kitchen.get_order(order_id).await.unwrap().status,
        OrderStatus::Pending
    );

    let mut next = Some(processes[1]);
    let mut last = None;
    while let Some(id) = next {
        kitchen.start_process(id, EmployeeId(2)).await.unwrap();
        let finished = kitchen.finish_process(id).await.unwrap();
        next = finished.next_process;
        last = Some(finished);
    }
    assert!(last.unwrap().order_ready);

    let order = kitchen.get_order(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
    assert!(order
        .groups
        .iter()
        .all(|g| g.status == GroupItemStatus::Ready));

    kitchen.finish_order(order_id).await.unwrap();
    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_stages_cannot_be_skipped_or_doubled() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    let placed = kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    let launched = kitchen.launch_order(order_id).await.unwrap();
    let first = queued(&launched)[0];

    let grill = menu.catalog.rule(menu.grill).unwrap();
    let err = kitchen
        .processes()
        .create_process(ProcessCreate {
            group_item_id: placed.group_item_id,
            rule: grill,
            queue_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::GroupItem(GroupItemError::StageInProgress(id)) if id == first
    ));

    // Canceling the stage-1 process frees the stage, but stage 2 is still out of order.
    kitchen.cancel_process(first, "burnt").await.unwrap();
    let err = kitchen
        .processes()
        .create_process(ProcessCreate {
            group_item_id: placed.group_item_id,
            rule: menu.catalog.rule(menu.grill).unwrap(),
            queue_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ProcessError::GroupItem(GroupItemError::StageOutOfOrder {
            expected: Some(1),
            got: 2
        })
    );

    let retry = kitchen
        .processes()
        .create_process(ProcessCreate {
            group_item_id: placed.group_item_id,
            rule: menu.catalog.rule(menu.prep).unwrap(),
            queue_id: None,
        })
        .await
        .unwrap();
    kitchen.start_process(retry, EmployeeId(1)).await.unwrap();
    assert!(kitchen.finish_process(retry).await.unwrap().next_process.is_some());

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_process_state_machine_and_pauses() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    kitchen.add_item(order_id, line(menu.pizza, dec!(1))).await.unwrap();
    let process = queued(&kitchen.launch_order(order_id).await.unwrap())[0];

    assert!(matches!(
        kitchen.finish_process(process).await,
        Err(KitchenError::Process(ProcessError::NotStarted(ProcessStatus::Pending)))
    ));
    assert!(matches!(
        kitchen.continue_process(process).await,
        Err(KitchenError::Process(ProcessError::NotPaused(_)))
    ));

    kitchen.start_process(process, EmployeeId(3)).await.unwrap();
    kitchen.pause_process(process).await.unwrap();
    assert!(matches!(
        kitchen.finish_process(process).await,
        Err(KitchenError::Process(ProcessError::NotStarted(ProcessStatus::Paused)))
    ));
    let paused = kitchen.continue_process(process).await.unwrap();
    assert!(paused >= Duration::zero());

    kitchen.finish_process(process).await.unwrap();
    let record = kitchen.processes().get(process).await.unwrap().unwrap();
    assert_eq!(record.status, ProcessStatus::Finished);
    assert_eq!(record.employee_id, Some(EmployeeId(3)));
    assert!(record.duration.is_some());

    assert!(matches!(
        kitchen.cancel_process(process, "late").await,
        Err(KitchenError::Process(ProcessError::AlreadyTerminal(ProcessStatus::Finished)))
    ));

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_stock_follows_item_adds_and_removals() {
    let menu = menu();
    let (system, kitchen) = start(&menu);
    let patties = stock(&kitchen, menu.burger, dec!(10)).await;

    let order_id = kitchen.create_order(table()).await.unwrap();
    let first = kitchen.add_item(order_id, line(menu.burger, dec!(4))).await.unwrap();
    assert_eq!(on_hand(&kitchen, patties).await, dec!(6));

    let err = kitchen
        .add_item(order_id, line(menu.burger, dec!(7)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        KitchenError::GroupItem(GroupItemError::Stock(StockError::InsufficientStock {
            requested: dec!(7),
            available: dec!(6),
        }))
    );
    assert_eq!(on_hand(&kitchen, patties).await, dec!(6));

    let removed = kitchen
        .remove_item(first.group_item_id, first.item_id, Some(EmployeeId(1)))
        .await
        .unwrap();
    assert!(removed.group_empty);
    assert_eq!(on_hand(&kitchen, patties).await, dec!(10));

    // The emptied group is gone from both the actor and the order.
    assert!(kitchen
        .group_items()
        .get(first.group_item_id)
        .await
        .unwrap()
        .is_none());
    let order = kitchen.get_order(order_id).await.unwrap();
    assert!(order.groups.is_empty());
    assert_eq!(order.total, Decimal::ZERO);

    let row = kitchen.stocks().get(patties).await.unwrap().unwrap();
    assert_eq!(row.movements.len(), 3);
    assert_eq!(row.ledger_balance(), row.current_stock);

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_rejected_first_item_leaves_no_group_behind() {
    let menu = menu();
    let (system, kitchen) = start(&menu);
    stock(&kitchen, menu.burger, dec!(1)).await;

    let order_id = kitchen.create_order(table()).await.unwrap();
    let err = kitchen
        .add_item(order_id, line(menu.burger, dec!(3)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        KitchenError::GroupItem(GroupItemError::Stock(StockError::InsufficientStock { .. }))
    ));

    assert!(kitchen.group_items().list().await.unwrap().is_empty());
    assert!(kitchen.get_order(order_id).await.unwrap().groups.is_empty());

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_cancel_order_stops_production_and_restores_stock() {
    let menu = menu();
    let (system, kitchen) = start(&menu);
    let patties = stock(&kitchen, menu.burger, dec!(5)).await;

    let order_id = kitchen.create_order(table()).await.unwrap();
    let placed = kitchen.add_item(order_id, line(menu.burger, dec!(3))).await.unwrap();
    let process = queued(&kitchen.launch_order(order_id).await.unwrap())[0];
    kitchen.start_process(process, EmployeeId(1)).await.unwrap();

    assert!(matches!(
        kitchen.cancel_order(order_id, "  ").await,
        Err(KitchenError::Process(ProcessError::MissingCancelReason))
    ));
    assert!(kitchen.cancel_order(order_id, "customer left").await.unwrap());

    let record = kitchen.processes().get(process).await.unwrap().unwrap();
    assert_eq!(record.status, ProcessStatus::Canceled);
    assert_eq!(record.cancel_reason.as_deref(), Some("customer left"));

    let group = kitchen
        .group_items()
        .get(placed.group_item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.status, GroupItemStatus::Canceled);
    assert_eq!(group.total_price, Decimal::ZERO);

    assert_eq!(on_hand(&kitchen, patties).await, dec!(5));
    let order = kitchen.get_order(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Canceled);
    assert_eq!(order.subtotal, Decimal::ZERO);

    // Canceling twice is a no-op; archiving closes it for good.
    assert!(!kitchen.cancel_order(order_id, "again").await.unwrap());
    assert!(kitchen.archive_order(order_id).await.unwrap());

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_fractional_quantity_blocks_launch() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    kitchen
        .add_item(order_id, line(menu.burger, dec!(1.5)))
        .await
        .unwrap();
    let err = kitchen.launch_order(order_id).await.unwrap_err();
    assert_eq!(
        err,
        KitchenError::GroupItem(GroupItemError::QuantityNotInteger(dec!(1.5)))
    );
    assert_eq!(
        kitchen.get_order(order_id).await.unwrap().status,
        OrderStatus::Staging
    );

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_delivery_must_ship_before_finishing() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen
        .create_order(OrderCreate {
            fulfillment: Fulfillment::Delivery {
                address: "12 Harbour St".into(),
                contact: "555-0100".into(),
                delivery_fee: dec!(4.00),
            },
            observation: None,
        })
        .await
        .unwrap();
    kitchen.add_item(order_id, line(menu.cola, dec!(2))).await.unwrap();
    let launched = kitchen.launch_order(order_id).await.unwrap();
    assert!(queued(&launched).is_empty());

    let order = kitchen.get_order(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
    assert_eq!(order.total, dec!(10.00));

    assert_eq!(
        kitchen.finish_order(order_id).await,
        Err(KitchenError::Order(OrderError::DeliveryNotShipped))
    );
    kitchen.ship_order(order_id).await.unwrap();
    assert_eq!(
        kitchen
            .add_payment(order_id, dec!(10.00), kitchen_pipeline::model::PaymentMethod::Cash)
            .await,
        Ok(dec!(10.00))
    );
    kitchen.finish_order(order_id).await.unwrap();

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_launch_requires_items_and_staging() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    assert_eq!(
        kitchen.launch_order(order_id).await,
        Err(KitchenError::Order(OrderError::EmptyOrder))
    );
    assert!(matches!(
        kitchen.launch_order(OrderId(99)).await,
        Err(KitchenError::Order(OrderError::NotFound(_)))
    ));

    kitchen.add_item(order_id, line(menu.cola, dec!(1))).await.unwrap();
    kitchen.launch_order(order_id).await.unwrap();
    assert!(matches!(
        kitchen.add_item(order_id, line(menu.cola, dec!(1))).await,
        Err(KitchenError::Order(OrderError::NotStaging(OrderStatus::Ready)))
    ));

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_performance_report_covers_finished_work() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    let mut next = queued(&kitchen.launch_order(order_id).await.unwrap()).first().copied();
    while let Some(id) = next {
        kitchen.start_process(id, EmployeeId(7)).await.unwrap();
        next = kitchen.finish_process(id).await.unwrap().next_process;
    }

    let report = kitchen.performance_report(Utc::now()).await.unwrap();
    assert_eq!(report.open_queues, 0);
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].category_id, menu.burgers);
    assert_eq!(report.categories[0].finished, 2);
    assert_eq!(report.rules.len(), 2);
    assert_eq!(report.employees[0].employee_id, EmployeeId(7));
    assert!(report.rules[1].avg_queue_secs.is_some());

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_pending_group_rejects_fractional_item_changes() {
    let menu = menu();
    let (system, kitchen) = start(&menu);
    let patties = stock(&kitchen, menu.burger, dec!(10)).await;

    let order_id = kitchen.create_order(table()).await.unwrap();
    kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    let half = kitchen.add_item(order_id, line(menu.burger, dec!(0.5))).await.unwrap();
    kitchen.add_item(order_id, line(menu.burger, dec!(0.5))).await.unwrap();
    let group_item_id = half.group_item_id;
    assert!(kitchen.group_items().pend(group_item_id).await.unwrap());
    assert_eq!(on_hand(&kitchen, patties).await, dec!(8));

    // The order is still staging, so the next line lands in the pending group.
    assert_eq!(
        kitchen.add_item(order_id, line(menu.burger, dec!(0.5))).await,
        Err(KitchenError::GroupItem(GroupItemError::QuantityNotInteger(dec!(2.5))))
    );
    assert_eq!(
        kitchen
            .remove_item(group_item_id, half.item_id, None)
            .await
            .unwrap_err(),
        KitchenError::GroupItem(GroupItemError::QuantityNotInteger(dec!(1.5)))
    );

    let group = kitchen.group_items().get(group_item_id).await.unwrap().unwrap();
    assert_eq!(group.status, GroupItemStatus::Pending);
    assert_eq!(group.quantity, dec!(2));
    assert_eq!(group.items.len(), 3);
    assert_eq!(on_hand(&kitchen, patties).await, dec!(8));

    let whole = kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    assert_eq!(whole.group_item_id, group_item_id);
    assert_eq!(on_hand(&kitchen, patties).await, dec!(7));

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_rejected_launch_leaves_every_group_staging() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    let whole = kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    let half = kitchen
        .add_item(order_id, line(menu.large_burger, dec!(0.5)))
        .await
        .unwrap();
    assert_ne!(whole.group_item_id, half.group_item_id);

    assert_eq!(
        kitchen.launch_order(order_id).await,
        Err(KitchenError::GroupItem(GroupItemError::QuantityNotInteger(dec!(0.5))))
    );
    let order = kitchen.get_order(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Staging);
    assert!(order
        .groups
        .iter()
        .all(|g| g.status == GroupItemStatus::Staging));
    assert!(kitchen.processes().list().await.unwrap().is_empty());

    // The burger group still batches new lines.
    let again = kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    assert_eq!(again.group_item_id, whole.group_item_id);
    assert_eq!(kitchen.get_order(order_id).await.unwrap().groups.len(), 2);

    // Fixing the half portion lets the launch through.
    kitchen
        .add_item(order_id, line(menu.large_burger, dec!(0.5)))
        .await
        .unwrap();
    assert_eq!(queued(&kitchen.launch_order(order_id).await.unwrap()).len(), 2);

    shutdown(system, kitchen).await;
}

#[tokio::test]
async fn test_canceling_a_queued_stage_closes_its_queue() {
    let menu = menu();
    let (system, kitchen) = start(&menu);

    let order_id = kitchen.create_order(table()).await.unwrap();
    let placed = kitchen.add_item(order_id, line(menu.burger, dec!(1))).await.unwrap();
    let first = queued(&kitchen.launch_order(order_id).await.unwrap())[0];
    kitchen.start_process(first, EmployeeId(1)).await.unwrap();
    let second = kitchen.finish_process(first).await.unwrap().next_process.unwrap();

    let waiting = kitchen.processes().get(second).await.unwrap().unwrap();
    let queue_id = waiting.queue_id.unwrap();
    assert_eq!(
        kitchen.performance_report(Utc::now()).await.unwrap().open_queues,
        1
    );

    assert!(kitchen
        .cancel_group_item(placed.group_item_id, "dropped on the floor")
        .await
        .unwrap());

    let canceled = kitchen.processes().get(second).await.unwrap().unwrap();
    assert_eq!(canceled.status, ProcessStatus::Canceled);
    let queue = kitchen.queues().get(queue_id).await.unwrap().unwrap();
    assert!(queue.left_at.is_some());
    assert_eq!(
        kitchen.performance_report(Utc::now()).await.unwrap().open_queues,
        0
    );

    shutdown(system, kitchen).await;
}
