//! Walks one table order through the kitchen: two burgers that go through prep
//! and grill, plus a drink that needs no production.

use chrono::{Duration, Utc};
use kitchen_pipeline::config::KitchenConfig;
use kitchen_pipeline::group_item_actor::NewItem;
use kitchen_pipeline::kitchen::LaunchedGroup;
use kitchen_pipeline::lifecycle::{setup_tracing, KitchenSystem};
use kitchen_pipeline::model::{
    Catalog, EmployeeId, Fulfillment, NewCategory, NewProduct, NewRule, OrderCreate,
    PaymentMethod, ProductId, StockCreate,
};
use rust_decimal_macros::dec;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn, Instrument};

fn demo_catalog() -> Result<(Catalog, [ProductId; 2]), Box<dyn std::error::Error>> {
    let catalog = Catalog::new();
    let burgers = catalog.add_category(NewCategory {
        name: "burgers".into(),
        allow_fractional_quantity: false,
        needs_production: true,
        printer: Some("pass".into()),
    });
    let drinks = catalog.add_category(NewCategory {
        name: "drinks".into(),
        allow_fractional_quantity: false,
        needs_production: false,
        printer: Some("bar".into()),
    });
    catalog.add_rule(NewRule {
        name: "prep".into(),
        order: 1,
        category_id: burgers,
        ideal_time: Duration::minutes(3),
    })?;
    catalog.add_rule(NewRule {
        name: "grill".into(),
        order: 2,
        category_id: burgers,
        ideal_time: Duration::minutes(8),
    })?;
    let burger = catalog.add_product(NewProduct {
        name: "cheeseburger".into(),
        price: dec!(12.50),
        category_id: burgers,
        size: None,
    })?;
    let cola = catalog.add_product(NewProduct {
        name: "cola".into(),
        price: dec!(3.00),
        category_id: drinks,
        size: None,
    })?;
    Ok((catalog, [burger, cola]))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = KitchenConfig::from_env();
    setup_tracing(&config);

    let (catalog, [burger, cola]) = demo_catalog()?;
    let system = KitchenSystem::new(&config, catalog);
    let kitchen = system.kitchen();

    let mut events = system.subscribe();
    let display = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => info!(%json, "Display"),
                    Err(e) => warn!(error = %e, "Unprintable event"),
                },
                Err(RecvError::Lagged(missed)) => warn!(missed, "Display lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let patties = kitchen
        .track_stock(
            burger,
            StockCreate {
                product_id: burger,
                variation: None,
                initial_stock: dec!(20),
                min_stock: dec!(5),
                max_stock: dec!(40),
                unit: "unit".into(),
            },
        )
        .await?;

    let order_id = async {
        let order_id = kitchen
            .create_order(OrderCreate {
                fulfillment: Fulfillment::Table {
                    table_number: 7,
                    service_fee: dec!(2.50),
                },
                observation: None,
            })
            .await?;
        for (product_id, quantity) in [(burger, dec!(2)), (cola, dec!(1))] {
            kitchen
                .add_item(
                    order_id,
                    NewItem {
                        product_id,
                        quantity,
                        observation: None,
                        employee_id: None,
                    },
                )
                .await?;
        }
        Ok::<_, kitchen_pipeline::KitchenError>(order_id)
    }
    .instrument(tracing::info_span!("counter"))
    .await?;

    let launched = kitchen.launch_order(order_id).await?;

    async {
        for group in launched {
            let LaunchedGroup::Queued { process_id, .. } = group else {
                continue;
            };
            let mut next = Some(process_id);
            while let Some(process_id) = next {
                kitchen.start_process(process_id, EmployeeId(1)).await?;
                next = kitchen.finish_process(process_id).await?.next_process;
            }
        }
        Ok::<_, kitchen_pipeline::KitchenError>(())
    }
    .instrument(tracing::info_span!("line"))
    .await?;

    let order = kitchen.get_order(order_id).await?;
    info!(%order_id, status = ?order.status, total = %order.total, "Order produced");
    kitchen
        .add_payment(order_id, order.total, PaymentMethod::Card)
        .await?;
    kitchen.finish_order(order_id).await?;

    let level_pct = kitchen.stocks().stock_level(patties).await?;
    let alerts = kitchen.stocks().check_alerts(patties).await?;
    info!(%patties, %level_pct, alerts = alerts.len(), "Stock after service");

    let report = kitchen.performance_report(Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    drop(kitchen);
    system.shutdown().await?;
    display.await?;
    Ok(())
}
