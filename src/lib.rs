//! # Kitchen Pipeline
//!
//! Restaurant order fulfillment built on [`actor_framework`]: orders are
//! itemized into group items, each group item travels through its category's
//! production stages, and every item add or removal moves the stock ledger.
//!
//! ## Architecture
//!
//! One [`ResourceActor`](actor_framework::ResourceActor) per aggregate type,
//! so every aggregate has a single writer:
//!
//! | Actor | Aggregate | Calls |
//! |---|---|---|
//! | [`stock_actor`] | [`Stock`](model::Stock) and its movement ledger | - |
//! | [`order_actor`] | [`Order`](model::Order) | - |
//! | [`queue_actor`] | [`OrderQueue`](model::OrderQueue) | - |
//! | [`group_item_actor`] | [`GroupItem`](model::GroupItem) and its items | order, stock |
//! | [`process_actor`] | [`OrderProcess`](model::OrderProcess) | group item, queue |
//!
//! Calls only flow down this table, so no actor ever waits on one that is
//! waiting on it.
//!
//! ## Module Tour
//!
//! - [`model`]: data and pure state transitions; the [`Catalog`](model::Catalog)
//!   of categories, products and process rules
//! - [`clients`]: typed wrappers over each actor's mailbox
//! - [`kitchen`]: the [`Kitchen`](kitchen::Kitchen) use-case facade
//! - [`analytics`]: performance metrics over process and queue history
//! - [`notify`]: operator-display events
//! - [`lifecycle`]: [`KitchenSystem`](lifecycle::KitchenSystem) wiring and tracing setup
//! - [`config`]: environment configuration
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run --bin kitchen-demo
//! ```

pub mod analytics;
pub mod clients;
pub mod config;
pub mod group_item_actor;
pub mod kitchen;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod process_actor;
pub mod queue_actor;
pub mod stock_actor;

pub use kitchen::{Kitchen, KitchenError};
pub use lifecycle::KitchenSystem;
