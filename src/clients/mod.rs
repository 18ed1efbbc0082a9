//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).
//!
//! One client per actor. Each recovers its actor's typed error from the
//! framework envelope, so callers match on domain variants such as
//! [`StockError::InsufficientStock`](crate::stock_actor::StockError::InsufficientStock)
//! instead of strings.

pub mod group_item_client;
pub mod order_client;
pub mod process_client;
pub mod queue_client;
pub mod stock_client;

pub use group_item_client::*;
pub use order_client::*;
pub use process_client::*;
pub use queue_client::*;
pub use stock_client::*;
