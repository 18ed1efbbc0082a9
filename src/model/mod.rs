//! Domain model: plain data plus the pure state transitions of each aggregate.
//!
//! Actors wrap these types; nothing here performs I/O or talks to another actor.

pub mod catalog;
pub mod group_item;
pub mod ids;
pub mod item;
pub mod order;
pub mod process;
pub mod queue;
pub mod serde_helpers;
pub mod stock;

pub use catalog::*;
pub use group_item::*;
pub use ids::*;
pub use item::*;
pub use order::*;
pub use process::*;
pub use queue::*;
pub use stock::*;

/// Update payload of aggregates that only change through actions.
#[derive(Debug, Clone, Copy)]
pub enum NoUpdate {}
