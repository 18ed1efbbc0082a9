//! System wiring and process-wide setup.

pub mod kitchen_system;
pub mod tracing;

pub use kitchen_system::*;
pub use self::tracing::*;
