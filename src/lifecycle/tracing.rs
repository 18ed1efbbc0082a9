//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber. Levels come from
//! `RUST_LOG`; the format from [`KitchenConfig::log_format`].
//!
//! The module path is hidden (`with_target(false)`): every actor log line
//! already carries an `entity_type` field.
//!
//! ```bash
//! # Outcomes only
//! RUST_LOG=info cargo run
//!
//! # Request payloads and client spans
//! RUST_LOG=debug cargo run
//!
//! # One JSON object per line
//! KITCHEN_LOG_FORMAT=json RUST_LOG=info cargo run
//! ```
//!
//! A stage finishing at `info` reads roughly:
//!
//! ```text
//! INFO finish_process{id=process_1}: Action ok entity_type="GroupItem" id=group_item_1
//! INFO finish_process{id=process_1}: Notified group_item_id=group_item_1 destination="oven" receivers=1
//! INFO finish_process{id=process_1}: Action ok entity_type="OrderProcess" id=process_1
//! INFO finish_process{id=process_1}: Created entity_type="OrderProcess" id=process_2 size=2
//! ```

use crate::config::{KitchenConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Calling it twice keeps the first one.
pub fn setup_tracing(config: &KitchenConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
