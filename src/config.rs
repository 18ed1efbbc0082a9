//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `KITCHEN_ACTOR_BUFFER` | `32` |
//! | `KITCHEN_EVENT_CAPACITY` | `1024` |
//! | `KITCHEN_LOG_FORMAT` | `compact` (or `json`) |
//! | `KITCHEN_DEFAULT_PRINTER` | `kitchen` |
//!
//! Unparseable values fall back to the default.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Mailbox size of every actor.
    pub actor_buffer: usize,
    /// Buffered notifications per subscriber before the slowest one lags.
    pub event_capacity: usize,
    pub log_format: LogFormat,
    /// Destination for finished groups whose category has no printer.
    pub default_printer: String,
}

impl KitchenConfig {
    pub fn from_env() -> Self {
        Self {
            actor_buffer: std::env::var("KITCHEN_ACTOR_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(32),
            event_capacity: std::env::var("KITCHEN_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1024),
            log_format: std::env::var("KITCHEN_LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            default_printer: std::env::var("KITCHEN_DEFAULT_PRINTER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "kitchen".into()),
        }
    }
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            actor_buffer: 32,
            event_capacity: 1024,
            log_format: LogFormat::Compact,
            default_printer: "kitchen".into(),
        }
    }
}
