use chrono::Duration;

#[derive(Debug, Clone)]
pub enum QueueAction {
    /// Marks the group as having left the queue.
    Close,
}

/// Results from QueueActions - variants match 1:1 with QueueAction
#[derive(Debug, Clone)]
pub enum QueueActionResult {
    /// Time spent waiting.
    Close(Duration),
}
