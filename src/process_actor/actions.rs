//! Custom actions for the Process actor.

use crate::model::{EmployeeId, GroupItemId, ProcessRule, QueueId};
use chrono::Duration;

#[derive(Debug, Clone)]
pub enum ProcessAction {
    /// Claims the stage for `employee_id` and closes the wait queue, if any.
    Start { employee_id: EmployeeId },
    Pause,
    Continue,
    /// Completes the stage and opens the queue toward the next one.
    Finish,
    Cancel { reason: String },
}

/// What finishing a stage set in motion. The caller creates the next process.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishOutcome {
    pub group_item_id: GroupItemId,
    pub next_rule: Option<ProcessRule>,
    pub queue_id: Option<QueueId>,
    pub group_ready: bool,
    pub order_ready: bool,
    /// Working time net of pauses.
    pub duration: Duration,
}

/// Results from ProcessActions - variants match 1:1 with ProcessAction
#[derive(Debug, Clone)]
pub enum ProcessActionResult {
    Start,
    Pause,
    /// Pause time accumulated so far.
    Continue(Duration),
    Finish(FinishOutcome),
    Cancel,
}
