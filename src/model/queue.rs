use crate::model::ids::{CategoryId, GroupItemId, QueueId, RuleId};
use crate::queue_actor::QueueError;
use crate::model::serde_helpers::option_duration_ms;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time a group item waits between finishing one stage and starting the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderQueue {
    pub id: QueueId,
    pub group_item_id: GroupItemId,
    pub category_id: CategoryId,
    pub from_rule: RuleId,
    pub to_rule: RuleId,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    #[serde(with = "option_duration_ms")]
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct QueueCreate {
    pub group_item_id: GroupItemId,
    pub category_id: CategoryId,
    pub from_rule: RuleId,
    pub to_rule: RuleId,
    pub joined_at: DateTime<Utc>,
}

impl OrderQueue {
    pub fn new(id: QueueId, params: QueueCreate) -> Self {
        Self {
            id,
            group_item_id: params.group_item_id,
            category_id: params.category_id,
            from_rule: params.from_rule,
            to_rule: params.to_rule,
            joined_at: params.joined_at,
            left_at: None,
            duration: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.left_at.is_none()
    }

    pub fn close(&mut self, now: DateTime<Utc>) -> Result<Duration, QueueError> {
        if !self.is_open() {
            return Err(QueueError::AlreadyClosed(self.id));
        }
        let waited = (now - self.joined_at).max(Duration::zero());
        self.left_at = Some(now);
        self.duration = Some(waited);
        Ok(waited)
    }
}
