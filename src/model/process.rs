//! One execution of a process rule against a group item.
//!
//! `Pending → Started ↔ Paused → Finished`, `Canceled` from any non-terminal state.

use crate::model::catalog::ProcessRule;
use crate::model::ids::{CategoryId, EmployeeId, GroupItemId, ProcessId, ProductId, QueueId, RuleId};
use crate::process_actor::ProcessError;
use crate::model::serde_helpers::{duration_ms, option_duration_ms};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Pending,
    Started,
    Paused,
    Finished,
    Canceled,
}

impl ProcessStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessStatus::Finished | ProcessStatus::Canceled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProcess {
    pub id: ProcessId,
    pub group_item_id: GroupItemId,
    pub rule_id: RuleId,
    pub rule_order: u32,
    pub category_id: CategoryId,
    /// Distinct products in the group when the stage was entered.
    pub product_ids: Vec<ProductId>,
    /// Queue the group waited in before this stage; closed when the process starts.
    pub queue_id: Option<QueueId>,
    pub status: ProcessStatus,
    pub employee_id: Option<EmployeeId>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(with = "duration_ms")]
    pub total_paused: Duration,
    /// Working time net of pauses, set on finish.
    #[serde(with = "option_duration_ms")]
    pub duration: Option<Duration>,
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCreate {
    pub group_item_id: GroupItemId,
    pub rule: ProcessRule,
    pub queue_id: Option<QueueId>,
}

impl OrderProcess {
    pub fn new(id: ProcessId, params: ProcessCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            group_item_id: params.group_item_id,
            rule_id: params.rule.id,
            rule_order: params.rule.order,
            category_id: params.rule.category_id,
            product_ids: Vec::new(),
            queue_id: params.queue_id,
            status: ProcessStatus::Pending,
            employee_id: None,
            created_at: now,
            started_at: None,
            paused_at: None,
            finished_at: None,
            canceled_at: None,
            total_paused: Duration::zero(),
            duration: None,
            cancel_reason: None,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn ensure_pending(&self) -> Result<(), ProcessError> {
        if self.status != ProcessStatus::Pending {
            return Err(ProcessError::NotPending(self.status));
        }
        Ok(())
    }

    pub fn ensure_started(&self) -> Result<(), ProcessError> {
        if self.status != ProcessStatus::Started {
            return Err(ProcessError::NotStarted(self.status));
        }
        Ok(())
    }

    pub fn start(&mut self, employee_id: EmployeeId, now: DateTime<Utc>) -> Result<(), ProcessError> {
        self.ensure_pending()?;
        self.status = ProcessStatus::Started;
        self.employee_id = Some(employee_id);
        self.started_at = Some(now);
        Ok(())
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), ProcessError> {
        self.ensure_started()?;
        self.status = ProcessStatus::Paused;
        self.paused_at = Some(now);
        Ok(())
    }

    /// Resumes a paused process. Returns the accumulated pause time.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<Duration, ProcessError> {
        if self.status != ProcessStatus::Paused {
            return Err(ProcessError::NotPaused(self.status));
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.total_paused += (now - paused_at).max(Duration::zero());
        }
        self.status = ProcessStatus::Started;
        Ok(self.total_paused)
    }

    /// Returns the working time net of pauses.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<Duration, ProcessError> {
        self.ensure_started()?;
        let elapsed = self.started_at.map(|s| now - s).unwrap_or_else(Duration::zero);
        let duration = (elapsed - self.total_paused).max(Duration::zero());
        self.status = ProcessStatus::Finished;
        self.finished_at = Some(now);
        self.duration = Some(duration);
        Ok(duration)
    }

    pub fn cancel(&mut self, reason: &str, now: DateTime<Utc>) -> Result<(), ProcessError> {
        if reason.trim().is_empty() {
            return Err(ProcessError::MissingCancelReason);
        }
        if self.status.is_terminal() {
            return Err(ProcessError::AlreadyTerminal(self.status));
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.total_paused += (now - paused_at).max(Duration::zero());
        }
        self.status = ProcessStatus::Canceled;
        self.canceled_at = Some(now);
        self.cancel_reason = Some(reason.trim().to_string());
        Ok(())
    }
}
