use crate::model::{EmployeeId, OrderProcess, ProcessCreate, ProcessId};
use crate::process_actor::{FinishOutcome, ProcessAction, ProcessActionResult, ProcessError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Process actor.
#[derive(Clone)]
pub struct ProcessClient {
    inner: ResourceClient<OrderProcess>,
}

/// Result of finishing a stage, after the follow-up stage was queued.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedProcess {
    pub duration: Duration,
    /// Process created for the next stage, if there is one.
    pub next_process: Option<ProcessId>,
    /// Set when the next stage's process could not be created. The stage
    /// itself is finished and its queue stays open until `retry` succeeds.
    pub unqueued: Option<UnqueuedStage>,
    pub group_ready: bool,
    pub order_ready: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnqueuedStage {
    pub retry: ProcessCreate,
    pub error: ProcessError,
}

impl ProcessClient {
    pub fn new(inner: ResourceClient<OrderProcess>) -> Self {
        Self { inner }
    }

    /// Creates a process for a stage. Fails unless the stage directly follows
    /// the last one finished on the group item.
    #[instrument(skip(self))]
    pub async fn create_process(&self, params: ProcessCreate) -> Result<ProcessId, ProcessError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    async fn act(&self, id: ProcessId, action: ProcessAction) -> Result<ProcessActionResult, ProcessError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn start_process(&self, id: ProcessId, employee_id: EmployeeId) -> Result<(), ProcessError> {
        match self.act(id, ProcessAction::Start { employee_id }).await? {
            ProcessActionResult::Start => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn pause_process(&self, id: ProcessId) -> Result<(), ProcessError> {
        match self.act(id, ProcessAction::Pause).await? {
            ProcessActionResult::Pause => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Returns the pause time accumulated so far.
    #[instrument(skip(self))]
    pub async fn continue_process(&self, id: ProcessId) -> Result<Duration, ProcessError> {
        match self.act(id, ProcessAction::Continue).await? {
            ProcessActionResult::Continue(paused) => Ok(paused),
            other => Err(unexpected(other)),
        }
    }

    /// Finishes the stage and creates the process for the next one.
    ///
    /// Once the finish is accepted this returns `Ok`; a failure to create the
    /// next process is reported in [`FinishedProcess::unqueued`].
    #[instrument(skip(self))]
    pub async fn finish_process(&self, id: ProcessId) -> Result<FinishedProcess, ProcessError> {
        let outcome: FinishOutcome = match self.act(id, ProcessAction::Finish).await? {
            ProcessActionResult::Finish(outcome) => outcome,
            other => return Err(unexpected(other)),
        };

        let mut next_process = None;
        let mut unqueued = None;
        if let Some(rule) = outcome.next_rule {
            let params = ProcessCreate {
                group_item_id: outcome.group_item_id,
                rule,
                queue_id: outcome.queue_id,
            };
            match self.create_process(params.clone()).await {
                Ok(next) => {
                    info!(finished = %id, %next, "Next stage queued");
                    next_process = Some(next);
                }
                Err(error) => {
                    warn!(finished = %id, %error, "Next stage not queued");
                    unqueued = Some(UnqueuedStage {
                        retry: params,
                        error,
                    });
                }
            }
        }

        Ok(FinishedProcess {
            duration: outcome.duration,
            next_process,
            unqueued,
            group_ready: outcome.group_ready,
            order_ready: outcome.order_ready,
        })
    }

    #[instrument(skip(self))]
    pub async fn cancel_process(&self, id: ProcessId, reason: String) -> Result<(), ProcessError> {
        match self.act(id, ProcessAction::Cancel { reason }).await? {
            ProcessActionResult::Cancel => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProcessActionResult) -> ProcessError {
    ProcessError::ActorCommunication(format!("unexpected reply: {result:?}"))
}

#[async_trait]
impl ActorClient<OrderProcess> for ProcessClient {
    type Error = ProcessError;

    fn inner(&self) -> &ResourceClient<OrderProcess> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<ProcessError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => ProcessError::NotFound(id),
            Err(other) => ProcessError::ActorCommunication(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, GroupItemId, ProcessRule, QueueId, RuleId};
    use actor_framework::mock::{create_mock_client, expect_action, expect_create};

    fn rule(id: u32, order: u32) -> ProcessRule {
        ProcessRule {
            id: RuleId(id),
            name: format!("stage {order}"),
            order,
            category_id: CategoryId(1),
            ideal_time: Duration::minutes(5),
        }
    }

    #[tokio::test]
    async fn test_finish_creates_next_stage_process() {
        let (inner, mut receiver) = create_mock_client::<OrderProcess>(8);
        let client = ProcessClient::new(inner);

        let task = tokio::spawn(async move { client.finish_process(ProcessId(1)).await });

        let (id, action, respond_to) = expect_action(&mut receiver).await.unwrap();
        assert_eq!(id, ProcessId(1));
        assert!(matches!(action, ProcessAction::Finish));
        respond_to
            .send(Ok(ProcessActionResult::Finish(FinishOutcome {
                group_item_id: GroupItemId(4),
                next_rule: Some(rule(2, 2)),
                queue_id: Some(QueueId(9)),
                group_ready: false,
                order_ready: false,
                duration: Duration::minutes(3),
            })))
            .unwrap();

        let (params, respond_to) = expect_create(&mut receiver).await.unwrap();
        assert_eq!(params.group_item_id, GroupItemId(4));
        assert_eq!(params.rule.id, RuleId(2));
        assert_eq!(params.queue_id, Some(QueueId(9)));
        respond_to.send(Ok(ProcessId(2))).unwrap();

        let finished = task.await.unwrap().unwrap();
        assert_eq!(finished.next_process, Some(ProcessId(2)));
        assert!(finished.unqueued.is_none());
        assert_eq!(finished.duration, Duration::minutes(3));
    }

    #[tokio::test]
    async fn test_finish_survives_failed_next_stage_creation() {
        let (inner, mut receiver) = create_mock_client::<OrderProcess>(8);
        let client = ProcessClient::new(inner);

        let task = tokio::spawn(async move { client.finish_process(ProcessId(1)).await });

        let (_, _, respond_to) = expect_action(&mut receiver).await.unwrap();
        respond_to
            .send(Ok(ProcessActionResult::Finish(FinishOutcome {
                group_item_id: GroupItemId(4),
                next_rule: Some(rule(2, 2)),
                queue_id: Some(QueueId(9)),
                group_ready: false,
                order_ready: false,
                duration: Duration::minutes(3),
            })))
            .unwrap();

        let (_, respond_to) = expect_create(&mut receiver).await.unwrap();
        respond_to.send(Err(FrameworkError::ActorClosed)).unwrap();

        let finished = task.await.unwrap().unwrap();
        assert_eq!(finished.next_process, None);
        assert_eq!(finished.duration, Duration::minutes(3));
        let unqueued = finished.unqueued.unwrap();
        assert_eq!(unqueued.retry.rule.id, RuleId(2));
        assert_eq!(unqueued.retry.queue_id, Some(QueueId(9)));
        assert!(matches!(unqueued.error, ProcessError::ActorCommunication(_)));
    }

    #[tokio::test]
    async fn test_last_stage_creates_nothing() {
        let (inner, mut receiver) = create_mock_client::<OrderProcess>(8);
        let client = ProcessClient::new(inner);

        let task = tokio::spawn(async move { client.finish_process(ProcessId(5)).await });

        let (_, _, respond_to) = expect_action(&mut receiver).await.unwrap();
        respond_to
            .send(Ok(ProcessActionResult::Finish(FinishOutcome {
                group_item_id: GroupItemId(1),
                next_rule: None,
                queue_id: None,
                group_ready: true,
                order_ready: true,
                duration: Duration::minutes(1),
            })))
            .unwrap();

        let finished = task.await.unwrap().unwrap();
        assert_eq!(finished.next_process, None);
        assert!(finished.group_ready && finished.order_ready);
    }
}
