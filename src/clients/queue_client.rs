use crate::model::{OrderQueue, QueueCreate, QueueId};
use crate::queue_actor::{QueueAction, QueueActionResult, QueueError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, instrument};

/// Client for interacting with the Queue actor.
#[derive(Clone)]
pub struct QueueClient {
    inner: ResourceClient<OrderQueue>,
}

impl QueueClient {
    pub fn new(inner: ResourceClient<OrderQueue>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn open(&self, params: QueueCreate) -> Result<QueueId, QueueError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Returns the time spent waiting.
    #[instrument(skip(self))]
    pub async fn close(&self, id: QueueId) -> Result<Duration, QueueError> {
        let result = self
            .inner
            .perform_action(id, QueueAction::Close)
            .await
            .map_err(Self::map_error)?;
        match result {
            QueueActionResult::Close(waited) => Ok(waited),
        }
    }
}

#[async_trait]
impl ActorClient<OrderQueue> for QueueClient {
    type Error = QueueError;

    fn inner(&self) -> &ResourceClient<OrderQueue> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<QueueError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => QueueError::NotFound(id),
            Err(other) => QueueError::ActorCommunication(other.to_string()),
        }
    }
}
