use crate::model::{
    GroupItemId, GroupSummary, Order, OrderCreate, OrderId, OrderUpdate, PaymentMethod,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, summary), fields(group_item_id = %summary.id))]
    pub async fn attach_group(&self, id: OrderId, summary: GroupSummary) -> Result<(), OrderError> {
        match self.act(id, OrderAction::AttachGroup(summary)).await? {
            OrderActionResult::AttachGroup => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Returns `true` when this sync made the order ready.
    #[instrument(skip(self, summary), fields(group_item_id = %summary.id))]
    pub async fn sync_group(&self, id: OrderId, summary: GroupSummary) -> Result<bool, OrderError> {
        match self.act(id, OrderAction::SyncGroup(summary)).await? {
            OrderActionResult::SyncGroup { order_ready } => Ok(order_ready),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn detach_group(&self, id: OrderId, group_item_id: GroupItemId) -> Result<bool, OrderError> {
        match self.act(id, OrderAction::DetachGroup(group_item_id)).await? {
            OrderActionResult::DetachGroup(removed) => Ok(removed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn launch(&self, id: OrderId) -> Result<(), OrderError> {
        match self.act(id, OrderAction::Launch).await? {
            OrderActionResult::Launch => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn ready(&self, id: OrderId) -> Result<bool, OrderError> {
        match self.act(id, OrderAction::Ready).await? {
            OrderActionResult::Ready(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn ship(&self, id: OrderId) -> Result<(), OrderError> {
        match self.act(id, OrderAction::Ship).await? {
            OrderActionResult::Ship => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn finish(&self, id: OrderId) -> Result<(), OrderError> {
        match self.act(id, OrderAction::Finish).await? {
            OrderActionResult::Finish => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<bool, OrderError> {
        match self.act(id, OrderAction::Cancel).await? {
            OrderActionResult::Cancel(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn archive(&self, id: OrderId) -> Result<bool, OrderError> {
        match self.act(id, OrderAction::Archive).await? {
            OrderActionResult::Archive(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }

    /// Returns the total paid so far.
    #[instrument(skip(self))]
    pub async fn add_payment(
        &self,
        id: OrderId,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Decimal, OrderError> {
        match self.act(id, OrderAction::AddPayment { amount, method }).await? {
            OrderActionResult::AddPayment(paid) => Ok(paid),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_total(&self, id: OrderId) -> Result<Decimal, OrderError> {
        match self.act(id, OrderAction::UpdateTotal).await? {
            OrderActionResult::UpdateTotal(total) => Ok(total),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunication(format!("unexpected reply: {result:?}"))
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunication(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn test_launch_error_is_typed() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(3))
            .return_err(FrameworkError::EntityError(Box::new(OrderError::EmptyOrder)));

        let client = OrderClient::new(mock.client());
        assert_eq!(client.launch(OrderId(3)).await, Err(OrderError::EmptyOrder));
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_a_communication_error() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::ActorClosed);

        let client = OrderClient::new(mock.client());
        let err = client.cancel(OrderId(1)).await.unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunication(_)));
    }

    #[tokio::test]
    async fn test_archive_reports_change() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(1))
            .return_ok(OrderActionResult::Archive(true));
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidTransition {
                    from: OrderStatus::Pending,
                    to: OrderStatus::Archived,
                },
            )));

        let client = OrderClient::new(mock.client());
        assert_eq!(client.archive(OrderId(1)).await, Ok(true));
        assert!(matches!(
            client.archive(OrderId(1)).await,
            Err(OrderError::InvalidTransition { .. })
        ));
        mock.verify();
    }
}
