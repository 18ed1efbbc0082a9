use crate::model::{
    EmployeeId, ManualMovement, Reservation, Stock, StockAlert, StockCreate, StockId,
    StockMovement, StockUpdate,
};
use crate::stock_actor::{StockAction, StockActionResult, StockError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the Stock actor.
#[derive(Clone)]
pub struct StockClient {
    inner: ResourceClient<Stock>,
}

impl StockClient {
    pub fn new(inner: ResourceClient<Stock>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_stock(&self, params: StockCreate) -> Result<StockId, StockError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_stock(&self, id: StockId, update: StockUpdate) -> Result<Stock, StockError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn act(&self, id: StockId, action: StockAction) -> Result<StockActionResult, StockError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn reserve(&self, id: StockId, reservation: Reservation) -> Result<StockMovement, StockError> {
        match self.act(id, StockAction::Reserve(reservation)).await? {
            StockActionResult::Reserve(movement) => Ok(movement),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, id: StockId, reservation: Reservation) -> Result<StockMovement, StockError> {
        match self.act(id, StockAction::Restore(reservation)).await? {
            StockActionResult::Restore(movement) => Ok(movement),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_movement(&self, id: StockId, movement: ManualMovement) -> Result<StockMovement, StockError> {
        match self.act(id, StockAction::AddMovement(movement)).await? {
            StockActionResult::AddMovement(movement) => Ok(movement),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_movement(
        &self,
        id: StockId,
        movement: ManualMovement,
    ) -> Result<StockMovement, StockError> {
        match self.act(id, StockAction::RemoveMovement(movement)).await? {
            StockActionResult::RemoveMovement(movement) => Ok(movement),
            other => Err(unexpected(other)),
        }
    }

    /// Sets the absolute level. `None` when nothing had to move.
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        id: StockId,
        new_stock: Decimal,
        reason: Option<String>,
        employee_id: Option<EmployeeId>,
    ) -> Result<Option<StockMovement>, StockError> {
        let action = StockAction::Adjust {
            new_stock,
            reason,
            employee_id,
        };
        match self.act(id, action).await? {
            StockActionResult::Adjust(movement) => Ok(movement),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn check_alerts(&self, id: StockId) -> Result<Vec<StockAlert>, StockError> {
        match self.act(id, StockAction::CheckAlerts).await? {
            StockActionResult::CheckAlerts(alerts) => Ok(alerts),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn stock_level(&self, id: StockId) -> Result<Decimal, StockError> {
        match self.act(id, StockAction::StockLevel).await? {
            StockActionResult::StockLevel(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: StockActionResult) -> StockError {
    StockError::ActorCommunication(format!("unexpected reply: {result:?}"))
}

#[async_trait]
impl ActorClient<Stock> for StockClient {
    type Error = StockError;

    fn inner(&self) -> &ResourceClient<Stock> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<StockError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => StockError::NotFound(id),
            Err(other) => StockError::ActorCommunication(other.to_string()),
        }
    }
}
