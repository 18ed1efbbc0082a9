use crate::group_item_actor::{GroupItemAction, GroupItemActionResult, GroupItemError, NewItem};
use crate::model::{
    EmployeeId, GroupItem, GroupItemCreate, GroupItemId, Item, ItemId, ProcessId, ProductId,
    RuleId, StageOutcome,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the GroupItem actor.
#[derive(Clone)]
pub struct GroupItemClient {
    inner: ResourceClient<GroupItem>,
}

/// A line taken out of a group item.
#[derive(Debug, Clone)]
pub struct RemovedItem {
    pub item: Item,
    /// The group has no items left and may be deleted.
    pub group_empty: bool,
}

impl GroupItemClient {
    pub fn new(inner: ResourceClient<GroupItem>) -> Self {
        Self { inner }
    }

    /// Creates a group item and attaches it to its order.
    #[instrument(skip(self))]
    pub async fn create_group_item(&self, params: GroupItemCreate) -> Result<GroupItemId, GroupItemError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    async fn act(
        &self,
        id: GroupItemId,
        action: GroupItemAction,
    ) -> Result<GroupItemActionResult, GroupItemError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, id: GroupItemId, item: NewItem) -> Result<ItemId, GroupItemError> {
        match self.act(id, GroupItemAction::AddItem(item)).await? {
            GroupItemActionResult::AddItem(item_id) => Ok(item_id),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        id: GroupItemId,
        item_id: ItemId,
        employee_id: Option<EmployeeId>,
    ) -> Result<RemovedItem, GroupItemError> {
        let action = GroupItemAction::RemoveItem {
            item_id,
            employee_id,
        };
        match self.act(id, action).await? {
            GroupItemActionResult::RemoveItem {
                removed,
                group_empty,
            } => Ok(RemovedItem {
                item: removed,
                group_empty,
            }),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_additional_item(
        &self,
        id: GroupItemId,
        item_id: ItemId,
        product_id: ProductId,
        quantity: Decimal,
    ) -> Result<(), GroupItemError> {
        let action = GroupItemAction::AddAdditionalItem {
            item_id,
            product_id,
            quantity,
        };
        match self.act(id, action).await? {
            GroupItemActionResult::AddAdditionalItem => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_additional_item(
        &self,
        id: GroupItemId,
        item_id: ItemId,
        product_id: ProductId,
    ) -> Result<(), GroupItemError> {
        let action = GroupItemAction::RemoveAdditionalItem {
            item_id,
            product_id,
        };
        match self.act(id, action).await? {
            GroupItemActionResult::RemoveAdditionalItem => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_removed_ingredient(
        &self,
        id: GroupItemId,
        item_id: ItemId,
        name: String,
    ) -> Result<bool, GroupItemError> {
        match self
            .act(id, GroupItemAction::AddRemovedIngredient { item_id, name })
            .await?
        {
            GroupItemActionResult::AddRemovedIngredient(added) => Ok(added),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_removed_ingredient(
        &self,
        id: GroupItemId,
        item_id: ItemId,
        name: String,
    ) -> Result<bool, GroupItemError> {
        match self
            .act(id, GroupItemAction::RemoveRemovedIngredient { item_id, name })
            .await?
        {
            GroupItemActionResult::RemoveRemovedIngredient(removed) => Ok(removed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_complement(&self, id: GroupItemId, product_id: ProductId) -> Result<(), GroupItemError> {
        match self
            .act(id, GroupItemAction::SetComplement { product_id })
            .await?
        {
            GroupItemActionResult::SetComplement => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_complement(&self, id: GroupItemId) -> Result<(), GroupItemError> {
        match self.act(id, GroupItemAction::RemoveComplement).await? {
            GroupItemActionResult::RemoveComplement => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn pend(&self, id: GroupItemId) -> Result<bool, GroupItemError> {
        match self.act(id, GroupItemAction::Pend).await? {
            GroupItemActionResult::Pend(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn start(&self, id: GroupItemId) -> Result<bool, GroupItemError> {
        match self.act(id, GroupItemAction::Start).await? {
            GroupItemActionResult::Start(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }

    /// Returns `true` when readying this group made its order ready.
    #[instrument(skip(self))]
    pub async fn ready(&self, id: GroupItemId) -> Result<bool, GroupItemError> {
        match self.act(id, GroupItemAction::Ready).await? {
            GroupItemActionResult::Ready { order_ready, .. } => Ok(order_ready),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: GroupItemId) -> Result<bool, GroupItemError> {
        match self.act(id, GroupItemAction::Cancel).await? {
            GroupItemActionResult::Cancel(changed) => Ok(changed),
            other => Err(unexpected(other)),
        }
    }

    /// `(quantity, total_price)` of the group.
    #[instrument(skip(self))]
    pub async fn calculate_total_price(&self, id: GroupItemId) -> Result<(Decimal, Decimal), GroupItemError> {
        match self.act(id, GroupItemAction::CalculateTotalPrice).await? {
            GroupItemActionResult::CalculateTotalPrice {
                quantity,
                total_price,
            } => Ok((quantity, total_price)),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn can_add_items(&self, id: GroupItemId) -> Result<bool, GroupItemError> {
        match self.act(id, GroupItemAction::CanAddItems).await? {
            GroupItemActionResult::CanAddItems(open) => Ok(open),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn enter_stage(
        &self,
        id: GroupItemId,
        rule_id: RuleId,
        process_id: ProcessId,
    ) -> Result<Vec<ProductId>, GroupItemError> {
        let action = GroupItemAction::EnterStage {
            rule_id,
            process_id,
        };
        match self.act(id, action).await? {
            GroupItemActionResult::EnterStage(products) => Ok(products),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn start_stage(&self, id: GroupItemId, process_id: ProcessId) -> Result<(), GroupItemError> {
        match self.act(id, GroupItemAction::StartStage(process_id)).await? {
            GroupItemActionResult::StartStage => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn finish_stage(
        &self,
        id: GroupItemId,
        process_id: ProcessId,
    ) -> Result<StageOutcome, GroupItemError> {
        match self.act(id, GroupItemAction::FinishStage(process_id)).await? {
            GroupItemActionResult::FinishStage(outcome) => Ok(outcome),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn abandon_stage(&self, id: GroupItemId, process_id: ProcessId) -> Result<bool, GroupItemError> {
        match self.act(id, GroupItemAction::AbandonStage(process_id)).await? {
            GroupItemActionResult::AbandonStage(released) => Ok(released),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: GroupItemActionResult) -> GroupItemError {
    GroupItemError::ActorCommunication(format!("unexpected reply: {result:?}"))
}

#[async_trait]
impl ActorClient<GroupItem> for GroupItemClient {
    type Error = GroupItemError;

    fn inner(&self) -> &ResourceClient<GroupItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<GroupItemError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => GroupItemError::NotFound(id),
            Err(other) => GroupItemError::ActorCommunication(other.to_string()),
        }
    }
}
