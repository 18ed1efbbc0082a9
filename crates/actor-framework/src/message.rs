//! # Generic Messages
//!
//! Requests exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants are the lifecycle of a persistent aggregate:
///
/// - **Create**: builds a new aggregate from [`ActorEntity::Create`].
/// - **Get**: loads one aggregate by ID.
/// - **List**: loads every aggregate held by the actor (read-only projections).
/// - **Update**: applies an [`ActorEntity::Update`] payload.
/// - **Delete**: removes the aggregate after its `on_delete` hook succeeds.
/// - **Action**: runs a domain operation ([`ActorEntity::Action`]).
///
/// Because every request for a given entity type goes through one mailbox,
/// mutations of the same aggregate can never interleave.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
