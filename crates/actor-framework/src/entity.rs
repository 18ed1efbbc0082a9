//! # ActorEntity Trait
//!
//! The contract every aggregate (stock row, group item, order, production
//! process, ...) implements to be owned by a [`ResourceActor`](crate::ResourceActor).
//!
//! Associated types pin down the payloads accepted for each operation, so a
//! `StockCreate` can never be sent to the order actor.
//!
//! [`ActorEntity::on_create`] and [`ActorEntity::on_delete`] have no-op
//! defaults; the other hooks are required.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// An aggregate owned by a `ResourceActor`.
///
/// # Hooks and context
/// Hooks are `async` so an aggregate can call other actors (an order line
/// reserving stock, a production stage advancing its group item). The
/// `Context` holds those dependencies and is injected by `run()`, which lets
/// actors be wired after they are all constructed.
///
/// # Failure semantics
/// When `on_update` or `handle_action` returns an error the actor restores the
/// aggregate to the state it had before the request. Implementations may
/// therefore mutate `self` freely and bail out with `?`; side effects on
/// *other* actors are not undone and must be ordered after validation.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier handed out by the actor's `u32` counter.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Creation payload.
    type Create: Send + Sync + Debug;

    /// Partial update payload; use an empty enum when updates are unsupported.
    type Update: Send + Sync + Debug;

    /// Enum representing aggregate-specific operations (e.g. `Reserve`).
    type Action: Send + Sync + Debug;

    /// Reply of [`handle_action`](ActorEntity::handle_action).
    type ActionResult: Send + Sync + Debug;

    /// Clients of other actors plus shared services, `()` for leaf aggregates.
    type Context: Send + Sync;

    /// One error enum per aggregate; every operation of the actor shares it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the aggregate from its fresh ID. Pure validation only; calls to
    /// other actors belong in `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the entity is stored.
    /// An error here discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an `Update` payload.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Runs one domain operation and returns its reply.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
