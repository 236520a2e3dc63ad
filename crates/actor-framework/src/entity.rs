//! # ActorEntity Trait
//!
//! The contract a resource must satisfy to be owned by a [`ResourceActor`](crate::ResourceActor).
//!
//! Entities are seeded into the actor when it is constructed; after that they are only
//! changed through `on_update` (a plain field overwrite) or `handle_action` (resource-specific
//! logic that may consult the injected `Context`). Collection reads go through [`ActorEntity::select`],
//! which sees every entity in insertion order.
//!
//! Associated types keep each resource's payloads apart: an `Order` actor only accepts
//! order patches and order queries, and the compiler rejects anything else.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Partial overwrite applied by `on_update`.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. a status transition).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// A read over the whole collection (filtering, sorting, paging).
    type Query: Send + Sync + Debug;

    /// What a [`ActorEntity::Query`] produces.
    type QueryResult: Send + Sync + Debug;

    /// The runtime context injected into the actor's `run()`.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than per message: callers match on a single type and
    /// the actor forwards it boxed inside [`FrameworkError::EntityError`](crate::FrameworkError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// The key this entity is stored under.
    fn id(&self) -> &Self::Id;

    /// Answer a collection query. Items are passed in insertion order.
    fn select(items: &[Self], query: &Self::Query) -> Self::QueryResult;

    // --- Lifecycle Hooks (Async) ---

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    ///
    /// The entity is mutated in place; when the handler returns an error the actor does not
    /// roll anything back, so handlers validate before they write.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
