//! # Generic Messages
//!
//! The requests a `ResourceClient` sends to its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// Three entity-scoped operations and one collection-scoped read:
///
/// - **Get**: current state of one resource by ID.
/// - **Update**: overwrite fields with [`ActorEntity::Update`]; returns the new state.
/// - **Action**: run an [`ActorEntity::Action`] against one resource.
/// - **Query**: run an [`ActorEntity::Query`] over the whole store.
///
/// Creation and deletion are absent: the store is seeded once when the actor is built.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Query {
        query: T::Query,
        respond_to: Response<T::QueryResult>,
    },
}
