//! # Actor Framework
//!
//! Building blocks for a single-owner, message-driven resource store on top of Tokio.
//!
//! A resource type implements [`ActorEntity`]. A [`ResourceActor`] owns every instance of
//! it, seeded once at construction, and processes requests strictly one at a time, so the
//! store is never shared and never locked. Callers talk to it through a cloneable
//! [`ResourceClient`], usually wrapped in a domain client implementing [`ActorClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): domain data plus `on_update`, `handle_action` and `select`.
//! 2. **Runtime** ([`ResourceActor`]): the message loop and the ordered store.
//! 3. **Interface** ([`ResourceClient`]): typed async requests over mpsc + oneshot.
//!
//! ## Requests
//!
//! | Request | Scope | Hook |
//! |---------|-------|------|
//! | `Get` | one entity | none (clone out) |
//! | `Update` | one entity | [`ActorEntity::on_update`] |
//! | `Action` | one entity | [`ActorEntity::handle_action`] |
//! | `Query` | whole store | [`ActorEntity::select`] |
//!
//! ## Context Injection
//!
//! Dependencies are handed to [`ResourceActor::run`], not to the constructor, and every hook
//! receives them by reference. A store that enforces a rule table takes that table as its
//! context.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockClient`] (queued expectations) and
//! [`mock::create_mock_client`] (raw receiver) for testing domain clients without an actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
