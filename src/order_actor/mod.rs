//! # Order Actor
//!
//! The order store: one [`ResourceActor`] owning every [`Order`], seeded at construction.
//!
//! ## Structure
//!
//! - [`entity`]: [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`actions`]: [`OrderAction`] (policy-checked status transition) and its result
//! - [`error`]: [`OrderError`]
//! - [`seed`]: deterministic seed data
//! - [`new()`]: factory returning the actor and its client
//!
//! The actor's context is the [`TransitionPolicy`](crate::policy::TransitionPolicy) it enforces:
//!
//! ```rust
//! use order_tracker::clients::OrderClient;
//! use order_tracker::model::{ListQuery, OrderStatus};
//! use order_tracker::order_actor::{self, seed_orders};
//! use order_tracker::policy::TransitionPolicy;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = order_actor::new(seed_orders(100, chrono::Utc::now()));
//!     let client = OrderClient::new(generic_client);
//!     tokio::spawn(actor.run(TransitionPolicy::standard()));
//!
//!     let page = client.list_orders(ListQuery::default().status(OrderStatus::Delivered)).await?;
//!     assert_eq!(page.total, 20);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod seed;

pub use actions::*;
pub use error::*;
pub use seed::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor, seeded with `orders`, and its client.
pub fn new(orders: Vec<Order>) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(32, orders)
}
