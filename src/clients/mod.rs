//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient), plus the
//! [`OrdersApi`] seam the orchestrator talks through.

pub mod api;
pub mod order_client;

pub use api::*;
pub use order_client::*;
