//! Starting, wiring and stopping the order store, plus tracing setup.
//!
//! - [`OrderSystem`] seeds and spawns the store actor and hands out its clients
//! - [`setup_tracing`] initializes logging

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use tracing::*;
