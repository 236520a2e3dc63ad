//! Shared state handed to every handler.

use crate::clients::OrderClient;
use crate::policy::TransitionPolicy;

pub struct AppState {
    /// Handle to the order store actor.
    pub orders: OrderClient,
    /// The policy the store enforces; used here to describe a refusal.
    pub policy: TransitionPolicy,
}

impl AppState {
    pub fn new(orders: OrderClient, policy: TransitionPolicy) -> Self {
        Self { orders, policy }
    }
}
