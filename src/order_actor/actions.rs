//! Custom actions for the Order actor.
//!
//! Handled by [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action)
//! with the actor's [`TransitionPolicy`](crate::policy::TransitionPolicy) as context.

use crate::model::{Order, OrderStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Move the order to `to` if the policy allows it.
    ///
    /// Moving to the current status is accepted and changes nothing (not even
    /// `updated_at`), so retried requests are harmless.
    Transition { to: OrderStatus },
}

/// Results from OrderActions.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// The status changed; carries the new state.
    Transitioned(Order),
    /// The order already had the requested status.
    Unchanged(Order),
}

impl OrderActionResult {
    pub fn into_order(self) -> Order {
        match self {
            OrderActionResult::Transitioned(order) | OrderActionResult::Unchanged(order) => order,
        }
    }
}
