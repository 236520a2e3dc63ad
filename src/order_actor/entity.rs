//! [`ActorEntity`] implementation for [`Order`].
//!
//! - `Update` is a raw [`OrderPatch`]: provided fields are overwritten, nothing is validated.
//! - `Action` is a policy-checked [`OrderAction::Transition`]; the policy arrives as the
//!   actor's context, so check and write happen inside one message with nothing interleaved.
//! - `Query` is a [`ListQuery`] evaluated over the whole store in seed order.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::model::{ListQuery, Order, OrderId, OrderPatch, OrdersList};
use crate::policy::TransitionPolicy;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Update = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Query = ListQuery;
    type QueryResult = OrdersList;
    type Context = TransitionPolicy;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn select(items: &[Self], query: &ListQuery) -> OrdersList {
        query.apply(items)
    }

    async fn on_update(
        &mut self,
        update: OrderPatch,
        _ctx: &TransitionPolicy,
    ) -> Result<(), Self::Error> {
        self.apply_patch(update, Utc::now());
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        policy: &TransitionPolicy,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::Transition { to } if to == self.status => {
                Ok(OrderActionResult::Unchanged(self.clone()))
            }
            OrderAction::Transition { to } => {
                if !policy.can_transition(self.status, to) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to,
                    });
                }
                self.apply_patch(OrderPatch::status(to), Utc::now());
                Ok(OrderActionResult::Transitioned(self.clone()))
            }
        }
    }
}
