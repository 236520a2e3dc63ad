//! # Order Client
//!
//! High-level API over a `ResourceClient<Order>`: list, detail, raw patch and
//! policy-checked transition, all returning [`OrderError`].
use crate::model::{ListQuery, Order, OrderId, OrderPatch, OrderStatus, OrdersList};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Filtered, sorted page of orders.
    pub async fn list_orders(&self, query: ListQuery) -> Result<OrdersList, OrderError> {
        self.query(query).await
    }

    /// One order by id; an absent id is [`OrderError::NotFound`].
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id.clone())
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    /// Overwrites the provided fields without consulting the transition policy.
    #[instrument(skip(self))]
    pub async fn patch_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order, OrderError> {
        debug!("patch_order called");
        self.inner
            .update(id, patch)
            .await
            .map_err(Self::map_error)
    }

    /// Moves the order to `to`, enforced by the store's policy.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: OrderId,
        to: OrderStatus,
    ) -> Result<OrderActionResult, OrderError> {
        info!("Sending transition to actor");
        self.inner
            .perform_action(id, OrderAction::Transition { to })
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(OrderId(id)),
            other => other
                .downcast_entity::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}
