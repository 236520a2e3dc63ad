//! # Orders API
//!
//! The contract the orchestrator consumes, mirroring the HTTP endpoints:
//! list, detail, and status change. [`OrderClient`] implements it directly against the
//! store; [`MockOrdersApi`] wraps the same store with artificial latency and random
//! failure injection, the way a flaky network would behave.

use crate::clients::OrderClient;
use crate::model::{ListQuery, Order, OrderId, OrderStatus, OrdersList};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Message carried by injected failures.
pub const MOCK_FAILURE_MESSAGE: &str = "Mocked network error";

#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// `GET /orders`
    async fn fetch_orders(&self, query: ListQuery) -> Result<OrdersList, OrderError>;

    /// `GET /orders/{id}`
    async fn fetch_order(&self, id: &OrderId) -> Result<Order, OrderError>;

    /// `PATCH /orders/{id}` with `{status}`
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, OrderError>;
}

#[async_trait]
impl OrdersApi for OrderClient {
    async fn fetch_orders(&self, query: ListQuery) -> Result<OrdersList, OrderError> {
        self.list_orders(query).await
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.get_order(id.clone()).await
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        self.transition(id.clone(), status)
            .await
            .map(|result| result.into_order())
    }
}

/// Latency and failure knobs for [`MockOrdersApi`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockSettings {
    /// Sleep before every call.
    pub delay: Duration,
    /// Probability in `[0, 1]` that a call fails with a transport error. `0` never fails,
    /// `1` always does.
    pub error_rate: f64,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(400),
            error_rate: 0.0,
        }
    }
}

impl MockSettings {
    /// No delay, no failures.
    pub fn instant() -> Self {
        Self {
            delay: Duration::ZERO,
            error_rate: 0.0,
        }
    }

    pub fn failing(mut self) -> Self {
        self.error_rate = 1.0;
        self
    }

    fn should_fail(&self) -> bool {
        self.error_rate > 0.0 && rand::random::<f64>() < self.error_rate
    }
}

/// In-process stand-in for the HTTP API, backed by a real store.
///
/// Settings can be swapped at runtime with [`MockOrdersApi::configure`].
pub struct MockOrdersApi {
    client: OrderClient,
    settings: RwLock<MockSettings>,
}

impl MockOrdersApi {
    pub fn new(client: OrderClient, settings: MockSettings) -> Self {
        Self {
            client,
            settings: RwLock::new(settings),
        }
    }

    pub fn settings(&self) -> MockSettings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn configure(&self, settings: MockSettings) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    async fn simulate(&self, call: &'static str) -> Result<(), OrderError> {
        let settings = self.settings();
        if !settings.delay.is_zero() {
            tokio::time::sleep(settings.delay).await;
        }
        if settings.should_fail() {
            warn!(call, "Injecting mock failure");
            return Err(OrderError::TransportError(MOCK_FAILURE_MESSAGE.to_string()));
        }
        debug!(call, "Mock call passed through");
        Ok(())
    }
}

#[async_trait]
impl OrdersApi for MockOrdersApi {
    async fn fetch_orders(&self, query: ListQuery) -> Result<OrdersList, OrderError> {
        self.simulate("fetch_orders").await?;
        self.client.fetch_orders(query).await
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.simulate("fetch_order").await?;
        self.client.fetch_order(id).await
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        self.simulate("update_status").await?;
        self.client.update_status(id, status).await
    }
}
