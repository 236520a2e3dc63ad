use crate::clients::{MockOrdersApi, OrderClient};
use crate::config::AppConfig;
use crate::order_actor::{self, seed_orders};
use crate::orchestrator::OrdersOrchestrator;
use crate::policy::TransitionPolicy;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Owns the running order store and hands out everything that talks to it.
///
/// # Architecture
///
/// - **Order actor**: one [`ResourceActor`](actor_framework::ResourceActor) holding the
///   seeded orders, running with the [`TransitionPolicy`] as its context.
/// - **Mock API**: a [`MockOrdersApi`] over the same store, with the configured latency and
///   failure rate, for the orchestrator to talk through.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&AppConfig::default());
///
/// let orchestrator = system.orchestrator();
/// orchestrator.fetch(ListQuery::default()).await;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the Order actor
    pub order_client: OrderClient,

    /// The policy the store was started with
    pub policy: TransitionPolicy,

    mock_api: Arc<MockOrdersApi>,

    /// Task handle for the actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl OrderSystem {
    /// Seeds the store with `config.seed_count` orders and starts it under the standard
    /// policy.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_policy(config, TransitionPolicy::standard())
    }

    pub fn with_policy(config: &AppConfig, policy: TransitionPolicy) -> Self {
        let (actor, client) = order_actor::new(seed_orders(config.seed_count, Utc::now()));
        let handle = tokio::spawn(actor.run(policy));
        let order_client = OrderClient::new(client);

        info!(seed_count = config.seed_count, "Order system started");
        debug!(
            delay_ms = config.mock.delay.as_millis() as u64,
            error_rate = config.mock.error_rate,
            "Mock API configured for orchestrators"
        );

        Self {
            mock_api: Arc::new(MockOrdersApi::new(order_client.clone(), config.mock)),
            order_client,
            policy,
            handle,
        }
    }

    /// The in-process API; its settings can be changed at runtime.
    pub fn mock_api(&self) -> Arc<MockOrdersApi> {
        Arc::clone(&self.mock_api)
    }

    /// A fresh orchestrator (empty cache) over the mock API.
    pub fn orchestrator(&self) -> OrdersOrchestrator<MockOrdersApi> {
        OrdersOrchestrator::new(self.mock_api(), self.policy)
    }

    /// Gracefully shuts down the store.
    ///
    /// Drops this system's clients and waits for the actor task. The actor only exits once
    /// every client is gone, so clones handed out earlier (the router's state, orchestrators)
    /// must be dropped first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor shut down cleanly
    /// - `Err(String)` if the actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.mock_api);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
