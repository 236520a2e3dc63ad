//! # Order Tracker
//!
//! > **Shipment orders behind an actor, an HTTP API, and an optimistic client cache.**
//!
//! A seeded, in-memory collection of shipment orders that can be filtered, sorted, paged and
//! moved through a fixed status lifecycle. The collection is owned by a single
//! [`ResourceActor`](actor_framework::ResourceActor); everything else talks to it through
//! clients.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`], [`policy`])
//! - [`Order`](model::Order), its [`OrderStatus`](model::OrderStatus) and
//!   [`Provider`](model::Provider), and [`ListQuery`](model::ListQuery) (filter, sort, page).
//! - [`TransitionPolicy`](policy::TransitionPolicy): which status may follow which. Passed
//!   as a value to whoever enforces it.
//!
//! ### 2. The Store ([`order_actor`])
//! - `Order` implements [`ActorEntity`](actor_framework::ActorEntity). The actor runs with
//!   the policy as its context and enforces it in the `Transition` action, the only
//!   policy-checked write.
//!
//! ### 3. The Interface ([`clients`], [`api`])
//! - [`OrderClient`](clients::OrderClient) wraps the generic client with order-specific
//!   calls and errors.
//! - [`OrdersApi`](clients::OrdersApi) is the contract the orchestrator consumes;
//!   [`MockOrdersApi`](clients::MockOrdersApi) adds latency and failure injection.
//! - [`api::build_router`] serves `GET /orders`, `GET /orders/:id`, `PATCH /orders/:id`.
//!
//! ### 4. The Cache ([`orchestrator`])
//! - [`OrdersOrchestrator`](orchestrator::OrdersOrchestrator): stale-while-revalidate list
//!   and detail queries, optimistic status changes with rollback, and outcome notices.
//!
//! ### 5. Wiring ([`config`], [`lifecycle`])
//! - [`AppConfig`](config::AppConfig) from the environment,
//!   [`OrderSystem`](lifecycle::OrderSystem) to start and stop the store, and
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Serve on 127.0.0.1:8080 with 100 seeded orders
//! RUST_LOG=info cargo run
//!
//! curl 'localhost:8080/orders?status=delivered&sort=eta&order=desc'
//! curl -X PATCH localhost:8080/orders/1000 -H 'content-type: application/json' \
//!      -d '{"status":"in_transit"}'
//! ```
//!
//! ## 🧪 Testing
//!
//! Clients are tested against [`actor_framework::mock`] without spawning an actor; the
//! router is driven in-process with `tower::ServiceExt::oneshot`.

pub mod api;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod order_actor;
pub mod policy;
