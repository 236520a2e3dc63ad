//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG` (default `info`). Module paths are hidden (`with_target(false)`); the store
//! identifies itself through the `entity_type` field instead.
//!
//! ```bash
//! # Requests, status changes, startup
//! RUST_LOG=info cargo run
//!
//! # Every store request with its query or patch, cache hits and discarded fetches
//! RUST_LOG=debug cargo run
//!
//! # Just the orchestrator
//! RUST_LOG=order_tracker::orchestrator=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a status change reads roughly:
//!
//! ```text
//! INFO request{method=PATCH uri=/orders/ORD-1000}: started processing request
//! DEBUG Action entity_type="Order" id=ORD-1000 action=Transition { to: InTransit }
//! INFO Action ok entity_type="Order" id=ORD-1000
//! INFO request{..}: Status changed id=ORD-1000 from=created to=in_transit
//! ```

/// Initializes the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();
}
