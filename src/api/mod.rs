//! # HTTP API
//!
//! | Method | Path | Success | Failures |
//! |---|---|---|---|
//! | `GET` | `/orders` | `{items, total, page, limit}` | 400 on an unknown filter or sort value |
//! | `GET` | `/orders/:id` | the order | 404 |
//! | `PATCH` | `/orders/:id` | the order after the change | 404, 400, 422 |
//!
//! An all-digit `:id` is read as an order number (`7` is `ORD-0007`).

pub mod api_types;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
