//! The lifecycle of one optimistic status change.

use crate::model::{Order, OrderStatus};
use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};

/// Where an optimistic status change stands.
///
/// Every state carries the pre-image: the order as the caller's list showed it before the
/// optimistic write (or the detail copy, when the list did not hold it).
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState {
    /// Applied to the cache as `target` at `applied_at`, waiting on the store.
    Pending {
        pre_image: Order,
        target: OrderStatus,
        applied_at: DateTime<Utc>,
    },
    /// The store accepted the change; `order` is its authoritative result.
    Committed { pre_image: Order, order: Order },
    /// The store (or the transport) refused; every rewritten copy was restored.
    RolledBack { pre_image: Order, error: OrderError },
}
