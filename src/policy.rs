//! # Status Transition Policy
//!
//! Which statuses an order may move to next. The policy is a plain `Copy` value handed to
//! whatever enforces it: the order store's transition action, the orchestrator's local guard,
//! and the HTTP layer all receive the same [`TransitionPolicy`] rather than reaching for a
//! global table.

use crate::model::OrderStatus;

type Edges = &'static [(OrderStatus, &'static [OrderStatus])];

const STANDARD: Edges = &[
    (
        OrderStatus::Created,
        &[OrderStatus::InTransit, OrderStatus::Canceled],
    ),
    (
        OrderStatus::InTransit,
        &[OrderStatus::Arrived, OrderStatus::Canceled],
    ),
    (OrderStatus::Arrived, &[OrderStatus::Delivered]),
    (OrderStatus::Delivered, &[]),
    (OrderStatus::Canceled, &[]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPolicy {
    edges: Edges,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionPolicy {
    /// The shipment lifecycle: `created → in_transit → arrived → delivered`, with
    /// `canceled` reachable until arrival. `delivered` and `canceled` are terminal.
    pub const fn standard() -> Self {
        Self { edges: STANDARD }
    }

    /// A policy over a custom edge table. Statuses missing from the table have no out-edges.
    pub const fn new(edges: Edges) -> Self {
        Self { edges }
    }

    /// Out-edges of `status`, in table order.
    pub fn allowed_next(&self, status: OrderStatus) -> &'static [OrderStatus] {
        self.edges
            .iter()
            .find(|(from, _)| *from == status)
            .map(|(_, next)| *next)
            .unwrap_or(&[])
    }

    pub fn can_transition(&self, from: OrderStatus, to: OrderStatus) -> bool {
        self.allowed_next(from).contains(&to)
    }

    pub fn is_terminal(&self, status: OrderStatus) -> bool {
        self.allowed_next(status).is_empty()
    }
}
