//! A tracked shipment order.
//!
//! # Actor Framework
//! `Order` implements [`ActorEntity`](actor_framework::ActorEntity) (see
//! [`crate::order_actor::entity`]) so a [`ResourceActor`](actor_framework::ResourceActor)
//! owns the canonical collection.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Type-safe identifier for Orders, e.g. `ORD-1000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub const PREFIX: &'static str = "ORD-";

    /// `ORD-` followed by `n` zero-padded to at least four digits.
    pub fn from_number(n: u32) -> Self {
        Self(format!("{}{n:04}", Self::PREFIX))
    }

    /// Accepts either a full id or a bare number (`"7"` becomes `ORD-0007`).
    pub fn coerce(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Self(format!("{}{raw:0>4}", Self::PREFIX))
        } else {
            Self(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that is not one of the known enum spellings.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Shipment lifecycle state. Serialized in snake_case (`in_transit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    InTransit,
    Arrived,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::InTransit,
        OrderStatus::Arrived,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Arrived => "arrived",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Carrier handling the shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Nauta,
    BlueX,
    Globex,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Nauta, Provider::BlueX, Provider::Globex];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Nauta => "Nauta",
            Provider::BlueX => "BlueX",
            Provider::Globex => "Globex",
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "provider",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub provider: Provider,
    pub status: OrderStatus,
    pub eta: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial overwrite of an order. `None` fields are left alone; the id can never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub provider: Option<Provider>,
    pub eta: Option<DateTime<Utc>>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Order {
    /// Overwrites the provided fields and stamps `updated_at`.
    pub fn apply_patch(&mut self, patch: OrderPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(eta) = patch.eta {
            self.eta = eta;
        }
        self.updated_at = now;
    }
}
