//! Request and response bodies for the `/orders` endpoints.
//!
//! Query values arrive as raw strings so that empty and malformed values can be told apart
//! from absent ones; [`ListParams::into_query`] does the interpretation.

use crate::api::error::{INVALID_STATUS, MISSING_STATUS};
use crate::model::{ListQuery, OrderStatus, Provider, SortDir, SortKey};
use crate::order_actor::OrderError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

/// Raw `GET /orders` parameters. The paging and sorting names also come with a leading
/// underscore; when both spellings are sent the plain one wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub provider: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "_page")]
    pub page_alt: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "_limit")]
    pub limit_alt: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "_sort")]
    pub sort_alt: Option<String>,
    pub order: Option<String>,
    #[serde(rename = "_order")]
    pub order_alt: Option<String>,
}

impl ListParams {
    /// Builds the store query. Unknown enum spellings are a 400; a page or limit that is
    /// not a number keeps its default.
    pub fn into_query(self) -> Result<ListQuery, OrderError> {
        let mut query = ListQuery::default();
        let page = self.page.or(self.page_alt);
        let limit = self.limit.or(self.limit_alt);
        let sort = self.sort.or(self.sort_alt);
        let order = self.order.or(self.order_alt);

        if let Some(status) = parse_non_empty::<OrderStatus>(self.status)? {
            query = query.status(status);
        }
        if let Some(provider) = parse_non_empty::<Provider>(self.provider)? {
            query = query.provider(provider);
        }
        if let Some(page) = parse_number(page) {
            query = query.page(page);
        }
        if let Some(limit) = parse_number(limit) {
            query = query.limit(limit);
        }

        let sort = parse_non_empty::<SortKey>(sort)?.unwrap_or_default();
        let order = parse_non_empty::<SortDir>(order)?.unwrap_or_default();
        Ok(query.sort(sort, order))
    }
}

fn parse_non_empty<T>(raw: Option<String>) -> Result<Option<T>, OrderError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: T::Err| OrderError::ValidationError(e.to_string())),
    }
}

fn parse_number(raw: Option<String>) -> Option<i64> {
    raw?.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// PATCH /orders/:id
// ---------------------------------------------------------------------------

/// `PATCH` body. `status` is kept as raw JSON so that an absent value and a value of the
/// wrong type can be reported differently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchStatusBody {
    pub status: Option<serde_json::Value>,
}

impl PatchStatusBody {
    /// Reads `bytes` leniently: a body that is not a JSON object counts as empty.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// The requested status. Absent, `null`, `""`, `false` and `0` are a missing status;
    /// any other value must be a known status string.
    pub fn status(&self) -> Result<OrderStatus, OrderError> {
        use serde_json::Value;

        let raw = match &self.status {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(other) => Some(other),
        }
        .ok_or_else(|| OrderError::ValidationError(MISSING_STATUS.to_string()))?;

        raw.as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| OrderError::ValidationError(INVALID_STATUS.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 422 body. `allowed` lists the statuses `from` may move to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidTransitionResponse {
    pub error: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub allowed: Vec<OrderStatus>,
}
