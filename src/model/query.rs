//! List queries over the order collection: filter, stable sort, page.

use crate::model::{Order, OrderStatus, ParseEnumError, Provider};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Provider,
    Status,
    #[default]
    Eta,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Id,
        SortKey::Provider,
        SortKey::Status,
        SortKey::Eta,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Provider => "provider",
            SortKey::Status => "status",
            SortKey::Eta => "eta",
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
        }
    }

    /// Ascending comparison on this key. Strings compare lexically, timestamps in time order.
    pub fn compare(self, a: &Order, b: &Order) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Provider => a.provider.as_str().cmp(b.provider.as_str()),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::Eta => a.eta.cmp(&b.eta),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(ParseEnumError {
                kind: "sort order",
                value: other.to_string(),
            }),
        }
    }
}

/// One list request. Also the cache key for list queries: two requests that would produce
/// the same page compare equal.
///
/// `page` and `limit` are always at least 1; [`ListQuery::page`] and [`ListQuery::limit`]
/// clamp on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub provider: Option<Provider>,
    page: u32,
    limit: u32,
    pub sort: SortKey,
    pub order: SortDir,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: None,
            provider: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortKey::default(),
            order: SortDir::default(),
        }
    }
}

impl ListQuery {
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the page, clamping anything below 1 up to 1.
    pub fn page(mut self, page: i64) -> Self {
        self.page = clamp_positive(page);
        self
    }

    /// Sets the page size, clamping anything below 1 up to 1.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = clamp_positive(limit);
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortDir) -> Self {
        self.sort = key;
        self.order = order;
        self
    }

    pub fn page_number(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.limit
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self.provider.map_or(true, |p| order.provider == p)
    }

    /// Runs the query over `items`, which must be in original (seed) order.
    ///
    /// Ties on the sort key keep that original order in both directions.
    pub fn apply(&self, items: &[Order]) -> OrdersList {
        let mut matched: Vec<&Order> = items.iter().filter(|o| self.matches(o)).collect();
        let total = matched.len();

        // sort_by is stable; reversing the comparator (not the output) keeps ties in order
        matched.sort_by(|a, b| match self.order {
            SortDir::Asc => self.sort.compare(a, b),
            SortDir::Desc => self.sort.compare(b, a),
        });

        let limit = self.limit as usize;
        let start = (self.page as usize - 1).saturating_mul(limit);
        let items = matched
            .into_iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect();

        OrdersList {
            items,
            total,
            page: self.page,
            limit: self.limit,
        }
    }
}

fn clamp_positive(n: i64) -> u32 {
    u32::try_from(n.max(1)).unwrap_or(u32::MAX)
}

/// One page of a list query plus the post-filter, pre-page total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersList {
    pub items: Vec<Order>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

impl OrdersList {
    /// Whether a page after this one has items.
    pub fn has_next(&self) -> bool {
        self.total as u64 > u64::from(self.page) * u64::from(self.limit)
    }

    pub fn find(&self, id: &crate::model::OrderId) -> Option<&Order> {
        self.items.iter().find(|o| &o.id == id)
    }

    pub fn find_mut(&mut self, id: &crate::model::OrderId) -> Option<&mut Order> {
        self.items.iter_mut().find(|o| &o.id == id)
    }
}
