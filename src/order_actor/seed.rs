//! Deterministic seed data for the order store.

use crate::model::{Order, OrderId, OrderStatus, Provider};
use chrono::{DateTime, Duration, Utc};

/// Number of orders seeded when nothing else is configured.
pub const DEFAULT_SEED_COUNT: usize = 100;

/// First order number; the seed runs `ORD-1000`, `ORD-1001`, ...
pub const FIRST_ORDER_NUMBER: u32 = 1000;

/// Largest seed that keeps every id within `ORD-####`.
pub const MAX_SEED_COUNT: usize = 10_000 - FIRST_ORDER_NUMBER as usize;

/// Builds `count` orders relative to `now`.
///
/// For the `i`-th order: provider and status cycle through their variants (`i % 3`,
/// `i % 5`), the ETA falls between 3 days ago and 6 days ahead (`i % 10 - 3`), creation
/// is 15 to 21 days back and the last update 0 to 4 days back.
pub fn seed_orders(count: usize, now: DateTime<Utc>) -> Vec<Order> {
    (0..count)
        .map(|i| {
            let n = i as i64;
            Order {
                id: OrderId::from_number(FIRST_ORDER_NUMBER + i as u32),
                provider: Provider::ALL[i % Provider::ALL.len()],
                status: OrderStatus::ALL[i % OrderStatus::ALL.len()],
                eta: now + Duration::days(n % 10 - 3),
                created_at: now - Duration::days(15 + n % 7),
                updated_at: now - Duration::days(n % 5),
            }
        })
        .collect()
}
