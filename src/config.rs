//! Runtime configuration, resolved once at startup.
//!
//! Every knob comes from the environment. `main` loads `.env.local` (if present) through
//! `dotenvy` before calling [`AppConfig::from_env`]; nothing else reads environment
//! variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `ORDERS_ADDR` | `127.0.0.1:8080` |
//! | `ORDERS_SEED_COUNT` | `100` |
//! | `MOCK_DELAY_MS` | `400` |
//! | `MOCK_ERROR_RATE` | `0.0` |
//!
//! `ORDERS_SEED_COUNT` is capped at [`MAX_SEED_COUNT`]. The two `MOCK_*` knobs configure the
//! in-process [`MockOrdersApi`](crate::clients::MockOrdersApi) that orchestrators talk
//! through; the HTTP server calls the store directly and is not affected by them.

use crate::clients::MockSettings;
use crate::order_actor::{DEFAULT_SEED_COUNT, MAX_SEED_COUNT};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ADDR_VAR: &str = "ORDERS_ADDR";
pub const SEED_COUNT_VAR: &str = "ORDERS_SEED_COUNT";
pub const MOCK_DELAY_VAR: &str = "MOCK_DELAY_MS";
pub const MOCK_ERROR_RATE_VAR: &str = "MOCK_ERROR_RATE";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("MOCK_ERROR_RATE must be within [0, 1], got {0}")]
    ErrorRateOutOfRange(f64),

    #[error("ORDERS_SEED_COUNT must be at most {max}, got {0}", max = MAX_SEED_COUNT)]
    SeedCountTooLarge(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub seed_count: usize,
    pub mock: MockSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            seed_count: DEFAULT_SEED_COUNT,
            mock: MockSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves the config through `lookup` instead of the process environment.
    /// Unset and empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let addr = parse_var(&lookup, ADDR_VAR)?.unwrap_or(defaults.addr);
        let seed_count = parse_var(&lookup, SEED_COUNT_VAR)?.unwrap_or(defaults.seed_count);
        if seed_count > MAX_SEED_COUNT {
            return Err(ConfigError::SeedCountTooLarge(seed_count));
        }
        let delay = parse_var::<u64>(&lookup, MOCK_DELAY_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.mock.delay);
        let error_rate = parse_var::<f64>(&lookup, MOCK_ERROR_RATE_VAR)?
            .unwrap_or(defaults.mock.error_rate);
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(ConfigError::ErrorRateOutOfRange(error_rate));
        }

        Ok(Self {
            addr,
            seed_count,
            mock: MockSettings { delay, error_rate },
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
