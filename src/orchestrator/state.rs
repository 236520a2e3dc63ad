//! Per-query cache entries and their observable state.

use crate::order_actor::OrderError;
use std::time::Duration;
use tokio::time::Instant;

/// What a caller sees for one query.
///
/// `Loading` and `Error` keep the last good data around so it can stay on screen while a
/// refetch runs or after one fails.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading {
        previous: Option<T>,
    },
    Success {
        data: T,
    },
    Error {
        error: OrderError,
        previous: Option<T>,
    },
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    /// Best data available: fresh on success, otherwise the last known good value.
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Idle => None,
            QueryState::Success { data } => Some(data),
            QueryState::Loading { previous } | QueryState::Error { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            QueryState::Idle => None,
            QueryState::Success { data } => Some(data),
            QueryState::Loading { previous } | QueryState::Error { previous, .. } => {
                previous.as_mut()
            }
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            QueryState::Idle => None,
            QueryState::Success { data } => Some(data),
            QueryState::Loading { previous } | QueryState::Error { previous, .. } => previous,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    pub fn error(&self) -> Option<&OrderError> {
        match self {
            QueryState::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Cache bookkeeping behind one [`QueryState`].
///
/// Every fetch takes a new generation; a completion whose generation is no longer current
/// (superseded by a newer fetch, or canceled) is dropped.
#[derive(Debug)]
pub(crate) struct QueryEntry<T> {
    pub(crate) state: QueryState<T>,
    generation: u64,
    fetched_at: Option<Instant>,
    stale: bool,
}

impl<T> Default for QueryEntry<T> {
    fn default() -> Self {
        Self {
            state: QueryState::Idle,
            generation: 0,
            fetched_at: None,
            stale: false,
        }
    }
}

impl<T> QueryEntry<T> {
    pub(crate) fn is_fresh(&self, stale_time: Duration) -> bool {
        matches!(self.state, QueryState::Success { .. })
            && !self.stale
            && self.fetched_at.is_some_and(|at| at.elapsed() < stale_time)
    }

    /// Enters `Loading`, keeping the current data, and returns the fetch's generation.
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        let previous = std::mem::take(&mut self.state).into_data();
        self.state = QueryState::Loading { previous };
        self.generation
    }

    /// Lands a fetch result. Returns `false` (and changes nothing) if the fetch is stale.
    pub(crate) fn finish(&mut self, generation: u64, result: Result<T, OrderError>) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Ok(data) => self.resolve(data),
            Err(error) => {
                let previous = std::mem::take(&mut self.state).into_data();
                self.state = QueryState::Error { error, previous };
            }
        }
        true
    }

    /// Stores authoritative data directly, retiring any in-flight fetch.
    pub(crate) fn resolve(&mut self, data: T) {
        self.generation += 1;
        self.state = QueryState::Success { data };
        self.fetched_at = Some(Instant::now());
        self.stale = false;
    }

    /// Retires an in-flight fetch so its response is discarded. Returns whether one was running.
    pub(crate) fn cancel(&mut self) -> bool {
        if !self.state.is_loading() {
            return false;
        }
        self.generation += 1;
        self.state = match std::mem::take(&mut self.state).into_data() {
            Some(data) => QueryState::Success { data },
            None => QueryState::Idle,
        };
        true
    }

    pub(crate) fn invalidate(&mut self) {
        self.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_keeps_previous_data() {
        let mut entry = QueryEntry::default();
        let first = entry.begin();
        assert!(entry.finish(first, Ok(1)));

        entry.begin();
        assert_eq!(entry.state, QueryState::Loading { previous: Some(1) });
        assert_eq!(entry.state.data(), Some(&1));
    }

    #[test]
    fn newer_fetch_supersedes_older() {
        let mut entry = QueryEntry::default();
        let older = entry.begin();
        let newer = entry.begin();

        assert!(entry.finish(newer, Ok("new")));
        assert!(!entry.finish(older, Ok("old")));
        assert_eq!(entry.state, QueryState::Success { data: "new" });
    }

    #[test]
    fn error_keeps_last_good_data() {
        let mut entry = QueryEntry::default();
        let g = entry.begin();
        entry.finish(g, Ok(7));
        let g = entry.begin();
        entry.finish(g, Err(OrderError::TransportError("down".into())));

        assert_eq!(entry.state.data(), Some(&7));
        assert!(entry.state.error().is_some());
    }

    #[test]
    fn cancel_discards_the_in_flight_result() {
        let mut entry = QueryEntry::default();
        let g = entry.begin();
        entry.finish(g, Ok(1));

        let in_flight = entry.begin();
        assert!(entry.cancel());
        assert_eq!(entry.state, QueryState::Success { data: 1 });
        assert!(!entry.finish(in_flight, Ok(2)));
        assert!(!entry.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn freshness_expires_and_invalidate_forces_stale() {
        let stale_time = Duration::from_secs(30);
        let mut entry = QueryEntry::default();
        let g = entry.begin();
        entry.finish(g, Ok(()));
        assert!(entry.is_fresh(stale_time));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(!entry.is_fresh(stale_time));

        entry.resolve(());
        assert!(entry.is_fresh(stale_time));
        entry.invalidate();
        assert!(!entry.is_fresh(stale_time));
    }
}
