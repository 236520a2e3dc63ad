//! # Query/Mutation Orchestrator
//!
//! Client-side cache in front of an [`OrdersApi`]:
//!
//! - **List queries** are cached per [`ListQuery`] and served stale-while-revalidate: a
//!   refetch keeps the last good page visible, and a failed fetch leaves it in place next
//!   to the error. Nothing is retried automatically; [`OrdersOrchestrator::refetch`] is the
//!   explicit retry.
//! - **Detail queries** are cached per [`OrderId`] with the same rules.
//! - **Status changes** are optimistic. The [`TransitionPolicy`] guard runs first (a
//!   disallowed change never leaves the process), any in-flight fetch of the affected list
//!   is canceled, the cached order is rewritten, and only then is the API called. Success
//!   invalidates and refetches; failure restores the pre-image and posts a persistent error.
//!
//! Within one query key the newest fetch wins: each fetch is stamped with a generation
//! and completions from retired generations are dropped.
//!
//! Cache state sits behind a `std::sync::Mutex` that is never held across an `.await`, so
//! the orchestrator can be cloned into concurrently running tasks.

pub mod mutation;
pub mod notice;
pub mod state;

pub use mutation::*;
pub use notice::*;
pub use state::QueryState;

use crate::clients::OrdersApi;
use crate::model::{ListQuery, Order, OrderId, OrderStatus, OrdersList};
use crate::order_actor::OrderError;
use crate::policy::TransitionPolicy;
use chrono::Utc;
use state::QueryEntry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// List queries are cached per distinct request.
pub type QueryKey = ListQuery;

/// How long a successful fetch is served from cache without refetching.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

#[derive(Default)]
struct Cache {
    lists: HashMap<ListQuery, QueryEntry<OrdersList>>,
    details: HashMap<OrderId, QueryEntry<Order>>,
    mutations: HashMap<OrderId, MutationState>,
}

/// The copies one optimistic write overwrote, each as it was before.
struct Overwritten {
    list: Option<Order>,
    detail: Option<Order>,
}

impl Cache {
    /// Re-applies in-flight optimistic changes on top of freshly fetched data, so a refetch
    /// landing mid-mutation does not flash the old status.
    fn overlay_pending(&self, list: &mut OrdersList) {
        for (id, mutation) in &self.mutations {
            if let Some(order) = list.find_mut(id) {
                overlay(order, mutation);
            }
        }
    }

    /// Puts back what the optimistic write for `id` overwrote. Copies it never touched are
    /// left as they are, except those a mid-mutation fetch overlaid: those have no prior
    /// snapshot here, so they are marked stale instead.
    fn restore(
        &mut self,
        key: &ListQuery,
        id: &OrderId,
        applied: &MutationState,
        was: Overwritten,
    ) {
        for (list_key, entry) in self.lists.iter_mut() {
            let Some(cached) = entry.state.data_mut().and_then(|l| l.find_mut(id)) else {
                continue;
            };
            match &was.list {
                Some(pre) if list_key == key => *cached = pre.clone(),
                _ if shows(cached, applied) => entry.invalidate(),
                _ => {}
            }
        }

        if let Some(entry) = self.details.get_mut(id) {
            if let Some(cached) = entry.state.data_mut() {
                match was.detail {
                    Some(pre) => *cached = pre,
                    None if shows(cached, applied) => entry.invalidate(),
                    None => {}
                }
            }
        }
    }
}

fn overlay(order: &mut Order, mutation: &MutationState) {
    if let MutationState::Pending {
        target, applied_at, ..
    } = mutation
    {
        order.status = *target;
        order.updated_at = *applied_at;
    }
}

/// Whether `order` carries the optimistic write of the pending `mutation`.
fn shows(order: &Order, mutation: &MutationState) -> bool {
    matches!(
        mutation,
        MutationState::Pending { target, applied_at, .. }
            if order.status == *target && order.updated_at == *applied_at
    )
}

pub struct OrdersOrchestrator<A: OrdersApi> {
    api: Arc<A>,
    policy: TransitionPolicy,
    cache: Arc<Mutex<Cache>>,
    notices: NoticeBoard,
    stale_time: Duration,
}

impl<A: OrdersApi> Clone for OrdersOrchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            policy: self.policy,
            cache: Arc::clone(&self.cache),
            notices: self.notices.clone(),
            stale_time: self.stale_time,
        }
    }
}

impl<A: OrdersApi> OrdersOrchestrator<A> {
    pub fn new(api: Arc<A>, policy: TransitionPolicy) -> Self {
        Self {
            api,
            policy,
            cache: Arc::default(),
            notices: NoticeBoard::default(),
            stale_time: DEFAULT_STALE_TIME,
        }
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn current_notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    pub fn clear_notice(&self) {
        self.notices.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn list_state(&self, key: &ListQuery) -> QueryState<OrdersList> {
        self.lock()
            .lists
            .get(key)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    pub fn detail_state(&self, id: &OrderId) -> QueryState<Order> {
        self.lock()
            .details
            .get(id)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    pub fn mutation_state(&self, id: &OrderId) -> Option<MutationState> {
        self.lock().mutations.get(id).cloned()
    }

    /// Fetches the list for `key` unless a fresh copy is cached, and returns the resulting
    /// state. If a newer fetch for the same key finished first, the newer state is returned.
    #[instrument(skip(self))]
    pub async fn fetch(&self, key: ListQuery) -> QueryState<OrdersList> {
        let generation = {
            let mut cache = self.lock();
            let entry = cache.lists.entry(key).or_default();
            if entry.is_fresh(self.stale_time) {
                debug!("Serving cached list");
                return entry.state.clone();
            }
            entry.begin()
        };

        let result = self.api.fetch_orders(key).await;

        let mut cache = self.lock();
        let result = result.map(|mut list| {
            cache.overlay_pending(&mut list);
            list
        });
        if let Err(e) = &result {
            warn!(error = %e, "List fetch failed");
        }
        let entry = cache.lists.entry(key).or_default();
        if !entry.finish(generation, result) {
            debug!(generation, "Discarding superseded list fetch");
        }
        entry.state.clone()
    }

    /// Marks `key` stale and fetches it again.
    pub async fn refetch(&self, key: ListQuery) -> QueryState<OrdersList> {
        self.invalidate(&key);
        self.fetch(key).await
    }

    pub fn invalidate(&self, key: &ListQuery) {
        if let Some(entry) = self.lock().lists.get_mut(key) {
            entry.invalidate();
        }
    }

    /// Retires any in-flight fetch of `key`; its response will be discarded.
    pub fn cancel(&self, key: &ListQuery) -> bool {
        self.lock()
            .lists
            .get_mut(key)
            .is_some_and(|entry| entry.cancel())
    }

    /// Fetches one order unless a fresh copy is cached.
    #[instrument(skip(self))]
    pub async fn fetch_order(&self, id: OrderId) -> QueryState<Order> {
        let generation = {
            let mut cache = self.lock();
            let entry = cache.details.entry(id.clone()).or_default();
            if entry.is_fresh(self.stale_time) {
                return entry.state.clone();
            }
            entry.begin()
        };

        let result = self.api.fetch_order(&id).await;

        let mut cache = self.lock();
        let result = result.map(|mut order| {
            if let Some(mutation) = cache.mutations.get(&id) {
                overlay(&mut order, mutation);
            }
            order
        });
        if let Err(e) = &result {
            warn!(error = %e, "Detail fetch failed");
        }
        let entry = cache.details.entry(id).or_default();
        entry.finish(generation, result);
        entry.state.clone()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Optimistically moves order `id` to `to`, as seen through the list cached for `key`.
    ///
    /// Returns `Err` only when the change is refused locally: the transition is not allowed,
    /// or the order could not be loaded at all. Once dispatched, the outcome is reported as
    /// [`MutationState::Committed`] or [`MutationState::RolledBack`].
    #[instrument(skip(self))]
    pub async fn change_status(
        &self,
        key: ListQuery,
        id: OrderId,
        to: OrderStatus,
    ) -> Result<MutationState, OrderError> {
        let current = match self.cached_order(&key, &id) {
            Some(order) => order,
            None => match self.fetch_order(id.clone()).await {
                QueryState::Error { error, .. } => return Err(error),
                state => state
                    .into_data()
                    .ok_or_else(|| OrderError::NotFound(id.clone()))?,
            },
        };

        if !self.policy.can_transition(current.status, to) {
            debug!(from = %current.status, %to, "Rejected by transition policy");
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        let (pre_image, applied, overwritten) = self.apply_optimistic(&key, &id, to, current);

        match self.api.update_status(&id, to).await {
            Ok(order) => {
                let committed = MutationState::Committed {
                    pre_image,
                    order: order.clone(),
                };
                {
                    let mut cache = self.lock();
                    cache.mutations.insert(id.clone(), committed.clone());
                    cache.details.entry(id.clone()).or_default().resolve(order.clone());
                    for entry in cache.lists.values_mut() {
                        entry.invalidate();
                    }
                }
                info!(status = %order.status, "Status change committed");
                self.notices.success(SUCCESS_MESSAGE);
                self.fetch(key).await;
                Ok(committed)
            }
            Err(error) => {
                let rolled_back = MutationState::RolledBack {
                    pre_image: pre_image.clone(),
                    error: error.clone(),
                };
                {
                    let mut cache = self.lock();
                    cache.restore(&key, &id, &applied, overwritten);
                    cache.mutations.insert(id.clone(), rolled_back.clone());
                }
                warn!(error = %error, "Status change rolled back");
                self.notices.error(ROLLBACK_MESSAGE);
                Ok(rolled_back)
            }
        }
    }

    fn cached_order(&self, key: &ListQuery, id: &OrderId) -> Option<Order> {
        let cache = self.lock();
        cache
            .lists
            .get(key)
            .and_then(|e| e.state.data())
            .and_then(|list| list.find(id))
            .or_else(|| cache.details.get(id).and_then(|e| e.state.data()))
            .cloned()
    }

    /// Cancels in-flight fetches, rewrites the cached copies of the order in the `key` list
    /// and the detail cache, and records the mutation as pending. Returns the pre-image, the
    /// pending state, and what each rewritten copy held before.
    fn apply_optimistic(
        &self,
        key: &ListQuery,
        id: &OrderId,
        to: OrderStatus,
        current: Order,
    ) -> (Order, MutationState, Overwritten) {
        let mut cache = self.lock();
        let now = Utc::now();

        if cache.lists.get_mut(key).is_some_and(|e| e.cancel()) {
            debug!("Canceled in-flight list fetch before optimistic write");
        }
        if let Some(entry) = cache.details.get_mut(id) {
            entry.cancel();
        }

        let list = cache
            .lists
            .get_mut(key)
            .and_then(|e| e.state.data_mut())
            .and_then(|list| list.find_mut(id))
            .map(|order| {
                let pre = order.clone();
                order.status = to;
                order.updated_at = now;
                pre
            });
        let detail = cache
            .details
            .get_mut(id)
            .and_then(|e| e.state.data_mut())
            .map(|order| {
                let pre = order.clone();
                order.status = to;
                order.updated_at = now;
                pre
            });

        let pre_image = list.clone().or_else(|| detail.clone()).unwrap_or(current);
        let pending = MutationState::Pending {
            pre_image: pre_image.clone(),
            target: to,
            applied_at: now,
        };
        cache.mutations.insert(id.clone(), pending.clone());
        (pre_image, pending, Overwritten { list, detail })
    }
}
