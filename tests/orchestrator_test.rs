//! Orchestrator scenarios against a real store.
//!
//! Most tests go through [`MockOrdersApi`]; the ones that need to fail a single order or
//! hold a fetch open use `ScriptedApi`, a thin [`OrdersApi`] over the same store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use order_tracker::clients::{MockOrdersApi, MockSettings, OrderClient, OrdersApi};
use order_tracker::model::{
    ListQuery, Order, OrderId, OrderPatch, OrderStatus, OrdersList, Provider, SortDir, SortKey,
};
use order_tracker::orchestrator::{
    MutationState, NoticeKind, OrdersOrchestrator, QueryState, ROLLBACK_MESSAGE,
    SUCCESS_MESSAGE,
};
use order_tracker::order_actor::{self, seed_orders, OrderError};
use order_tracker::policy::TransitionPolicy;
use tokio::sync::Notify;

fn store() -> OrderClient {
    let (actor, client) = order_actor::new(seed_orders(100, Utc::now()));
    tokio::spawn(actor.run(TransitionPolicy::standard()));
    OrderClient::new(client)
}

fn by_id() -> ListQuery {
    ListQuery::default().sort(SortKey::Id, SortDir::Asc)
}

fn cached_status<A: OrdersApi>(orch: &OrdersOrchestrator<A>, id: &str) -> OrderStatus {
    orch.list_state(&by_id())
        .data()
        .and_then(|list| list.find(&OrderId::from(id)))
        .map(|o| o.status)
        .expect("order not in cached page")
}

// ---------------------------------------------------------------------------
// ScriptedApi
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Script {
    failing_ids: Mutex<HashSet<OrderId>>,
    fail_lists: AtomicBool,
    hold_next_list: AtomicBool,
    hold_next_update: AtomicBool,
    list_calls: AtomicUsize,
    held: Notify,
    release: Notify,
}

struct ScriptedApi {
    client: OrderClient,
    script: Arc<Script>,
}

#[async_trait]
impl OrdersApi for ScriptedApi {
    async fn fetch_orders(&self, query: ListQuery) -> Result<OrdersList, OrderError> {
        self.script.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_lists.load(Ordering::SeqCst) {
            return Err(OrderError::TransportError("lists down".into()));
        }
        // read first, answer later: the held response carries pre-release data
        let list = self.client.list_orders(query).await;
        if self.script.hold_next_list.swap(false, Ordering::SeqCst) {
            self.script.held.notify_one();
            self.script.release.notified().await;
        }
        list
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.client.fetch_order(id).await
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        tokio::task::yield_now().await;
        if self.script.hold_next_update.swap(false, Ordering::SeqCst) {
            self.script.held.notify_one();
            self.script.release.notified().await;
        }
        if self.script.failing_ids.lock().unwrap().contains(id) {
            return Err(OrderError::TransportError("rejected".into()));
        }
        self.client.update_status(id, status).await
    }
}

fn scripted() -> (OrdersOrchestrator<ScriptedApi>, Arc<Script>) {
    let script = Arc::new(Script::default());
    let api = ScriptedApi {
        client: store(),
        script: Arc::clone(&script),
    };
    (
        OrdersOrchestrator::new(Arc::new(api), TransitionPolicy::standard()),
        script,
    )
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_update_rolls_back_and_posts_persistent_error() {
    let api = Arc::new(MockOrdersApi::new(store(), MockSettings::instant()));
    let orch = OrdersOrchestrator::new(Arc::clone(&api), TransitionPolicy::standard());
    let id = OrderId::from("ORD-1000");

    orch.fetch(by_id()).await;
    let before = orch.list_state(&by_id()).data().unwrap().find(&id).cloned().unwrap();

    api.configure(MockSettings::instant().failing());
    let outcome = orch
        .change_status(by_id(), id.clone(), OrderStatus::InTransit)
        .await
        .unwrap();

    match &outcome {
        MutationState::RolledBack { pre_image, error } => {
            assert_eq!(pre_image, &before);
            assert!(matches!(error, OrderError::TransportError(_)));
        }
        other => panic!("expected rollback, got {other:?}"),
    }
    let restored = orch.list_state(&by_id()).data().unwrap().find(&id).cloned();
    assert_eq!(restored, Some(before));
    assert_eq!(orch.mutation_state(&id), Some(outcome));

    let notice = orch.current_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, ROLLBACK_MESSAGE);

    api.configure(MockSettings::instant());
    let stored = api.fetch_order(&id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Created);

    orch.clear_notice();
    assert_eq!(orch.current_notice(), None);
}

#[tokio::test]
async fn rollback_restores_each_cached_copy_to_its_own_snapshot() {
    let client = store();
    let api = Arc::new(MockOrdersApi::new(client.clone(), MockSettings::instant()));
    let orch = OrdersOrchestrator::new(Arc::clone(&api), TransitionPolicy::standard());
    let id = OrderId::from("ORD-1000");

    orch.fetch(by_id()).await;
    let list_before = orch.list_state(&by_id()).data().and_then(|l| l.find(&id)).cloned().unwrap();

    // the detail cache picks up a write the cached list never saw
    let patch = OrderPatch {
        provider: Some(Provider::Globex),
        ..OrderPatch::default()
    };
    client.patch_order(id.clone(), patch).await.unwrap();
    let detail_before = orch.fetch_order(id.clone()).await.into_data().unwrap();
    assert_eq!(list_before.provider, Provider::Nauta);
    assert_eq!(detail_before.provider, Provider::Globex);

    api.configure(MockSettings::instant().failing());
    let outcome = orch
        .change_status(by_id(), id.clone(), OrderStatus::InTransit)
        .await
        .unwrap();
    assert!(matches!(
        &outcome,
        MutationState::RolledBack { pre_image, .. } if pre_image == &list_before
    ));

    assert_eq!(orch.detail_state(&id).into_data(), Some(detail_before));
    let list_after = orch.list_state(&by_id()).data().and_then(|l| l.find(&id)).cloned();
    assert_eq!(list_after, Some(list_before));
}

#[tokio::test]
async fn fetch_during_pending_change_carries_the_optimistic_write() {
    let (orch, script) = scripted();
    let id = OrderId::from("ORD-1000");
    let wide = by_id().limit(20);
    script.failing_ids.lock().unwrap().insert(id.clone());
    orch.fetch(by_id()).await;

    script.hold_next_update.store(true, Ordering::SeqCst);
    let change = {
        let orch = orch.clone();
        let id = id.clone();
        tokio::spawn(async move { orch.change_status(by_id(), id, OrderStatus::InTransit).await })
    };
    script.held.notified().await;

    let optimistic = orch.list_state(&by_id()).data().and_then(|l| l.find(&id)).cloned().unwrap();
    let overlaid = orch.fetch(wide).await.data().and_then(|l| l.find(&id)).cloned().unwrap();
    assert_eq!(overlaid.status, OrderStatus::InTransit);
    assert_eq!(overlaid.updated_at, optimistic.updated_at);

    script.release.notify_one();
    assert!(matches!(change.await.unwrap(), Ok(MutationState::RolledBack { .. })));

    // the overlaid copy had no snapshot of its own, so it goes stale and is fetched again
    let calls = script.list_calls.load(Ordering::SeqCst);
    let refreshed = orch.fetch(wide).await;
    assert_eq!(script.list_calls.load(Ordering::SeqCst), calls + 1);
    assert_eq!(
        refreshed.data().and_then(|l| l.find(&id)).map(|o| o.status),
        Some(OrderStatus::Created)
    );
}

#[tokio::test(start_paused = true)]
async fn successful_update_refetches_and_notice_clears_after_2200ms() {
    let api = Arc::new(MockOrdersApi::new(store(), MockSettings::instant()));
    let orch = OrdersOrchestrator::new(api, TransitionPolicy::standard());
    let id = OrderId::from("ORD-1000");

    orch.fetch(by_id()).await;
    let outcome = orch
        .change_status(by_id(), id.clone(), OrderStatus::InTransit)
        .await
        .unwrap();

    let MutationState::Committed { pre_image, order } = outcome else {
        panic!("expected commit");
    };
    assert_eq!(pre_image.status, OrderStatus::Created);
    assert_eq!(order.status, OrderStatus::InTransit);
    assert_eq!(cached_status(&orch, "ORD-1000"), OrderStatus::InTransit);
    assert!(matches!(orch.list_state(&by_id()), QueryState::Success { .. }));
    assert_eq!(orch.detail_state(&id).data().map(|o| o.status), Some(OrderStatus::InTransit));

    let notice = orch.current_notice().unwrap();
    assert_eq!((notice.kind, notice.message.as_str()), (NoticeKind::Success, SUCCESS_MESSAGE));

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(orch.current_notice().is_some());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(orch.current_notice(), None);
}

#[tokio::test]
async fn disallowed_change_is_refused_without_dispatch() {
    let api = Arc::new(MockOrdersApi::new(store(), MockSettings::instant()));
    let orch = OrdersOrchestrator::new(Arc::clone(&api), TransitionPolicy::standard());
    let delivered = OrderId::from("ORD-1003");

    orch.fetch(by_id()).await;
    // a dispatched request would come back as a transport error and a rollback
    api.configure(MockSettings::instant().failing());

    let err = orch
        .change_status(by_id(), delivered.clone(), OrderStatus::Created)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Created
        }
    );
    assert_eq!(orch.mutation_state(&delivered), None);
    assert_eq!(orch.current_notice(), None);

    // same-status changes have no edge either
    assert!(orch
        .change_status(by_id(), delivered, OrderStatus::Delivered)
        .await
        .is_err());
}

#[tokio::test]
async fn order_outside_the_cache_is_loaded_first() {
    let api = Arc::new(MockOrdersApi::new(store(), MockSettings::instant()));
    let orch = OrdersOrchestrator::new(api, TransitionPolicy::standard());
    let id = OrderId::from("ORD-1002");

    let outcome = orch
        .change_status(by_id(), id.clone(), OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(matches!(outcome, MutationState::Committed { .. }));
    assert_eq!(
        orch.detail_state(&id).data().map(|o| o.status),
        Some(OrderStatus::Delivered)
    );

    let missing = orch
        .change_status(by_id(), OrderId::from("ORD-9999"), OrderStatus::Canceled)
        .await;
    assert_eq!(missing, Err(OrderError::NotFound(OrderId::from("ORD-9999"))));
}

#[tokio::test]
async fn concurrent_mutations_on_different_ids_are_independent() {
    let (orch, script) = scripted();
    let failing = OrderId::from("ORD-1000");
    let passing = OrderId::from("ORD-1001");
    script.failing_ids.lock().unwrap().insert(failing.clone());

    orch.fetch(by_id()).await;
    let (a, b) = tokio::join!(
        orch.change_status(by_id(), failing.clone(), OrderStatus::Canceled),
        orch.change_status(by_id(), passing.clone(), OrderStatus::Arrived),
    );

    assert!(matches!(a.unwrap(), MutationState::RolledBack { .. }));
    assert!(matches!(b.unwrap(), MutationState::Committed { .. }));
    assert_eq!(cached_status(&orch, "ORD-1000"), OrderStatus::Created);
    assert_eq!(cached_status(&orch, "ORD-1001"), OrderStatus::Arrived);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn fresh_lists_are_served_from_cache() {
    let (orch, script) = scripted();

    orch.fetch(by_id()).await;
    orch.fetch(by_id()).await;
    assert_eq!(script.list_calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(31)).await;
    orch.fetch(by_id()).await;
    assert_eq!(script.list_calls.load(Ordering::SeqCst), 2);

    orch.refetch(by_id()).await;
    assert_eq!(script.list_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn failed_list_fetch_keeps_last_good_data() {
    let (orch, script) = scripted();
    let first = orch.fetch(by_id()).await;
    let good = first.data().cloned().unwrap();
    assert_eq!(good.total, 100);

    script.fail_lists.store(true, Ordering::SeqCst);
    let state = orch.refetch(by_id()).await;
    assert!(matches!(state.error(), Some(OrderError::TransportError(_))));
    assert_eq!(state.data(), Some(&good));

    script.fail_lists.store(false, Ordering::SeqCst);
    let state = orch.refetch(by_id()).await;
    assert_eq!(state, QueryState::Success { data: good });
}

#[tokio::test]
async fn canceled_fetch_result_is_discarded() {
    let (orch, script) = scripted();
    script.hold_next_list.store(true, Ordering::SeqCst);

    let task = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.fetch(by_id()).await })
    };
    script.held.notified().await;
    assert!(orch.list_state(&by_id()).is_loading());

    assert!(orch.cancel(&by_id()));
    script.release.notify_one();

    assert_eq!(task.await.unwrap(), QueryState::Idle);
    assert_eq!(orch.list_state(&by_id()), QueryState::Idle);
}

#[tokio::test]
async fn optimistic_write_cancels_in_flight_refetch() {
    let (orch, script) = scripted();
    orch.fetch(by_id()).await;

    // a refetch that reads the store now but answers after the mutation
    script.hold_next_list.store(true, Ordering::SeqCst);
    let stale = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.refetch(by_id()).await })
    };
    script.held.notified().await;

    let outcome = orch
        .change_status(by_id(), OrderId::from("ORD-1000"), OrderStatus::InTransit)
        .await
        .unwrap();
    assert!(matches!(outcome, MutationState::Committed { .. }));

    script.release.notify_one();
    stale.await.unwrap();
    assert_eq!(cached_status(&orch, "ORD-1000"), OrderStatus::InTransit);
}
