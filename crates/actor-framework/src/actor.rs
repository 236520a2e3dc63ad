//! # Generic Actor Server
//!
//! `ResourceActor` owns the entity store and the receiving end of the channel. It
//! processes messages one at a time, so the store needs no `Mutex`.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// Entities live in a `Vec` in insertion order with a `HashMap` index beside it, so
/// [`ActorEntity::select`] always sees a stable order (queries rely on it for tie-breaks)
/// while lookups by ID stay O(1).
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new(buffer, seed)` returns the actor and its client.
/// 2.  **Wire**: pass dependencies into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Counter { id: u32, hits: u32 }
/// #[derive(Debug)] struct CounterError;
/// impl std::fmt::Display for CounterError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "counter") }
/// }
/// impl std::error::Error for CounterError {}
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = u32;
///     type Update = u32;
///     type Action = ();
///     type ActionResult = u32;
///     type Query = ();
///     type QueryResult = usize;
///     type Context = ();
///     type Error = CounterError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn select(items: &[Self], _: &()) -> usize { items.len() }
///     async fn on_update(&mut self, hits: u32, _: &()) -> Result<(), Self::Error> { self.hits = hits; Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<u32, Self::Error> { self.hits += 1; Ok(self.hits) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let seed = vec![Counter { id: 1, hits: 0 }, Counter { id: 2, hits: 0 }];
///     let (actor, client) = ResourceActor::new(10, seed);
///     tokio::spawn(actor.run(()));
///
///     assert_eq!(client.perform_action(1, ()).await.unwrap(), 1);
///     assert_eq!(client.query(()).await.unwrap(), 2);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    items: Vec<T>,
    index: HashMap<T::Id, usize>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` seeded with `seed`, and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the MPSC channel; when it is full, client calls wait.
    /// A later seed entry with a duplicate ID replaces the earlier one in place.
    pub fn new(buffer_size: usize, seed: impl IntoIterator<Item = T>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut actor = Self {
            receiver,
            items: Vec::new(),
            index: HashMap::new(),
        };
        for item in seed {
            actor.insert(item);
        }
        (actor, ResourceClient::new(sender))
    }

    fn insert(&mut self, item: T) {
        match self.index.get(item.id()) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.index.insert(item.id().clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        let pos = *self.index.get(id)?;
        self.items.get_mut(pos)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Order" rather than "order_tracker::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.items.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.index.get(&id).map(|&pos| self.items[pos].clone());
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(item.clone()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Query { query, respond_to } => {
                    debug!(entity_type, ?query, "Query");
                    let _ = respond_to.send(Ok(T::select(&self.items, &query)));
                }
            }
        }

        info!(entity_type, size = self.items.len(), "Shutdown");
    }
}
