//! Shared store handle: serialized dispatch plus snapshot subscription.

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::reducer::Reducer;

/// Thread-safe container applying intents through a [`Reducer`].
///
/// Dispatch is synchronous and serialized: intents are applied one at a
/// time, in the order their callers reach the store. Readers get `Arc`
/// snapshots and can never mutate shared state in place.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R::State>>,
    _reducer: PhantomData<fn() -> R>,
}

struct StoreInner<S> {
    current: Mutex<Arc<S>>,
    publisher: watch::Sender<Arc<S>>,
}

impl<R: Reducer> Store<R> {
    /// Create a store holding `initial`.
    pub fn new(initial: R::State) -> Self {
        let initial = Arc::new(initial);
        let (publisher, _) = watch::channel(Arc::clone(&initial));
        Self {
            inner: Arc::new(StoreInner {
                current: Mutex::new(initial),
                publisher,
            }),
            _reducer: PhantomData,
        }
    }

    /// Apply an intent and return the resulting snapshot.
    pub fn dispatch(&self, intent: R::Intent) -> Arc<R::State> {
        let mut current = self.inner.current.lock();
        let next = Arc::new(R::reduce((**current).clone(), intent));
        *current = Arc::clone(&next);
        // Publish while still holding the lock so subscribers observe
        // snapshots in dispatch order.
        self.inner.publisher.send_replace(Arc::clone(&next));
        next
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<R::State> {
        Arc::clone(&*self.inner.current.lock())
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<R::State>> {
        self.inner.publisher.subscribe()
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _reducer: PhantomData,
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}
