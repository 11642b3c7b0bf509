//! Key-coalescing work queue.
//!
//! Items are buffered per key. A key becomes visible to [`KeyedQueue::get`]
//! once it has pending items and no worker holds it; `get` hands out the whole
//! buffer for that key at once and marks the key in flight until
//! [`KeyedQueue::done`] is called. Items added for an in-flight key are kept
//! and the key is rescheduled on `done`.
//!
//! [`KeyedQueue::shut_down`] lets workers drain what is already scheduled;
//! [`KeyedQueue::shut_down_now`] discards everything not yet handed out.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use parking_lot::Mutex;
use tokio::sync::Notify;

struct QueueState<K, V> {
    /// Keys ready to be handed out, in scheduling order.
    queue: VecDeque<K>,

    /// Keys with pending items (queued, or waiting for their worker to finish).
    dirty: HashSet<K>,

    /// Keys currently held by a worker.
    processing: HashSet<K>,

    /// Items buffered since the key was last handed out.
    pending: HashMap<K, Vec<V>>,

    shutting_down: bool,

    /// Set by `shut_down_now`: new items are dropped and nothing is handed out.
    discarding: bool,
}

impl<K, V> QueueState<K, V>
where
    K: Clone + Eq + Hash,
{
    fn take_next(&mut self) -> Option<(K, Vec<V>)> {
        let key = self.queue.pop_front()?;
        self.dirty.remove(&key);
        self.processing.insert(key.clone());
        let items = self.pending.remove(&key).unwrap_or_default();
        Some((key, items))
    }
}

/// Blocking, deduplicating work queue keyed by entity identity.
pub struct KeyedQueue<K, V> {
    state: Mutex<QueueState<K, V>>,
    notify: Notify,
}

impl<K, V> KeyedQueue<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                queue: VecDeque::new(),
                dirty: HashSet::new(),
                processing: HashSet::new(),
                pending: HashMap::new(),
                shutting_down: false,
                discarding: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Append an item to the key's pending list. Never blocks.
    ///
    /// After [`shut_down`](Self::shut_down) the item is still buffered, but a
    /// key that is not in flight is no longer scheduled. After
    /// [`shut_down_now`](Self::shut_down_now) the item is dropped.
    pub fn add(&self, key: K, item: V) {
        let scheduled = {
            let mut state = self.state.lock();
            if state.discarding {
                return;
            }
            state.pending.entry(key.clone()).or_default().push(item);

            if !state.dirty.insert(key.clone()) {
                // Already queued or waiting on its worker's `done`.
                false
            } else if state.processing.contains(&key) || state.shutting_down {
                false
            } else {
                state.queue.push_back(key);
                true
            }
        };

        if scheduled {
            self.notify.notify_one();
        }
    }

    /// Wait for a key with pending items.
    ///
    /// Returns the key with every item buffered for it since the previous
    /// retrieval, or `None` once the queue is shut down and drained. The key
    /// stays in flight until [`done`](Self::done) is called for it.
    pub async fn get(&self) -> Option<(K, Vec<V>)> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(batch) = state.take_next() {
                    return Some(batch);
                }
                if state.shutting_down {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Non-blocking variant of [`get`](Self::get).
    pub fn try_get(&self) -> Option<(K, Vec<V>)> {
        self.state.lock().take_next()
    }

    /// Release a key taken by `get`. If items arrived for it in the meantime
    /// it is scheduled again.
    pub fn done(&self, key: &K) {
        let rescheduled = {
            let mut state = self.state.lock();
            state.processing.remove(key);
            if !state.discarding && state.dirty.contains(key) {
                state.queue.push_back(key.clone());
                true
            } else {
                false
            }
        };

        if rescheduled {
            self.notify.notify_one();
        }
    }

    /// Close the queue and wake every blocked `get`.
    ///
    /// Workers keep receiving already scheduled keys until the queue is
    /// drained.
    pub fn shut_down(&self) {
        self.state.lock().shutting_down = true;
        self.notify.notify_waiters();
    }

    /// Close the queue, drop every item not yet handed out and wake every
    /// blocked `get`. Keys already in flight are left to their workers.
    pub fn shut_down_now(&self) {
        {
            let mut state = self.state.lock();
            state.shutting_down = true;
            state.discarding = true;
            state.queue.clear();
            state.dirty.clear();
            state.pending.clear();
        }
        self.notify.notify_waiters();
    }

    /// Number of keys waiting to be handed out.
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys currently held by workers.
    pub fn in_flight(&self) -> usize {
        self.state.lock().processing.len()
    }
}

impl<K, V> Default for KeyedQueue<K, V>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
