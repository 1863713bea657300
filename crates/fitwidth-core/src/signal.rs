#![forbid(unsafe_code)]

//! Payload-free change signals with independent subscriptions.
//!
//! A [`Signal`] is the subscription registry behind a host event such as
//! "the viewport was resized". A [`KeyedSignal`] is the same thing fanned out
//! per key, used for per-node resize observation.
//!
//! # Invariants
//!
//! 1. Listeners run in registration order.
//! 2. A listener unsubscribed before or during an emission is not called by
//!    the remainder of that emission.
//! 3. `KeyedSignal::emit(k)` only reaches listeners subscribed under `k`.
//! 4. Emission never holds the registry borrow while a listener runs, so
//!    listeners may subscribe or unsubscribe re-entrantly.
//!
//! Both types use `Rc<RefCell<..>>` and are single-threaded, matching the
//! host's dispatch loop.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use ahash::AHashMap;

/// Callback invoked on emission. Carries no payload: "something may have changed".
pub type Listener = Rc<dyn Fn()>;

/// Identity of one subscription within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct SignalInner {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl SignalInner {
    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn contains(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(sid, _)| *sid == id)
    }
}

/// A shared, clonable subscription registry for one event source.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct Signal {
    inner: Rc<RefCell<SignalInner>>,
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Signal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.inner.borrow_mut().subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().unsubscribe(id)
    }

    /// Whether `id` is still registered.
    #[must_use]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().contains(id)
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Call every live listener. Returns how many ran.
    pub fn emit(&self) -> usize {
        let snapshot: Vec<(SubscriptionId, Listener)> = self.inner.borrow().listeners.clone();
        let mut ran = 0;
        for (id, listener) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            listener();
            ran += 1;
        }
        ran
    }
}

struct KeyedInner<K> {
    next_id: u64,
    by_key: AHashMap<K, Vec<(SubscriptionId, Listener)>>,
}

impl<K> Default for KeyedInner<K> {
    fn default() -> Self {
        Self {
            next_id: 0,
            by_key: AHashMap::new(),
        }
    }
}

/// A subscription registry partitioned by key.
///
/// Subscription ids are unique across all keys of one registry.
pub struct KeyedSignal<K> {
    inner: Rc<RefCell<KeyedInner<K>>>,
}

impl<K> Clone for KeyedSignal<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K> Default for KeyedSignal<K> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(KeyedInner::default())),
        }
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for KeyedSignal<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("KeyedSignal")
            .field("keys", &inner.by_key.len())
            .finish()
    }
}

impl<K: Eq + Hash + Clone> KeyedSignal<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `key`.
    pub fn subscribe(&self, key: K, listener: Listener) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.by_key.entry(key).or_default().push((id, listener));
        id
    }

    /// Remove a listener registered under `key`. Returns `false` if it was
    /// already gone.
    pub fn unsubscribe(&self, key: &K, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(list) = inner.by_key.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sid, _)| *sid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            inner.by_key.remove(key);
        }
        removed
    }

    #[must_use]
    pub fn is_subscribed(&self, key: &K, id: SubscriptionId) -> bool {
        self.inner
            .borrow()
            .by_key
            .get(key)
            .is_some_and(|list| list.iter().any(|(sid, _)| *sid == id))
    }

    /// Number of live listeners for `key`.
    #[must_use]
    pub fn listener_count(&self, key: &K) -> usize {
        self.inner.borrow().by_key.get(key).map_or(0, Vec::len)
    }

    /// Number of live listeners across all keys.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.inner.borrow().by_key.values().map(Vec::len).sum()
    }

    /// Call the live listeners registered under `key`. Returns how many ran.
    pub fn emit(&self, key: &K) -> usize {
        let snapshot: Vec<(SubscriptionId, Listener)> = match self.inner.borrow().by_key.get(key)
        {
            Some(list) => list.clone(),
            None => return 0,
        };
        let mut ran = 0;
        for (id, listener) in snapshot {
            if !self.is_subscribed(key, id) {
                continue;
            }
            listener();
            ran += 1;
        }
        ran
    }
}
