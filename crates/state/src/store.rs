//! Observable value container.
//!
//! A [`Store`] holds one aggregate behind an `Arc`. Replacing the value installs
//! a new `Arc` and calls every subscriber synchronously, in registration order,
//! on the calling thread. Installs and their notifications are serialized by
//! a dispatch lock, so subscribers always observe replaces in install order.
//! Subscribers run outside the value lock: they may read the store or replace
//! another store, but must not replace or subscribe to the store notifying them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct Inner<T> {
    value: Arc<T>,
    subscribers: Vec<(u64, Callback<T>)>,
    next_subscriber_id: u64,
}

/// Shared handle to an observable value. Clones refer to the same store.
pub struct Store<T> {
    inner: Arc<Mutex<Inner<T>>>,
    dispatch: Arc<Mutex<()>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<T: Send + Sync + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: Arc::new(value),
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
            dispatch: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        lock_inner(&self.inner)
    }

    fn lock_dispatch(&self) -> MutexGuard<'_, ()> {
        self.dispatch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current value.
    pub fn current(&self) -> Arc<T> {
        Arc::clone(&self.lock().value)
    }

    /// Install a new value and notify every subscriber with it.
    pub fn replace(&self, value: T) {
        let _dispatch = self.lock_dispatch();
        self.install_and_notify(value);
    }

    /// Compute the next value from the current one and install it. No other
    /// replace can slip in between the read and the install.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let _dispatch = self.lock_dispatch();
        let next = f(&self.current());
        self.install_and_notify(next);
    }

    fn install_and_notify(&self, value: T) {
        let (value, callbacks) = {
            let mut inner = self.lock();
            inner.value = Arc::new(value);
            let callbacks: Vec<Callback<T>> = inner
                .subscribers
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect();
            (Arc::clone(&inner.value), callbacks)
        };

        for callback in callbacks {
            callback(&value);
        }
    }

    /// Register `callback`. It is called right away with the current value and
    /// again after every replace until the returned handle is unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let _dispatch = self.lock_dispatch();
        let (id, value) = {
            let mut inner = self.lock();
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;
            inner.subscribers.push((id, Arc::clone(&callback)));
            (id, Arc::clone(&inner.value))
        };

        callback(&value);

        let store: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = store.upgrade() {
                lock_inner(&inner)
                    .subscribers
                    .retain(|(subscriber_id, _)| *subscriber_id != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock_inner(&self.inner);
        f.debug_struct("Store")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

fn lock_inner<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle leaves the callback registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str, i32) + Clone) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let log = Arc::clone(&log);
            move |name: &str, value: i32| log.lock().unwrap().push(format!("{name}:{value}"))
        };
        (log, sink)
    }

    #[test]
    fn test_subscribe_calls_back_immediately() {
        let store = Store::new(1);
        let (log, sink) = recorder();
        let _sub = store.subscribe(move |v| sink("a", **v));
        assert_eq!(*log.lock().unwrap(), vec!["a:1"]);
    }

    #[test]
    fn test_replace_notifies_each_subscriber_once_in_order() {
        let store = Store::new(0);
        let (log, sink) = recorder();
        let first = sink.clone();
        let _a = store.subscribe(move |v| first("a", **v));
        let _b = store.subscribe(move |v| sink("b", **v));
        log.lock().unwrap().clear();

        store.replace(7);

        assert_eq!(*log.lock().unwrap(), vec!["a:7", "b:7"]);
        assert_eq!(*store.current(), 7);
    }

    #[test]
    fn test_subscribers_receive_the_installed_value() {
        let store = Store::new(String::from("old"));
        let seen: Arc<Mutex<Option<Arc<String>>>> = Arc::new(Mutex::new(None));
        let _sub = {
            let seen = Arc::clone(&seen);
            store.subscribe(move |v| *seen.lock().unwrap() = Some(Arc::clone(v)))
        };

        store.replace(String::from("new"));

        let seen = seen.lock().unwrap().clone().unwrap();
        assert!(Arc::ptr_eq(&seen, &store.current()));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = Store::new(0);
        let (log, sink) = recorder();
        let sub = store.subscribe(move |v| sink("a", **v));
        assert_eq!(store.subscriber_count(), 1);

        sub.unsubscribe();
        store.replace(3);

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(*log.lock().unwrap(), vec!["a:0"]);
    }

    #[test]
    fn test_dropping_handle_keeps_subscription() {
        let store = Store::new(0);
        let (log, sink) = recorder();
        drop(store.subscribe(move |v| sink("a", **v)));

        store.replace(5);

        assert_eq!(*log.lock().unwrap(), vec!["a:0", "a:5"]);
    }

    #[test]
    fn test_concurrent_replaces_notify_in_install_order() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..500 {
            let store = Store::new(0);
            let last_seen = Arc::new(Mutex::new(0));
            let _sub = {
                let last_seen = Arc::clone(&last_seen);
                store.subscribe(move |v| *last_seen.lock().unwrap() = **v)
            };
            let barrier = Arc::new(Barrier::new(2));

            let writers: Vec<_> = [1, 2]
                .into_iter()
                .map(|value| {
                    let store = store.clone();
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        store.replace(value);
                    })
                })
                .collect();
            for writer in writers {
                writer.join().unwrap();
            }

            assert_eq!(*last_seen.lock().unwrap(), *store.current());
        }
    }

    #[test]
    fn test_update_is_atomic_across_threads() {
        use std::thread;

        let store = Store::new(0u32);
        let writers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.update(|v| v + 1);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(*store.current(), 800);
    }

    #[test]
    fn test_subscriber_may_read_store() {
        let store = Store::new(1);
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let seen = Arc::clone(&seen);
            store.subscribe(move |_| seen.lock().unwrap().push(*reader.current()))
        };

        store.update(|v| v + 1);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
