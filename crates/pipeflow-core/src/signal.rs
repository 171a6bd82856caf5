#![forbid(unsafe_code)]

//! The value-holding publisher primitive.
//!
//! # Design
//!
//! [`Signal<T>`] is a handle to shared, reference-counted storage holding the
//! current value, the value it replaced, a list of weakly held subscriber
//! slots, and the subscriptions this signal owns into its upstreams
//! ("observations"). Cloning a `Signal` creates another handle to the same
//! storage. Teardown runs when the last handle drops.
//!
//! # Invariants
//!
//! 1. Fan-out visits subscribers in subscription order and completes before
//!    `update` returns.
//! 2. The subscriber list is snapshotted when a fan-out starts: callbacks
//!    added during delivery see the next update only, callbacks dropped
//!    during delivery still receive the in-flight event.
//! 3. Delivery happens before commit. While subscribers run, `get()` still
//!    returns the value being replaced; the event carries the new one.
//! 4. `version()` increments by exactly 1 per committed update.
//! 5. A signal never delivers into itself. `try_update` during the signal's
//!    own fan-out returns [`SignalError::Reentrant`]; `update` panics.
//!
//! # Failure Modes
//!
//! - **Subscriber panics**: the panic unwinds through `update`. Later
//!   subscribers in the same fan-out are skipped, the new value is not
//!   committed, and the signal accepts updates again afterwards.
//! - **Teardown**: subscribers registered with a completion callback are
//!   told the stream ended, the subscriber list is cleared, and held upstream
//!   subscriptions are released. Weak handles then reject updates with
//!   [`SignalError::Closed`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::SignalError;
use crate::event::Event;
use crate::join::join_with;
use crate::subscription::Subscription;

type Callback<T> = Box<dyn Fn(&Event<T>)>;
type Completion = Box<dyn FnOnce()>;

/// One registered subscriber. Strongly owned by its [`Subscription`].
struct Slot<T> {
    on_event: Callback<T>,
    on_complete: Cell<Option<Completion>>,
}

struct SignalInner<T> {
    current: T,
    previous: T,
    /// Bumped once per committed update.
    version: u64,
    /// Set for the duration of a fan-out.
    delivering: bool,
    subscribers: Vec<Weak<Slot<T>>>,
    /// Subscriptions into upstream signals, released on teardown.
    observations: Vec<Subscription>,
}

impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        let subscribers = std::mem::take(&mut self.subscribers);
        tracing::trace!(
            message = "signal.teardown",
            subscribers = subscribers.len(),
            observations = self.observations.len()
        );
        for slot in subscribers.iter().filter_map(Weak::upgrade) {
            if let Some(on_complete) = slot.on_complete.take() {
                on_complete();
            }
        }
        drop(subscribers);
        self.observations.clear();
    }
}

/// Resets the delivering flag when a fan-out ends, including by unwinding.
struct DeliveryGuard<'a, T>(&'a RefCell<SignalInner<T>>);

impl<T> Drop for DeliveryGuard<'_, T> {
    fn drop(&mut self) {
        self.0.borrow_mut().delivering = false;
    }
}

/// A single-slot publisher with synchronous fan-out.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use pipeflow_core::Signal;
///
/// let count = Signal::new(1);
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let _sub = count.subscribe(move |event| {
///     sink.borrow_mut().push((*event.value(), *event.previous()));
/// });
///
/// count.update(5);
/// assert_eq!(count.get(), 5);
/// assert_eq!(count.previous(), 1);
/// assert_eq!(*seen.borrow(), vec![(5, 1)]);
/// ```
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("current", &inner.current)
            .field("previous", &inner.previous)
            .field("version", &inner.version)
            .field(
                "subscribers",
                &inner
                    .subscribers
                    .iter()
                    .filter(|slot| slot.strong_count() > 0)
                    .count(),
            )
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a signal whose previous value starts equal to `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        let previous = value.clone();
        Self::with_previous(value, previous)
    }

    /// Create a signal seeded with both a current and a previous value.
    #[must_use]
    pub fn with_previous(current: T, previous: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                current,
                previous,
                version: 0,
                delivering: false,
                subscribers: Vec::new(),
                observations: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().current.clone()
    }

    /// Clone of the value replaced by the last committed update (or the seed).
    #[must_use]
    pub fn previous(&self) -> T {
        self.inner.borrow().previous.clone()
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` holds the borrow while something calls `hold` or
    /// `subscribe` on the same signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().current)
    }

    /// Number of committed updates.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of subscribers whose [`Subscription`] is still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }

    /// Whether a fan-out is in progress on this signal.
    #[must_use]
    pub fn is_delivering(&self) -> bool {
        self.inner.borrow().delivering
    }

    /// Whether both handles point at the same signal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register a callback for future updates. Past values are not replayed.
    pub fn subscribe(&self, on_event: impl Fn(&Event<T>) + 'static) -> Subscription {
        self.register(Box::new(on_event), None)
    }

    /// Like [`subscribe`](Self::subscribe), also running `on_complete` once
    /// when the signal is torn down while the subscription is alive.
    pub fn subscribe_with_completion(
        &self,
        on_event: impl Fn(&Event<T>) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> Subscription {
        self.register(Box::new(on_event), Some(Box::new(on_complete)))
    }

    fn register(&self, on_event: Callback<T>, on_complete: Option<Completion>) -> Subscription {
        let slot = Rc::new(Slot {
            on_event,
            on_complete: Cell::new(on_complete),
        });
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|slot| slot.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&slot));
        drop(inner);
        let source: Weak<dyn Any> = Rc::downgrade(&self.inner) as Weak<dyn Any>;
        Subscription::new(slot, source)
    }

    /// Publish `value` to every subscriber, then commit it.
    ///
    /// # Panics
    ///
    /// Panics with [`SignalError::Reentrant`] when called from inside this
    /// signal's own fan-out, and propagates any panic raised by a subscriber.
    pub fn update(&self, value: T) {
        if let Err(err) = self.try_update(value) {
            panic!("{err}");
        }
    }

    /// Publish `value`, rejecting reentrant calls instead of panicking.
    pub fn try_update(&self, value: T) -> Result<(), SignalError> {
        let (event, slots) = {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                tracing::warn!(message = "signal.reentrant", borrowed = true);
                return Err(SignalError::Reentrant);
            };
            if inner.delivering {
                tracing::warn!(message = "signal.reentrant", borrowed = false);
                return Err(SignalError::Reentrant);
            }
            inner.delivering = true;
            inner.subscribers.retain(|slot| slot.strong_count() > 0);
            let slots: Vec<Rc<Slot<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            tracing::trace!(
                message = "signal.update",
                version = inner.version + 1,
                subscribers = slots.len()
            );
            (Event::new(value, inner.current.clone()), slots)
        };

        {
            let _delivering = DeliveryGuard(&self.inner);
            for slot in &slots {
                (slot.on_event)(&event);
            }
        }

        let (value, _) = event.into_parts();
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.previous = std::mem::replace(&mut inner.current, value);
        inner.version += 1;
        Ok(())
    }

    /// Take ownership of a subscription into another signal.
    ///
    /// The subscription lives until this signal is torn down, so a data-flow
    /// edge feeding this signal dies with it.
    pub fn hold(&self, subscription: Subscription) {
        self.inner.borrow_mut().observations.push(subscription);
    }

    /// Merge with `other` into a pair signal.
    ///
    /// The pair is seeded with both current values (and both previous
    /// values) at once. An update on either parent republishes the pair with
    /// only that parent's slot replaced. Dropping the pair unsubscribes it
    /// from both parents.
    #[must_use]
    pub fn combine<U: Clone + 'static>(&self, other: &Signal<U>) -> Signal<(T, U)> {
        join_with(
            self,
            other,
            |left, right| (left.clone(), right.clone()),
            |merged: &(T, U), left: &T| (left.clone(), merged.1.clone()),
            |merged: &(T, U), right: &U| (merged.0.clone(), right.clone()),
        )
    }

    /// A non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// A non-owning handle to a [`Signal`].
///
/// Composition glue forwards into downstream signals through weak handles so
/// that an upstream never keeps its consumers alive.
pub struct WeakSignal<T> {
    inner: Weak<RefCell<SignalInner<T>>>,
}

impl<T> Clone for WeakSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for WeakSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSignal")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<T: Clone + 'static> WeakSignal<T> {
    /// Recover a strong handle if the signal is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Signal<T>> {
        self.inner.upgrade().map(|inner| Signal { inner })
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Publish through the weak handle; [`SignalError::Closed`] after teardown.
    pub fn try_update(&self, value: T) -> Result<(), SignalError> {
        self.upgrade().ok_or(SignalError::Closed)?.try_update(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
