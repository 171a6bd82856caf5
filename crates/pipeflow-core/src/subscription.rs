#![forbid(unsafe_code)]

//! RAII subscription guards.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

/// Keeps a subscriber callback registered on a [`Signal`](crate::Signal).
///
/// The signal only stores a weak reference to the callback; this guard holds
/// the strong one. Dropping the guard (or calling
/// [`unsubscribe`](Self::unsubscribe)) removes the callback before the next
/// fan-out. The guard is type-erased so subscriptions into signals of
/// different value types can be stored side by side.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    slot: Option<Rc<dyn Any>>,
    source: Weak<dyn Any>,
}

impl Subscription {
    pub(crate) fn new(slot: Rc<dyn Any>, source: Weak<dyn Any>) -> Self {
        Self {
            slot: Some(slot),
            source,
        }
    }

    /// Stop receiving events. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        self.slot = None;
    }

    /// Whether the callback is still registered on a live signal.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot.is_some() && self.source.strong_count() > 0
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Signal;

    #[test]
    fn active_until_source_dropped() {
        let signal = Signal::new(0);
        let sub = signal.subscribe(|_| {});
        assert!(sub.is_active());
        drop(signal);
        assert!(!sub.is_active());
    }

    #[test]
    fn unsubscribe_releases_slot() {
        let signal = Signal::new(0);
        let sub = signal.subscribe(|_| {});
        assert_eq!(signal.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn debug_reports_activity() {
        let signal = Signal::new(0);
        let sub = signal.subscribe(|_| {});
        assert!(format!("{sub:?}").contains("active: true"));
    }
}
