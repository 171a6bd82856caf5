#![forbid(unsafe_code)]

//! The immutable update snapshot delivered to subscribers.

/// One delivered update: the value just published and the value it replaced.
///
/// Events are built once per fan-out and handed to every subscriber by
/// shared reference, so all subscribers of one update observe the same
/// instance.
///
/// `previous` is always present. A signal seeded with a single value reports
/// that seed as the previous value of its first event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event<T> {
    value: T,
    previous: T,
}

impl<T> Event<T> {
    /// Create an event from the new value and the value it replaces.
    #[must_use]
    pub const fn new(value: T, previous: T) -> Self {
        Self { value, previous }
    }

    /// The newly published value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// The value that was current before this update.
    #[must_use]
    pub const fn previous(&self) -> &T {
        &self.previous
    }

    /// Split into `(value, previous)`.
    #[must_use]
    pub fn into_parts(self) -> (T, T) {
        (self.value, self.previous)
    }

    /// Apply `f` to both values.
    #[must_use]
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Event<U> {
        Event {
            value: f(&self.value),
            previous: f(&self.previous),
        }
    }
}

impl<T: PartialEq> Event<T> {
    /// Whether the update actually changed the value.
    ///
    /// Signals publish equal values too; this lets a consumer skip them.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.value != self.previous
    }
}
