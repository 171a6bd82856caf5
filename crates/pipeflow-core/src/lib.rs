#![forbid(unsafe_code)]

//! Signal primitives for Pipeflow.
//!
//! This crate provides the publisher side of a push-based data-flow graph:
//!
//! - [`Signal`]: a shared, single-slot publisher holding a current and a
//!   previous value, with synchronous fan-out to its subscribers.
//! - [`Event`]: the immutable snapshot delivered to subscribers on update.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`join_with`]: the two-parent join used by every merge shape.
//!
//! # Architecture
//!
//! `Signal<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` slots and pruned lazily at the start of
//! each fan-out. A signal may also *hold* subscriptions into upstream
//! signals; those are released when the signal is torn down, which is what
//! keeps a composed data-flow edge alive exactly as long as its downstream
//! node.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order, synchronously, before
//!    `update` returns.
//! 2. After `update(v)`, `get() == v` and `previous()` is the value `get()`
//!    returned before the call. Equal values are not deduplicated.
//! 3. Subscribing never replays history.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    fan-out.
//! 5. A signal never delivers into itself: reentrant updates are rejected.
//!
//! # Threading
//!
//! Everything here is `!Send`. A pipeline lives in one evaluation context and
//! concurrent updates from several threads are excluded by construction.

pub mod error;
pub mod event;
pub mod join;
pub mod signal;
pub mod subscription;

pub use error::SignalError;
pub use event::Event;
pub use join::join_with;
pub use signal::{Signal, WeakSignal};
pub use subscription::Subscription;
