#![forbid(unsafe_code)]

//! Errors reported by [`Signal`](crate::Signal) updates.

use thiserror::Error;

/// Why an update was rejected.
///
/// Delivery faults are not represented here: a panicking subscriber unwinds
/// through `update` to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The signal is already delivering an update further up the call stack.
    #[error("reentrant update: signal is already delivering an event")]
    Reentrant,

    /// The signal has been torn down; no handle can publish into it anymore.
    #[error("signal has been torn down")]
    Closed,
}
