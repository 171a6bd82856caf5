#![forbid(unsafe_code)]

//! Two-parent joins.
//!
//! Every merge shape (pairwise and each arity extension) is an instance of
//! [`join_with`]: a joined signal seeded from both parents at once, and two
//! splice functions that rebuild the joined value from the joined signal's
//! own current value plus the one parent that changed.

use crate::signal::Signal;

/// Join `left` and `right` into a signal of `M`.
///
/// - `seed` builds the joined value from both parents. It runs twice at
///   construction: once over the current values and once over the previous
///   values, so the joined signal is complete immediately.
/// - `on_left` / `on_right` rebuild the joined value when one parent
///   publishes. They read "the other side" from the joined signal's current
///   value, never from the other parent, so the joined signal is the only
///   source of truth after construction.
///
/// Both subscriptions are held by the joined signal: dropping it detaches
/// from both parents. The joined signal does not keep its parents alive.
///
/// # Panics
///
/// A parent update that arrives while the joined signal is itself delivering
/// (a subscriber of the join writing back into a parent) panics with
/// [`SignalError::Reentrant`](crate::SignalError::Reentrant).
#[must_use]
pub fn join_with<L, R, M>(
    left: &Signal<L>,
    right: &Signal<R>,
    seed: impl Fn(&L, &R) -> M,
    on_left: impl Fn(&M, &L) -> M + 'static,
    on_right: impl Fn(&M, &R) -> M + 'static,
) -> Signal<M>
where
    L: Clone + 'static,
    R: Clone + 'static,
    M: Clone + 'static,
{
    let current = left.with(|l| right.with(|r| seed(l, r)));
    let previous = seed(&left.previous(), &right.previous());
    let joined = Signal::with_previous(current, previous);

    tracing::debug!(
        message = "signal.join",
        left = std::any::type_name::<L>(),
        right = std::any::type_name::<R>()
    );

    let target = joined.downgrade();
    let left_sub = left.subscribe(move |event| {
        if let Some(joined) = target.upgrade() {
            let next = joined.with(|merged| on_left(merged, event.value()));
            joined.update(next);
        }
    });

    let target = joined.downgrade();
    let right_sub = right.subscribe(move |event| {
        if let Some(joined) = target.upgrade() {
            let next = joined.with(|merged| on_right(merged, event.value()));
            joined.update(next);
        }
    });

    joined.hold(left_sub);
    joined.hold(right_sub);
    joined
}
