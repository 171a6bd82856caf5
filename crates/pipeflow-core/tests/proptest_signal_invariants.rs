//! Property-based invariant tests for `Signal`.
//!
//! These tests verify invariants that must hold for **any** sequence of
//! updates and subscriptions:
//!
//! 1. After each update, `get()` is the supplied value and `previous()` is
//!    the value `get()` returned just before.
//! 2. One update reaches every live subscriber exactly once, in
//!    subscription order, with the same event.
//! 3. Unsubscribed callbacks receive nothing further.
//! 4. New subscribers never receive past events.
//! 5. `version()` counts committed updates.
//! 6. `combine` seeds from both parents and splices exactly one slot per
//!    parent update.

use std::cell::RefCell;
use std::rc::Rc;

use pipeflow_core::{Event, Signal, Subscription};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

type Log = Rc<RefCell<Vec<(usize, Event<i64>)>>>;

fn tagged_subscriber(signal: &Signal<i64>, tag: usize, log: &Log) -> Subscription {
    let log = Rc::clone(log);
    signal.subscribe(move |event| log.borrow_mut().push((tag, *event)))
}

/// Either an update on parent A, or on parent B.
#[derive(Debug, Clone)]
enum PairOp {
    Left(i64),
    Right(i64),
}

fn pair_op() -> impl Strategy<Value = PairOp> {
    prop_oneof![
        any::<i64>().prop_map(PairOp::Left),
        any::<i64>().prop_map(PairOp::Right),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. History bookkeeping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn current_and_previous_track_updates(
        seed in any::<i64>(),
        values in proptest::collection::vec(any::<i64>(), 0..64),
    ) {
        let signal = Signal::new(seed);
        prop_assert_eq!(signal.previous(), seed);

        for (i, value) in values.iter().copied().enumerate() {
            let before = signal.get();
            signal.update(value);
            prop_assert_eq!(signal.get(), value);
            prop_assert_eq!(signal.previous(), before);
            prop_assert_eq!(signal.version(), i as u64 + 1);
        }
    }

    #[test]
    fn events_carry_new_and_replaced_values(
        seed in any::<i64>(),
        values in proptest::collection::vec(any::<i64>(), 1..32),
    ) {
        let signal = Signal::new(seed);
        let log: Log = Rc::default();
        let _sub = tagged_subscriber(&signal, 0, &log);

        for value in &values {
            signal.update(*value);
        }

        let mut expected_previous = seed;
        let log = log.borrow();
        prop_assert_eq!(log.len(), values.len());
        for ((_, event), value) in log.iter().zip(&values) {
            prop_assert_eq!(*event.value(), *value);
            prop_assert_eq!(*event.previous(), expected_previous);
            expected_previous = *value;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2-4. Fan-out order, unsubscribe, no replay
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fanout_visits_subscribers_in_order(
        subscribers in 1usize..16,
        value in any::<i64>(),
    ) {
        let signal = Signal::new(0);
        let log: Log = Rc::default();
        let addresses: Rc<RefCell<Vec<usize>>> = Rc::default();
        let _subs: Vec<_> = (0..subscribers)
            .map(|tag| {
                let log = Rc::clone(&log);
                let addresses = Rc::clone(&addresses);
                signal.subscribe(move |event| {
                    addresses.borrow_mut().push(std::ptr::from_ref(event).addr());
                    log.borrow_mut().push((tag, *event));
                })
            })
            .collect();

        signal.update(value);

        let log = log.borrow();
        let tags: Vec<usize> = log.iter().map(|(tag, _)| *tag).collect();
        prop_assert_eq!(tags, (0..subscribers).collect::<Vec<_>>());
        prop_assert!(log.iter().all(|(_, event)| *event == Event::new(value, 0)));

        // Every subscriber was handed the same `Event`, not a copy.
        let addresses = addresses.borrow();
        prop_assert_eq!(addresses.len(), subscribers);
        prop_assert!(addresses.iter().all(|addr| *addr == addresses[0]));
    }

    #[test]
    fn dropped_subscribers_receive_nothing(
        keep in proptest::collection::vec(any::<bool>(), 1..16),
        value in any::<i64>(),
    ) {
        let signal = Signal::new(0);
        let log: Log = Rc::default();
        let subs: Vec<_> = (0..keep.len())
            .map(|tag| tagged_subscriber(&signal, tag, &log))
            .collect();

        let kept: Vec<_> = subs
            .into_iter()
            .zip(&keep)
            .filter_map(|(sub, keep)| keep.then_some(sub))
            .collect();

        signal.update(value);

        let expected: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(tag, keep)| keep.then_some(tag))
            .collect();
        let delivered: Vec<usize> = log.borrow().iter().map(|(tag, _)| *tag).collect();
        prop_assert_eq!(delivered, expected);
        prop_assert_eq!(signal.subscriber_count(), kept.len());
    }

    #[test]
    fn late_subscribers_see_only_future_updates(
        before in proptest::collection::vec(any::<i64>(), 0..16),
        after in proptest::collection::vec(any::<i64>(), 0..16),
    ) {
        let signal = Signal::new(0);
        for value in &before {
            signal.update(*value);
        }

        let log: Log = Rc::default();
        let _sub = tagged_subscriber(&signal, 0, &log);
        for value in &after {
            signal.update(*value);
        }

        let delivered: Vec<i64> = log.borrow().iter().map(|(_, e)| *e.value()).collect();
        prop_assert_eq!(delivered, after);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Pair merge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn combine_tracks_last_value_of_each_parent(
        a0 in any::<i64>(),
        b0 in any::<i64>(),
        ops in proptest::collection::vec(pair_op(), 0..64),
    ) {
        let a = Signal::new(a0);
        let b = Signal::new(b0);
        let pair = a.combine(&b);
        prop_assert_eq!(pair.get(), (a0, b0));

        let (mut last_a, mut last_b) = (a0, b0);
        for op in ops {
            let before = pair.get();
            match op {
                PairOp::Left(v) => {
                    a.update(v);
                    last_a = v;
                    prop_assert_eq!(pair.get().1, before.1);
                }
                PairOp::Right(v) => {
                    b.update(v);
                    last_b = v;
                    prop_assert_eq!(pair.get().0, before.0);
                }
            }
            prop_assert_eq!(pair.get(), (last_a, last_b));
            prop_assert_eq!(pair.previous(), before);
        }
    }
}
