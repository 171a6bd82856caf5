//! Property-based invariant tests for composed pipelines.
//!
//! 1. A merge of any width is fully seeded at construction.
//! 2. After any sequence of upstream updates, every merge slot holds the
//!    last value of its upstream, and each update publishes exactly once.
//! 3. `transform(f) >> transform(g)` matches `transform(g . f)` for every
//!    input sequence, including the seeded history.
//! 4. A linked processor sees every upstream event with the right previous
//!    value.

use std::cell::RefCell;
use std::rc::Rc;

use pipeflow_compose::{Component, Processor, link, transform};
use pipeflow_core::Signal;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// An update on one of three sources.
#[derive(Debug, Clone)]
enum TripleOp {
    A(i32),
    B(bool),
    C(u16),
}

fn triple_op() -> impl Strategy<Value = TripleOp> {
    prop_oneof![
        any::<i32>().prop_map(TripleOp::A),
        any::<bool>().prop_map(TripleOp::B),
        any::<u16>().prop_map(TripleOp::C),
    ]
}

/// Records each `(new, previous)` pair it reacts to.
struct Recorder {
    state: Signal<usize>,
    pairs: Rc<RefCell<Vec<(i64, i64)>>>,
}

impl Component for Recorder {
    type Model = usize;

    fn state(&self) -> &Signal<usize> {
        &self.state
    }
}

impl Processor for Recorder {
    type Upstream = i64;

    fn react(&mut self, _new: &i64) {
        let seen = self.state.get() + 1;
        self.state.update(seen);
    }

    fn react_with_previous(&mut self, new: &i64, previous: &i64) {
        self.pairs.borrow_mut().push((*new, *previous));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Merge seeding and slot semantics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn triple_merge_tracks_last_value_per_slot(
        a0 in any::<i32>(),
        b0 in any::<bool>(),
        c0 in any::<u16>(),
        ops in proptest::collection::vec(triple_op(), 0..64),
    ) {
        let a = Signal::new(a0);
        let b = Signal::new(b0);
        let c = Signal::new(c0);
        let merged = a.clone().erase() >> b.clone().erase() >> c.clone().erase();
        prop_assert_eq!(merged.state().get(), (a0, b0, c0));
        prop_assert_eq!(merged.state().previous(), (a0, b0, c0));

        let mut expected = (a0, b0, c0);
        for (i, op) in ops.iter().enumerate() {
            let before = merged.state().get();
            match *op {
                TripleOp::A(v) => { a.update(v); expected.0 = v; }
                TripleOp::B(v) => { b.update(v); expected.1 = v; }
                TripleOp::C(v) => { c.update(v); expected.2 = v; }
            }
            prop_assert_eq!(merged.state().get(), expected);
            prop_assert_eq!(merged.state().previous(), before);
            prop_assert_eq!(merged.state().version(), i as u64 + 1);
        }
    }

    #[test]
    fn pairwise_merge_seeds_previous_from_both_parents(
        a in any::<(i8, i8)>(),
        b in any::<(i8, i8)>(),
    ) {
        let left = Signal::with_previous(a.0, a.1);
        let right = Signal::with_previous(b.0, b.1);
        let merged = left.erase() >> right.erase();
        prop_assert_eq!(merged.state().get(), (a.0, b.0));
        prop_assert_eq!(merged.state().previous(), (a.1, b.1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Transform composition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn chained_transforms_match_fused_transform(
        seed in any::<i32>(),
        values in proptest::collection::vec(any::<i32>(), 0..32),
        add in any::<i32>(),
        mul in any::<i32>(),
    ) {
        let f = move |x: &i32| x.wrapping_add(add);
        let g = move |x: &i32| i64::from(*x).wrapping_mul(i64::from(mul));

        let source = Signal::new(seed);
        let chained = source.clone().erase() >> transform(f) >> transform(g);
        let fused = source.clone().erase() >> transform(move |x: &i32| g(&f(x)));

        prop_assert_eq!(chained.state().get(), fused.state().get());
        prop_assert_eq!(chained.state().previous(), fused.state().previous());
        for value in values {
            source.update(value);
            prop_assert_eq!(chained.state().get(), fused.state().get());
            prop_assert_eq!(chained.state().previous(), fused.state().previous());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Linked processors
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn linked_processor_sees_every_event(
        seed in any::<i64>(),
        values in proptest::collection::vec(any::<i64>(), 0..32),
    ) {
        let pairs = Rc::new(RefCell::new(Vec::new()));
        let source = Signal::new(seed);
        let linked = source.clone().erase() >> link(Recorder {
            state: Signal::new(0),
            pairs: Rc::clone(&pairs),
        });

        for value in &values {
            source.update(*value);
        }

        prop_assert_eq!(linked.state().get(), values.len());
        let expected: Vec<(i64, i64)> = values
            .iter()
            .scan(seed, |previous, value| {
                let pair = (*value, *previous);
                *previous = *value;
                Some(pair)
            })
            .collect();
        prop_assert_eq!(&*pairs.borrow(), &expected);
    }
}
