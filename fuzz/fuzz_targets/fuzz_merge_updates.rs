#![no_main]

use std::cell::RefCell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pipeflow_compose::{Component, transform};
use pipeflow_core::Signal;

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Left(i16),
    Middle(bool),
    Right(u8),
    Subscribe,
    Unsubscribe,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    seed: (i16, bool, u8),
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzInput| {
    let (l0, m0, r0) = input.seed;
    let left = Signal::new(l0);
    let middle = Signal::new(m0);
    let right = Signal::new(r0);

    let merged = left.clone().erase() >> middle.clone().erase() >> right.clone().erase();
    let summary = merged.state().clone().erase()
        >> transform(|(l, m, r): &(i16, bool, u8)| i32::from(*l) + i32::from(*m) + i32::from(*r));

    let seen = Rc::new(RefCell::new(0usize));
    let mut subs = Vec::new();
    let mut expected = (l0, m0, r0);
    let mut updates = 0u64;

    for op in input.ops.into_iter().take(1024) {
        let before = merged.state().get();
        match op {
            FuzzOp::Left(v) => {
                left.update(v);
                expected.0 = v;
            }
            FuzzOp::Middle(v) => {
                middle.update(v);
                expected.1 = v;
            }
            FuzzOp::Right(v) => {
                right.update(v);
                expected.2 = v;
            }
            FuzzOp::Subscribe => {
                let sink = Rc::clone(&seen);
                subs.push(merged.state().subscribe(move |_| *sink.borrow_mut() += 1));
                continue;
            }
            FuzzOp::Unsubscribe => {
                subs.pop();
                continue;
            }
        }
        updates += 1;
        assert_eq!(merged.state().get(), expected);
        assert_eq!(merged.state().previous(), before);
        assert_eq!(merged.state().version(), updates);
        assert_eq!(merged.state().subscriber_count(), subs.len() + 1);
        let (l, m, r) = expected;
        assert_eq!(summary.state().get(), i32::from(l) + i32::from(m) + i32::from(r));
    }
});
