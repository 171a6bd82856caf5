#![forbid(unsafe_code)]

//! The composition operator.
//!
//! [`Compose`] is one operation with five shapes, selected by the right-hand
//! operand:
//!
//! | Shape              | Left                  | Right                 | Output                 |
//! |--------------------|-----------------------|-----------------------|------------------------|
//! | link               | any [`Component`]     | [`link`]`(processor)` | [`AnyComponent<B>`]    |
//! | terminate          | any [`Component`]     | [`render::<R>()`]     | [`RenderHandle<R>`]    |
//! | transform          | any [`Component`]     | [`transform`]`(f)`    | [`AnyComponent<B>`]    |
//! | pairwise merge     | [`AnyComponent<A>`]   | [`AnyComponent<B>`]   | [`Merged<(A, B)>`]     |
//! | arity extension    | [`Merged<(T1..Tn)>`]  | [`AnyComponent<C>`]   | [`Merged<(T1..Tn, C)>`]|
//!
//! `>>` is implemented for [`AnyComponent`] and [`Merged`] as sugar for
//! [`Compose::compose`], and [`ComponentExt`] offers the same shapes as
//! methods on any component.
//!
//! # Invariants
//!
//! 1. Wiring mismatches are type errors; composing cannot fail at runtime.
//! 2. Every shape consumes already-built upstream components, so a pipeline
//!    is a DAG by construction and no ownership cycle can form.
//! 3. The output owns its upstream chain. The edge from upstream to output
//!    is a subscription held by the output's signal (or, for a renderer, by
//!    the [`RenderHandle`]), so dropping the output detaches it.
//!
//! [`Merged<(A, B)>`]: Merged
//! [`Merged<(T1..Tn)>`]: Merged
//! [`Merged<(T1..Tn, C)>`]: Merged
//! [`render::<R>()`]: render

use std::any::type_name;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::ops::Shr;
use std::rc::Rc;

use pipeflow_core::Signal;

use crate::component::{Component, Processor, Renderer};
use crate::erased::{AnyComponent, Linked};
use crate::merge::Merged;
use crate::render::RenderHandle;

/// Composition of `self` with a right-hand operand.
pub trait Compose<Rhs> {
    type Output;

    fn compose(self, rhs: Rhs) -> Self::Output;
}

/// Free-function form of [`Compose::compose`].
pub fn compose<L, R>(lhs: L, rhs: R) -> L::Output
where
    L: Compose<R>,
{
    lhs.compose(rhs)
}

// ---------------------------------------------------------------------------
// Right-hand operands
// ---------------------------------------------------------------------------

/// A processor waiting to be linked under an upstream. See [`link`].
#[derive(Debug)]
pub struct Link<P>(P);

/// Link `processor` under the left-hand component.
pub fn link<P: Processor>(processor: P) -> Link<P> {
    Link(processor)
}

/// A pure mapping waiting to be applied to an upstream. See [`transform`].
pub struct Transform<A, B, F> {
    map: F,
    _signature: PhantomData<fn(&A) -> B>,
}

/// Publish `map(value)` for every value of the left-hand component.
///
/// `map` must be a pure function of its input.
pub fn transform<A, B, F>(map: F) -> Transform<A, B, F>
where
    F: Fn(&A) -> B + 'static,
{
    Transform {
        map,
        _signature: PhantomData,
    }
}

/// A renderer type waiting to be mounted on an upstream. See [`render`].
pub struct Render<R>(PhantomData<fn() -> R>);

/// Terminate the pipeline with renderer `R`.
pub fn render<R: Renderer>() -> Render<R> {
    Render(PhantomData)
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

impl<U, P> Compose<Link<P>> for U
where
    U: Component,
    P: Processor<Upstream = U::Model>,
{
    type Output = AnyComponent<P::Model>;

    fn compose(self, Link(processor): Link<P>) -> Self::Output {
        tracing::debug!(
            message = "compose.link",
            upstream = type_name::<U::Model>(),
            downstream = type_name::<P::Model>()
        );
        let upstream = self.erase();
        let state = processor.state().clone();
        let processor = Rc::new(RefCell::new(processor));

        let target = Rc::downgrade(&processor);
        let subscription = upstream.state().subscribe(move |event| {
            if let Some(processor) = target.upgrade() {
                let mut processor = processor.borrow_mut();
                processor.react(event.value());
                processor.react_with_previous(event.value(), event.previous());
            }
        });
        state.hold(subscription);

        AnyComponent::assemble(state, Linked::new(processor, upstream))
    }
}

impl<U, R> Compose<Render<R>> for U
where
    U: Component,
    R: Renderer<Upstream = U::Model>,
{
    type Output = RenderHandle<R>;

    fn compose(self, _: Render<R>) -> Self::Output {
        tracing::debug!(
            message = "compose.render",
            upstream = type_name::<U::Model>(),
            renderer = type_name::<R>()
        );
        RenderHandle::mount(self.erase())
    }
}

impl<U, A, B, F> Compose<Transform<A, B, F>> for U
where
    U: Component<Model = A>,
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(&A) -> B + 'static,
{
    type Output = AnyComponent<B>;

    fn compose(self, transform: Transform<A, B, F>) -> Self::Output {
        tracing::debug!(
            message = "compose.transform",
            upstream = type_name::<A>(),
            downstream = type_name::<B>()
        );
        let upstream = self.erase();
        let map = transform.map;
        let state = Signal::with_previous(
            upstream.state().with(&map),
            map(&upstream.state().previous()),
        );

        let target = state.downgrade();
        let subscription = upstream.state().subscribe(move |event| {
            if let Some(state) = target.upgrade() {
                state.update(map(event.value()));
            }
        });
        state.hold(subscription);

        AnyComponent::assemble(state, upstream)
    }
}

// ---------------------------------------------------------------------------
// Operator sugar
// ---------------------------------------------------------------------------

impl<M, Rhs> Shr<Rhs> for AnyComponent<M>
where
    Self: Compose<Rhs>,
{
    type Output = <Self as Compose<Rhs>>::Output;

    fn shr(self, rhs: Rhs) -> Self::Output {
        self.compose(rhs)
    }
}

impl<M, Rhs> Shr<Rhs> for Merged<M>
where
    Self: Compose<Rhs>,
{
    type Output = <Self as Compose<Rhs>>::Output;

    fn shr(self, rhs: Rhs) -> Self::Output {
        self.compose(rhs)
    }
}

/// The composition shapes as methods on any component.
pub trait ComponentExt: Component + Sized {
    /// Link shape.
    fn link<P>(self, processor: P) -> AnyComponent<P::Model>
    where
        P: Processor<Upstream = Self::Model>,
    {
        self.compose(link(processor))
    }

    /// Transform shape.
    fn map<B, F>(self, map: F) -> AnyComponent<B>
    where
        B: Clone + 'static,
        F: Fn(&Self::Model) -> B + 'static,
    {
        self.compose(transform::<Self::Model, B, F>(map))
    }

    /// Pairwise merge shape.
    ///
    /// Always builds a two-slot tuple, so merging a [`Merged`] this way nests
    /// it. [`Merged`] has an inherent `merge` that appends a slot instead,
    /// which method syntax picks first.
    fn merge<C: Component>(self, other: C) -> Merged<(Self::Model, C::Model)> {
        self.erase().compose(other.erase())
    }

    /// Terminate shape.
    fn mount<R>(self) -> RenderHandle<R>
    where
        R: Renderer<Upstream = Self::Model>,
    {
        self.compose(render::<R>())
    }
}

impl<C: Component> ComponentExt for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderCell;
    use pipeflow_core::Event;

    /// Publishes the running sum of its upstream.
    struct Accumulator {
        state: Signal<i64>,
        diffs: Vec<i64>,
    }

    impl Accumulator {
        fn new() -> Self {
            Self {
                state: Signal::new(0),
                diffs: Vec::new(),
            }
        }
    }

    impl Component for Accumulator {
        type Model = i64;

        fn state(&self) -> &Signal<i64> {
            &self.state
        }
    }

    impl Processor for Accumulator {
        type Upstream = i64;

        fn react(&mut self, new: &i64) {
            let total = self.state.get() + new;
            self.state.update(total);
        }

        fn react_with_previous(&mut self, new: &i64, previous: &i64) {
            self.diffs.push(new - previous);
        }
    }

    struct Label {
        cell: RenderCell<i64>,
    }

    impl Renderer for Label {
        type Upstream = i64;
        type Output = String;

        fn mount(cell: RenderCell<i64>) -> Self {
            Self { cell }
        }

        fn render(&self) -> String {
            match self.cell.value() {
                Some(v) => format!("total={v}"),
                None => "waiting".to_string(),
            }
        }
    }

    #[test]
    fn link_forwards_both_reactions() {
        let source = Signal::new(0i64);
        let chain = source.clone().erase() >> link(Accumulator::new());

        source.update(5);
        source.update(2);
        assert_eq!(chain.state().get(), 7);

        let diffs = chain.processor::<Accumulator>().map(|acc| acc.diffs.clone());
        assert_eq!(diffs, Some(vec![5, -3]));
    }

    #[test]
    fn processor_of_the_wrong_type_is_none() {
        let chain = Signal::new(0i64).link(Accumulator::new());
        assert!(chain.processor::<Accumulator>().is_some());
        assert!(chain.processor::<Signal<i64>>().is_none());
        assert!(!chain.is::<Accumulator>());
    }

    #[test]
    fn transform_seeds_and_maps() {
        let source = Signal::new(1);
        let doubled = source.clone().erase() >> transform(|x: &i32| x * 2);
        assert_eq!(doubled.state().get(), 2);

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = doubled
            .state()
            .subscribe(move |event| sink.borrow_mut().push(*event));

        source.update(5);
        assert_eq!(*log.borrow(), vec![Event::new(10, 2)]);
    }

    #[test]
    fn transform_seeds_previous_through_map() {
        let source = Signal::with_previous(3, 1);
        let squared = source.map(|x| x * x);
        assert_eq!(squared.state().get(), 9);
        assert_eq!(squared.state().previous(), 1);
    }

    #[test]
    fn render_terminates_chain() {
        let source = Signal::new(0i64);
        let view = compose(source.clone().link(Accumulator::new()), render::<Label>());
        assert_eq!(view.render(), "waiting");

        source.update(4);
        assert_eq!(view.render(), "total=4");
    }

    #[test]
    fn extension_methods_match_operator_shapes() {
        let a = Signal::new(1);
        let b = Signal::new("b");
        let merged = a.clone().merge(b.clone());
        assert_eq!(merged.state().get(), (1, "b"));

        a.update(2);
        assert_eq!(merged.state().get(), (2, "b"));
    }

    #[test]
    fn dropping_link_output_detaches_from_upstream() {
        let source = Signal::new(0i64);
        let chain = source.clone().link(Accumulator::new());
        assert_eq!(source.subscriber_count(), 1);

        drop(chain);
        assert_eq!(source.subscriber_count(), 0);
        source.update(1);
    }
}
