#![forbid(unsafe_code)]

//! Component contracts.
//!
//! A component is any type that satisfies one of these capability traits;
//! there is no shared base type. The three roles are told apart by which
//! traits a type implements:
//!
//! | Role      | Traits                    | Publishes | Reacts |
//! |-----------|---------------------------|-----------|--------|
//! | Source    | [`Component`]             | yes       | no     |
//! | Processor | [`Component`] + [`Processor`] | yes   | yes    |
//! | Renderer  | [`Renderer`]              | no        | yes    |

use pipeflow_core::Signal;

use crate::erased::AnyComponent;
use crate::render::RenderCell;

/// Publishes a [`Signal`] of its model.
///
/// A component implementing only this trait is a source: nothing upstream
/// feeds it, and whoever owns it decides when to call `update`.
pub trait Component: 'static {
    /// The value type this component publishes.
    type Model: Clone + 'static;

    /// The signal this component publishes.
    fn state(&self) -> &Signal<Self::Model>;

    /// Wrap into an [`AnyComponent`] so it can be chained regardless of its
    /// concrete type.
    fn erase(self) -> AnyComponent<Self::Model>
    where
        Self: Sized,
    {
        AnyComponent::new(self)
    }
}

/// A component that reacts to an upstream model and publishes its own.
///
/// Once linked, every upstream event invokes [`react`](Self::react) and then
/// [`react_with_previous`](Self::react_with_previous). Implement the second
/// one only when the component wants to diff against the replaced value.
pub trait Processor: Component {
    /// The model this component consumes.
    type Upstream: Clone + 'static;

    fn react(&mut self, new: &Self::Upstream);

    fn react_with_previous(&mut self, _new: &Self::Upstream, _previous: &Self::Upstream) {}
}

/// The terminal of a pipeline: reacts to an upstream model and renders.
///
/// A renderer has no signal of its own. It is constructed by the
/// composition operator with a [`RenderCell`] bound to the upstream; the cell
/// holds the most recent upstream event, or nothing before the first one.
pub trait Renderer: 'static {
    /// The model this renderer consumes.
    type Upstream: Clone + 'static;
    /// What [`render`](Self::render) produces.
    type Output;

    /// Construct the renderer bound to its upstream cell.
    fn mount(cell: RenderCell<Self::Upstream>) -> Self
    where
        Self: Sized;

    fn react(&mut self, _new: &Self::Upstream) {}

    fn react_with_previous(&mut self, _new: &Self::Upstream, _previous: &Self::Upstream) {}

    fn render(&self) -> Self::Output;
}

/// A bare signal is the simplest source.
impl<T: Clone + 'static> Component for Signal<T> {
    type Model = T;

    fn state(&self) -> &Signal<T> {
        self
    }
}
