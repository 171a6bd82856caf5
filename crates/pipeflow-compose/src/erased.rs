#![forbid(unsafe_code)]

//! Type-erased components.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use pipeflow_core::Signal;

use crate::component::Component;

/// What a linked node owns: the processor and the chain it was linked under.
pub(crate) struct Linked<P> {
    processor: Rc<RefCell<P>>,
    _upstream: Box<dyn Any>,
}

impl<P> Linked<P> {
    pub(crate) fn new(processor: Rc<RefCell<P>>, upstream: impl Any) -> Self {
        Self {
            processor,
            _upstream: Box::new(upstream),
        }
    }
}

/// Any component publishing `M`, with its concrete type erased.
///
/// Owns what it wraps: the concrete component and, for a composed node,
/// everything upstream of it. Dropping an `AnyComponent` tears down the
/// chain it owns unless other handles keep individual signals alive.
pub struct AnyComponent<M> {
    // Dropped before `owned`.
    state: Signal<M>,
    owned: Box<dyn Any>,
}

impl<M: Clone + 'static> AnyComponent<M> {
    /// Erase a concrete component.
    pub fn new<C: Component<Model = M>>(component: C) -> Self {
        let state = component.state().clone();
        Self::assemble(state, component)
    }

    /// Build an erased node from the signal it publishes and whatever must
    /// stay alive for that signal to keep being fed.
    pub(crate) fn assemble(state: Signal<M>, owned: impl Any) -> Self {
        Self {
            state,
            owned: Box::new(owned),
        }
    }

    /// Whether the wrapped value is a `T`.
    ///
    /// The wrapped value is the component passed to [`new`](Self::new). A
    /// merge wraps its pair of upstreams. A linked node wraps a private
    /// record, so use [`processor`](Self::processor) to reach its processor.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.owned.is::<T>()
    }

    /// Borrow the wrapped value as a `T`, if it is one. See [`is`](Self::is)
    /// for what counts as the wrapped value.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.owned.downcast_ref::<T>()
    }

    /// Borrow the processor of a linked node, if this node was linked with a
    /// `P`.
    ///
    /// Returns `None` for any other node, and while the processor is
    /// reacting.
    #[must_use]
    pub fn processor<P: Any>(&self) -> Option<Ref<'_, P>> {
        self.owned
            .downcast_ref::<Linked<P>>()
            .and_then(|linked| linked.processor.try_borrow().ok())
    }
}

impl<M: Clone + 'static> Component for AnyComponent<M> {
    type Model = M;

    fn state(&self) -> &Signal<M> {
        &self.state
    }

    fn erase(self) -> AnyComponent<M> {
        self
    }
}

impl<M: fmt::Debug> fmt::Debug for AnyComponent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyComponent")
            .field("model", &std::any::type_name::<M>())
            .field("state", &self.state)
            .finish()
    }
}
