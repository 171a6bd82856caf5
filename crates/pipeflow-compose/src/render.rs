#![forbid(unsafe_code)]

//! The render bridge.
//!
//! A [`Renderer`] has no signal of its own. When a pipeline is terminated the
//! composition operator creates a [`RenderCell`] for the renderer, mounts the
//! renderer on it, and returns a [`RenderHandle`] that owns the whole chain.
//!
//! # Design
//!
//! The upstream subscription reaches the cell and the renderer only through
//! weak handles; the [`RenderHandle`] holds the strong ones. For every
//! upstream event the cell is refreshed first, then the renderer's `react`
//! and `react_with_previous` run, so a renderer reading its cell from inside
//! `react` already sees the new event.
//!
//! View layers that do not own the renderer can poll
//! [`RenderCell::version`] or [`RenderCell::subscribe`] to a clone of the
//! cell.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use pipeflow_core::{Event, Signal, Subscription};

use crate::component::{Component, Renderer};
use crate::erased::AnyComponent;

/// The latest upstream event seen by a renderer.
pub struct RenderCell<T> {
    latest: Signal<Option<Event<T>>>,
    closed: Rc<Cell<bool>>,
}

impl<T: Clone + 'static> RenderCell<T> {
    /// An empty, open cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: Signal::new(None),
            closed: Rc::new(Cell::new(false)),
        }
    }

    /// The most recent upstream event, or `None` before the first one.
    #[must_use]
    pub fn latest(&self) -> Option<Event<T>> {
        self.latest.get()
    }

    /// The most recent upstream value.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.latest.with(|latest| latest.as_ref().map(|e| e.value().clone()))
    }

    /// Number of upstream events recorded so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.latest.version()
    }

    /// Whether the upstream has completed or the owning handle was dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Observe every event recorded from now on.
    pub fn subscribe(&self, on_event: impl Fn(&Event<T>) + 'static) -> Subscription {
        self.latest.subscribe(move |recorded| {
            if let Some(event) = recorded.value() {
                on_event(event);
            }
        })
    }
}

impl<T: Clone + 'static> Default for RenderCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RenderCell<T> {
    fn clone(&self) -> Self {
        Self {
            latest: self.latest.clone(),
            closed: Rc::clone(&self.closed),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RenderCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCell")
            .field("latest", &self.latest)
            .field("closed", &self.closed.get())
            .finish()
    }
}

/// A terminated pipeline: the renderer plus everything upstream of it.
///
/// Dropping the handle detaches the renderer and tears down whatever part of
/// the chain nothing else keeps alive. Cells cloned out of the handle report
/// [`is_closed`](RenderCell::is_closed) afterwards.
pub struct RenderHandle<R: Renderer> {
    upstream: AnyComponent<R::Upstream>,
    subscription: Subscription,
    renderer: Rc<RefCell<R>>,
    cell: RenderCell<R::Upstream>,
}

impl<R: Renderer> RenderHandle<R> {
    pub(crate) fn mount(upstream: AnyComponent<R::Upstream>) -> Self {
        let cell = RenderCell::new();
        let renderer = Rc::new(RefCell::new(R::mount(cell.clone())));

        let latest = cell.latest.downgrade();
        let target = Rc::downgrade(&renderer);
        let closed = Rc::clone(&cell.closed);
        let subscription = upstream.state().subscribe_with_completion(
            move |event| {
                if let Some(latest) = latest.upgrade() {
                    latest.update(Some(event.clone()));
                }
                if let Some(renderer) = target.upgrade() {
                    let mut renderer = renderer.borrow_mut();
                    renderer.react(event.value());
                    renderer.react_with_previous(event.value(), event.previous());
                }
            },
            move || closed.set(true),
        );

        Self {
            upstream,
            subscription,
            renderer,
            cell,
        }
    }

    /// Render the current state.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the renderer's own `react`.
    pub fn render(&self) -> R::Output {
        self.renderer.borrow().render()
    }

    /// Borrow the renderer.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.renderer.borrow())
    }

    /// The cell the renderer was mounted on.
    #[must_use]
    pub fn cell(&self) -> &RenderCell<R::Upstream> {
        &self.cell
    }

    /// The chain feeding this renderer.
    #[must_use]
    pub fn upstream(&self) -> &AnyComponent<R::Upstream> {
        &self.upstream
    }

    /// Whether the upstream subscription is still attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active() && !self.cell.is_closed()
    }
}

impl<R: Renderer> Drop for RenderHandle<R> {
    fn drop(&mut self) {
        tracing::trace!(
            message = "render.detach",
            renderer = std::any::type_name::<R>(),
            events = self.cell.version()
        );
        self.cell.closed.set(true);
    }
}

impl<R: Renderer> fmt::Debug for RenderHandle<R>
where
    R::Upstream: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHandle")
            .field("renderer", &std::any::type_name::<R>())
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}
