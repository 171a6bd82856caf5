#![forbid(unsafe_code)]

//! Merged components.
//!
//! A [`Merged<M>`] publishes a tuple assembled from several upstreams. It is
//! built by the pairwise merge shape (`AnyComponent<A> >> AnyComponent<B>`)
//! and widened one slot at a time by the arity-extension shape
//! (`Merged<(T1, .., Tn)> >> AnyComponent<C>`) up to eight slots.
//!
//! Each step is a [`join_with`] of the existing tuple signal and the new
//! upstream, so an update on any upstream republishes the whole tuple with
//! exactly that upstream's slot replaced. Every slot is populated from the
//! moment the merge is built; there is no partial tuple.

use std::any::type_name;
use std::fmt;

use pipeflow_core::{Signal, join_with};

use crate::component::Component;
use crate::compose::Compose;
use crate::erased::AnyComponent;

/// A component publishing the tuple of several upstream models.
pub struct Merged<M> {
    inner: AnyComponent<M>,
}

impl<M: Clone + 'static> Merged<M> {
    fn assemble(state: Signal<M>, upstreams: impl std::any::Any) -> Self {
        Self {
            inner: AnyComponent::assemble(state, upstreams),
        }
    }
}

impl<M: Clone + 'static> Component for Merged<M> {
    type Model = M;

    fn state(&self) -> &Signal<M> {
        self.inner.state()
    }

    fn erase(self) -> AnyComponent<M> {
        self.inner
    }
}

impl<M: fmt::Debug> fmt::Debug for Merged<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Merged").field(&self.inner).finish()
    }
}

impl<A, B> Compose<AnyComponent<B>> for AnyComponent<A>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    type Output = Merged<(A, B)>;

    fn compose(self, rhs: AnyComponent<B>) -> Self::Output {
        tracing::debug!(
            message = "compose.merge",
            left = type_name::<A>(),
            right = type_name::<B>()
        );
        let state = self.state().combine(rhs.state());
        Merged::assemble(state, (self, rhs))
    }
}

/// Arity extension for one tuple width.
///
/// `extend_merge!(0 T1, 1 T2; 2)` implements
/// `Merged<(T1, T2)> >> AnyComponent<C> -> Merged<(T1, T2, C)>`; the trailing
/// literal is the index the new slot lands in.
macro_rules! extend_merge {
    ($($idx:tt $T:ident),+ ; $new:tt) => {
        impl<$($T,)+ C> Compose<AnyComponent<C>> for Merged<($($T,)+)>
        where
            $($T: Clone + 'static,)+
            C: Clone + 'static,
        {
            type Output = Merged<($($T,)+ C)>;

            fn compose(self, rhs: AnyComponent<C>) -> Self::Output {
                tracing::debug!(
                    message = "compose.extend",
                    width = $new + 1,
                    added = type_name::<C>()
                );
                let state = join_with(
                    self.state(),
                    rhs.state(),
                    |tuple: &($($T,)+), added: &C| ($(tuple.$idx.clone(),)+ added.clone()),
                    |merged: &($($T,)+ C), tuple: &($($T,)+)| {
                        ($(tuple.$idx.clone(),)+ merged.$new.clone())
                    },
                    |merged: &($($T,)+ C), added: &C| ($(merged.$idx.clone(),)+ added.clone()),
                );
                Merged::assemble(state, (self, rhs))
            }
        }

        impl<$($T,)+> Merged<($($T,)+)>
        where
            $($T: Clone + 'static,)+
        {
            /// Append `other` as a new last slot. Same as `self >> other.erase()`.
            pub fn merge<D: Component>(self, other: D) -> Merged<($($T,)+ D::Model)> {
                self.compose(other.erase())
            }
        }
    };
}

extend_merge!(0 T1, 1 T2; 2);
extend_merge!(0 T1, 1 T2, 2 T3; 3);
extend_merge!(0 T1, 1 T2, 2 T3, 3 T4; 4);
extend_merge!(0 T1, 1 T2, 2 T3, 3 T4, 4 T5; 5);
extend_merge!(0 T1, 1 T2, 2 T3, 3 T4, 4 T5, 5 T6; 6);
extend_merge!(0 T1, 1 T2, 2 T3, 3 T4, 4 T5, 5 T6, 6 T7; 7);
