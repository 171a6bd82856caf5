//! The wardrobe state manager.
//!
//! Sits under the costume generator and tracks what is being worn. A
//! costume is counted as a change only when it differs from the one it
//! replaces. Pulling the same garment on again in a different colour tears
//! it; the wardrobe stays [`Wardrobe::Torn`] until a different garment is
//! worn.

use pipeflow::prelude::*;
use serde::Serialize;

use crate::costume::Costume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Wardrobe {
    Dressed { costume: Costume, changes: u32 },
    Torn { costume: Costume, changes: u32 },
}

impl Wardrobe {
    #[must_use]
    pub const fn costume(&self) -> Costume {
        match *self {
            Self::Dressed { costume, .. } | Self::Torn { costume, .. } => costume,
        }
    }

    #[must_use]
    pub const fn changes(&self) -> u32 {
        match *self {
            Self::Dressed { changes, .. } | Self::Torn { changes, .. } => changes,
        }
    }

    #[must_use]
    pub const fn is_torn(&self) -> bool {
        matches!(self, Self::Torn { .. })
    }
}

pub struct StateManager {
    state: Signal<Wardrobe>,
}

impl StateManager {
    #[must_use]
    pub fn new(initial: Costume) -> Self {
        Self {
            state: Signal::new(Wardrobe::Dressed {
                costume: initial,
                changes: 0,
            }),
        }
    }
}

impl Component for StateManager {
    type Model = Wardrobe;

    fn state(&self) -> &Signal<Wardrobe> {
        &self.state
    }
}

impl Processor for StateManager {
    type Upstream = Costume;

    fn react(&mut self, _new: &Costume) {}

    fn react_with_previous(&mut self, new: &Costume, previous: &Costume) {
        let current = self.state.get();
        let changes = if new == previous {
            current.changes()
        } else {
            current.changes() + 1
        };

        let next = if new != previous && new.garment == previous.garment {
            tracing::warn!(
                message = "wardrobe.torn",
                garment = new.garment.name(),
                from = previous.colour.name(),
                to = new.colour.name()
            );
            Wardrobe::Torn {
                costume: *new,
                changes,
            }
        } else if current.is_torn() && new.garment == current.costume().garment {
            Wardrobe::Torn {
                costume: *new,
                changes,
            }
        } else {
            Wardrobe::Dressed {
                costume: *new,
                changes,
            }
        };
        self.state.update(next);
    }
}
