//! Wiring of the demo pipeline.
//!
//! ```text
//! CostumeGenerator ──┬────────────────────────────┐
//!                    └─> StateManager ──────────┐ │
//! Clock ──────────────────────────────────────┐ │ │
//!                                             v v v
//!                           merge (costume, wardrobe, tick)
//!                                      │ transform
//!                                      v
//!                                    Frame ──> renderer
//! ```

use pipeflow::prelude::*;

use crate::costume::{Clock, CostumeGenerator};
use crate::state::StateManager;
use crate::view::Frame;

/// The assembled demo: both sources plus the terminated pipeline.
pub struct Demo<R: Renderer<Upstream = Frame>> {
    generator: CostumeGenerator,
    clock: Clock,
    view: RenderHandle<R>,
}

impl<R: Renderer<Upstream = Frame>> Demo<R> {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let generator = CostumeGenerator::new(seed);
        let clock = Clock::new();

        let costumes = generator.state().clone();
        let wardrobe =
            costumes.clone().erase() >> link(StateManager::new(costumes.get()));
        let merged = costumes.erase() >> wardrobe >> clock.state().clone().erase();
        let view = merged >> transform(Frame::from_parts) >> render::<R>();

        tracing::debug!(message = "demo.assembled", seed);
        Self {
            generator,
            clock,
            view,
        }
    }

    /// Advance both sources once and render the resulting frame.
    pub fn step(&mut self) -> R::Output {
        self.generator.advance();
        let tick = self.clock.tick();
        tracing::trace!(message = "demo.step", tick, frames = self.view.cell().version());
        self.view.render()
    }

    /// Number of frames the renderer has received.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.view.cell().version()
    }

    #[must_use]
    pub fn latest(&self) -> Option<Frame> {
        self.view.cell().value()
    }

    #[must_use]
    pub fn view(&self) -> &RenderHandle<R> {
        &self.view
    }
}
