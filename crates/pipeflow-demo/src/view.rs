//! Frames and the renderers that print them.

use pipeflow::prelude::*;
use serde::Serialize;

use crate::costume::Costume;
use crate::error::Result;
use crate::state::Wardrobe;

/// One line of demo output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub costume: Costume,
    pub wardrobe: Wardrobe,
}

impl Frame {
    /// Build a frame from the merged `(costume, wardrobe, tick)` tuple.
    #[must_use]
    pub fn from_parts(parts: &(Costume, Wardrobe, u64)) -> Self {
        let (costume, wardrobe, tick) = *parts;
        Self {
            tick,
            costume,
            wardrobe,
        }
    }
}

/// Renders the latest frame as a human-readable line.
pub struct TextView {
    cell: RenderCell<Frame>,
    torn_frames: u64,
}

impl TextView {
    #[must_use]
    pub fn torn_frames(&self) -> u64 {
        self.torn_frames
    }
}

impl Renderer for TextView {
    type Upstream = Frame;
    type Output = String;

    fn mount(cell: RenderCell<Frame>) -> Self {
        Self {
            cell,
            torn_frames: 0,
        }
    }

    fn react_with_previous(&mut self, new: &Frame, previous: &Frame) {
        if new.wardrobe.is_torn() && !previous.wardrobe.is_torn() {
            self.torn_frames += 1;
        }
    }

    fn render(&self) -> String {
        let Some(frame) = self.cell.value() else {
            return "(no frames yet)".to_string();
        };
        let status = if frame.wardrobe.is_torn() {
            "TORN"
        } else {
            "ok"
        };
        format!(
            "[{:>4}] wearing {:<14} changes={:<3} {status}",
            frame.tick,
            frame.costume.to_string(),
            frame.wardrobe.changes()
        )
    }
}

/// Renders the latest frame as one JSON object per line.
pub struct JsonView {
    cell: RenderCell<Frame>,
}

impl Renderer for JsonView {
    type Upstream = Frame;
    type Output = Result<String>;

    fn mount(cell: RenderCell<Frame>) -> Self {
        Self { cell }
    }

    fn render(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.cell.latest().map(|e| *e.value()))?)
    }
}
