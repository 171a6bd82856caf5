//! The costume generator source and the clock source.

use std::fmt;

use pipeflow::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Garment {
    Cape,
    Coat,
    Hat,
    Mask,
    Gloves,
}

impl Garment {
    pub const ALL: [Self; 5] = [Self::Cape, Self::Coat, Self::Hat, Self::Mask, Self::Gloves];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cape => "cape",
            Self::Coat => "coat",
            Self::Hat => "hat",
            Self::Mask => "mask",
            Self::Gloves => "gloves",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Colour {
    Crimson,
    Teal,
    Gold,
    Violet,
}

impl Colour {
    pub const ALL: [Self; 4] = [Self::Crimson, Self::Teal, Self::Gold, Self::Violet];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crimson => "crimson",
            Self::Teal => "teal",
            Self::Gold => "gold",
            Self::Violet => "violet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Costume {
    pub colour: Colour,
    pub garment: Garment,
}

impl Costume {
    #[must_use]
    pub const fn new(colour: Colour, garment: Garment) -> Self {
        Self { colour, garment }
    }
}

impl fmt::Display for Costume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.colour.name(), self.garment.name())
    }
}

/// Publishes a freshly drawn costume each time it is advanced.
///
/// Draws are reproducible for a given seed.
pub struct CostumeGenerator {
    state: Signal<Costume>,
    rng: StdRng,
}

impl CostumeGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let first = draw(&mut rng);
        Self {
            state: Signal::new(first),
            rng,
        }
    }

    /// Draw the next costume and publish it.
    pub fn advance(&mut self) -> Costume {
        let costume = draw(&mut self.rng);
        tracing::debug!(message = "costume.draw", costume = %costume);
        self.state.update(costume);
        costume
    }
}

fn draw(rng: &mut StdRng) -> Costume {
    let colour = Colour::ALL[rng.gen_range(0..Colour::ALL.len())];
    let garment = Garment::ALL[rng.gen_range(0..Garment::ALL.len())];
    Costume::new(colour, garment)
}

impl Component for CostumeGenerator {
    type Model = Costume;

    fn state(&self) -> &Signal<Costume> {
        &self.state
    }
}

/// Publishes a monotonically increasing tick count, starting at zero.
#[derive(Default)]
pub struct Clock {
    state: Signal<u64>,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        let next = self.state.get() + 1;
        self.state.update(next);
        next
    }
}

impl Component for Clock {
    type Model = u64;

    fn state(&self) -> &Signal<u64> {
        &self.state
    }
}
