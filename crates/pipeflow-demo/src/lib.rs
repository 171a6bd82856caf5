#![forbid(unsafe_code)]

//! Costume-wardrobe demo for Pipeflow.
//!
//! A costume generator and a clock are advanced on a timer. A wardrobe state
//! manager is linked under the generator, the three models are merged into
//! one tuple, mapped into a [`view::Frame`] and rendered once per tick.

pub mod cli;
pub mod costume;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod view;

pub use cli::{run, run_from_env};
pub use error::{DemoError, Result};
