#![forbid(unsafe_code)]

//! Components and the composition operator for Pipeflow pipelines.
//!
//! A pipeline is assembled from three roles:
//!
//! - **sources** implement [`Component`] and publish a [`Signal`](pipeflow_core::Signal),
//! - **processors** additionally implement [`Processor`] and react to an
//!   upstream model,
//! - **renderers** implement [`Renderer`] and terminate the pipeline.
//!
//! [`Compose`] wires them together. Every wiring is checked at compile time:
//! a processor can only be linked under an upstream publishing exactly the
//! model it consumes.
//!
//! # Example
//!
//! ```
//! use pipeflow_compose::{Component, transform};
//! use pipeflow_core::Signal;
//!
//! let width = Signal::new(3);
//! let height = Signal::new(4);
//!
//! let area = (width.clone().erase() >> height.clone().erase())
//!     >> transform(|(w, h): &(i32, i32)| w * h);
//! assert_eq!(area.state().get(), 12);
//!
//! height.update(5);
//! assert_eq!(area.state().get(), 15);
//! ```

pub mod component;
pub mod compose;
pub mod erased;
pub mod merge;
pub mod render;

pub use component::{Component, Processor, Renderer};
pub use compose::{
    Compose, ComponentExt, Link, Render, Transform, compose, link, render, transform,
};
pub use erased::AnyComponent;
pub use merge::Merged;
pub use render::{RenderCell, RenderHandle};
