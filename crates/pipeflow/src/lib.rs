#![forbid(unsafe_code)]

//! Pipeflow public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users: the
//! signal primitives from `pipeflow-core` and the component contracts and
//! composition operator from `pipeflow-compose`.
//!
//! ```
//! use pipeflow::prelude::*;
//!
//! let celsius = Signal::new(20.0_f64);
//! let fahrenheit = celsius.clone().map(|c| c * 9.0 / 5.0 + 32.0);
//!
//! celsius.update(100.0);
//! assert_eq!(fahrenheit.state().get(), 212.0);
//! assert_eq!(fahrenheit.state().previous(), 68.0);
//! ```

pub mod prelude {
    pub use pipeflow_compose::{
        AnyComponent, Component, ComponentExt, Compose, Merged, Processor, RenderCell,
        RenderHandle, Renderer, compose, link, render, transform,
    };
    pub use pipeflow_core::{Event, Signal, SignalError, Subscription, WeakSignal};
}
