//! WebAssembly bridge for the Lorenz attractor explorer.
//!
//! Two front-ends share the core solver: [`WasmLorenzApp`] renders once per
//! submit with a static/interactive toggle, and [`WasmDashboard`] re-renders
//! only the fragments subscribed to the slider that moved.

mod analysis;
mod app;
pub mod controls;
pub mod dashboard;
pub mod figure;
mod logging;
pub mod page;
pub mod static_plot;

pub use app::{RenderedPlot, WasmLorenzApp};
pub use dashboard::{UiFragment, WasmDashboard};
pub use logging::init_logging;
