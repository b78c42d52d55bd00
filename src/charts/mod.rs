//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{BoxStats, ChartPlotter, ACCENT_COLOR, PALETTE};
pub use renderer::{RenderError, StaticChartRenderer};
