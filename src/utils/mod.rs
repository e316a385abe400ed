//! Console views and output helpers

pub mod display;

pub use display::{render_view, Color, ColorOutput, GridView, ReportFormatter, SummaryView};
