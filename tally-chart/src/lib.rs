//! Headless time-series line charts rendered on a Skia CPU raster surface.

mod axis;
mod chart;
mod grid;
mod text;
mod types;

pub use axis::Axis;
pub use chart::{Chart, RenderOptions};
pub use grid::{linspace, value_precision};
pub use types::{Insets, HEIGHT, WIDTH};
