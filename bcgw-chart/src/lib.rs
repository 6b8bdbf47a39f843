//! SVG charts for groundwater level series, rendered with `plotters`.

pub mod area;
pub mod chart;
pub mod error;
pub mod seasonal;
pub mod units;

pub use area::{gwl_area_plot, AreaPlotParams};
pub use chart::Chart;
pub use error::{ChartError, Result};
pub use seasonal::gwl_monthly_plot;
pub use units::SlopeUnit;
