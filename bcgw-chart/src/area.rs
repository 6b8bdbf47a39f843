//! Hydrograph of a well's monthly series with its trend line.

use crate::chart::Chart;
use crate::error::{ChartError, Result};
use crate::units::{is_stable, per_year, SlopeUnit};
use bcgw_data::MonthlyRecord;
use chrono::{Duration, NaiveDate};
use plotters::coord::types::RangedDate;
use plotters::prelude::*;

pub(crate) const SIZE: (u32, u32) = (900, 500);
const WATER: RGBColor = RGBColor(54, 144, 192);
const TREND: RGBColor = RGBColor(204, 76, 2);
const INTERPOLATED: RGBColor = RGBColor(215, 25, 28);

/// Trend parameters and display switches for [`gwl_area_plot`].
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPlotParams {
    /// Slope in `unit` per period, positive when levels deepen.
    pub trend: Option<f64>,
    /// Level at the first date of the series.
    pub intercept: Option<f64>,
    pub trend_category: String,
    pub sig: Option<f64>,
    pub unit: SlopeUnit,
    pub show_interpolated: bool,
    pub show_stable_line: bool,
    pub title: Option<String>,
}

impl Default for AreaPlotParams {
    fn default() -> Self {
        AreaPlotParams {
            trend: None,
            intercept: None,
            trend_category: String::from("stable"),
            sig: None,
            unit: SlopeUnit::Annual,
            show_interpolated: true,
            show_stable_line: false,
            title: None,
        }
    }
}

impl AreaPlotParams {
    /// Parameters with the slope unit given by name.
    pub fn new(
        trend: Option<f64>,
        intercept: Option<f64>,
        trend_category: &str,
        sig: Option<f64>,
        unit: &str,
    ) -> Result<Self> {
        Ok(AreaPlotParams {
            trend,
            intercept,
            trend_category: trend_category.to_string(),
            sig,
            unit: unit.parse()?,
            ..AreaPlotParams::default()
        })
    }

    pub fn is_stable(&self) -> bool {
        is_stable(&self.trend_category)
    }

    pub fn slope_per_day(&self) -> Option<f64> {
        self.trend.map(|trend| self.unit.per_day(trend))
    }

    pub fn subtitle(&self) -> String {
        let category = format!("Trend category: {}", self.trend_category.trim());
        if self.is_stable() {
            return category;
        }
        match (self.slope_per_day(), self.sig) {
            (Some(per_day), Some(sig)) => format!(
                "{}; Rate: {:.2} m/year; Significance: {:.3}",
                category,
                per_year(per_day),
                sig
            ),
            (Some(per_day), None) => {
                format!("{}; Rate: {:.2} m/year", category, per_year(per_day))
            }
            _ => category,
        }
    }

    /// End points of the trend line over `start..=end`, if one is drawn.
    pub fn trend_line(&self, start: NaiveDate, end: NaiveDate) -> Option<[(NaiveDate, f64); 2]> {
        if self.is_stable() && !self.show_stable_line {
            return None;
        }
        let (per_day, intercept) = (self.slope_per_day()?, self.intercept?);
        let level = |date: NaiveDate| intercept + per_day * (date - start).num_days() as f64;
        Some([(start, level(start)), (end, level(end))])
    }
}

/// Shallowest and deepest level to show, padded.
pub(crate) fn depth_bounds(levels: impl Iterator<Item = f64>) -> (f64, f64) {
    let (low, high) = levels
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), v| {
            (low.min(v), high.max(v))
        });
    if !low.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((high - low) * 0.05).max(0.5);
    (low - pad, high + pad)
}

/// Area chart of the monthly median level, depth increasing downwards.
///
/// Records must belong to one well.
pub fn gwl_area_plot(records: &[MonthlyRecord], params: &AreaPlotParams) -> Result<Chart> {
    let mut series: Vec<&MonthlyRecord> = records.iter().collect();
    series.sort_by_key(|record| record.date);
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(ChartError::EmptySeries);
    };
    let (start, end) = (first.date, last.date);
    let title = params
        .title
        .clone()
        .unwrap_or_else(|| format!("Observation Well #{}", first.well_num));
    let subtitle = params.subtitle();
    let line = params.trend_line(start, end);

    let (shallow, deep) = depth_bounds(
        series
            .iter()
            .map(|record| record.med_gwl)
            .chain(line.iter().flatten().map(|(_, level)| *level)),
    );
    let x_end = if end > start {
        end
    } else {
        start + Duration::days(30)
    };
    let x_range: RangedDate<NaiveDate> = (start..x_end).into();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root
            .titled(&title, ("sans-serif", 22))?
            .titled(&subtitle, ("sans-serif", 14))?;
        let mut chart = ChartBuilder::on(&area)
            .margin(20)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, -deep..-shallow)?;
        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|date: &NaiveDate| date.format("%Y").to_string())
            .y_labels(8)
            .y_label_formatter(&|y: &f64| format!("{:.1}", -y))
            .y_desc("Depth below ground (m)")
            .draw()?;

        chart
            .draw_series(
                AreaSeries::new(
                    series.iter().map(|record| (record.date, -record.med_gwl)),
                    -deep,
                    WATER.mix(0.4),
                )
                .border_style(WATER),
            )?
            .label("Monthly median level")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], WATER.filled()));

        if let Some(points) = line {
            chart
                .draw_series(LineSeries::new(
                    points.iter().map(|(date, level)| (*date, -level)),
                    TREND.stroke_width(2),
                ))?
                .label("Trend")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TREND));
        }

        if params.show_interpolated && series.iter().any(|record| record.is_interpolated()) {
            chart
                .draw_series(
                    series
                        .iter()
                        .filter(|record| record.is_interpolated())
                        .map(|record| {
                            Circle::new((record.date, -record.med_gwl), 3, INTERPOLATED.filled())
                        }),
                )?
                .label("Interpolated")
                .legend(|(x, y)| Circle::new((x + 10, y), 3, INTERPOLATED.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
    }

    Ok(Chart {
        title,
        subtitle: Some(subtitle),
        svg,
    })
}
