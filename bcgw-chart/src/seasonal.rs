//! Seasonal view: the spread of monthly levels per calendar month.

use crate::area::{depth_bounds, SIZE};
use crate::chart::Chart;
use crate::error::{ChartError, Result};
use bcgw_data::MonthlyRecord;
use bcgw_utils::stats::{median, quantile};
use plotters::prelude::*;

const RANGE_BAND: RGBColor = RGBColor(208, 209, 230);
const PERCENTILE_BAND: RGBColor = RGBColor(103, 169, 207);
const MEDIAN: RGBColor = RGBColor(1, 70, 54);
const RECENT: RGBColor = RGBColor(204, 76, 2);
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Distribution of monthly median levels for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthStats {
    pub month: u32,
    pub min: f64,
    pub q05: f64,
    pub median: f64,
    pub q95: f64,
    pub max: f64,
}

/// Per-month statistics for the calendar months present in `records`.
pub fn month_stats(records: &[MonthlyRecord]) -> Vec<MonthStats> {
    (1..=12)
        .filter_map(|month| {
            let levels: Vec<f64> = records
                .iter()
                .filter(|record| record.month == month)
                .map(|record| record.med_gwl)
                .collect();
            Some(MonthStats {
                month,
                min: levels.iter().copied().reduce(f64::min)?,
                q05: quantile(&levels, 0.05)?,
                median: median(&levels)?,
                q95: quantile(&levels, 0.95)?,
                max: levels.iter().copied().reduce(f64::max)?,
            })
        })
        .collect()
}

fn month_label(x: &f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || !(1.0..=12.0).contains(&rounded) {
        return String::new();
    }
    MONTHS[rounded as usize - 1].to_string()
}

/// Seasonal chart: min-max and 5-95% bands of monthly medians per calendar
/// month with the median line, plus the latest 12 months when `last_12`.
///
/// Records must belong to one well.
pub fn gwl_monthly_plot(records: &[MonthlyRecord], last_12: bool) -> Result<Chart> {
    let stats = month_stats(records);
    let (Some(first), Some(last)) = (
        records.iter().min_by_key(|record| record.date),
        records.iter().max_by_key(|record| record.date),
    ) else {
        return Err(ChartError::EmptySeries);
    };
    let title = format!("Observation Well #{}", first.well_num);
    let subtitle = format!("Monthly groundwater levels, {}-{}", first.year, last.year);
    let mut recent: Vec<&MonthlyRecord> = records.iter().collect();
    recent.sort_by_key(|record| std::cmp::Reverse(record.date));
    recent.truncate(12);

    let (shallow, deep) = depth_bounds(records.iter().map(|record| record.med_gwl));
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
            .build_cartesian_2d(0.5f64..12.5f64, -deep..-shallow)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(12)
            .x_label_formatter(&month_label)
            .y_label_formatter(&|y: &f64| format!("{:.1}", -y))
            .y_desc("Depth below ground (m)")
            .draw()?;

        let band = |low: f64, high: f64, m: u32, half_width: f64| {
            let x = m as f64;
            [(x - half_width, -low), (x + half_width, -high)]
        };
        chart
            .draw_series(stats.iter().map(|s| {
                Rectangle::new(band(s.min, s.max, s.month, 0.4), RANGE_BAND.filled())
            }))?
            .label("Range")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RANGE_BAND.filled()));
        chart
            .draw_series(stats.iter().map(|s| {
                Rectangle::new(band(s.q05, s.q95, s.month, 0.3), PERCENTILE_BAND.filled())
            }))?
            .label("5th-95th percentile")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], PERCENTILE_BAND.filled())
            });
        chart
            .draw_series(LineSeries::new(
                stats.iter().map(|s| (s.month as f64, -s.median)),
                MEDIAN.stroke_width(2),
            ))?
            .label("Median")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MEDIAN));

        if last_12 {
            chart
                .draw_series(recent.iter().map(|record| {
                    Circle::new((record.month as f64, -record.med_gwl), 4, RECENT.filled())
                }))?
                .label("Last 12 months")
                .legend(|(x, y)| Circle::new((x + 10, y), 4, RECENT.filled()));
        }

        chart
            .configure_series_labels()
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn records() -> Vec<MonthlyRecord> {
        let mut records = Vec::new();
        for year in 2010..2020 {
            for month in 1..=12u32 {
                let seasonal = if (4..=9).contains(&month) { 1.0 } else { 3.0 };
                records.push(MonthlyRecord {
                    well_num: 2,
                    ems_id: None,
                    year,
                    month,
                    date: NaiveDate::from_ymd_opt(year, month, 15).unwrap(),
                    med_gwl: seasonal + (year - 2010) as f64 * 0.1,
                    dev_med_gwl: None,
                    n_readings: 28,
                });
            }
        }
        records
    }

    #[test]
    fn test_month_stats() {
        let stats = month_stats(&records());
        assert_eq!(stats.len(), 12);
        let jan = stats[0];
        assert_eq!(jan.month, 1);
        assert!((jan.min - 3.0).abs() < 1e-12);
        assert!((jan.max - 3.9).abs() < 1e-12);
        assert!((jan.median - 3.45).abs() < 1e-12);
        assert!(jan.q05 >= jan.min && jan.q05 <= jan.median);
        assert!(jan.q95 <= jan.max && jan.q95 >= jan.median);
        assert!(stats[5].median < jan.median);
    }

    #[test]
    fn test_month_stats_skips_absent_months() {
        let only_march: Vec<MonthlyRecord> =
            records().into_iter().filter(|r| r.month == 3).collect();
        let stats = month_stats(&only_march);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].month, 3);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(&1.0), "Jan");
        assert_eq!(month_label(&12.0), "Dec");
        assert_eq!(month_label(&1.5), "");
        assert_eq!(month_label(&0.5), "");
    }

    #[test]
    fn test_render_seasonal_plot() {
        let chart = gwl_monthly_plot(&records(), true).unwrap();
        assert_eq!(chart.title, "Observation Well #2");
        assert_eq!(
            chart.subtitle.as_deref(),
            Some("Monthly groundwater levels, 2010-2019")
        );
        assert!(chart.svg.contains("Last 12 months"));
        let without = gwl_monthly_plot(&records(), false).unwrap();
        assert!(!without.svg.contains("Last 12 months"));
        assert!(matches!(
            gwl_monthly_plot(&[], true),
            Err(ChartError::EmptySeries)
        ));
    }
}
