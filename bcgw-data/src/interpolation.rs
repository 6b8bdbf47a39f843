use chrono::NaiveDate;

/// A single data point for interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Linearly interpolate the value at `date` between two data points, weighted
/// by elapsed days rather than position.
///
/// Returns `start.value` when the two points share a date.
pub fn interpolate_at(start: &DataPoint, end: &DataPoint, date: NaiveDate) -> f64 {
    let span = (end.date - start.date).num_days();
    if span == 0 {
        return start.value;
    }
    let elapsed = (date - start.date).num_days();
    let slope = (end.value - start.value) / span as f64;
    start.value + slope * elapsed as f64
}

/// Fill every date in `dates` from a sorted series of known points.
///
/// Dates before the first or after the last known point are `None`;
/// everything in between is interpolated from the bracketing pair.
pub fn interpolate_series(known: &[DataPoint], dates: &[NaiveDate]) -> Vec<Option<f64>> {
    dates
        .iter()
        .map(|&date| {
            let upper = known.partition_point(|p| p.date < date);
            match (upper.checked_sub(1).map(|i| &known[i]), known.get(upper)) {
                (_, Some(end)) if end.date == date => Some(end.value),
                (Some(start), Some(end)) => Some(interpolate_at(start, end, date)),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(y: i32, m: u32, d: u32, value: f64) -> DataPoint {
        DataPoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            value,
        }
    }

    #[test]
    fn test_interpolate_at_uses_elapsed_days() {
        let start = point(2022, 11, 12, 7.0);
        let end = point(2022, 11, 17, 16.0);
        let date = NaiveDate::from_ymd_opt(2022, 11, 13).unwrap();
        assert!((interpolate_at(&start, &end, date) - 8.8).abs() < 1e-12);
        assert_eq!(interpolate_at(&start, &end, end.date), 16.0);
    }

    #[test]
    fn test_interpolate_same_day() {
        let p = point(2022, 11, 12, 100.0);
        assert_eq!(interpolate_at(&p, &p, p.date), 100.0);
    }

    #[test]
    fn test_interpolate_series_irregular_gap() {
        let known = vec![point(2020, 1, 15, 1.0), point(2020, 4, 15, 10.0)];
        let dates = vec![
            NaiveDate::from_ymd_opt(2019, 12, 15).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 15).unwrap(),
            NaiveDate::from_ymd_opt(2020, 4, 15).unwrap(),
            NaiveDate::from_ymd_opt(2020, 5, 15).unwrap(),
        ];
        let filled = interpolate_series(&known, &dates);
        assert_eq!(filled[0], None);
        assert_eq!(filled[1], Some(1.0));
        // Jan 15 -> Feb 15 is 31 of 91 days
        let expected = 1.0 + 9.0 * 31.0 / 91.0;
        assert!((filled[2].unwrap() - expected).abs() < 1e-12);
        assert_eq!(filled[3], Some(10.0));
        assert_eq!(filled[4], None);
    }
}
