//! Shared utility functions for BC groundwater crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Day of the month used as the representative date of a monthly value.
    pub const MID_MONTH_DAY: u32 = 15;

    /// Timestamp layouts seen in the observation well CSV files.
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse an observation timestamp, keeping only its calendar date.
    ///
    /// Accepts a bare date or a date with an hour/minute(/second) time part,
    /// separated by either a space or `T`. A trailing `Z` is ignored.
    pub fn parse_observation_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim().trim_end_matches('Z');
        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(datetime.date());
            }
        }
        parse_date(trimmed)
            .map_err(|e| anyhow::anyhow!("unrecognised timestamp '{}': {}", s, e))
    }

    /// Number of months since year 0 for a (year, month) pair.
    pub fn month_index(year: i32, month: u32) -> i32 {
        year * 12 + (month as i32 - 1)
    }

    /// The date `months` calendar months before `date`, clamped to the end
    /// of the month when the day does not exist.
    pub fn months_before(date: &NaiveDate, months: u32) -> NaiveDate {
        date.checked_sub_months(chrono::Months::new(months))
            .unwrap_or(*date)
    }

}

/// Order statistics over slices of f64, ignoring NaN.
pub mod stats {
    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
        v.sort_by(|a, b| a.total_cmp(b));
        v
    }

    /// Median, averaging the two middle values for even lengths.
    pub fn median(values: &[f64]) -> Option<f64> {
        let v = sorted(values);
        let n = v.len();
        match n {
            0 => None,
            _ if n % 2 == 1 => Some(v[n / 2]),
            _ => Some((v[n / 2 - 1] + v[n / 2]) / 2.0),
        }
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        let v = sorted(values);
        if v.is_empty() {
            return None;
        }
        Some(v.iter().sum::<f64>() / v.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator). Needs two values.
    pub fn sample_sd(values: &[f64]) -> Option<f64> {
        let v = sorted(values);
        if v.len() < 2 {
            return None;
        }
        let m = v.iter().sum::<f64>() / v.len() as f64;
        let ss: f64 = v.iter().map(|x| (x - m).powi(2)).sum();
        Some((ss / (v.len() - 1) as f64).sqrt())
    }

    /// Quantile by linear interpolation between order statistics
    /// (Hyndman & Fan type 7).
    pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
        let v = sorted(values);
        if v.is_empty() || !(0.0..=1.0).contains(&p) {
            return None;
        }
        let h = (v.len() - 1) as f64 * p;
        let lo = h.floor() as usize;
        let hi = h.ceil() as usize;
        Some(v[lo] + (h - lo as f64) * (v[hi] - v[lo]))
    }

}
