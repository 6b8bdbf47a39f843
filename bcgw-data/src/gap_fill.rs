use crate::{
    interpolation::{interpolate_series, DataPoint},
    monthly::MonthlyRecord,
    trim::{trim_range, TrimOptions},
    year_month::MonthRange,
};
use log::debug;

/// Complete one well's monthly series.
///
/// Every month from the first to the last record is present exactly once.
/// Months without a record get a synthetic one, `n_readings == 0`, with the
/// median (and deviation, where both neighbours have one) interpolated
/// against elapsed days between the bracketing records. Records that already
/// exist, synthetic or not, are kept unchanged.
pub fn fill_well(records: &[&MonthlyRecord]) -> Vec<MonthlyRecord> {
    let mut known: Vec<&MonthlyRecord> = records.to_vec();
    known.sort_by_key(|record| record.year_month());
    known.dedup_by_key(|record| record.year_month());
    let (Some(first), Some(last)) = (known.first(), known.last()) else {
        return Vec::new();
    };

    let months: Vec<_> = MonthRange::new(first.year_month(), last.year_month()).collect();
    let dates: Vec<_> = months.iter().map(|ym| ym.date()).collect();
    let levels: Vec<DataPoint> = known
        .iter()
        .map(|record| DataPoint {
            date: record.date,
            value: record.med_gwl,
        })
        .collect();
    let deviations: Vec<DataPoint> = known
        .iter()
        .filter_map(|record| {
            record.dev_med_gwl.map(|value| DataPoint {
                date: record.date,
                value,
            })
        })
        .collect();
    let filled_levels = interpolate_series(&levels, &dates);
    let filled_deviations = interpolate_series(&deviations, &dates);

    let mut result = Vec::with_capacity(months.len());
    let mut next_known = known.iter().peekable();
    for (i, year_month) in months.iter().enumerate() {
        if let Some(record) = next_known.next_if(|record| record.year_month() == *year_month) {
            result.push((*record).clone());
            continue;
        }
        let Some(med_gwl) = filled_levels[i] else {
            continue;
        };
        result.push(MonthlyRecord {
            well_num: first.well_num,
            ems_id: first.ems_id.clone(),
            year: year_month.year(),
            month: year_month.month(),
            date: year_month.date(),
            med_gwl,
            dev_med_gwl: filled_deviations[i],
            n_readings: 0,
        });
    }
    result
}

/// Build a contiguous monthly time series for every well.
///
/// Gaps are filled by [`fill_well`]; with `options.trim`, long interpolated
/// runs at the head and tail of each series are cut away (see
/// [`crate::trim`]). Wells keep their first-appearance order. Running this
/// on its own output returns the same table.
pub fn make_well_ts(monthly: &[MonthlyRecord], options: &TrimOptions) -> Vec<MonthlyRecord> {
    let mut result = Vec::new();
    for (well_num, group) in MonthlyRecord::group_by_well(monthly) {
        let filled = fill_well(&group);
        let missing: Vec<bool> = filled.iter().map(MonthlyRecord::is_interpolated).collect();
        let kept = trim_range(&missing, options);
        debug!(
            "well {}: {} months, {} interpolated, kept {}..{}",
            well_num,
            filled.len(),
            missing.iter().filter(|&&m| m).count(),
            kept.start,
            kept.end
        );
        result.extend(filled.into_iter().skip(kept.start).take(kept.len()));
    }
    result
}
