use crate::year_month::YearMonth;
use bcgw_utils::stats::median;
use bcgw_wells::observation::Observation;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Median groundwater level of one well for one calendar month.
///
/// `n_readings` counts the source observations behind the median; zero
/// marks a month synthesized by interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    #[serde(rename = "Well_Num")]
    pub well_num: u32,
    #[serde(rename = "EMS_ID")]
    pub ems_id: Option<String>,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    /// Mid-month date
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "med_GWL")]
    pub med_gwl: f64,
    /// Monthly median minus the median historical daily average
    #[serde(rename = "dev_med_GWL")]
    pub dev_med_gwl: Option<f64>,
    #[serde(rename = "nReadings")]
    pub n_readings: u32,
}

impl MonthlyRecord {
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    pub fn is_interpolated(&self) -> bool {
        self.n_readings == 0
    }

    /// Split a table into per-well groups, wells in first-appearance order.
    pub fn group_by_well(records: &[MonthlyRecord]) -> Vec<(u32, Vec<&MonthlyRecord>)> {
        let mut groups: Vec<(u32, Vec<&MonthlyRecord>)> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|(well, _)| *well == record.well_num) {
                Some((_, group)) => group.push(record),
                None => groups.push((record.well_num, vec![record])),
            }
        }
        groups
    }
}

/// Monthly median groundwater level per well.
///
/// Wells keep their first-appearance order; months are ascending. A month
/// without observations is absent from the output.
pub fn monthly_values(observations: &[Observation]) -> Vec<MonthlyRecord> {
    let mut result = Vec::new();
    for (well_num, group) in Observation::group_by_well(observations) {
        let ems_id = group.iter().find_map(|obs| obs.ems_id.clone());
        let mut months: BTreeMap<YearMonth, Vec<&Observation>> = BTreeMap::new();
        for obs in group {
            months
                .entry(YearMonth::from_date(obs.date))
                .or_default()
                .push(obs);
        }
        debug!("well {}: {} months with readings", well_num, months.len());
        for (year_month, readings) in months {
            let levels: Vec<f64> = readings.iter().map(|obs| obs.gwl).collect();
            let historical: Vec<f64> = readings
                .iter()
                .filter_map(|obs| obs.historical_mean)
                .collect();
            let Some(med_gwl) = median(&levels) else {
                continue;
            };
            result.push(MonthlyRecord {
                well_num,
                ems_id: ems_id.clone(),
                year: year_month.year(),
                month: year_month.month(),
                date: year_month.date(),
                med_gwl,
                dev_med_gwl: median(&historical).map(|hist| med_gwl - hist),
                n_readings: readings.len() as u32,
            });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(well_num: u32, y: i32, m: u32, d: u32, gwl: f64, hist: Option<f64>) -> Observation {
        Observation {
            well_num,
            ems_id: Some(format!("E{}", well_num)),
            station_name: None,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            gwl,
            historical_mean: hist,
            historical_min: None,
            historical_max: None,
            status: String::from("Approved"),
        }
    }

    #[test]
    fn test_monthly_median_irregular_sampling() {
        let table = vec![
            obs(309, 2020, 1, 2, 5.0, Some(4.0)),
            obs(309, 2020, 1, 3, 7.0, Some(4.0)),
            obs(309, 2020, 1, 30, 6.5, Some(5.0)),
            obs(309, 2020, 3, 10, 2.0, None),
        ];
        let monthly = monthly_values(&table);
        // February has no readings and is absent
        assert_eq!(monthly.len(), 2);
        assert_eq!((monthly[0].year, monthly[0].month), (2020, 1));
        assert_eq!(monthly[0].med_gwl, 6.5);
        assert_eq!(monthly[0].n_readings, 3);
        assert_eq!(monthly[0].dev_med_gwl, Some(2.5));
        assert_eq!(monthly[0].date, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
        assert_eq!(monthly[0].ems_id.as_deref(), Some("E309"));
        assert_eq!((monthly[1].year, monthly[1].month), (2020, 3));
        assert_eq!(monthly[1].n_readings, 1);
        assert_eq!(monthly[1].dev_med_gwl, None);
    }

    #[test]
    fn test_monthly_keeps_well_order() {
        let table = vec![
            obs(310, 2021, 5, 1, 1.0, None),
            obs(2, 2020, 1, 1, 1.0, None),
            obs(310, 2021, 4, 1, 1.0, None),
        ];
        let monthly = monthly_values(&table);
        let wells: Vec<u32> = monthly.iter().map(|r| r.well_num).collect();
        assert_eq!(wells, vec![310, 310, 2]);
        assert_eq!(monthly[0].month, 4);
        assert_eq!(monthly[1].month, 5);
    }

    #[test]
    fn test_monthly_csv_header() {
        let monthly = monthly_values(&[obs(1, 2020, 1, 1, 1.0, None)]);
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&monthly[0]).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            data.lines().next().unwrap(),
            "Well_Num,EMS_ID,Year,Month,Date,med_GWL,dev_med_GWL,nReadings"
        );
    }
}
