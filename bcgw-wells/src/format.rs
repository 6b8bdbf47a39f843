//! Parsing of catalogue CSV payloads into the canonical observation table.
//!
//! Each well has a primary series (`Time`/`QualifiedTime`, `Value`,
//! `Approval`) and a long-format historical summary (`dummydate`, `type`,
//! `Value`) giving the minimum, mean and maximum level recorded on each
//! calendar day. The summary is pivoted wide and joined on [`DayKey`].

use crate::{
    day_key::DayKey,
    error::{Result, WellError},
    observation::{Observation, Which},
    well::WellId,
};
use bcgw_utils::dates::parse_observation_date;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::collections::BTreeMap;

/// Long-term statistics for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoricalDaily {
    pub minimum: Option<f64>,
    pub mean: Option<f64>,
    pub maximum: Option<f64>,
}

/// Historical summary pivoted wide, keyed by calendar day.
pub type HistoricalTable = BTreeMap<DayKey, HistoricalDaily>;

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn parse_value(field: Option<&str>) -> Option<f64> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn optional_text(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("NA"))
        .map(String::from)
}

/// Parse a historical summary table.
///
/// Never fails: a payload without `date`/`type`/`Value` columns, or with no
/// usable rows, gives an empty table and the observations keep missing
/// historical values.
pub fn parse_historical(summary_csv: &str) -> HistoricalTable {
    let mut table = HistoricalTable::new();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(summary_csv.as_bytes());
    let headers = match rdr.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            debug!("historical summary unreadable: {}", e);
            return table;
        }
    };
    let date_index = headers
        .iter()
        .position(|h| h.to_lowercase().contains("date"));
    let type_index = column_index(&headers, "type");
    let value_index = column_index(&headers, "Value");
    let (date_index, type_index, value_index) = match (date_index, type_index, value_index) {
        (Some(d), Some(t), Some(v)) => (d, t, v),
        _ => {
            debug!("historical summary lacks date/type/Value columns");
            return table;
        }
    };

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let Some(key) = record
            .get(date_index)
            .and_then(|s| parse_observation_date(s).ok())
            .map(DayKey::from)
        else {
            continue;
        };
        let Some(value) = parse_value(record.get(value_index)) else {
            continue;
        };
        let kind = record.get(type_index).unwrap_or("").to_lowercase();
        match kind.as_str() {
            "min" | "minimum" => table.entry(key).or_default().minimum = Some(value),
            "mean" | "average" | "avg" => table.entry(key).or_default().mean = Some(value),
            "max" | "maximum" => table.entry(key).or_default().maximum = Some(value),
            _ => {}
        }
    }
    table
}

/// Parse the primary series of one well, leaving historical columns empty.
///
/// Rows with a blank or non-numeric `Value`, or an unreadable timestamp, are
/// skipped. Output is sorted by date.
pub fn parse_primary(well: WellId, primary_csv: &str, which: Which) -> Result<Vec<Observation>> {
    let table = format!("{}-{}", well.code(), which.data_file());
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(primary_csv.as_bytes());
    let headers = rdr.headers()?.clone();

    // hourly files name the column Time, daily averages QualifiedTime
    let time_index = column_index(&headers, which.time_column())
        .or_else(|| column_index(&headers, "Time"))
        .or_else(|| column_index(&headers, "QualifiedTime"))
        .ok_or_else(|| WellError::MissingColumn {
            column: which.time_column().to_string(),
            table: table.clone(),
        })?;
    let value_index = column_index(&headers, "Value").ok_or_else(|| WellError::MissingColumn {
        column: String::from("Value"),
        table: table.clone(),
    })?;
    let status_index = column_index(&headers, "Approval");
    let ems_index = column_index(&headers, "EMS_ID");
    let name_index = column_index(&headers, "Station_Name");

    let mut observations = Vec::new();
    let mut skipped = 0u32;
    for result in rdr.records() {
        let record = result?;
        let date = match record.get(time_index).map(parse_observation_date) {
            Some(Ok(date)) => date,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let Some(gwl) = parse_value(record.get(value_index)) else {
            skipped += 1;
            continue;
        };
        observations.push(Observation {
            well_num: well.number(),
            ems_id: optional_text(&record, ems_index),
            station_name: optional_text(&record, name_index),
            date,
            gwl,
            historical_mean: None,
            historical_min: None,
            historical_max: None,
            status: optional_text(&record, status_index).unwrap_or_default(),
        });
    }
    debug!(
        "{}: parsed {} readings, skipped {} blank or malformed",
        table,
        observations.len(),
        skipped
    );
    observations.sort_by_key(|obs| obs.date);
    Ok(observations)
}

/// Attach historical daily statistics to each observation by calendar day.
pub fn merge_historical(
    observations: Vec<Observation>,
    historical: &HistoricalTable,
) -> Vec<Observation> {
    observations
        .into_iter()
        .map(|mut obs| {
            let daily = historical
                .get(&DayKey::from(obs.date))
                .copied()
                .unwrap_or_default();
            obs.historical_mean = daily.mean;
            obs.historical_min = daily.minimum;
            obs.historical_max = daily.maximum;
            obs
        })
        .collect()
}

/// Build the canonical observation table for one well.
pub fn format_gwl(
    well: WellId,
    primary_csv: &str,
    summary_csv: Option<&str>,
    which: Which,
) -> Result<Vec<Observation>> {
    let observations = parse_primary(well, primary_csv, which)?;
    let historical = summary_csv.map(parse_historical).unwrap_or_default();
    if historical.is_empty() {
        debug!("{}: no historical summary, historical columns left empty", well);
    }
    Ok(merge_historical(observations, &historical))
}
