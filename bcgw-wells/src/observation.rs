use crate::error::{Result, WellError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which record of a well to retrieve from the data catalogue.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Which {
    /// The complete hourly record.
    #[default]
    All,
    /// Hourly record restricted to the last two years.
    Recent,
    /// Daily averages over the complete record.
    Daily,
}

impl Which {
    /// File suffix of the primary series in the catalogue.
    pub fn data_file(&self) -> &'static str {
        match self {
            Which::All | Which::Recent => "data.csv",
            Which::Daily => "average.csv",
        }
    }

    /// Name of the time column in the primary series.
    pub fn time_column(&self) -> &'static str {
        match self {
            Which::All | Which::Recent => "Time",
            Which::Daily => "QualifiedTime",
        }
    }
}

impl FromStr for Which {
    type Err = WellError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Which::All),
            "recent" => Ok(Which::Recent),
            "daily" => Ok(Which::Daily),
            _ => Err(WellError::InvalidSelector(s.to_string())),
        }
    }
}

impl fmt::Display for Which {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Which::All => "all",
            Which::Recent => "recent",
            Which::Daily => "daily",
        };
        write!(f, "{}", s)
    }
}

/// A single groundwater level reading in the canonical observation table.
///
/// `gwl` is metres below ground: larger means deeper (drier). The historical
/// columns hold the long-term daily statistics for the same calendar day and
/// are `None` when the well has no usable historical summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "Well_Num")]
    pub well_num: u32,
    #[serde(rename = "EMS_ID")]
    pub ems_id: Option<String>,
    #[serde(rename = "Station_Name")]
    pub station_name: Option<String>,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "GWL")]
    pub gwl: f64,
    #[serde(rename = "Historical_Daily_Average")]
    pub historical_mean: Option<f64>,
    #[serde(rename = "Historical_Daily_Minimum")]
    pub historical_min: Option<f64>,
    #[serde(rename = "Historical_Daily_Maximum")]
    pub historical_max: Option<f64>,
    #[serde(rename = "Status")]
    pub status: String,
}

impl Observation {
    /// Split a table into per-well slices, keeping wells in the order they
    /// first appear.
    pub fn group_by_well(observations: &[Observation]) -> Vec<(u32, Vec<&Observation>)> {
        let mut groups: Vec<(u32, Vec<&Observation>)> = Vec::new();
        for obs in observations {
            match groups.iter_mut().find(|(well, _)| *well == obs.well_num) {
                Some((_, group)) => group.push(obs),
                None => groups.push((obs.well_num, vec![obs])),
            }
        }
        groups
    }
}
