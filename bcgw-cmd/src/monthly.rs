//! Monthly and annual summaries of an observation table.

use crate::table::{read_table, write_table};
use bcgw_data::{annual_values, make_well_ts, monthly_values, MonthlyRecord, TrimOptions};
use bcgw_wells::observation::Observation;
use log::info;

/// Monthly medians, optionally gap-filled and trimmed.
pub fn monthly_table(observations: &[Observation], fill: bool, trim: bool) -> Vec<MonthlyRecord> {
    let monthly = monthly_values(observations);
    if !fill {
        return monthly;
    }
    let options = if trim {
        TrimOptions::default()
    } else {
        TrimOptions::no_trim()
    };
    let filled = make_well_ts(&monthly, &options);
    info!(
        "Gap-filled {} monthly rows into {} ({} interpolated)",
        monthly.len(),
        filled.len(),
        filled.iter().filter(|r| r.is_interpolated()).count()
    );
    filled
}

pub fn run_monthly(
    input: &str,
    output: &str,
    annual_output: Option<&str>,
    fill: bool,
    trim: bool,
) -> anyhow::Result<()> {
    let observations: Vec<Observation> = read_table(input)?;
    let monthly = monthly_table(&observations, fill, trim);
    write_table(output, &monthly)?;
    if let Some(path) = annual_output {
        write_table(path, &annual_values(&monthly))?;
    }
    Ok(())
}
