//! Retrieve observations from the provincial data catalogue.

use crate::table::write_table;
use bcgw_wells::{
    fetch::{get_gwl, FetchOptions},
    observation::{Observation, Which},
};
use log::info;
use std::time::Duration;

/// HTTP client shared by the fetching commands.
pub fn client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?)
}

/// Fetch options from command line values.
pub fn fetch_options(which: &str, url: Option<String>, quiet: bool) -> anyhow::Result<FetchOptions> {
    let which: Which = which.parse()?;
    let defaults = FetchOptions::default();
    Ok(FetchOptions {
        which,
        base_url: url.unwrap_or(defaults.base_url),
        quiet,
    })
}

pub async fn fetch_observations(
    wells: &[String],
    options: &FetchOptions,
) -> anyhow::Result<Vec<Observation>> {
    let client = client()?;
    let observations = get_gwl(&client, wells, options).await?;
    if observations.is_empty() {
        anyhow::bail!("No observations retrieved for wells {}", wells.join(","));
    }
    Ok(observations)
}

pub async fn run_fetch(wells: &[String], options: &FetchOptions, output: &str) -> anyhow::Result<()> {
    info!("Fetching {} wells ({})", wells.len(), options.which);
    let observations = fetch_observations(wells, options).await?;
    write_table(output, &observations)
}
