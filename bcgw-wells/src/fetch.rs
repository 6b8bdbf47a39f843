//! Retrieval of observation well CSV files from the provincial data catalogue.

use crate::{
    error::{Result, WellError},
    format::format_gwl,
    observation::{Observation, Which},
    well::{parse_wells, WellId},
};
use bcgw_utils::dates::months_before;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use reqwest::Client;

/// Default location of the observation well CSV files.
pub const DEFAULT_BASE_URL: &str = "http://www.env.gov.bc.ca/wsd/data_searches/obswell/map/data/";

/// File suffix of the historical min/mean/max summary.
pub const HISTORICAL_FILE: &str = "minMaxMean.csv";

/// How far back `Which::Recent` reaches.
pub const RECENT_MONTHS: u32 = 24;

/// Options for [`get_gwl`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub which: Which,
    /// Base URL the per-well file names are appended to.
    pub base_url: String,
    /// Suppress per-well progress messages. Warnings are always logged.
    pub quiet: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            which: Which::All,
            base_url: DEFAULT_BASE_URL.to_string(),
            quiet: false,
        }
    }
}

/// URL of one of a well's files, e.g. `.../OW309-data.csv`.
pub fn well_url(base_url: &str, well: &WellId, file: &str) -> String {
    let separator = if base_url.ends_with('/') { "" } else { "/" };
    format!("{}{}{}-{}", base_url, separator, well.code(), file)
}

/// Download a CSV payload. Any non-success status or an empty body is an error.
async fn fetch_csv(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(WellError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    let body = response.text().await?;
    if body.trim().len() <= 2 {
        return Err(WellError::EmptyResponse(url.to_string()));
    }
    Ok(body)
}

/// Fetch and format one well. Errors here only concern the primary series.
async fn get_well(
    client: &Client,
    well: &WellId,
    options: &FetchOptions,
    recent_since: NaiveDate,
) -> Result<Vec<Observation>> {
    let data_url = well_url(&options.base_url, well, options.which.data_file());
    let primary = fetch_csv(client, &data_url).await?;

    let summary_url = well_url(&options.base_url, well, HISTORICAL_FILE);
    let summary = match fetch_csv(client, &summary_url).await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("No historical summary for {}: {}", well, e);
            None
        }
    };

    let mut observations = format_gwl(*well, &primary, summary.as_deref(), options.which)?;
    if options.which == Which::Recent {
        observations.retain(|obs| obs.date >= recent_since);
    }
    Ok(observations)
}

/// Retrieve the canonical observation table for a set of wells.
///
/// The identifiers are validated before any request is made; a malformed or
/// mixed set is an error. A well whose primary series cannot be retrieved or
/// parsed is skipped with a warning, and the remaining wells are still
/// returned. Rows follow the input well order.
pub async fn get_gwl<S: AsRef<str>>(
    client: &Client,
    wells: &[S],
    options: &FetchOptions,
) -> Result<Vec<Observation>> {
    let wells = parse_wells(wells)?;
    let recent_since = months_before(&Local::now().date_naive(), RECENT_MONTHS);
    let mut result = Vec::new();

    for well in &wells {
        if !options.quiet {
            info!("Fetching {} ({}) from {}", well, options.which, options.base_url);
        }
        match get_well(client, well, options, recent_since).await {
            Ok(observations) => {
                if !options.quiet {
                    info!("  {} observations for {}", observations.len(), well);
                }
                result.extend(observations);
            }
            Err(e) => {
                warn!("Skipping well {}: {}", well, e);
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    const OW309_DATA: &str = include_str!("../../fixtures/OW309-data.csv");
    const OW309_HISTORICAL: &str = include_str!("../../fixtures/OW309-minMaxMean.csv");
    const OW002_DAILY: &str = include_str!("../../fixtures/OW002-average.csv");

    /// Serve canned files on a local port; unknown paths get a 404.
    fn serve<B: Into<String>>(files: Vec<(&'static str, B)>) -> String {
        serve_with_status("200 OK", files)
    }

    fn serve_with_status<B: Into<String>>(
        status: &'static str,
        files: Vec<(&'static str, B)>,
    ) -> String {
        let files: Vec<(&'static str, String)> =
            files.into_iter().map(|(name, body)| (name, body.into())).collect();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut raw = Vec::new();
                let mut buffer = [0u8; 1024];
                while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buffer) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => raw.extend_from_slice(&buffer[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&raw);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let response = match files.iter().find(|(name, _)| path.ends_with(name)) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    ),
                    None => String::from(
                        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    ),
                };
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/data/", address)
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_well_url() {
        let well = WellId::new(9).unwrap();
        assert_eq!(
            well_url("https://example.org/data/", &well, "data.csv"),
            "https://example.org/data/OW009-data.csv"
        );
        assert_eq!(
            well_url("https://example.org/data", &well, HISTORICAL_FILE),
            "https://example.org/data/OW009-minMaxMean.csv"
        );
    }

    #[tokio::test]
    async fn test_mixed_wells_fail_before_any_request() {
        // nothing listens here; validation must fail first
        let options = FetchOptions {
            base_url: String::from("http://127.0.0.1:9/"),
            ..FetchOptions::default()
        };
        let result = get_gwl(&client(), &["309", "OW002"], &options).await;
        assert!(matches!(result, Err(WellError::InvalidWells(_))));
    }

    #[tokio::test]
    async fn test_missing_well_is_skipped() {
        let base_url = serve(vec![
            ("OW309-data.csv", OW309_DATA),
            ("OW309-minMaxMean.csv", OW309_HISTORICAL),
        ]);
        let options = FetchOptions {
            base_url,
            quiet: true,
            ..FetchOptions::default()
        };
        let observations = get_gwl(&client(), &["404", "309"], &options).await.unwrap();
        assert_eq!(observations.len(), 435);
        assert!(observations.iter().all(|o| o.well_num == 309));
        assert!(observations[0].historical_mean.is_some());
    }

    #[tokio::test]
    async fn test_missing_historical_keeps_well() {
        let base_url = serve(vec![("OW002-average.csv", OW002_DAILY)]);
        let options = FetchOptions {
            which: Which::Daily,
            base_url,
            quiet: true,
        };
        let observations = get_gwl(&client(), &["OW002"], &options).await.unwrap();
        assert_eq!(observations.len(), 668);
        assert!(observations.iter().all(|o| o.historical_mean.is_none()));
    }

    #[tokio::test]
    async fn test_rows_follow_input_well_order() {
        let base_url = serve(vec![
            ("OW309-data.csv", OW309_DATA),
            ("OW002-data.csv", OW002_DAILY),
        ]);
        let options = FetchOptions {
            base_url,
            quiet: true,
            ..FetchOptions::default()
        };
        let observations = get_gwl(&client(), &["309", "2"], &options).await.unwrap();
        let first_other = observations.iter().position(|o| o.well_num == 2).unwrap();
        assert!(observations[..first_other].iter().all(|o| o.well_num == 309));
        assert!(observations[first_other..].iter().all(|o| o.well_num == 2));
    }

    #[tokio::test]
    async fn test_any_success_status_is_accepted() {
        let base_url = serve_with_status(
            "203 Non-Authoritative Information",
            vec![("OW309-data.csv", OW309_DATA)],
        );
        let options = FetchOptions {
            base_url,
            quiet: true,
            ..FetchOptions::default()
        };
        let observations = get_gwl(&client(), &["309"], &options).await.unwrap();
        assert_eq!(observations.len(), 435);
    }

    #[tokio::test]
    async fn test_recent_keeps_last_two_years() {
        let today = Local::now().date_naive();
        let old = months_before(&today, 36);
        let data = format!(
            "Time,Value,Approval\n{} 00:00,7.500,Approved\n{} 12:00,6.250,Working\n",
            old.format("%Y-%m-%d"),
            today.format("%Y-%m-%d")
        );
        let base_url = serve(vec![("OW309-data.csv", data)]);
        for quiet in [true, false] {
            let options = FetchOptions {
                which: Which::Recent,
                base_url: base_url.clone(),
                quiet,
            };
            let observations = get_gwl(&client(), &["309"], &options).await.unwrap();
            assert_eq!(observations.len(), 1, "quiet: {quiet}");
            assert_eq!(observations[0].date, today);
            assert!((observations[0].gwl - 6.25).abs() < 1e-9);
        }

        let everything = FetchOptions {
            which: Which::All,
            base_url,
            quiet: true,
        };
        let observations = get_gwl(&client(), &["309"], &everything).await.unwrap();
        assert_eq!(observations.len(), 2);
    }
}
