//! Command implementations for the BC groundwater CLI.
//!
//! Each subcommand runs one stage of the pipeline over CSV files, and
//! `analyze` runs all of them for a set of wells.

use bcgw_trend::TrendOptions;
use clap::Subcommand;

pub mod analyze;
pub mod fetch;
pub mod monthly;
pub mod table;
pub mod trend;

#[derive(Subcommand)]
pub enum Command {
    /// Download observations for a set of wells
    Fetch {
        /// Well numbers (309) or codes (OW309), comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        wells: Vec<String>,

        /// Record to retrieve: all, recent or daily
        #[arg(long, default_value = "all")]
        which: String,

        /// Base URL of the data catalogue
        #[arg(long)]
        url: Option<String>,

        /// Only log warnings
        #[arg(short, long)]
        quiet: bool,

        /// Output path for the observations CSV
        #[arg(short, long)]
        output: String,
    },

    /// Aggregate an observations CSV into monthly medians
    Monthly {
        /// Observations CSV written by `fetch`
        #[arg(short, long)]
        input: String,

        /// Fill gaps so every month is present
        #[arg(long)]
        fill: bool,

        /// Keep long interpolated runs at the edges of filled series
        #[arg(long)]
        no_trim: bool,

        /// Also write annual summaries to this path
        #[arg(long)]
        annual: Option<String>,

        /// Output path for the monthly CSV
        #[arg(short, long)]
        output: String,
    },

    /// Run Mann-Kendall trend tests on a monthly or annual CSV
    Trend {
        /// Monthly or annual CSV
        #[arg(short, long)]
        input: String,

        /// Value column to test (med_GWL for monthly, mean_GWL for annual)
        #[arg(short, long)]
        column: Option<String>,

        /// Input is an annual table
        #[arg(long)]
        annual: bool,

        /// Test the whole table as one series instead of per well
        #[arg(long)]
        ungrouped: bool,

        /// Minimum number of values per series
        #[arg(long, default_value_t = 4)]
        min_periods: usize,

        /// Prewhitening methods to run: yuepilon, zhang, comma separated
        #[arg(long, value_delimiter = ',', default_value = "yuepilon,zhang")]
        methods: Vec<String>,

        /// Output path for the trend results CSV
        #[arg(short, long)]
        output: String,
    },

    /// Fetch, summarize, test and chart a set of wells
    Analyze {
        /// Well numbers (309) or codes (OW309), comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        wells: Vec<String>,

        /// Record to retrieve: all, recent or daily
        #[arg(long, default_value = "all")]
        which: String,

        /// Base URL of the data catalogue
        #[arg(long)]
        url: Option<String>,

        /// Only log warnings
        #[arg(short, long)]
        quiet: bool,

        /// Directory for the CSV tables and SVG charts
        #[arg(long)]
        out_dir: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch {
            wells,
            which,
            url,
            quiet,
            output,
        } => {
            let options = fetch::fetch_options(&which, url, quiet)?;
            fetch::run_fetch(&wells, &options, &output).await
        }
        Command::Monthly {
            input,
            fill,
            no_trim,
            annual,
            output,
        } => monthly::run_monthly(&input, &output, annual.as_deref(), fill, !no_trim),
        Command::Trend {
            input,
            column,
            annual,
            ungrouped,
            min_periods,
            methods,
            output,
        } => {
            let options = TrendOptions {
                methods: trend::parse_methods(&methods)?,
                min_periods,
            };
            trend::run_trend(&input, &output, column.as_deref(), annual, ungrouped, &options)
        }
        Command::Analyze {
            wells,
            which,
            url,
            quiet,
            out_dir,
        } => {
            let options = fetch::fetch_options(&which, url, quiet)?;
            analyze::run_analyze(&wells, &options, &out_dir).await
        }
    }
}
