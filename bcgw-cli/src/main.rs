//! Command-line entry point for BC observation well groundwater trends.
//!
//! `fetch` downloads well records into an observation table, `monthly`
//! reduces it to monthly medians with optional gap filling, `trend` runs
//! the prewhitened Mann-Kendall tests and `analyze` chains these stages and
//! writes an area and a seasonal chart per well.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bcgw-cli",
    version,
    about = "BC groundwater level trend toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: bcgw_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    bcgw_cmd::run(cli.command).await
}
