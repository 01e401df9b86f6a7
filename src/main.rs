//! CLI interface for go-home-router.
//!
//! Drives the engine against the bundled `FixtureGateway` since the real
//! flight scraper and train service are out of scope for this crate —
//! this is how a reader can exercise the full pipeline end to end.

use clap::{Parser, Subcommand};
use go_home_router::{
    plan, FixtureGateway, PlanRequest, ProviderGateway, RunOptions, TransportFilter,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "go-home")]
#[command(about = "Plan multi-modal intercity routes (flights + high-speed rail)")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan a route between two cities on a given date
    Plan {
        /// Origin city name
        #[arg(short, long)]
        from: String,
        /// Destination city name
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Restrict to a single transport mode (all, flight, train)
        #[arg(long, default_value = "all")]
        mode: String,
        /// Allow international transfer hubs for mixed domestic/international trips
        #[arg(long, default_value = "true")]
        use_intl_hubs: bool,
        /// Disable accommodation surcharge pricing for long overnight transfers
        #[arg(long, default_value = "false")]
        no_accommodation: bool,
        /// Maximum number of candidate hub cities to consider
        #[arg(long, default_value = "15")]
        max_hubs: usize,
        /// Limit the report to this many plans
        #[arg(long, default_value = "30")]
        top_n: usize,
    },
}

fn parse_filter(mode: &str) -> TransportFilter {
    match mode.to_lowercase().as_str() {
        "flight" => TransportFilter::FlightOnly,
        "train" => TransportFilter::TrainOnly,
        _ => TransportFilter::All,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            from,
            to,
            date,
            mode,
            use_intl_hubs,
            no_accommodation,
            max_hubs,
            top_n,
        } => {
            let gateway: Arc<dyn ProviderGateway> = Arc::new(FixtureGateway::new());
            let options = RunOptions {
                transport_filter: parse_filter(&mode),
                use_intl_hubs,
                accommodation_enabled: !no_accommodation,
                max_hubs,
                top_n,
                ..RunOptions::default()
            };

            let outcome = plan(
                PlanRequest {
                    origin: from,
                    destination: to,
                    date,
                },
                gateway,
                &options,
                None,
            )
            .await?;

            println!("{}", outcome.report);
        }
    }

    Ok(())
}
