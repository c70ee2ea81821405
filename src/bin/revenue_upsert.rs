//! Create or update a single revenue record.
//!
//! Reads a revenue record JSON document (wire field names, e.g.
//! `DataYearMonth`, `CompanyCode`) from the given file, or from stdin when
//! no argument is supplied. Requires `REVENUE_API_BASE` in the environment
//! or a `.env` file.
//!
//! Usage:
//!   cargo run --bin revenue_upsert -- record.json
//!   cat record.json | cargo run --bin revenue_upsert

use std::io::Read;

use anyhow::{Context, Result};
use revenue_client::types::{RevenueUpsertRequest, UpsertOutcome};
use revenue_client::RevenueClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            buffer
        }
    };
    let record: RevenueUpsertRequest =
        serde_json::from_str(&raw).context("parsing record JSON")?;

    let client = RevenueClient::from_env()?;
    info!(
        "Upserting company {} period {}",
        record.company_code, record.data_year_month
    );

    match client.upsert(&record).await? {
        UpsertOutcome::Number(n) => info!("Backend answered {n}"),
        UpsertOutcome::Empty {} => info!("Backend answered with an empty body"),
    }
    Ok(())
}
