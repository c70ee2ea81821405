//! Query a page of revenue records.
//!
//! Requires `REVENUE_API_BASE` in the environment or a `.env` file.
//!
//! Usage:
//!   cargo run --bin revenue_search -- [companyCode] [fromYM] [toYM] [pageIndex] [pageSize]
//!
//! Examples:
//!   # First 100 records for company 2330
//!   cargo run --bin revenue_search -- 2330
//!
//!   # 2024 records, 20 per page
//!   cargo run --bin revenue_search -- 2330 202401 202412 1 20

use anyhow::Result;
use revenue_client::types::SearchParams;
use revenue_client::RevenueClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut params = SearchParams {
        company_code: args.first().cloned().filter(|code| !code.is_empty()),
        from_ym: args.get(1).cloned(),
        to_ym: args.get(2).cloned(),
        ..Default::default()
    };
    if let Some(raw) = args.get(3) {
        params.page_index = Some(raw.parse()?);
    }
    if let Some(raw) = args.get(4) {
        params.page_size = Some(raw.parse()?);
    }

    let client = RevenueClient::from_env()?;
    info!("Searching revenues at {}", client.base_url());

    let page = client.search(params).await?;
    info!(
        "{} of {} record(s) on page {}",
        page.items.len(),
        page.total_count,
        page.page_index
    );
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
