//! In-memory implementation of the revenue backend contract.
//!
//! Serves both endpoint generations so client integration tests can drive
//! the real HTTP path without a real backend. Also runnable standalone via
//! the `mock-backend` binary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use revenue_client::types::{Field, PagedResponse, RevenueRecord, RevenueUpsertRequest, SearchParams};

pub use axum::http::StatusCode;

/// Records keyed by (company code, year-month).
pub type Db = Arc<RwLock<HashMap<(u32, u32), RevenueRecord>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    delay: Duration,
}

/// Router over a fresh empty store.
pub fn app() -> Router {
    app_with_delay(Duration::ZERO)
}

/// Same routes, but every handler sleeps first. Lets tests hold a request
/// in flight long enough to be superseded.
pub fn app_with_delay(delay: Duration) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(HashMap::new())),
        delay,
    };
    Router::new()
        .route("/api/revenues/search", post(search))
        .route("/api/revenues/upsert", post(upsert))
        .route("/api/revenues/{company_code}", get(legacy_list))
        .route("/api/revenues", post(legacy_upsert))
        .with_state(state)
}

/// Router answering every request with a fixed status and body.
pub fn stub(status: StatusCode, body: &'static str) -> Router {
    Router::new().fallback(move || async move { (status, body) })
}

/// Bind `router` to an ephemeral local port in the background and return
/// its base URL. Test support.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn search(
    State(state): State<AppState>,
    Json(params): Json<SearchParams>,
) -> Json<PagedResponse<RevenueRecord>> {
    tokio::time::sleep(state.delay).await;
    let db = state.db.read().await;

    let mut rows: Vec<&RevenueRecord> = db.values().filter(|r| matches(r, &params)).collect();
    rows.sort_by_key(|r| (r.company_code, r.data_year_month));

    let page_index = params.page_index.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(100);
    let total_count = rows.len() as u64;
    let start = ((page_index - 1) as usize) * (page_size as usize);
    let items = rows
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .cloned()
        .collect();

    Json(PagedResponse {
        items,
        page_index,
        page_size,
        total_count,
    })
}

async fn upsert(
    State(state): State<AppState>,
    Json(request): Json<RevenueUpsertRequest>,
) -> Json<i64> {
    tokio::time::sleep(state.delay).await;
    store(&state.db, &request).await;
    // Affected-row count, as a bare number.
    Json(1)
}

#[derive(Deserialize)]
struct LegacyQuery {
    #[serde(rename = "fromYM")]
    from_ym: Option<String>,

    #[serde(rename = "toYM")]
    to_ym: Option<String>,
}

async fn legacy_list(
    State(state): State<AppState>,
    Path(company_code): Path<String>,
    Query(query): Query<LegacyQuery>,
) -> Json<Vec<RevenueRecord>> {
    tokio::time::sleep(state.delay).await;
    let params = SearchParams {
        company_code: Some(company_code),
        from_ym: query.from_ym,
        to_ym: query.to_ym,
        ..Default::default()
    };
    let db = state.db.read().await;
    let mut rows: Vec<RevenueRecord> = db
        .values()
        .filter(|r| matches(r, &params))
        .cloned()
        .collect();
    rows.sort_by_key(|r| (r.company_code, r.data_year_month));
    Json(rows)
}

async fn legacy_upsert(
    State(state): State<AppState>,
    Json(request): Json<RevenueUpsertRequest>,
) -> Json<bool> {
    tokio::time::sleep(state.delay).await;
    store(&state.db, &request).await;
    Json(true)
}

async fn store(db: &Db, request: &RevenueUpsertRequest) {
    let mut db = db.write().await;
    let record = db
        .entry((request.company_code, request.data_year_month))
        .or_insert_with(|| RevenueRecord::new(request.data_year_month, request.company_code));
    apply(record, request);
}

/// Absent keeps the stored value, Null clears it, Value replaces it.
fn apply(record: &mut RevenueRecord, request: &RevenueUpsertRequest) {
    merge(&mut record.report_date, &request.report_date);
    merge(&mut record.company_name, &request.company_name);
    merge(&mut record.industry, &request.industry);
    merge(&mut record.rev_current_month, &request.rev_current_month);
    merge(&mut record.rev_previous_month, &request.rev_previous_month);
    merge(
        &mut record.rev_same_month_last_year,
        &request.rev_same_month_last_year,
    );
    merge(&mut record.mom_change_pct, &request.mom_change_pct);
    merge(&mut record.yoy_change_pct, &request.yoy_change_pct);
    merge(
        &mut record.rev_accu_current_year,
        &request.rev_accu_current_year,
    );
    merge(&mut record.rev_accu_last_year, &request.rev_accu_last_year);
    merge(&mut record.accu_yoy_change_pct, &request.accu_yoy_change_pct);
    merge(&mut record.notes, &request.notes);
}

fn merge<T: Clone>(slot: &mut Option<T>, field: &Field<T>) {
    match field {
        Field::Absent => {}
        Field::Null => *slot = None,
        Field::Value(v) => *slot = Some(v.clone()),
    }
}

fn matches(record: &RevenueRecord, params: &SearchParams) -> bool {
    if let Some(code) = &params.company_code {
        if record.company_code.to_string() != *code {
            return false;
        }
    }
    // YYYMM compares correctly as text at fixed width.
    let ym = record.data_year_month.to_string();
    if let Some(from) = &params.from_ym {
        if ym.as_str() < from.as_str() {
            return false;
        }
    }
    if let Some(to) = &params.to_ym {
        if ym.as_str() > to.as_str() {
            return false;
        }
    }
    true
}
