//! End-to-end tests against the live mock backend.
//!
//! Each test spawns its own server on a random port so the stores never
//! interfere; the client is exercised over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use futures::future::AbortHandle;

use mock_backend::{app, app_with_delay, spawn, stub, StatusCode};
use revenue_client::types::{Field, RevenueUpsertRequest, SearchParams, UpsertOutcome};
use revenue_client::{LegacyClient, LegacyError, RestError, RevenueClient, YmRange};

fn tsmc_january() -> RevenueUpsertRequest {
    let mut request = RevenueUpsertRequest::new(202401, 2330);
    request.company_name = Field::Value("TSMC".to_string());
    request.rev_current_month = Field::Value(1000.5);
    request.notes = Field::Value("initial".to_string());
    request
}

#[tokio::test]
async fn upsert_then_search_round_trip() {
    let base = spawn(app()).await;
    let client = RevenueClient::new(&base);

    let outcome = client.upsert(&tsmc_january()).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::Number(1));

    let page = client
        .search(SearchParams {
            company_code: Some("2330".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    // Pagination defaults were transmitted and echoed back.
    assert_eq!(page.page_index, 1);
    assert_eq!(page.page_size, 100);
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].company_code, 2330);
    assert_eq!(page.items[0].data_year_month, 202401);
    assert_eq!(page.items[0].company_name.as_deref(), Some("TSMC"));
}

#[tokio::test]
async fn search_filters_by_year_month_range_and_pages() {
    let base = spawn(app()).await;
    let client = RevenueClient::new(&base);

    for ym in [202401, 202402, 202403, 202404] {
        client
            .upsert(&RevenueUpsertRequest::new(ym, 2330))
            .await
            .unwrap();
    }

    let page = client
        .search(SearchParams {
            from_ym: Some("202402".to_string()),
            to_ym: Some("202403".to_string()),
            page_index: Some(1),
            page_size: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].data_year_month, 202402);

    let second = client
        .search(SearchParams {
            from_ym: Some("202402".to_string()),
            to_ym: Some("202403".to_string()),
            page_index: Some(2),
            page_size: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].data_year_month, 202403);
}

#[tokio::test]
async fn null_clears_a_field_and_absent_preserves_it() {
    let base = spawn(app()).await;
    let client = RevenueClient::new(&base);

    client.upsert(&tsmc_january()).await.unwrap();

    // Second upsert of the same key: notes cleared, company name untouched.
    let mut update = RevenueUpsertRequest::new(202401, 2330);
    update.notes = Field::Null;
    client.upsert(&update).await.unwrap();

    let page = client
        .search(SearchParams {
            company_code: Some("2330".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.items[0].company_name.as_deref(), Some("TSMC"));
    assert_eq!(page.items[0].notes, None);
}

#[tokio::test]
async fn http_error_carries_status_and_response_text() {
    let base = spawn(stub(StatusCode::NOT_FOUND, "not found")).await;
    let client = RevenueClient::new(&base);

    let error = client
        .upsert(&RevenueUpsertRequest::new(202401, 2330))
        .await
        .unwrap_err();
    let message = error.to_string();
    assert!(message.contains("404"), "message was: {message}");
    assert!(message.contains("not found"), "message was: {message}");

    let error = client.search(SearchParams::default()).await.unwrap_err();
    assert!(matches!(error, RestError::Status { .. }));
}

#[tokio::test]
async fn empty_success_body_is_not_a_parse_error() {
    let base = spawn(stub(StatusCode::OK, "")).await;
    let client = RevenueClient::new(&base);

    let outcome = client
        .upsert(&RevenueUpsertRequest::new(202401, 2330))
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Empty {});
}

#[tokio::test]
async fn newer_auto_managed_request_cancels_the_older_one() {
    let base = spawn(app_with_delay(Duration::from_millis(300))).await;
    let client = Arc::new(RevenueClient::new(&base));

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.search(SearchParams::default()).await })
    };
    // Let the first request reach the server before superseding it.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = client.search(SearchParams::default()).await;

    let first = first.await.unwrap();
    assert!(matches!(first, Err(RestError::Cancelled)));
    assert!(second.is_ok());
}

#[tokio::test]
async fn explicitly_registered_request_bypasses_the_auto_slot() {
    let base = spawn(app_with_delay(Duration::from_millis(100))).await;
    let client = Arc::new(RevenueClient::new(&base));

    let (_handle, registration) = AbortHandle::new_pair();
    let first = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .search_with_registration(SearchParams::default(), registration)
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;

    // An auto-managed request must not abort the caller-managed one.
    let second = client.search(SearchParams::default()).await;

    assert!(first.await.unwrap().is_ok());
    assert!(second.is_ok());
}

#[tokio::test]
async fn aborting_an_explicit_registration_cancels_that_request() {
    let base = spawn(app_with_delay(Duration::from_millis(200))).await;
    let client = RevenueClient::new(&base);

    let (handle, registration) = AbortHandle::new_pair();
    handle.abort();

    let error = client
        .search_with_registration(SearchParams::default(), registration)
        .await
        .unwrap_err();
    assert!(matches!(error, RestError::Cancelled));
}

#[tokio::test]
async fn legacy_endpoints_round_trip() {
    let base = spawn(app()).await;
    let legacy = LegacyClient::new(&base);

    assert!(legacy.upsert_revenue(&tsmc_january()).await.unwrap());

    let rows = legacy
        .get_revenues(
            "2330",
            &YmRange {
                from_ym: Some("202401".to_string()),
                to_ym: Some("202412".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_name.as_deref(), Some("TSMC"));

    let missing = legacy.get_revenues("", &YmRange::default()).await;
    assert!(matches!(missing, Err(LegacyError::MissingCompanyCode)));
}
