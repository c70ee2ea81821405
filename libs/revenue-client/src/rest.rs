//! REST client for the revenue-reporting backend.
//!
//! All traffic funnels through [`RevenueClient::request`], which normalizes
//! errors and applies the "latest request wins" auto-cancellation policy.

use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use parking_lot::Mutex;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::types::{PagedResponse, RevenueRecord, RevenueUpsertRequest, SearchParams, UpsertOutcome};

/// Search endpoint, relative to the base URL.
pub const SEARCH_PATH: &str = "/api/revenues/search";

/// Upsert endpoint, relative to the base URL.
pub const UPSERT_PATH: &str = "/api/revenues/upsert";

#[derive(Error, Debug)]
pub enum RestError {
    /// Transport failure (DNS, connection refused), straight from reqwest.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("{method} {url} -> {status} {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    /// Malformed JSON on an otherwise successful response.
    #[error("failed to parse response JSON: {0}")]
    ParseFailed(#[from] serde_json::Error),

    /// Superseded by a newer auto-managed request.
    #[error("request cancelled: superseded by a newer call")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, RestError>;

/// REST client for the revenue-reporting backend.
///
/// Holds the single-slot auto-cancellation state: a request issued without
/// an explicit [`AbortRegistration`] aborts the previous auto-managed
/// request still in flight, so rapid successive calls (search-as-you-type)
/// resolve to the latest one only.
pub struct RevenueClient {
    base_url: String,
    http: Client,
    inflight: Mutex<Option<AbortHandle>>,
}

impl RevenueClient {
    /// Create a client against the given origin/prefix. A trailing slash is
    /// stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
            inflight: Mutex::new(None),
        }
    }

    /// Create a client from `REVENUE_API_BASE`.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        ClientConfig::from_env().map(|config| Self::new(config.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query a page of revenue records matching the given filters.
    ///
    /// Omitted `page_index`/`page_size` are sent as 1/100 so the server
    /// always receives explicit pagination values.
    pub async fn search(&self, params: SearchParams) -> Result<PagedResponse<RevenueRecord>> {
        self.search_inner(params, None).await
    }

    /// [`Self::search`] with caller-managed cancellation; bypasses the
    /// auto-cancellation slot.
    pub async fn search_with_registration(
        &self,
        params: SearchParams,
        registration: AbortRegistration,
    ) -> Result<PagedResponse<RevenueRecord>> {
        self.search_inner(params, Some(registration)).await
    }

    /// Create-or-update a single revenue record.
    ///
    /// `Field::Absent` members are dropped from the body entirely and
    /// `Field::Null` members are sent as explicit `null`; the backend keys
    /// its create/update defaults off that distinction.
    pub async fn upsert(&self, record: &RevenueUpsertRequest) -> Result<UpsertOutcome> {
        self.upsert_inner(record, None).await
    }

    /// [`Self::upsert`] with caller-managed cancellation; bypasses the
    /// auto-cancellation slot.
    pub async fn upsert_with_registration(
        &self,
        record: &RevenueUpsertRequest,
        registration: AbortRegistration,
    ) -> Result<UpsertOutcome> {
        self.upsert_inner(record, Some(registration)).await
    }

    async fn search_inner(
        &self,
        params: SearchParams,
        registration: Option<AbortRegistration>,
    ) -> Result<PagedResponse<RevenueRecord>> {
        let body = serde_json::to_value(params.normalized())?;
        let value = self
            .request(Method::POST, SEARCH_PATH, Some(body), registration)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn upsert_inner(
        &self,
        record: &RevenueUpsertRequest,
        registration: Option<AbortRegistration>,
    ) -> Result<UpsertOutcome> {
        let body = serde_json::to_value(record)?;
        let value = self
            .request(Method::POST, UPSERT_PATH, Some(body), registration)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Single choke point for issuing a request and normalizing the result.
    ///
    /// Without an explicit registration, the previous auto-managed request
    /// is aborted and this one takes over the slot. Returns the parsed
    /// response body, or `{}` when the body is empty.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        registration: Option<AbortRegistration>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let registration = match registration {
            Some(registration) => registration,
            None => {
                let (handle, registration) = AbortHandle::new_pair();
                // Replace-then-abort under the lock; aborting a finished
                // request is a no-op.
                if let Some(previous) = self.inflight.lock().replace(handle) {
                    previous.abort();
                }
                registration
            }
        };

        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let round_trip = async {
            let response = request.send().await?;
            let status = response.status();
            // Some responses have no body; a failed read degrades to "".
            let text = response.text().await.unwrap_or_default();
            Ok::<(StatusCode, String), reqwest::Error>((status, text))
        };

        let (status, text) = match Abortable::new(round_trip, registration).await {
            Ok(outcome) => outcome?,
            Err(Aborted) => {
                debug!("{} {} superseded by a newer request", method, url);
                return Err(RestError::Cancelled);
            }
        };

        if !status.is_success() {
            warn!("{} {} -> {}", method, url, status);
            return Err(RestError::Status {
                method,
                url,
                status,
                body: text,
            });
        }

        if text.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RevenueClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn status_error_message_carries_method_url_status_and_body() {
        let error = RestError::Status {
            method: Method::POST,
            url: "http://localhost:5000/api/revenues/upsert".to_string(),
            status: StatusCode::NOT_FOUND,
            body: "not found".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("POST"));
        assert!(message.contains("/api/revenues/upsert"));
        assert!(message.contains("404"));
        assert!(message.contains("not found"));
    }
}
