//! First-generation endpoints, kept for backends that still serve them.
//!
//! The GET-based client predates the POST search contract: no cancellation
//! management, and errors carry only method and status, not the response
//! text. New code should use [`crate::rest::RevenueClient`].

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

use crate::types::{RevenueRecord, RevenueUpsertRequest};

#[derive(Error, Debug)]
pub enum LegacyError {
    /// Rejected before any network call.
    #[error("companyCode is required")]
    MissingCompanyCode,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("GET {url} failed: {status}")]
    GetFailed { url: String, status: StatusCode },

    #[error("POST {url} failed: {status}")]
    PostFailed { url: String, status: StatusCode },
}

pub type Result<T> = std::result::Result<T, LegacyError>;

/// Optional inclusive year-month bounds for the legacy listing.
#[derive(Debug, Clone, Default)]
pub struct YmRange {
    pub from_ym: Option<String>,
    pub to_ym: Option<String>,
}

/// Client for the first-generation endpoint shapes.
pub struct LegacyClient {
    base_url: String,
    http: Client,
}

impl LegacyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `/api/revenues/{companyCode}` with optional `fromYM`/`toYM`
    /// query parameters.
    pub async fn get_revenues(
        &self,
        company_code: &str,
        range: &YmRange,
    ) -> Result<Vec<RevenueRecord>> {
        if company_code.is_empty() {
            return Err(LegacyError::MissingCompanyCode);
        }

        let url = self.list_url(company_code, range)?;
        debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(LegacyError::GetFailed {
                url: url.to_string(),
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }

    /// POST `/api/revenues`; resolves `true` on success.
    pub async fn upsert_revenue(&self, record: &RevenueUpsertRequest) -> Result<bool> {
        let url = format!("{}/api/revenues", self.base_url);
        debug!("POST {}", url);

        let response = self.http.post(&url).json(record).send().await?;
        if !response.status().is_success() {
            return Err(LegacyError::PostFailed {
                url,
                status: response.status(),
            });
        }
        Ok(true)
    }

    /// Build the listing URL; the company code is percent-encoded as a path
    /// segment.
    fn list_url(&self, company_code: &str, range: &YmRange) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LegacyError::InvalidBaseUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| LegacyError::InvalidBaseUrl(self.base_url.clone()))?
            .extend(["api", "revenues", company_code]);
        if range.from_ym.is_some() || range.to_ym.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(from) = &range.from_ym {
                query.append_pair("fromYM", from);
            }
            if let Some(to) = &range.to_ym {
                query.append_pair("toYM", to);
            }
        }
        Ok(url)
    }
}
