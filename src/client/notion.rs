//! Notion API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{Page, QueryResponse};
use super::NotionApi;
use crate::error::{ApiError, Result};

/// Notion API base URL
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// Versioned API contract this client is written against
const NOTION_VERSION: &str = "2022-06-28";

/// Notion allows an average of 3 requests per second per integration
const RATE_LIMIT_PER_SECOND: u32 = 3;

/// Per-request timeout; expiry is a soft failure like any other fetch error
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Notion API client
pub struct NotionClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl NotionClient {
    /// Create a new Notion API client.
    ///
    /// `DUEBRIEF_NOTION_API_HOST` overrides the base URL so tests can point
    /// the client at a local mock server.
    pub fn new(token: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let base_url = std::env::var("DUEBRIEF_NOTION_API_HOST")
            .map(|host| format!("{}/v1", host.trim_end_matches('/')))
            .unwrap_or_else(|_| API_BASE_URL.to_string());

        let quota = Quota::per_second(std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            base_url,
            token,
            rate_limiter,
        })
    }

    /// Make an authenticated API request
    async fn request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        // Apply rate limiting
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(retry_after).into())
            }
            StatusCode::BAD_REQUEST => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn check_database(&self, database_id: &str) -> Result<()> {
        let path = format!("/databases/{}", database_id);
        self.request::<serde_json::Value>(reqwest::Method::GET, &path, None)
            .await?;
        Ok(())
    }

    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse> {
        let path = format!("/databases/{}/query", database_id);

        let body = match start_cursor {
            Some(cursor) => serde_json::json!({ "start_cursor": cursor }),
            None => serde_json::json!({}),
        };

        self.request(reqwest::Method::POST, &path, Some(body)).await
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        let path = format!("/pages/{}", page_id);
        self.request(reqwest::Method::GET, &path, None).await
    }
}
