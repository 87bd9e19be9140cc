//! Sanity HTTP query API client.
//!
//! Issues GROQ queries against
//! `https://<project>.api.sanity.io/v<version>/data/query/<dataset>`
//! with the slug passed as a `$slug` query parameter (JSON encoded).

use super::{with_retry, ContentStore, RetryConfig, StoreError};
use crate::models::{Category, CategoryAccess};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Category by slug, public fields only.
const CATEGORY_ACCESS_QUERY: &str = r#"*[_type == "blogCategory" && slug.current == $slug][0] {
  "slug": slug.current,
  isProtected
}"#;

/// Category by slug, including the password verifier.
const CATEGORY_QUERY: &str = r#"*[_type == "blogCategory" && slug.current == $slug][0] {
  "slug": slug.current,
  isProtected,
  passwordHash
}"#;

/// Connection settings for a Sanity project.
#[derive(Clone)]
pub struct SanitySettings {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Read token for private datasets.
    pub token: Option<String>,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl std::fmt::Debug for SanitySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanitySettings")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

/// Content store backed by the Sanity query API.
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    retry: RetryConfig,
}

impl SanityClient {
    pub fn new(settings: SanitySettings) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            endpoint: query_endpoint(
                &settings.project_id,
                &settings.dataset,
                &settings.api_version,
            ),
            token: settings.token,
            retry: settings.retry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn query_once<T: DeserializeOwned>(
        &self,
        query: &str,
        slug_param: &str,
    ) -> Result<Option<T>, StoreError> {
        let mut request = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query), ("$slug", slug_param)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        let body: QueryResponse<T> = response.json().await.map_err(map_reqwest_error)?;
        Ok(body.result)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        slug: &str,
    ) -> Result<Option<T>, StoreError> {
        let slug_param =
            serde_json::to_string(slug).map_err(|e| StoreError::Decode(e.to_string()))?;
        with_retry(&self.retry, || self.query_once(query, &slug_param)).await
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn category_access(&self, slug: &str) -> Result<Option<CategoryAccess>, StoreError> {
        self.query(CATEGORY_ACCESS_QUERY, slug).await
    }

    async fn category(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        self.query(CATEGORY_QUERY, slug).await
    }
}

fn query_endpoint(project_id: &str, dataset: &str, api_version: &str) -> String {
    format!(
        "https://{}.api.sanity.io/v{}/data/query/{}",
        project_id,
        api_version.trim_start_matches('v'),
        dataset
    )
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout
    } else if err.is_decode() {
        StoreError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        StoreError::Status(status.as_u16())
    } else {
        StoreError::Network(err.to_string())
    }
}
