//! HTTP plumbing shared by all endpoint groups.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{ApiError, ErrorBody};
use crate::config::Settings;

/// Client for the indexing backend's REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from resolved settings.
    ///
    /// No timeout is applied unless `request_timeout` is set.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(secs) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, &settings.api_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(&url).query(query).send().await?;
        Self::parse_response(&url, response).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST {} {:?}", url, query);
        let response = self.client.post(&url).query(query).send().await?;
        Self::parse_response(&url, response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        Self::parse_response(&url, response).await
    }

    /// Turn a non-2xx response into [`ApiError::Status`].
    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.unwrap_or_default();

        Err(ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: ErrorBody::from_response(content_type.as_deref(), text),
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        url: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::with_client(Client::new(), "http://localhost:8000/api/");
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(api.url("/udm/"), "http://localhost:8000/api/udm/");
        assert_eq!(api.url("matching/stats"), "http://localhost:8000/api/matching/stats");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("WSOP 2024/ME #1.mp4"), "WSOP%202024%2FME%20%231.mp4");
    }

    #[test]
    fn test_new_from_settings() {
        let settings = Settings {
            api_url: "http://backend:9000/api".to_string(),
            request_timeout: Some(5),
            ..Default::default()
        };
        let api = ApiClient::new(&settings).unwrap();
        assert_eq!(api.base_url(), "http://backend:9000/api");
    }
}
