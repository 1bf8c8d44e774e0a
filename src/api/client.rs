use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the backend client. Every failure carries the URL it
/// happened against so handlers can flash a message the operator can act on.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{url} returned {status}: {detail}")]
    Status {
        url: String,
        status: StatusCode,
        detail: String,
    },

    /// A 2xx response without a decodable body. The backend never replies
    /// with an empty success, so this is reported rather than swallowed.
    #[error("no usable response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Thin typed client for the infrastructure backend. One method per backend
/// operation lives in the sibling modules; this holds the shared plumbing.
/// No retries or caching: the views decide when to re-fetch.
#[derive(Clone)]
pub struct InfraApi {
    http: reqwest::Client,
    base_url: String,
}

impl InfraApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }

    pub(crate) async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(&url)
            .query(query)
            .json(&Value::Object(Default::default()))
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST multipart");
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        let resp = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        decode(url, resp).await
    }
}

async fn decode<T: DeserializeOwned>(url: String, resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let detail = resp.text().await.unwrap_or_default();
        let detail: String = detail.chars().take(200).collect();
        return Err(ApiError::Status { url, status, detail });
    }
    resp.json::<T>()
        .await
        .map_err(|source| ApiError::Body { url, source })
}
