//! Shared plumbing for everything that calls a third-party HTTP service.

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("bhanu/", env!("CARGO_PKG_VERSION"));

/// Why a remote lookup produced nothing.
///
/// `Offline` means the service was never reached (DNS, connect, timeout);
/// the other variants mean it answered but without usable data. Tools keep
/// the two apart so an outage is never mistaken for an empty result.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("service unreachable: {0}")]
    Offline(#[source] reqwest::Error),

    #[error("service returned {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        })
}

/// `base` with `segment` appended as a single percent-encoded path segment,
/// so user text can never add path, query or fragment parts.
pub fn url_with_segment(base: &str, segment: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl(format!("{base} cannot take a path")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

async fn send(request: RequestBuilder, timeout: Duration) -> Result<reqwest::Response, FetchError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::Offline)?;

    let status = response.status();
    if !status.is_success() {
        debug!("Remote service answered {}", status);
        return Err(FetchError::Status(status));
    }
    Ok(response)
}

pub async fn fetch_text(request: RequestBuilder, timeout: Duration) -> Result<String, FetchError> {
    let response = send(request, timeout).await?;
    // a body cut off mid-read is still an unreachable service
    response.text().await.map_err(FetchError::Offline)
}

pub async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, FetchError> {
    let body = fetch_text(request, timeout).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Log a failed tool lookup. The user already gets a substitute answer, so
/// neither kind is logged above `info`.
pub fn log_failure(tool: &str, err: &FetchError) {
    match err {
        FetchError::Offline(_) => info!("{} unreachable, answering offline: {}", tool, err),
        _ => debug!("{} lookup returned no data: {}", tool, err),
    }
}
