/// Shared HTTP GET primitive for all JSON data sources.
///
/// One request per call, no retries, no caching. The response is fully
/// drained into memory before returning; the connection is released when
/// the `Response` is dropped on every exit path.

use crate::model::FetchError;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

const USER_AGENT: &str = concat!("littlefalls_service/", env!("CARGO_PKG_VERSION"));

/// Builds the blocking client shared by the adapters.
///
/// Timeouts and redirect policy are left at the reqwest defaults.
pub fn build_client() -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))
}

/// Issues a GET for `url` and returns the raw body of a 200 response.
///
/// # Errors
/// - `FetchError::InvalidUrl`: `url` is not an absolute http(s) URL.
/// - `FetchError::Transport`: the request could not be sent.
/// - `FetchError::Status`: the server answered with anything but 200.
/// - `FetchError::Body`: the body could not be read to completion.
pub fn fetch(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            url,
            parsed.scheme()
        )));
    }

    tracing::debug!(%url, "GET");

    let response = client
        .get(parsed)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let body = response
        .bytes()
        .map_err(|e| FetchError::Body(e.to_string()))?;

    Ok(body.to_vec())
}
