/// HTTP helpers shared by remote clients
///
/// - Header injection on outgoing requests
/// - Response draining with a dedicated unreadable-body error
/// - JSON fetching with status checking
use crate::error::{AppError, Result};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Build the HTTP client used by every remote integration
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Apply headers on a request, a later value replaces an earlier one
pub fn set_headers<I, K, V>(request: &mut Request, headers: I) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_ref().as_bytes())
            .map_err(|e| AppError::Validation(format!("invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value.as_ref()).map_err(|e| {
            AppError::Validation(format!("invalid header value for {}: {}", name, e))
        })?;

        request.headers_mut().insert(name, value);
    }

    Ok(())
}

/// Send a request and read the whole body
///
/// Transport errors propagate untouched, a failure while reading the body is
/// reported as [`AppError::UnreadableResponse`].
pub async fn send_request(client: &Client, request: Request) -> Result<(StatusCode, Vec<u8>)> {
    let url = request.url().to_string();
    let method = request.method().clone();

    let response = client.execute(request).await?;
    let status = response.status();

    let body = response
        .bytes()
        .await
        .map_err(|_| AppError::UnreadableResponse { url: url.clone() })?;

    debug!(%method, %url, status = status.as_u16(), length = body.len(), "HTTP exchange done");

    Ok((status, body.to_vec()))
}

/// Send a request expecting a successful JSON answer
pub async fn fetch_json(client: &Client, request: Request) -> Result<Value> {
    let url = request.url().to_string();
    let (status, body) = send_request(client, request).await?;

    if !status.is_success() {
        return Err(AppError::Remote {
            url,
            status: status.as_u16(),
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| AppError::Serialization(format!("invalid JSON from {}: {}", url, e)))
}
