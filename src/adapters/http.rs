use crate::utils::error::{EtlError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

const ERROR_BODY_PREVIEW: usize = 200;

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(client)
}

/// Turns a non-2xx response into `HttpStatusError` unless `lenient` is set,
/// in which case the body is handed back for parsing regardless.
pub async fn check_status(response: Response, lenient: bool) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if lenient {
        tracing::warn!("⚠️ {} returned {}, parsing body anyway", response.url(), status);
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let body = body.chars().take(ERROR_BODY_PREVIEW).collect();
    Err(EtlError::HttpStatusError {
        url,
        status: status.as_u16(),
        body,
    })
}
