//! HTTP utilities for OCI REST API calls

use super::auth::{http_date, RequestSigner};
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, DATE};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Response header carrying the list continuation token
pub const NEXT_PAGE_HEADER: &str = "opc-next-page";

/// Request header correlating client calls with service logs
pub const REQUEST_ID_HEADER: &str = "opc-request-id";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Non-success response from an OCI service
#[derive(Debug, Clone, Error)]
#[error("API request failed: {status} {code}")]
pub struct ApiError {
    pub status: u16,
    /// Service error code, e.g. `NotAuthorizedOrNotFound`
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn from_body(status: u16, body: &str) -> Self {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let field = |name: &str| {
            parsed
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string()
        };
        Self {
            status,
            code: field("code"),
            message: field("message"),
        }
    }
}

/// A decoded response plus its list continuation token, if any
#[derive(Debug, Clone)]
pub struct OciResponse {
    pub body: Value,
    pub next_page: Option<String>,
}

/// HTTP client wrapper that signs every request
#[derive(Clone)]
pub struct OciHttpClient {
    client: Client,
    signer: Arc<RequestSigner>,
}

impl OciHttpClient {
    /// Create a new HTTP client
    pub fn new(signer: RequestSigner) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ocinfo/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            signer: Arc::new(signer),
        })
    }

    /// Make a signed GET request to an OCI API
    pub async fn get(&self, url: &Url) -> Result<OciResponse> {
        tracing::debug!("GET {}", url);

        let host = url.host_str().context("Request URL has no host")?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let date = http_date();
        let authorization = self.signer.authorization("get", &path_and_query, &host, &date);

        let response = self
            .client
            .get(url.clone())
            .header(DATE, &date)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().simple().to_string())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only the sanitized/truncated body is logged
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::from_body(status.as_u16(), &body).into());
        }

        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).context("Failed to parse response JSON")?
        };

        Ok(OciResponse { body, next_page })
    }
}

/// Format an OCI API error for display
/// Maps well-known statuses to short messages instead of raw API details
pub fn format_oci_error(error: &anyhow::Error) -> String {
    if let Some(api) = error.downcast_ref::<ApiError>() {
        return match api.status {
            401 => "Authentication failed. Check the API key and fingerprint in your OCI config."
                .to_string(),
            403 | 404 if api.code == "NotAuthorizedOrNotFound" => {
                "Not authorized or not found. Check your IAM policies.".to_string()
            }
            403 => "Permission denied. Check your IAM policies.".to_string(),
            404 => "Resource not found.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 => "Invalid request. Check your parameters.".to_string(),
            409 => "Resource conflict.".to_string(),
            500..=599 => "OCI service temporarily unavailable. Please try again.".to_string(),
            _ => "Request failed. Check your network connection and try again.".to_string(),
        };
    }

    let error_str = format!("{:#}", error);
    let sanitized = error_str
        .chars()
        .filter(|c| !c.is_control())
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
