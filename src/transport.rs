//! Single-round-trip HTTP transport.
//!
//! One call to [`Transport::send`] opens at most one request and resolves
//! exactly once. No timeout and no retry are applied here; callers that need
//! bounded latency wrap the future themselves.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::core::AvaTaxError;

/// Message used when an error response carries no readable summary.
pub const SERVER_ERROR: &str = "AvaTax server error";

/// A fully formed request.
#[derive(Debug)]
pub struct ApiRequest<'a> {
    pub method: Method,
    /// Absolute path, e.g. `/1.0/tax/get`.
    pub path: String,
    pub headers: HeaderMap,
    pub query: Vec<(&'a str, &'a str)>,
    pub body: Option<Vec<u8>>,
}

/// A response that was not classified as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body. `None` if the body was not valid JSON.
    pub document: Option<Value>,
}

impl ApiResponse {
    /// The document, unless its envelope reports `ResultCode: "Error"`.
    ///
    /// A `None` document is passed through without error: callers must
    /// check for it.
    pub fn into_document(self) -> Result<Option<Value>, AvaTaxError> {
        if let Some(doc) = &self.document {
            if doc.get("ResultCode").and_then(Value::as_str) == Some("Error") {
                return Err(AvaTaxError::Service {
                    status: self.status,
                    message: first_message_summary(doc).unwrap_or_else(|| SERVER_ERROR.to_string()),
                });
            }
        }
        Ok(self.document)
    }
}

/// HTTP transport bound to one base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(base_url: Url) -> Result<Self, AvaTaxError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Perform one round trip.
    ///
    /// # Errors
    ///
    /// `AvaTaxError::Transport` on network failure, `AvaTaxError::Service` for
    /// HTTP status >= 400 (message taken from the first `Messages[].Summary`
    /// of the body when there is one).
    pub async fn send(&self, request: ApiRequest<'_>) -> Result<ApiResponse, AvaTaxError> {
        let mut url = self.base_url.clone();
        let path = format!("{}{}", self.base_url.path().trim_end_matches('/'), request.path);
        url.set_path(&path);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        debug!(method = %request.method, path = %path, "dispatching AvaTax request");

        let mut builder = self
            .http
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, path = %path, "AvaTax request failed");
            AvaTaxError::Transport(e)
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        debug!(status, len = bytes.len(), "AvaTax response received");

        let document = serde_json::from_slice::<Value>(&bytes).ok();

        if status >= 400 {
            let message = document
                .as_ref()
                .and_then(first_message_summary)
                .unwrap_or_else(|| SERVER_ERROR.to_string());
            return Err(AvaTaxError::Service { status, message });
        }

        if document.is_none() {
            debug!(status, "AvaTax response body is not JSON");
        }

        Ok(ApiResponse { status, document })
    }
}

/// `Summary` of the first entry in `Messages`.
///
/// Tolerates `Messages` being a single object instead of an array.
pub fn first_message_summary(doc: &Value) -> Option<String> {
    let messages = doc.get("Messages")?;
    let first = match messages {
        Value::Array(items) => items.first()?,
        other => other,
    };
    first.get("Summary")?.as_str().map(str::to_string)
}
