//! Network execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. `UreqTransport` makes one
//! blocking attempt per call and hands every HTTP status back as data, so
//! status interpretation stays in `ReinfoClient`. Failures that leave no HTTP
//! response to interpret become `ApiError::Connection`.

use tracing::debug;

use crate::config::DEFAULT_BODY_LIMIT;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Decompression is left to the client: the agent is built without ureq's
/// gzip support, so the body arrives exactly as the server sent it.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_body_limit(DEFAULT_BODY_LIMIT)
    }

    pub fn with_body_limit(body_limit: u64) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, body_limit }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url();
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(|e| match e {
                ureq::Error::BodyExceedsLimit(limit) => {
                    ApiError::Parse(format!("response body exceeds {limit} bytes"))
                }
                other => ApiError::Connection(other.to_string()),
            })?;

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: reason_phrase(status),
            headers,
            body,
        })
    }
}

/// ureq does not expose the reason phrase from the status line, so the
/// standard phrase for the code stands in for it.
fn reason_phrase(status: ureq::http::StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown Status").to_string()
}

#[cfg(test)]
mod tests {
    use ureq::http::StatusCode;

    use super::*;

    #[test]
    fn reason_phrase_for_standard_codes() {
        assert_eq!(reason_phrase(StatusCode::BAD_REQUEST), "Bad Request");
        assert_eq!(reason_phrase(StatusCode::SERVICE_UNAVAILABLE), "Service Unavailable");
    }

    #[test]
    fn reason_phrase_is_never_empty() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(reason_phrase(status), "Unknown Status");
    }

    #[test]
    fn debug_shows_the_body_limit() {
        let rendered = format!("{:?}", UreqTransport::with_body_limit(1024));
        assert!(rendered.starts_with("UreqTransport"));
        assert!(rendered.contains("1024"));
    }
}
