//! Request builder, response decoder and the blocking search call.
//!
//! # Design
//! `ReinfoClient` holds its configuration and a `Transport`, nothing else.
//! A search is split into `build_search_request`, which produces an
//! `HttpRequest`, and `parse_search_response`, which consumes an
//! `HttpResponse`. Both are pure; `search_transactions` runs the round-trip
//! in between through the transport. Callers that execute HTTP themselves can
//! use the two halves directly.

use std::collections::BTreeMap;
use std::io::Read;

use flate2::read::GzDecoder;
use serde_json::Value;
use tracing::debug;

use crate::condition::SearchCondition;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::parser::parse_transactions;
use crate::transport::{Transport, UreqTransport};
use crate::types::Transaction;

/// Synchronous client for the XIT001 transaction endpoint.
#[derive(Debug, Clone)]
pub struct ReinfoClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ReinfoClient<UreqTransport> {
    /// Client for the public endpoint using `api_key` for every call.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::with_body_limit(config.body_limit);
        Self { config, transport }
    }

    /// See `ClientConfig::from_env`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::with_config(ClientConfig::from_env()?))
    }
}

impl<T: Transport> ReinfoClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search real-estate transactions matching `condition`.
    pub fn search_transactions(&self, condition: &SearchCondition) -> Result<Vec<Transaction>, ApiError> {
        let request = self.build_search_request(condition);
        debug!(url = %request.url(), "searching transactions");
        let response = self.transport.execute(&request)?;
        self.parse_search_response(response)
    }

    /// Query parameters for `condition`. `year` and `language` are always
    /// present; `area`, `city` and `quarter` only when set.
    pub fn build_params(&self, condition: &SearchCondition) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("year".to_string(), condition.year().to_string());
        if let Some(area) = condition.area() {
            params.insert("area".to_string(), area.to_string());
        }
        if let Some(city) = condition.city() {
            params.insert("city".to_string(), city.to_string());
        }
        if let Some(quarter) = condition.quarter() {
            params.insert("quarter".to_string(), quarter.to_string());
        }
        params.insert("language".to_string(), condition.language().as_str().to_string());
        params
    }

    pub fn build_search_request(&self, condition: &SearchCondition) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.config.base_url.clone(),
            query: self.build_params(condition).into_iter().collect(),
            headers: vec![
                (self.config.auth_header.clone(), self.config.api_key.clone()),
                ("accept-encoding".to_string(), "gzip".to_string()),
            ],
        }
    }

    pub fn parse_search_response(&self, response: HttpResponse) -> Result<Vec<Transaction>, ApiError> {
        let payload = decode_response(response)?;
        Ok(parse_transactions(&payload))
    }
}

/// Check the status, undo gzip when declared, and decode the body as JSON.
/// The JSON structure is returned as the server sent it.
pub fn decode_response(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;

    let gzipped = response
        .header("content-encoding")
        .is_some_and(|encoding| encoding.trim().eq_ignore_ascii_case("gzip"));
    let body = if gzipped {
        gunzip(&response.body)?
    } else {
        response.body
    };

    let text = std::str::from_utf8(&body).map_err(|e| ApiError::Parse(e.to_string()))?;
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let reason = response.reason.clone();
    Err(match response.status {
        401 => ApiError::Auth,
        400 => ApiError::Request { reason },
        status => ApiError::Status { status, reason },
    })
}

fn gunzip(body: &[u8]) -> Result<Vec<u8>, ApiError> {
    let mut decoded = Vec::new();
    GzDecoder::new(body)
        .read_to_end(&mut decoded)
        .map_err(|e| ApiError::Parse(format!("invalid gzip body: {e}")))?;
    Ok(decoded)
}
