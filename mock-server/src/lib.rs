use std::{collections::HashMap, io::Write, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use flate2::{write::GzEncoder, Compression};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const SEARCH_PATH: &str = "/ex-api/external/XIT001";
pub const AUTH_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// What the mock endpoint accepts and serves.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub api_key: String,
    pub records: Vec<Value>,
}

impl MockConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            records: sample_records(),
        }
    }
}

type Shared = Arc<MockConfig>;

pub fn app(config: MockConfig) -> Router {
    Router::new()
        .route(SEARCH_PATH, get(search))
        .route("/status/{code}", get(fixed_status))
        .route("/garbage", get(garbage))
        .with_state(Arc::new(config))
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

async fn search(
    State(config): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let key = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    if key != Some(config.api_key.as_str()) {
        info!("rejecting request with missing or wrong subscription key");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let query = match SearchQuery::from_params(&params) {
        Ok(query) => query,
        Err(message) => {
            info!(%message, "rejecting invalid search parameters");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    let data: Vec<Value> = config
        .records
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect();
    debug!(year = query.year, quarter = ?query.quarter, matched = data.len(), "serving search");

    let body = json!({ "status": "OK", "data": data }).to_string();
    let wants_gzip = headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("gzip"));

    if !wants_gzip {
        return ([(header::CONTENT_TYPE, "application/json")], body).into_response();
    }
    match gzip(body.as_bytes()) {
        Ok(compressed) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CONTENT_ENCODING, "gzip"),
            ],
            compressed,
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn fixed_status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

async fn garbage() -> Response {
    ([(header::CONTENT_TYPE, "application/json")], "<html>not json</html>").into_response()
}

/// Parameters accepted by the real endpoint, validated the same way.
#[derive(Debug, PartialEq)]
struct SearchQuery {
    year: i32,
    quarter: Option<u8>,
}

impl SearchQuery {
    fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let year = params
            .get("year")
            .and_then(|y| y.parse().ok())
            .ok_or_else(|| "year must be an integer".to_string())?;
        if !params.contains_key("area") && !params.contains_key("city") {
            return Err("area or city is required".to_string());
        }
        let quarter = match params.get("quarter") {
            None => None,
            Some(q) => match q.parse::<u8>() {
                Ok(q @ 1..=4) => Some(q),
                _ => return Err("quarter must be 1-4".to_string()),
            },
        };
        if let Some(language) = params.get("language") {
            if language != "ja" && language != "en" {
                return Err("language must be ja or en".to_string());
            }
        }
        Ok(Self { year, quarter })
    }

    /// Records carry their period as "2024Q1".
    fn matches(&self, record: &Value) -> bool {
        let Some(period) = record.get("Period").and_then(Value::as_str) else {
            return false;
        };
        let Some((year, quarter)) = period.split_once('Q') else {
            return false;
        };
        year == self.year.to_string() && self.quarter.map_or(true, |q| quarter == q.to_string())
    }
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Raw records shaped like the live API: numbers as strings, blanks as "".
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "PriceCategory": "Real Estate Transaction Price Information",
            "Type": "Residential Land(Land and Building)",
            "Region": "Residential Area",
            "MunicipalityCode": "13101",
            "Prefecture": "Tokyo",
            "Municipality": "Chiyoda Ward",
            "DistrictName": "Kanda",
            "TradePrice": "50000000",
            "UnitPrice": "1500000",
            "Area": "100.5",
            "BuildingYear": "2020",
            "Structure": "RC",
            "FloorAreaRatio": "600",
            "CoverageRatio": "80",
            "Frontage": "6.0",
            "Period": "2024Q1"
        }),
        json!({
            "PriceCategory": "Real Estate Transaction Price Information",
            "Type": "Pre-owned Condominiums, etc.",
            "MunicipalityCode": "13113",
            "Prefecture": "Tokyo",
            "Municipality": "Shibuya Ward",
            "DistrictName": "",
            "TradePrice": "30000000",
            "UnitPrice": "",
            "Area": "60",
            "BuildingYear": "",
            "Structure": "SRC",
            "FloorAreaRatio": "",
            "CoverageRatio": "",
            "Frontage": "",
            "Period": "2024Q2"
        }),
        json!({
            "PriceCategory": "Real Estate Transaction Price Information",
            "Type": "Residential Land(Land Only)",
            "MunicipalityCode": "13104",
            "Prefecture": "Tokyo",
            "Municipality": "Shinjuku Ward",
            "DistrictName": "Okubo",
            "TradePrice": "82000000",
            "UnitPrice": "2700000",
            "Area": "",
            "BuildingYear": null,
            "Structure": null,
            "FloorAreaRatio": "300",
            "CoverageRatio": "60",
            "Frontage": "50.0m or longer",
            "Period": "2023Q4"
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn query_requires_integer_year() {
        let err = SearchQuery::from_params(&params(&[("year", "abc"), ("area", "13")])).unwrap_err();
        assert!(err.contains("year"));
    }

    #[test]
    fn query_requires_area_or_city() {
        let err = SearchQuery::from_params(&params(&[("year", "2024")])).unwrap_err();
        assert!(err.contains("area or city"));
    }

    #[test]
    fn query_rejects_bad_quarter_and_language() {
        assert!(SearchQuery::from_params(&params(&[("year", "2024"), ("area", "13"), ("quarter", "5")])).is_err());
        assert!(SearchQuery::from_params(&params(&[("year", "2024"), ("area", "13"), ("language", "fr")])).is_err());
    }

    #[test]
    fn query_parses_valid_params() {
        let query = SearchQuery::from_params(&params(&[
            ("year", "2024"),
            ("city", "13101"),
            ("quarter", "2"),
            ("language", "en"),
        ]))
        .unwrap();
        assert_eq!(query, SearchQuery { year: 2024, quarter: Some(2) });
    }

    #[test]
    fn matches_filters_by_period() {
        let all_2024 = SearchQuery { year: 2024, quarter: None };
        let q1_2024 = SearchQuery { year: 2024, quarter: Some(1) };

        let records = sample_records();
        assert_eq!(records.iter().filter(|r| all_2024.matches(r)).count(), 2);
        assert_eq!(records.iter().filter(|r| q1_2024.matches(r)).count(), 1);
    }

    #[test]
    fn records_without_period_never_match() {
        let query = SearchQuery { year: 2024, quarter: None };
        assert!(!query.matches(&json!({ "TradePrice": "1" })));
        assert!(!query.matches(&json!({ "Period": "2024" })));
    }
}
