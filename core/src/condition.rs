//! Validated search filter for the transaction endpoint.
//!
//! A `SearchCondition` can only be obtained through `build()` or `new()`,
//! both of which reject invalid combinations, so every instance the client
//! sees is already valid.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Language of the values in the response. Field names are always English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Ja,
    #[default]
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ja" => Ok(Language::Ja),
            "en" => Ok(Language::En),
            other => Err(ApiError::Configuration(format!(
                "language must be 'ja' or 'en', got '{other}'"
            ))),
        }
    }
}

/// Filter for a transaction search.
///
/// At least one of `area` (2-digit prefecture code) or `city` (5-digit
/// municipality code) is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCondition {
    year: i32,
    area: Option<String>,
    city: Option<String>,
    quarter: Option<u8>,
    language: Language,
}

impl SearchCondition {
    pub fn builder(year: i32) -> SearchConditionBuilder {
        SearchConditionBuilder {
            year,
            area: None,
            city: None,
            quarter: None,
            language: None,
        }
    }

    /// Validate all fields at once. `language` takes the wire code.
    pub fn new(
        year: i32,
        area: Option<&str>,
        city: Option<&str>,
        quarter: Option<i32>,
        language: &str,
    ) -> Result<Self, ApiError> {
        let mut builder = Self::builder(year).language(language);
        if let Some(area) = area {
            builder = builder.area(area);
        }
        if let Some(city) = city {
            builder = builder.city(city);
        }
        if let Some(quarter) = quarter {
            builder = builder.quarter(quarter);
        }
        builder.build()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn quarter(&self) -> Option<u8> {
        self.quarter
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// Collects raw inputs; nothing is checked until `build()`.
#[derive(Debug, Clone)]
pub struct SearchConditionBuilder {
    year: i32,
    area: Option<String>,
    city: Option<String>,
    quarter: Option<i32>,
    language: Option<String>,
}

impl SearchConditionBuilder {
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn quarter(mut self, quarter: i32) -> Self {
        self.quarter = Some(quarter);
        self
    }

    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    pub fn build(self) -> Result<SearchCondition, ApiError> {
        if self.area.is_none() && self.city.is_none() {
            return Err(ApiError::Configuration(
                "at least one of 'area' or 'city' must be specified".to_string(),
            ));
        }

        let quarter = match self.quarter {
            None => None,
            Some(q @ 1..=4) => Some(q as u8),
            Some(q) => {
                return Err(ApiError::Configuration(format!(
                    "quarter must be between 1 and 4, got {q}"
                )))
            }
        };

        let language = match self.language {
            Some(code) => code.parse()?,
            None => Language::default(),
        };

        Ok(SearchCondition {
            year: self.year,
            area: self.area,
            city: self.city,
            quarter,
            language,
        })
    }
}
