//! Synchronous client for the Real Estate Information Library transaction API.
//!
//! # Overview
//! Turns a validated `SearchCondition` into a request for the XIT001
//! endpoint, executes it with the subscription key header, decodes the
//! (possibly gzip-compressed) JSON response, and maps each raw record into a
//! typed `Transaction`.
//!
//! # Design
//! - `ReinfoClient` holds only its `ClientConfig` and a `Transport`.
//! - Request building and response parsing are pure (`build_search_request`,
//!   `parse_search_response`); `Transport::execute` is the single I/O seam.
//! - Field parsing is lenient: unparsable numbers become `None`, except for
//!   `transaction_price` and `area`, which fall back to zero.
//!
//! ```no_run
//! use reinfolib_core::{ReinfoClient, SearchCondition};
//!
//! # fn main() -> Result<(), reinfolib_core::ApiError> {
//! let client = ReinfoClient::from_env()?;
//! let condition = SearchCondition::builder(2024).area("13").quarter(1).build()?;
//! for transaction in client.search_transactions(&condition)? {
//!     println!("{} {}", transaction.city, transaction.trade_price());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod http;
pub mod parser;
pub mod transport;
pub mod types;

pub use client::{decode_response, ReinfoClient};
pub use condition::{Language, SearchCondition, SearchConditionBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use parser::{parse_transaction, parse_transactions};
pub use transport::{Transport, UreqTransport};
pub use types::{TradePrice, Transaction, DEFAULT_USD_RATE};
