//! Currency conversion core.
//!
//! # Overview
//! Validates the three raw inputs of a conversion form, builds the request
//! for the latest-rates endpoint, parses its response into a rate and a
//! converted amount, and classifies every failure into a user-facing
//! message.
//!
//! # Design
//! - `validate` is pure and synchronous.
//! - `RateClient` splits the endpoint call into `build_latest_rates` and
//!   `parse_latest_rates`, so the I/O boundary is explicit and the C ABI can
//!   let the host perform the request.
//! - `Converter` runs that round-trip over any `HttpTransport` (reqwest in
//!   production) and keeps no state between calls.
//! - `ConverterForm` is the only stateful piece: it owns the busy flag and
//!   the result slot for one screen.

pub mod client;
pub mod config;
pub mod converter;
pub mod error;
pub mod form;
pub mod http;
pub mod types;
pub mod validate;

pub use client::RateClient;
pub use config::ProviderConfig;
pub use converter::Converter;
pub use error::{
    ConfigError, ConversionError, FxError, TransportError, ValidationError, GENERIC_FAILURE_MESSAGE,
};
pub use form::{run_conversion, ConverterForm, Outcome, Phase, Submission, SubmitRejected, Ticket};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{ConversionRequest, ConversionResult, ConversionSummary, CurrencyCode};
pub use validate::validate;
