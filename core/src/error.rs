//! Error types for input validation, rate conversion and configuration.
//!
//! # Design
//! Every variant carries the exact message shown to the user, so the
//! boundary can render any failure with `to_string()`. Validation failures
//! and conversion failures are separate enums because they come from
//! different stages: validation never touches the network, conversion only
//! runs once validation has succeeded. `FxError` joins the two for callers
//! that drive the whole workflow.

use thiserror::Error;

/// Shown when a failure carries no usable message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong while fetching exchange rates.";

/// Rejections produced by `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Base currency must be a 3-letter uppercase code (for example CAD).")]
    InvalidBaseCode,

    #[error("Destination currency must be a 3-letter uppercase code.")]
    InvalidTargetCode,

    #[error("Amount needs to be a positive number.")]
    InvalidAmount,
}

/// Failures of a single conversion attempt, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The request never produced an HTTP response.
    #[error("{}", network_message(.0))]
    NetworkError(String),

    /// The provider answered 401.
    #[error("The API key looks invalid or missing.")]
    AuthError,

    /// The provider answered 429.
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("The currency service returned an unexpected error.")]
    ServiceError { status: u16 },

    /// The body was not JSON or had no `data` object.
    #[error("Unexpected response from the currency API.")]
    MalformedResponse,

    /// `data` had no entry for the requested currency.
    #[error("Destination currency was not found in the API result.")]
    CurrencyNotFound { currency: String },

    /// `data` had an entry for the currency but it is not a positive number.
    #[error("The currency API returned an unusable rate for {currency}.")]
    InvalidRate { currency: String, value: String },

    /// `amount × rate` overflowed to infinity or underflowed to zero.
    #[error("The converted amount is too large or too small to show.")]
    AmountOutOfRange,
}

fn network_message(message: &str) -> &str {
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE
    } else {
        message
    }
}

/// Either stage of the workflow failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Failure executing an `HttpRequest`; no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for ConversionError {
    fn from(err: TransportError) -> Self {
        ConversionError::NetworkError(err.message)
    }
}

/// Problems loading `ProviderConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing {0} in environment (.env)")]
    MissingApiKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_passes_message_through() {
        let err = ConversionError::NetworkError("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn empty_network_message_falls_back_to_generic() {
        let err = ConversionError::NetworkError("  ".to_string());
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn fx_error_is_transparent() {
        let err: FxError = ValidationError::InvalidAmount.into();
        assert_eq!(err.to_string(), "Amount needs to be a positive number.");

        let err: FxError = ConversionError::RateLimited.into();
        assert_eq!(
            err.to_string(),
            "Too many requests. Please wait a moment and try again."
        );
    }

    #[test]
    fn transport_error_becomes_network_error() {
        let err: ConversionError = TransportError::new("dns failure").into();
        assert_eq!(err, ConversionError::NetworkError("dns failure".to_string()));
    }
}
