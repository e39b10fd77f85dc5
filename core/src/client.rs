//! Stateless request builder and response parser for the latest-rates
//! endpoint.
//!
//! # Design
//! `RateClient` holds only the endpoint base URL and API key and carries no
//! mutable state between calls. `build_latest_rates` produces an
//! `HttpRequest`; `parse_latest_rates` consumes the matching `HttpResponse`
//! and classifies every failure. The caller executes the round-trip, which
//! keeps this module deterministic and lets the same code serve the async
//! `Converter` and the C ABI.

use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::ConversionError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ConversionRequest, ConversionResult};

const LATEST_PATH: &str = "/v1/latest";

#[derive(Debug, Clone)]
pub struct RateClient {
    config: ProviderConfig,
}

impl RateClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::from_config(ProviderConfig::new(base_url, api_key))
    }

    pub fn from_config(config: ProviderConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config: ProviderConfig { base_url, ..config },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Request the rate from `request.base` to `request.target` only.
    pub fn build_latest_rates(&self, request: &ConversionRequest) -> HttpRequest {
        let url = format!(
            "{}{LATEST_PATH}?apikey={}&base_currency={}&currencies={}",
            self.config.base_url,
            urlencoding::encode(&self.config.api_key),
            request.base,
            request.target,
        );
        tracing::debug!(base = %request.base, target = %request.target, "built latest-rates request");
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    pub fn parse_latest_rates(
        &self,
        request: &ConversionRequest,
        response: HttpResponse,
    ) -> Result<ConversionResult, ConversionError> {
        check_status(&response)?;

        let body: Value =
            serde_json::from_str(&response.body).map_err(|_| ConversionError::MalformedResponse)?;
        let rates = body
            .get("data")
            .and_then(Value::as_object)
            .ok_or(ConversionError::MalformedResponse)?;

        let currency = request.target.as_str();
        let raw = match rates.get(currency) {
            None | Some(Value::Null) => {
                return Err(ConversionError::CurrencyNotFound {
                    currency: currency.to_string(),
                })
            }
            Some(raw) => raw,
        };
        let rate = rate_value(raw).ok_or_else(|| ConversionError::InvalidRate {
            currency: currency.to_string(),
            value: raw.to_string(),
        })?;

        let result = ConversionResult::for_amount(request.amount, rate);
        if !(result.converted_amount.is_finite() && result.converted_amount > 0.0) {
            return Err(ConversionError::AmountOutOfRange);
        }
        Ok(result)
    }
}

/// Map non-success status codes to the appropriate `ConversionError`.
fn check_status(response: &HttpResponse) -> Result<(), ConversionError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        401 => Err(ConversionError::AuthError),
        429 => Err(ConversionError::RateLimited),
        status => Err(ConversionError::ServiceError { status }),
    }
}

/// A rate may arrive as a JSON number or a numeric string.
fn rate_value(raw: &Value) -> Option<f64> {
    let rate = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
