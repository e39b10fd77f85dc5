//! Value objects for a single conversion attempt.
//!
//! # Design
//! All types here are created per submit and dropped after render. A
//! `CurrencyCode` can only be obtained through `CurrencyCode::normalize`, so
//! holding a `ConversionRequest` is proof that validation already ran.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A three-letter uppercase ASCII currency code such as `CAD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Trim and uppercase `raw`, returning `None` unless the result is
    /// exactly three ASCII letters.
    pub fn normalize(raw: &str) -> Option<Self> {
        let code = raw.trim().to_uppercase();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Some(Self(code))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value).ok_or_else(|| format!("invalid currency code: {value:?}"))
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A validated conversion: `amount` units of `base` into `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: f64,
}

/// The rate used and the amount it produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub rate: f64,
    pub converted_amount: f64,
}

impl ConversionResult {
    pub fn for_amount(amount: f64, rate: f64) -> Self {
        Self {
            rate,
            converted_amount: amount * rate,
        }
    }
}

/// A completed conversion paired with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub request: ConversionRequest,
    pub result: ConversionResult,
}

impl ConversionSummary {
    /// `"100 CAD = 74.00 USD"`
    pub fn headline(&self) -> String {
        format!(
            "{} {} = {:.2} {}",
            self.request.amount, self.request.base, self.result.converted_amount, self.request.target
        )
    }

    /// `"Used rate: 1 CAD = 0.7400 USD"`
    pub fn rate_line(&self) -> String {
        format!(
            "Used rate: 1 {} = {:.4} {}",
            self.request.base, self.result.rate, self.request.target
        )
    }
}
