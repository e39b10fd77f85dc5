//! Input validation for the three raw form fields.

use crate::error::ValidationError;
use crate::types::{ConversionRequest, CurrencyCode};

/// Normalize and check the raw base code, target code and amount.
///
/// Checks run in field order, so the first bad field is the one reported.
pub fn validate(
    raw_base: &str,
    raw_target: &str,
    raw_amount: &str,
) -> Result<ConversionRequest, ValidationError> {
    let base = CurrencyCode::normalize(raw_base).ok_or(ValidationError::InvalidBaseCode)?;
    let target = CurrencyCode::normalize(raw_target).ok_or(ValidationError::InvalidTargetCode)?;
    let amount = parse_amount(raw_amount).ok_or(ValidationError::InvalidAmount)?;
    Ok(ConversionRequest {
        base,
        target,
        amount,
    })
}

fn parse_amount(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}
