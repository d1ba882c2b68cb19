use serde::Deserialize;
use sqlx::types::BigDecimal;
use std::fmt;
use std::str::FromStr;

use crate::domain::{fits_money_scale, MONEY_SCALE};

pub const AMOUNT_INPUT_MAX_LEN: usize = 64;
pub const AMOUNT_MAX_INTEGER_DIGITS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Amounts arrive either as JSON strings (`"50.00"`) or bare numbers (`50`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    fn raw(&self) -> String {
        match self {
            AmountInput::Text(value) => value.clone(),
            AmountInput::Number(value) => value.to_string(),
        }
    }
}

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Parse a monetary amount into a decimal the money columns can hold.
///
/// Sign is not checked here; non-positive amounts are rejected by the ledger.
pub fn parse_amount(input: &AmountInput) -> Result<BigDecimal, ValidationError> {
    let raw = sanitize_string(&input.raw());
    validate_required("amount", &raw)?;
    validate_max_len("amount", &raw, AMOUNT_INPUT_MAX_LEN)?;

    if raw.contains(['e', 'E']) {
        return Err(ValidationError::new("amount", "must be a plain decimal number"));
    }

    let amount = BigDecimal::from_str(&raw)
        .map_err(|_| ValidationError::new("amount", "must be a decimal number"))?;

    if !fits_money_scale(&amount) {
        return Err(ValidationError::new(
            "amount",
            format!("must have at most {} decimal places", MONEY_SCALE),
        ));
    }

    if amount.abs().with_scale(0).digits() > AMOUNT_MAX_INTEGER_DIGITS {
        return Err(ValidationError::new("amount", "is too large"));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AmountInput {
        AmountInput::Text(value.to_string())
    }

    #[test]
    fn test_parse_amount_accepts_strings_and_numbers() {
        assert_eq!(parse_amount(&text("50.00")).unwrap(), BigDecimal::from(50));
        assert_eq!(parse_amount(&text(" 12.5 ")).unwrap(), "12.5".parse::<BigDecimal>().unwrap());

        let number: AmountInput = serde_json::from_str("75").unwrap();
        assert_eq!(parse_amount(&number).unwrap(), BigDecimal::from(75));

        let number: AmountInput = serde_json::from_str("0.25").unwrap();
        assert_eq!(parse_amount(&number).unwrap(), "0.25".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn test_parse_amount_leaves_sign_to_the_ledger() {
        assert_eq!(parse_amount(&text("-5")).unwrap(), BigDecimal::from(-5));
        assert_eq!(parse_amount(&text("0")).unwrap(), BigDecimal::from(0));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        let err = parse_amount(&text("ten dollars")).unwrap_err();
        assert_eq!(err.field, "amount");

        assert!(parse_amount(&text("")).is_err());
        assert!(parse_amount(&text("1e3")).is_err());
    }

    #[test]
    fn test_parse_amount_rejects_sub_cent_precision() {
        let err = parse_amount(&text("10.005")).unwrap_err();
        assert!(err.message.contains("decimal places"));

        // Trailing zeros beyond two places are harmless.
        assert_eq!(parse_amount(&text("10.500")).unwrap(), "10.5".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn test_parse_amount_rejects_oversized_values() {
        assert!(parse_amount(&text("12345678901234567")).is_err());
        assert!(parse_amount(&text(&"9".repeat(80))).is_err());
        assert!(parse_amount(&text("1234567890123456")).is_ok());
    }

    #[test]
    fn test_sanitize_string_strips_control_chars() {
        assert_eq!(sanitize_string("  4  2\u{7} "), "4 2");
    }
}
