//! Request validation - turns loosely-typed client input into [`LoanTerms`].
//!
//! Every violated constraint is collected so the client can show all problems
//! at once. Field errors follow the `{loc, msg, type}` shape browser clients
//! already understand.

use crate::core::types::{LoanTerms, MINOR_UNIT, Money, Rate, round_money};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Raw create-scenario payload as sent by the client.
///
/// Fields are kept as JSON values so missing or mistyped fields are reported
/// as field errors rather than failing deserialization as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanRequest {
    /// Principal
    pub amount: Option<Value>,
    /// Annual percentage rate
    pub apr: Option<Value>,
    /// Number of monthly payments
    pub term_months: Option<Value>,
}

/// Upper bounds on accepted input, loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Largest accepted principal
    pub max_amount: Money,
    /// Largest accepted APR percentage
    pub max_apr: Rate,
    /// Longest accepted term, bounds schedule size
    pub max_term_months: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_amount: Decimal::from(1_000_000_000_u64),
            max_apr: Decimal::ONE_HUNDRED,
            max_term_months: 480,
        }
    }
}

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path to the offending value, e.g. `["body", "amount"]`
    pub loc: Vec<String>,
    /// Human-readable message
    pub msg: String,
    /// Machine-readable error kind
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Error on a field of the request body.
    #[must_use]
    pub fn body(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    /// Error on a path parameter.
    #[must_use]
    pub fn path(param: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec!["path".to_string(), param.to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    /// The last element of `loc`, the field name.
    #[must_use]
    pub fn field(&self) -> &str {
        self.loc.last().map_or("field", String::as_str)
    }
}

/// Validation failure rendered as the `detail` of a 422 response.
///
/// `Single` is used when no particular field can be blamed (for example an
/// unparsable body); it serializes as a bare string. `Batch` serializes as an
/// array of [`FieldError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ValidationError {
    /// One message not tied to a field
    Single(String),
    /// Every violated field constraint
    Batch(Vec<FieldError>),
}

impl ValidationError {
    /// Number of reported violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(errors) => errors.len(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(msg) => f.write_str(msg),
            Self::Batch(errors) => {
                for (index, error) in errors.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}: {}", error.field(), error.msg)?;
                }
                Ok(())
            }
        }
    }
}

fn number_to_decimal(number: &Number) -> Option<Decimal> {
    if let Some(value) = number.as_i64() {
        return Some(Decimal::from(value));
    }
    if let Some(value) = number.as_u64() {
        return Some(Decimal::from(value));
    }
    number.as_f64().and_then(Decimal::from_f64)
}

fn decimal_field(
    field: &str,
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
) -> Option<Decimal> {
    let parsed = match value {
        None => {
            errors.push(FieldError::body(field, "Field required", "missing"));
            return None;
        }
        Some(Value::Number(number)) => number_to_decimal(number),
        Some(Value::String(text)) => Decimal::from_str(text.trim()).ok(),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.push(FieldError::body(field, "Input should be a valid number", "float_type"));
    }
    parsed
}

fn integer_field(
    field: &str,
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let number = match value {
        None => {
            errors.push(FieldError::body(field, "Field required", "missing"));
            return None;
        }
        Some(Value::Number(number)) => number_to_decimal(number),
        Some(Value::String(text)) => Decimal::from_str(text.trim()).ok(),
        Some(_) => None,
    };

    let Some(number) = number else {
        errors.push(FieldError::body(field, "Input should be a valid integer", "int_type"));
        return None;
    };
    if !number.fract().is_zero() {
        errors.push(FieldError::body(
            field,
            "Input should be a valid integer, got a number with a fractional part",
            "int_from_float",
        ));
        return None;
    }

    let integer = number.to_i64();
    if integer.is_none() {
        errors.push(FieldError::body(field, "Input should be a valid integer", "int_type"));
    }
    integer
}

fn check_amount(
    amount: Decimal,
    limits: &ValidationLimits,
    errors: &mut Vec<FieldError>,
) -> Option<Money> {
    if amount <= Decimal::ZERO {
        errors.push(FieldError::body("amount", "Input should be greater than 0", "greater_than"));
        return None;
    }
    if amount > limits.max_amount {
        errors.push(FieldError::body(
            "amount",
            format!("Input should be less than or equal to {}", limits.max_amount),
            "less_than_equal",
        ));
        return None;
    }

    let rounded = round_money(amount);
    if rounded < MINOR_UNIT {
        errors.push(FieldError::body(
            "amount",
            format!("Input should be at least {MINOR_UNIT}"),
            "greater_than_equal",
        ));
        return None;
    }
    Some(rounded)
}

fn check_apr(
    apr: Decimal,
    limits: &ValidationLimits,
    errors: &mut Vec<FieldError>,
) -> Option<Rate> {
    if apr < Decimal::ZERO {
        errors.push(FieldError::body(
            "apr",
            "Input should be greater than or equal to 0",
            "greater_than_equal",
        ));
        return None;
    }
    if apr > limits.max_apr {
        errors.push(FieldError::body(
            "apr",
            format!("Input should be less than or equal to {}", limits.max_apr),
            "less_than_equal",
        ));
        return None;
    }
    Some(apr.normalize())
}

fn check_term(
    term_months: i64,
    limits: &ValidationLimits,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    if term_months < 1 {
        errors.push(FieldError::body(
            "term_months",
            "Input should be greater than or equal to 1",
            "greater_than_equal",
        ));
        return None;
    }
    match u32::try_from(term_months) {
        Ok(term) if term <= limits.max_term_months => Some(term),
        _ => {
            errors.push(FieldError::body(
                "term_months",
                format!("Input should be less than or equal to {}", limits.max_term_months),
                "less_than_equal",
            ));
            None
        }
    }
}

/// Validates a raw request against the configured limits.
///
/// Returns every violation in field order (`amount`, `apr`, `term_months`).
/// On success the amount is rounded half-up to cents.
pub fn validate_loan_request(
    request: &LoanRequest,
    limits: &ValidationLimits,
) -> Result<LoanTerms, ValidationError> {
    let mut errors = Vec::new();

    let amount = decimal_field("amount", request.amount.as_ref(), &mut errors)
        .and_then(|amount| check_amount(amount, limits, &mut errors));
    let apr = decimal_field("apr", request.apr.as_ref(), &mut errors)
        .and_then(|apr| check_apr(apr, limits, &mut errors));
    let term_months = integer_field("term_months", request.term_months.as_ref(), &mut errors)
        .and_then(|term| check_term(term, limits, &mut errors));

    match (amount, apr, term_months) {
        (Some(amount), Some(apr), Some(term_months)) if errors.is_empty() => Ok(LoanTerms {
            amount,
            apr,
            term_months,
        }),
        _ => Err(ValidationError::Batch(errors)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request(body: Value) -> LoanRequest {
        serde_json::from_value(body).unwrap()
    }

    fn batch(result: Result<LoanTerms, ValidationError>) -> Vec<FieldError> {
        match result.unwrap_err() {
            ValidationError::Batch(errors) => errors,
            ValidationError::Single(msg) => panic!("expected batch, got {msg}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let terms = validate_loan_request(
            &request(json!({"amount": 10000, "apr": 5.5, "term_months": 36})),
            &ValidationLimits::default(),
        )
        .unwrap();

        assert_eq!(terms.amount, dec!(10000));
        assert_eq!(terms.apr, dec!(5.5));
        assert_eq!(terms.term_months, 36);
    }

    #[test]
    fn test_amount_is_rounded_to_cents() {
        let terms = validate_loan_request(
            &request(json!({"amount": "1000.005", "apr": 0, "term_months": 12})),
            &ValidationLimits::default(),
        )
        .unwrap();
        assert_eq!(terms.amount, dec!(1000.01));
    }

    #[test]
    fn test_zero_amount_cites_amount() {
        let errors = batch(validate_loan_request(
            &request(json!({"amount": 0, "apr": 5, "term_months": 12})),
            &ValidationLimits::default(),
        ));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["body", "amount"]);
        assert_eq!(errors[0].kind, "greater_than");
    }

    #[test]
    fn test_errors_are_batched() {
        let errors = batch(validate_loan_request(
            &request(json!({"amount": -5, "apr": 5, "term_months": 0})),
            &ValidationLimits::default(),
        ));
        let fields: Vec<&str> = errors.iter().map(FieldError::field).collect();
        assert_eq!(fields, vec!["amount", "term_months"]);
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let errors = batch(validate_loan_request(
            &request(json!({"apr": "abc", "term_months": 12.5})),
            &ValidationLimits::default(),
        ));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field(), "amount");
        assert_eq!(errors[0].msg, "Field required");
        assert_eq!(errors[1].field(), "apr");
        assert_eq!(errors[1].kind, "float_type");
        assert_eq!(errors[2].field(), "term_months");
        assert_eq!(errors[2].kind, "int_from_float");
    }

    #[test]
    fn test_numeric_strings_and_integral_floats_are_accepted() {
        let terms = validate_loan_request(
            &request(json!({"amount": "2500.50", "apr": "4.25", "term_months": 24.0})),
            &ValidationLimits::default(),
        )
        .unwrap();
        assert_eq!(terms.amount, dec!(2500.50));
        assert_eq!(terms.apr, dec!(4.25));
        assert_eq!(terms.term_months, 24);
    }

    #[test]
    fn test_upper_bounds() {
        let limits = ValidationLimits::default();
        let errors = batch(validate_loan_request(
            &request(json!({"amount": 2_000_000_000, "apr": 150, "term_months": 481})),
            &limits,
        ));

        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.kind == "less_than_equal"));
        assert_eq!(errors[1].msg, "Input should be less than or equal to 100");
        assert_eq!(errors[2].msg, "Input should be less than or equal to 480");
    }

    #[test]
    fn test_negative_apr_and_sub_cent_amount() {
        let errors = batch(validate_loan_request(
            &request(json!({"amount": 0.001, "apr": -1, "term_months": 12})),
            &ValidationLimits::default(),
        ));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, "greater_than_equal");
        assert_eq!(errors[1].field(), "apr");
    }

    #[test]
    fn test_custom_limits() {
        let limits = ValidationLimits {
            max_amount: dec!(5000),
            max_apr: dec!(30),
            max_term_months: 60,
        };
        let errors = batch(validate_loan_request(
            &request(json!({"amount": 6000, "apr": 25, "term_months": 72})),
            &limits,
        ));
        let fields: Vec<&str> = errors.iter().map(FieldError::field).collect();
        assert_eq!(fields, vec!["amount", "term_months"]);
    }

    #[test]
    fn test_validation_error_serialization() {
        let single = ValidationError::Single("Request body is not valid JSON".to_string());
        assert_eq!(
            serde_json::to_value(&single).unwrap(),
            json!("Request body is not valid JSON")
        );

        let batch = ValidationError::Batch(vec![FieldError::body(
            "amount",
            "Field required",
            "missing",
        )]);
        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!([{"loc": ["body", "amount"], "msg": "Field required", "type": "missing"}])
        );
    }

    #[test]
    fn test_violation_count_and_single_display() {
        let single = ValidationError::Single("bad".to_string());
        assert_eq!(single.violation_count(), 1);
        assert_eq!(single.to_string(), "bad");

        let batch = ValidationError::Batch(vec![
            FieldError::body("amount", "Field required", "missing"),
            FieldError::body("apr", "Field required", "missing"),
        ]);
        assert_eq!(batch.violation_count(), 2);
    }

    #[test]
    fn test_batch_display() {
        let error = ValidationError::Batch(vec![
            FieldError::body("amount", "Input should be greater than 0", "greater_than"),
            FieldError::body("term_months", "Field required", "missing"),
        ]);
        assert_eq!(
            error.to_string(),
            "amount: Input should be greater than 0; term_months: Field required"
        );
    }
}
