//! Payload validation.
//!
//! Each validator takes the raw JSON body and either returns a typed payload
//! or a [`ValidationErrors`] map keyed by field name. All rule failures of a
//! body are collected before returning, so clients see every problem at once.

pub mod product;
pub mod user;

pub use product::{validate_create_product, validate_update_product};
pub use user::{validate_create_user, validate_login, validate_update_user};

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// Hardcoded regex pattern - guaranteed to be valid at compile time
#[allow(clippy::unwrap_used)]
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .unwrap()
});

/// Pseudo-field used for errors about the body as a whole.
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for messages in self.errors.values() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Reads fields out of a JSON object while accumulating rule failures.
///
/// Every reader returns `None` when the field is absent or invalid; the
/// failure (if any) is recorded and surfaces from [`Fields::finish`].
pub(crate) struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> Self {
        let mut errors = ValidationErrors::new();
        let object = body.as_object();
        if object.is_none() {
            errors.add(BODY_FIELD, "The request body must be a JSON object");
        }
        Fields { object, errors }
    }

    /// `null` counts as not provided.
    fn value(&self, field: &str) -> Option<&'a Value> {
        self.object
            .and_then(|object| object.get(field))
            .filter(|value| !value.is_null())
    }

    /// First of `names` present in the body, else the first name.
    pub fn resolve(&self, names: &[&'static str]) -> &'static str {
        names
            .iter()
            .copied()
            .find(|name| self.value(name).is_some())
            .or_else(|| names.first().copied())
            .unwrap_or(BODY_FIELD)
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    fn missing(&mut self, field: &str) {
        self.error(field, format!("The {} field must be defined", field));
    }

    pub fn string(&mut self, field: &str, required: bool) -> Option<String> {
        match self.value(field) {
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.error(field, format!("The {} field must be a string", field));
                None
            }
            None => {
                if required {
                    self.missing(field);
                }
                None
            }
        }
    }

    pub fn number(&mut self, field: &str, required: bool) -> Option<Decimal> {
        let parsed = match self.value(field) {
            Some(Value::Number(number)) => parse_decimal(&number.to_string()),
            Some(Value::String(raw)) => parse_decimal(raw.trim()),
            Some(_) => None,
            None => {
                if required {
                    self.missing(field);
                }
                return None;
            }
        };

        if parsed.is_none() {
            self.error(field, format!("The {} field must be a number", field));
        }
        parsed
    }

    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let parsed = match self.value(field)? {
            Value::Bool(value) => Some(*value),
            Value::Number(number) => match number.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(raw) => match raw.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };

        if parsed.is_none() {
            self.error(field, format!("The {} field must be a boolean", field));
        }
        parsed
    }

    pub fn length(&mut self, field: &str, value: String, min: usize, max: usize) -> Option<String> {
        let count = value.chars().count();
        if count < min {
            self.error(
                field,
                format!("The {} field must have at least {} characters", field, min),
            );
            return None;
        }
        if count > max {
            self.error(
                field,
                format!(
                    "The {} field must not be greater than {} characters",
                    field, max
                ),
            );
            return None;
        }
        Some(value)
    }

    /// Trims, lowercases and checks email syntax.
    pub fn email(&mut self, field: &str, value: String) -> Option<String> {
        let normalized = value.trim().to_lowercase();
        if !EMAIL_PATTERN.is_match(&normalized) {
            self.error(
                field,
                format!("The {} field must be a valid email address", field),
            );
            return None;
        }
        Some(normalized)
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> Option<Decimal> {
        if value <= Decimal::ZERO {
            self.error(field, format!("The {} field must be positive", field));
            return None;
        }
        Some(value)
    }

    /// Returns the value without trailing zeros.
    pub fn max_decimals(&mut self, field: &str, value: Decimal, max: u32) -> Option<Decimal> {
        let value = value.normalize();
        if value.scale() > max {
            self.error(
                field,
                format!("The {} field must have 0-{} decimal places", field, max),
            );
            return None;
        }
        Some(value)
    }

    pub fn non_negative_integer(&mut self, field: &str, value: Decimal) -> Option<i64> {
        if value < Decimal::ZERO {
            self.error(field, format!("The {} field must not be less than 0", field));
            return None;
        }
        let integer = if value.fract().is_zero() {
            value.trunc().to_i64()
        } else {
            None
        };
        if integer.is_none() {
            self.error(field, format!("The {} field must be an integer", field));
        }
        integer
    }

    /// Succeeds only when no rule failed and `build` can assemble the payload.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        build().ok_or_else(|| ValidationErrors::single(BODY_FIELD, "The request body is invalid"))
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Trim helper for string fields that are not passwords.
pub(crate) fn trimmed(value: String) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_body_is_rejected() {
        let body = json!([1, 2, 3]);
        let fields = Fields::new(&body);
        let err = fields.finish(|| Some(())).unwrap_err();
        assert!(err.field(BODY_FIELD).is_some());
    }

    #[test]
    fn null_is_treated_as_absent() {
        let body = json!({ "name": null });
        let mut fields = Fields::new(&body);
        assert_eq!(fields.string("name", false), None);
        assert!(fields.finish(|| Some(())).is_ok());
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let body = json!({ "a": "12.50", "b": 3, "c": "abc", "d": true });
        let mut fields = Fields::new(&body);
        assert_eq!(fields.number("a", true), Some(Decimal::from_str("12.50").unwrap()));
        assert_eq!(fields.number("b", true), Some(Decimal::from(3)));
        assert_eq!(fields.number("c", true), None);
        assert_eq!(fields.number("d", true), None);
        let err = fields.finish(|| Some(())).unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn booleans_accept_common_encodings() {
        let body = json!({ "a": true, "b": "false", "c": 1, "d": "yes" });
        let mut fields = Fields::new(&body);
        assert_eq!(fields.boolean("a"), Some(true));
        assert_eq!(fields.boolean("b"), Some(false));
        assert_eq!(fields.boolean("c"), Some(true));
        assert_eq!(fields.boolean("d"), None);
        assert_eq!(fields.boolean("missing"), None);
        let err = fields.finish(|| Some(())).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["d"]);
    }

    #[test]
    fn email_is_normalized() {
        let body = json!({});
        let mut fields = Fields::new(&body);
        assert_eq!(
            fields.email("email", "  Alice@Example.COM ".to_string()),
            Some("alice@example.com".to_string())
        );
        assert_eq!(fields.email("email", "not-an-email".to_string()), None);
        assert_eq!(fields.email("email", "a@b".to_string()), None);
    }

    #[test]
    fn decimal_places_ignore_trailing_zeros() {
        let body = json!({});
        let mut fields = Fields::new(&body);
        let value = Decimal::from_str("1.500").unwrap();
        let normalized = fields.max_decimals("price", value, 2).unwrap();
        assert_eq!(normalized.scale(), 1);
        assert_eq!(normalized, value);
        assert_eq!(
            fields.max_decimals("price", Decimal::from_str("1.505").unwrap(), 2),
            None
        );
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "first");
        errors.add("email", "second");
        assert_eq!(errors.to_string(), "second; first");
    }
}
