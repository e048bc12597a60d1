// Type coercion

use crate::{Coerce, TypeTag};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:https?|ftp)://[^\s/$.?#][^\s]*$").unwrap());

/// A raw value after coercion to its rule's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<Value>),
}

impl Coerced {
    /// Length for size bounds: characters for text, elements for lists.
    pub fn size(&self) -> Option<usize> {
        match self {
            Coerced::Text(s) => Some(s.chars().count()),
            Coerced::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Numeric value for value bounds.
    pub fn number(&self) -> Option<f64> {
        match self {
            Coerced::Integer(i) => Some(*i as f64),
            Coerced::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Textual form of a scalar, used for pattern matching.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Coerced::Text(s) => Some(Cow::Borrowed(s)),
            Coerced::Integer(i) => Some(Cow::Owned(i.to_string())),
            Coerced::Float(f) => Some(Cow::Owned(f.to_string())),
            Coerced::Boolean(b) => Some(Cow::Owned(b.to_string())),
            Coerced::List(_) => None,
        }
    }

    /// Number of lines in a text value.
    pub fn line_count(&self) -> Option<usize> {
        match self {
            Coerced::Text(s) => Some(s.lines().count()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Coerced::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Why a value could not be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionFailure {
    /// Wrong shape for the type
    InvalidType,
    /// Text that is not an e-mail address
    InvalidEmail,
    /// Text that is not a URL
    InvalidUrl,
    /// Right shape, unacceptable value (e.g. a negative "positive")
    InvalidValue,
}

/// Coercion rules used when no custom [`Coerce`] is installed.
///
/// Numeric strings are accepted for numeric types, scalars are accepted for
/// `string`, and `boolean` understands `true/false/1/0/yes/no`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCoercer;

impl DefaultCoercer {
    fn infer(value: &Value) -> Result<Coerced, CoercionFailure> {
        match value {
            Value::String(s) => Ok(Coerced::Text(s.clone())),
            Value::Bool(b) => Ok(Coerced::Boolean(*b)),
            Value::Number(_) => Self::numeric(value),
            Value::Array(items) => Ok(Coerced::List(items.clone())),
            Value::Null | Value::Object(_) => Err(CoercionFailure::InvalidType),
        }
    }

    fn text(value: &Value) -> Result<Coerced, CoercionFailure> {
        match value {
            Value::String(s) => Ok(Coerced::Text(s.clone())),
            Value::Number(n) => Ok(Coerced::Text(n.to_string())),
            Value::Bool(b) => Ok(Coerced::Text(b.to_string())),
            _ => Err(CoercionFailure::InvalidType),
        }
    }

    fn numeric(value: &Value) -> Result<Coerced, CoercionFailure> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Coerced::Integer(i)),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(Coerced::Float)
                    .ok_or(CoercionFailure::InvalidType),
            },
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    Ok(Coerced::Integer(i))
                } else {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(Coerced::Float)
                        .ok_or(CoercionFailure::InvalidType)
                }
            }
            _ => Err(CoercionFailure::InvalidType),
        }
    }

    fn integer(value: &Value) -> Result<Coerced, CoercionFailure> {
        match Self::numeric(value)? {
            Coerced::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(Coerced::Integer(f as i64))
            }
            Coerced::Integer(i) => Ok(Coerced::Integer(i)),
            _ => Err(CoercionFailure::InvalidType),
        }
    }

    fn float(value: &Value) -> Result<Coerced, CoercionFailure> {
        Self::numeric(value).map(|c| match c {
            Coerced::Integer(i) => Coerced::Float(i as f64),
            other => other,
        })
    }

    fn boolean(value: &Value) -> Result<Coerced, CoercionFailure> {
        match value {
            Value::Bool(b) => Ok(Coerced::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Coerced::Boolean(false)),
                Some(1) => Ok(Coerced::Boolean(true)),
                _ => Err(CoercionFailure::InvalidType),
            },
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Coerced::Boolean(true)),
                "false" | "0" | "no" => Ok(Coerced::Boolean(false)),
                _ => Err(CoercionFailure::InvalidType),
            },
            _ => Err(CoercionFailure::InvalidType),
        }
    }

    fn signed(value: &Value, positive: bool) -> Result<Coerced, CoercionFailure> {
        let coerced = Self::numeric(value)?;
        let n = coerced.number().ok_or(CoercionFailure::InvalidType)?;
        if (positive && n > 0.0) || (!positive && n < 0.0) {
            Ok(coerced)
        } else {
            Err(CoercionFailure::InvalidValue)
        }
    }

    fn formatted(value: &Value, regex: &Regex, failure: CoercionFailure) -> Result<Coerced, CoercionFailure> {
        match value {
            Value::String(s) if regex.is_match(s.trim()) => Ok(Coerced::Text(s.trim().to_string())),
            _ => Err(failure),
        }
    }
}

impl Coerce for DefaultCoercer {
    fn coerce(&self, value: &Value, tag: Option<TypeTag>) -> Result<Coerced, CoercionFailure> {
        match tag {
            None => Self::infer(value),
            Some(TypeTag::String) => Self::text(value),
            Some(TypeTag::Integer) => Self::integer(value),
            Some(TypeTag::Float) => Self::float(value),
            Some(TypeTag::Boolean) => Self::boolean(value),
            Some(TypeTag::Email) => Self::formatted(value, &EMAIL_REGEX, CoercionFailure::InvalidEmail),
            Some(TypeTag::Url) => Self::formatted(value, &URL_REGEX, CoercionFailure::InvalidUrl),
            Some(TypeTag::Positive) => Self::signed(value, true),
            Some(TypeTag::Negative) => Self::signed(value, false),
            Some(TypeTag::List) => match value {
                Value::Array(items) => Ok(Coerced::List(items.clone())),
                _ => Err(CoercionFailure::InvalidType),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce(value: Value, tag: TypeTag) -> Result<Coerced, CoercionFailure> {
        DefaultCoercer.coerce(&value, Some(tag))
    }

    #[test]
    fn test_infer_without_type() {
        assert_eq!(DefaultCoercer.coerce(&json!("x"), None), Ok(Coerced::Text("x".into())));
        assert_eq!(DefaultCoercer.coerce(&json!(3), None), Ok(Coerced::Integer(3)));
        assert_eq!(DefaultCoercer.coerce(&json!(2.5), None), Ok(Coerced::Float(2.5)));
        assert_eq!(DefaultCoercer.coerce(&json!([1]), None), Ok(Coerced::List(vec![json!(1)])));
        assert_eq!(DefaultCoercer.coerce(&json!({"a": 1}), None), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_string_accepts_scalars() {
        assert_eq!(coerce(json!(42), TypeTag::String), Ok(Coerced::Text("42".into())));
        assert_eq!(coerce(json!(true), TypeTag::String), Ok(Coerced::Text("true".into())));
        assert_eq!(coerce(json!(["a"]), TypeTag::String), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_integer() {
        assert_eq!(coerce(json!(" 12 "), TypeTag::Integer), Ok(Coerced::Integer(12)));
        assert_eq!(coerce(json!(4.0), TypeTag::Integer), Ok(Coerced::Integer(4)));
        assert_eq!(coerce(json!(4.5), TypeTag::Integer), Err(CoercionFailure::InvalidType));
        assert_eq!(coerce(json!("twelve"), TypeTag::Integer), Err(CoercionFailure::InvalidType));
        assert_eq!(coerce(json!(true), TypeTag::Integer), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_float() {
        assert_eq!(coerce(json!(3), TypeTag::Float), Ok(Coerced::Float(3.0)));
        assert_eq!(coerce(json!("1.25"), TypeTag::Float), Ok(Coerced::Float(1.25)));
        assert_eq!(coerce(json!("inf"), TypeTag::Float), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(coerce(json!("Yes"), TypeTag::Boolean), Ok(Coerced::Boolean(true)));
        assert_eq!(coerce(json!(0), TypeTag::Boolean), Ok(Coerced::Boolean(false)));
        assert_eq!(coerce(json!("maybe"), TypeTag::Boolean), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_positive_and_negative() {
        assert_eq!(coerce(json!(1), TypeTag::Positive), Ok(Coerced::Integer(1)));
        assert_eq!(coerce(json!("0.5"), TypeTag::Positive), Ok(Coerced::Float(0.5)));
        assert_eq!(coerce(json!(0), TypeTag::Positive), Err(CoercionFailure::InvalidValue));
        assert_eq!(coerce(json!(-2), TypeTag::Positive), Err(CoercionFailure::InvalidValue));
        assert_eq!(coerce(json!(-2), TypeTag::Negative), Ok(Coerced::Integer(-2)));
        assert_eq!(coerce(json!(2), TypeTag::Negative), Err(CoercionFailure::InvalidValue));
        assert_eq!(coerce(json!("abc"), TypeTag::Negative), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_email() {
        assert!(coerce(json!("user+tag@example.co.uk"), TypeTag::Email).is_ok());
        assert_eq!(coerce(json!("not-an-email"), TypeTag::Email), Err(CoercionFailure::InvalidEmail));
        assert_eq!(coerce(json!("user@localhost"), TypeTag::Email), Err(CoercionFailure::InvalidEmail));
        assert_eq!(coerce(json!(12), TypeTag::Email), Err(CoercionFailure::InvalidEmail));
    }

    #[test]
    fn test_url() {
        assert!(coerce(json!("https://example.com/path?q=1"), TypeTag::Url).is_ok());
        assert!(coerce(json!("HTTP://localhost:8080"), TypeTag::Url).is_ok());
        assert_eq!(coerce(json!("example.com"), TypeTag::Url), Err(CoercionFailure::InvalidUrl));
        assert_eq!(coerce(json!("http://"), TypeTag::Url), Err(CoercionFailure::InvalidUrl));
    }

    #[test]
    fn test_list() {
        assert_eq!(coerce(json!([]), TypeTag::List), Ok(Coerced::List(vec![])));
        assert_eq!(coerce(json!("a,b"), TypeTag::List), Err(CoercionFailure::InvalidType));
    }

    #[test]
    fn test_coerced_helpers() {
        assert_eq!(Coerced::Text("añb".into()).size(), Some(3));
        assert_eq!(Coerced::List(vec![json!(1), json!(2)]).size(), Some(2));
        assert_eq!(Coerced::Integer(5).size(), None);
        assert_eq!(Coerced::Integer(5).number(), Some(5.0));
        assert_eq!(Coerced::Float(2.5).text().as_deref(), Some("2.5"));
        assert_eq!(Coerced::Text("a\nb\nc".into()).line_count(), Some(3));
        assert_eq!(Coerced::List(vec![]).text(), None);
    }
}
