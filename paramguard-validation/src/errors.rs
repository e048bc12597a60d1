// Violations, results and validation errors

use crate::{BindError, MessageKey};
use paramguard_i18n::I18nError;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// What went wrong with a field, with the parameters its message needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    Mandatory,
    InvalidType,
    InvalidFormat,
    InvalidEmail,
    InvalidUrl,
    TooShort { min_size: usize },
    TooLong { max_size: usize },
    TooSmall { min_value: f64 },
    TooBig { max_value: f64 },
    InvalidValue,
    TooManyLines { max_lines: usize },
    /// A list element failed; `message` is that element's rendered message.
    InvalidElement { index: usize, message: String },
}

impl ViolationKind {
    pub fn key(&self) -> MessageKey {
        match self {
            ViolationKind::Mandatory => MessageKey::ParamIsMandatory,
            ViolationKind::InvalidType => MessageKey::ParamHasInvalidType,
            ViolationKind::InvalidFormat => MessageKey::ParamHasInvalidFormat,
            ViolationKind::InvalidEmail => MessageKey::ParamHasInvalidEmail,
            ViolationKind::InvalidUrl => MessageKey::ParamHasInvalidUrl,
            ViolationKind::TooShort { .. } => MessageKey::ParamIsTooShort,
            ViolationKind::TooLong { .. } => MessageKey::ParamIsTooLong,
            ViolationKind::TooSmall { .. } => MessageKey::ParamIsTooSmall,
            ViolationKind::TooBig { .. } => MessageKey::ParamIsTooBig,
            ViolationKind::InvalidValue => MessageKey::ParamHasInvalidValue,
            ViolationKind::TooManyLines { .. } => MessageKey::ParamHasTooMuchLines,
            ViolationKind::InvalidElement { .. } => MessageKey::ListItemHasInvalidElement,
        }
    }

    /// Template parameters other than `name`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            ViolationKind::TooShort { min_size } => vec![("minsize", min_size.to_string())],
            ViolationKind::TooLong { max_size } => vec![("maxsize", max_size.to_string())],
            ViolationKind::TooSmall { min_value } => vec![("minvalue", min_value.to_string())],
            ViolationKind::TooBig { max_value } => vec![("maxvalue", max_value.to_string())],
            ViolationKind::TooManyLines { max_lines } => vec![("maxlines", max_lines.to_string())],
            ViolationKind::InvalidElement { message, .. } => vec![("message", message.clone())],
            _ => Vec::new(),
        }
    }
}

/// One field-level failure, before localization.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    field: String,
    label: Option<String>,
    kind: ViolationKind,
}

impl Violation {
    /// Create a violation. Without a label the message uses the anonymous
    /// subject of the locale instead of a name.
    pub fn new(field: impl Into<String>, label: Option<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            label,
            kind,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> &ViolationKind {
        &self.kind
    }

    pub fn message_key(&self) -> MessageKey {
        self.kind.key()
    }

    /// Name shown in the message: the label, or the field name.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }

    pub fn is_anonymous(&self) -> bool {
        self.label.is_none()
    }

    /// All template parameters, `name` included.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params: BTreeMap<_, _> = self.kind.params().into_iter().collect();
        params.insert("name", self.display_name().to_string());
        params
    }

    /// Rendered message of the failing list element, if any.
    pub fn nested_message(&self) -> Option<&str> {
        match &self.kind {
            ViolationKind::InvalidElement { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Outcome of one validation call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    messages: Vec<String>,
    total_count: usize,
    overflow_notice: String,
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// A result without violations.
    pub fn success() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        messages: Vec<String>,
        violations: Vec<Violation>,
        overflow_notice: String,
    ) -> Self {
        Self {
            messages,
            total_count: violations.len(),
            overflow_notice,
            violations,
        }
    }

    pub fn is_success(&self) -> bool {
        self.total_count == 0
    }

    /// Rendered messages in field order, capped to the display limit.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// True number of violations, regardless of the display cap.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// The "and N more" notice, empty when nothing was left out.
    pub fn overflow_notice(&self) -> &str {
        &self.overflow_notice
    }

    /// Every violation, including the ones beyond the display cap.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Messages joined into one line, followed by the overflow notice.
    pub fn summary(&self) -> String {
        let mut summary = self.messages.join(". ");
        summary.push_str(&self.overflow_notice);
        summary
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "messages": self.messages,
            "total_count": self.total_count,
            "summary": self.summary(),
        })
    }
}

/// Value-level validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError(pub ValidationResult);

impl ValidationError {
    pub fn result(&self) -> &ValidationResult {
        &self.0
    }

    pub fn into_result(self) -> ValidationResult {
        self.0
    }

    pub fn messages(&self) -> &[String] {
        self.0.messages()
    }

    pub fn total_count(&self) -> usize {
        self.0.total_count()
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.0.to_json()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.summary())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationResult> for ValidationError {
    fn from(result: ValidationResult) -> Self {
        Self(result)
    }
}

/// Any failure of a checking call.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("message catalog error: {0}")]
    Catalog(#[from] I18nError),

    #[error("argument binding failed: {0}")]
    Binding(#[from] BindError),

    #[error("malformed input: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl CheckError {
    /// The validation failure, if that is what this is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CheckError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_params() {
        assert_eq!(
            ViolationKind::TooSmall { min_value: 3.0 }.params(),
            vec![("minvalue", "3".to_string())]
        );
        assert_eq!(
            ViolationKind::TooBig { max_value: 2.5 }.params(),
            vec![("maxvalue", "2.5".to_string())]
        );
        assert!(ViolationKind::Mandatory.params().is_empty());
        assert_eq!(ViolationKind::TooManyLines { max_lines: 2 }.key().as_str(), "PARAM_HAS_TOO_MUCH_LINES");
    }

    #[test]
    fn test_violation_params_include_name() {
        let v = Violation::new("token", Some("Token".into()), ViolationKind::TooShort { min_size: 8 });
        let params = v.params();
        assert_eq!(params["name"], "Token");
        assert_eq!(params["minsize"], "8");
        assert!(!v.is_anonymous());
        assert_eq!(v.nested_message(), None);

        let anonymous = Violation::new("token", None, ViolationKind::Mandatory);
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.display_name(), "token");
    }

    #[test]
    fn test_result_summary_and_json() {
        let result = ValidationResult::new(
            vec!["'a' is mandatory".into(), "'b' is mandatory".into()],
            vec![
                Violation::new("a", Some("a".into()), ViolationKind::Mandatory),
                Violation::new("b", Some("b".into()), ViolationKind::Mandatory),
                Violation::new("c", Some("c".into()), ViolationKind::Mandatory),
            ],
            " ...and 1 more validation error".into(),
        );

        assert!(!result.is_success());
        assert_eq!(result.total_count(), 3);
        assert_eq!(
            result.summary(),
            "'a' is mandatory. 'b' is mandatory ...and 1 more validation error"
        );

        let json = result.to_json();
        assert_eq!(json["total_count"], 3);
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_validation_error_display() {
        let result = ValidationResult::new(
            vec!["It is mandatory".into()],
            vec![Violation::new("a", None, ViolationKind::Mandatory)],
            String::new(),
        );
        let err = ValidationError::from(result);
        assert_eq!(err.to_string(), "It is mandatory");
        assert_eq!(err.total_count(), 1);

        let check: CheckError = err.into();
        assert!(check.as_validation().is_some());
        assert_eq!(check.to_string(), "It is mandatory");
    }

    #[test]
    fn test_success() {
        let result = ValidationResult::success();
        assert!(result.is_success());
        assert_eq!(result.summary(), "");
    }
}
