// Built-in field checks

use crate::{
    Coerce, Coerced, CoercionFailure, Pattern, RuleSpec, TypeTag, ValidationContext, Violation,
    ViolationKind,
};
use paramguard_i18n::I18nError;
use paramguard_log::trace;
use serde_json::Value;

/// Whether a value counts as not given: missing, `null`, blank text or an
/// empty list.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Rejects blank values of mandatory fields
pub struct Presence;

impl Presence {
    pub fn validate(value: Option<&Value>, mandatory: bool) -> Result<(), ViolationKind> {
        if mandatory && is_blank(value) {
            Err(ViolationKind::Mandatory)
        } else {
            Ok(())
        }
    }
}

/// Coerces a value to its rule's type
pub struct TypeCheck;

impl TypeCheck {
    pub fn validate(
        coercer: &dyn Coerce,
        value: &Value,
        tag: Option<TypeTag>,
    ) -> Result<Coerced, ViolationKind> {
        coercer.coerce(value, tag).map_err(|failure| match failure {
            CoercionFailure::InvalidType => ViolationKind::InvalidType,
            CoercionFailure::InvalidEmail => ViolationKind::InvalidEmail,
            CoercionFailure::InvalidUrl => ViolationKind::InvalidUrl,
            CoercionFailure::InvalidValue => ViolationKind::InvalidValue,
        })
    }
}

/// Validates text length in characters, or list length in elements
pub struct SizeBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl SizeBounds {
    pub fn validate(&self, value: &Coerced) -> Result<(), ViolationKind> {
        let Some(size) = value.size() else {
            return Ok(());
        };
        if let Some(min_size) = self.min.filter(|min| size < *min) {
            return Err(ViolationKind::TooShort { min_size });
        }
        if let Some(max_size) = self.max.filter(|max| size > *max) {
            return Err(ViolationKind::TooLong { max_size });
        }
        Ok(())
    }
}

/// Validates a number against inclusive bounds
pub struct ValueBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueBounds {
    pub fn validate(&self, value: &Coerced) -> Result<(), ViolationKind> {
        let Some(n) = value.number() else {
            return Ok(());
        };
        if let Some(min_value) = self.min.filter(|min| n < *min) {
            return Err(ViolationKind::TooSmall { min_value });
        }
        if let Some(max_value) = self.max.filter(|max| n > *max) {
            return Err(ViolationKind::TooBig { max_value });
        }
        Ok(())
    }
}

/// Validates that the textual form of a scalar fully matches a pattern
pub struct PatternCheck<'a>(pub &'a Pattern);

impl PatternCheck<'_> {
    pub fn validate(&self, value: &Coerced) -> Result<(), ViolationKind> {
        match value.text() {
            Some(text) if !self.0.is_full_match(&text) => Err(ViolationKind::InvalidFormat),
            _ => Ok(()),
        }
    }
}

/// Validates the number of lines of a text
pub struct LineCount(pub usize);

impl LineCount {
    pub fn validate(&self, value: &Coerced) -> Result<(), ViolationKind> {
        match value.line_count() {
            Some(lines) if lines > self.0 => Err(ViolationKind::TooManyLines { max_lines: self.0 }),
            _ => Ok(()),
        }
    }
}

/// Validates every element of a list against the element rule
///
/// Stops at the first failing element. Its message is rendered right away
/// under the name `base[index]` and carried by the returned kind.
pub struct ElementCheck<'a> {
    pub base: &'a str,
    pub rule: &'a RuleSpec,
}

impl ElementCheck<'_> {
    pub fn validate(
        &self,
        ctx: &ValidationContext<'_>,
        items: &[Value],
    ) -> Result<Result<(), ViolationKind>, I18nError> {
        for (index, item) in items.iter().enumerate() {
            if let Err(kind) = run_checks(ctx.coercer(), Some(item), self.rule) {
                let name = format!("{}[{}]", self.base, index);
                trace!("element {} failed: {}", name, kind.key());
                let violation = Violation::new(name.clone(), Some(name), kind);
                let message = ctx.catalog().render_violation(&violation, ctx.locale())?;
                return Ok(Err(ViolationKind::InvalidElement { index, message }));
            }
        }
        Ok(Ok(()))
    }
}

/// Presence, type, size, value, pattern and line checks, in that order.
///
/// Returns the coerced value, or `None` for a blank optional value.
fn run_checks(
    coercer: &dyn Coerce,
    value: Option<&Value>,
    rule: &RuleSpec,
) -> Result<Option<Coerced>, ViolationKind> {
    Presence::validate(value, rule.is_mandatory())?;
    let Some(value) = value.filter(|v| !is_blank(Some(*v))) else {
        trace!("blank optional value, skipping checks");
        return Ok(None);
    };

    let coerced = TypeCheck::validate(coercer, value, rule.type_tag())?;

    SizeBounds {
        min: rule.min_size(),
        max: rule.max_size(),
    }
    .validate(&coerced)?;

    ValueBounds {
        min: rule.min_value(),
        max: rule.max_value(),
    }
    .validate(&coerced)?;

    if let Some(pattern) = rule.pattern() {
        PatternCheck(pattern).validate(&coerced)?;
    }
    if let Some(max) = rule.max_lines() {
        LineCount(max).validate(&coerced)?;
    }

    Ok(Some(coerced))
}

/// Validate one field against its rule.
///
/// Returns the first violation found, or `None` when the field passes. The
/// only error is a message missing from the catalog, which can happen while
/// rendering the message of a failing list element.
pub fn validate_field(
    ctx: &ValidationContext<'_>,
    field: &str,
    value: Option<&Value>,
    rule: &RuleSpec,
) -> Result<Option<Violation>, I18nError> {
    let kind = match run_checks(ctx.coercer(), value, rule) {
        Err(kind) => Some(kind),
        Ok(Some(coerced)) => match (rule.element(), coerced.as_list()) {
            (Some(element), Some(items)) => ElementCheck {
                base: element.label().or(rule.label()).unwrap_or(field),
                rule: element,
            }
            .validate(ctx, items)?
            .err(),
            _ => None,
        },
        Ok(None) => None,
    };

    if let Some(kind) = &kind {
        trace!("field {} failed: {}", field, kind.key());
    }
    Ok(kind.map(|kind| Violation::new(field, rule.label().map(str::to_string), kind)))
}
