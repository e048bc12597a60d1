// Validation engine

use crate::{
    CheckError, Coerce, ConfigError, DefaultCoercer, EngineConfig, FieldSource, MessageCatalog,
    RuleSet, ValidationContext, ValidationError, ValidationResult, validate_field,
};
use paramguard_i18n::{I18nError, Locale};
use paramguard_log::{Level, debug, event};
use std::fmt;
use std::sync::Arc;

/// Checks field values against their rules and renders every violation
///
/// An engine is read-only once built and can be shared between threads.
///
/// ```
/// use paramguard_validation::{RuleSet, RuleSpec, ValidationEngine};
/// use paramguard_i18n::Locale;
/// use serde_json::json;
///
/// let rules = RuleSet::new()
///     .field("age", RuleSpec::positive().mandatory().build().unwrap())
///     .field("email", RuleSpec::email().label("E-mail").build().unwrap());
///
/// let engine = ValidationEngine::new().with_locale(Locale::en());
/// let result = engine
///     .validate(&json!({"email": "nope"}), &rules)
///     .unwrap();
///
/// assert_eq!(result.total_count(), 2);
/// assert_eq!(result.messages()[0], "It is mandatory");
/// assert_eq!(result.messages()[1], "'E-mail' has an invalid e-mail format");
/// ```
#[derive(Clone)]
pub struct ValidationEngine {
    catalog: Arc<MessageCatalog>,
    coercer: Arc<dyn Coerce>,
    config: EngineConfig,
}

impl ValidationEngine {
    /// Engine with the built-in catalog, the default coercion rules and the
    /// default configuration.
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(MessageCatalog::builtin()),
            coercer: Arc::new(DefaultCoercer),
            config: EngineConfig::default(),
        }
    }

    /// Engine configured from `PARAMGUARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new().with_config(EngineConfig::from_env()?))
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_coercer(mut self, coercer: impl Coerce + 'static) -> Self {
        self.coercer = Arc::new(coercer);
        self
    }

    /// Render in `locale` instead of the process-wide locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.config.locale = Some(locale);
        self
    }

    /// Display cap on rendered messages, `0` for none.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.config.max_messages = max_messages;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Validate `values` against `rules`.
    ///
    /// The locale is resolved once, before the first field. Only a message
    /// missing from the catalog is an error; every violation ends up in the
    /// result.
    pub fn validate<S: FieldSource + ?Sized>(
        &self,
        values: &S,
        rules: &RuleSet,
    ) -> Result<ValidationResult, I18nError> {
        let locale = self.config.resolve_locale();
        self.validate_in(values, rules, &locale)
    }

    /// Validate with an explicit locale.
    pub fn validate_in<S: FieldSource + ?Sized>(
        &self,
        values: &S,
        rules: &RuleSet,
        locale: &Locale,
    ) -> Result<ValidationResult, I18nError> {
        let ctx = ValidationContext::new(locale, &self.catalog, self.coercer.as_ref());
        let mut messages = Vec::new();
        let mut violations = Vec::new();

        for (field, rule) in rules.iter() {
            match validate_field(&ctx, field, values.field(field), rule)? {
                Some(violation) => {
                    event!(
                        Level::Debug,
                        "field rejected",
                        field = field,
                        key = violation.message_key()
                    );
                    messages.push(self.catalog.render_violation(&violation, locale)?);
                    violations.push(violation);
                }
                None => event!(Level::Trace, "field accepted", field = field),
            }
        }

        let mut overflow_notice = String::new();
        if let Some(cap) = self.config.cap() {
            if messages.len() > cap {
                overflow_notice = self
                    .catalog
                    .render_overflow_notice(messages.len() - cap, locale)?;
                messages.truncate(cap);
            }
        }

        debug!(
            "validated {} fields in {}: {} violations",
            rules.len(),
            locale,
            violations.len()
        );
        Ok(ValidationResult::new(messages, violations, overflow_notice))
    }

    /// Validate and fail with the result unless every field passes.
    pub fn check<S: FieldSource + ?Sized>(&self, values: &S, rules: &RuleSet) -> Result<(), CheckError> {
        let result = self.validate(values, rules)?;
        if result.is_success() {
            Ok(())
        } else {
            Err(ValidationError(result).into())
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coerced, CoercionFailure, RuleSpec, TypeTag};
    use serde_json::{Value, json};

    fn engine() -> ValidationEngine {
        ValidationEngine::new().with_locale(Locale::en())
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationEngine>();
    }

    #[test]
    fn test_success() {
        let rules = RuleSet::new().field("name", RuleSpec::string().max_size(5).build().unwrap());
        let result = engine().validate(&json!({"name": "Ana"}), &rules).unwrap();
        assert!(result.is_success());
        assert!(result.messages().is_empty());
        assert!(engine().check(&json!({"name": "Ana"}), &rules).is_ok());
    }

    #[test]
    fn test_unruled_fields_pass_through() {
        let rules = RuleSet::new().field("a", RuleSpec::integer().build().unwrap());
        let result = engine()
            .validate(&json!({"a": 1, "extra": "anything"}), &rules)
            .unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_fields_in_rule_order() {
        let rules = RuleSet::new()
            .field("second", RuleSpec::builder().label("Second").mandatory().build().unwrap())
            .field("first", RuleSpec::builder().label("First").mandatory().build().unwrap());
        let result = engine().validate(&json!({}), &rules).unwrap();
        assert_eq!(
            result.messages(),
            &["'Second' is mandatory".to_string(), "'First' is mandatory".to_string()]
        );
    }

    #[test]
    fn test_cap_and_overflow_notice() {
        let rules: RuleSet = (0..4)
            .map(|i| (format!("f{i}"), RuleSpec::builder().mandatory().build().unwrap()))
            .collect();
        let result = engine().with_max_messages(3).validate(&json!({}), &rules).unwrap();

        assert_eq!(result.messages().len(), 3);
        assert_eq!(result.total_count(), 4);
        assert_eq!(result.violations().len(), 4);
        assert_eq!(result.overflow_notice(), " ...and 1 more validation error");

        let uncapped = engine().with_max_messages(0).validate(&json!({}), &rules).unwrap();
        assert_eq!(uncapped.messages().len(), 4);
        assert_eq!(uncapped.overflow_notice(), "");
    }

    #[test]
    fn test_check_fails_with_result() {
        let rules = RuleSet::new().field("a", RuleSpec::builder().mandatory().build().unwrap());
        let err = engine().check(&json!({}), &rules).unwrap_err();
        let invalid = err.as_validation().unwrap();
        assert_eq!(invalid.total_count(), 1);
        assert_eq!(err.to_string(), "It is mandatory");
    }

    #[test]
    fn test_explicit_locale_overrides_config() {
        let rules = RuleSet::new().field("a", RuleSpec::builder().mandatory().build().unwrap());
        let result = engine()
            .validate_in(&json!({}), &rules, &Locale::es())
            .unwrap();
        assert_eq!(result.messages()[0], "Es obligatorio");
    }

    #[test]
    fn test_broken_catalog_is_fatal() {
        let catalog = MessageCatalog::from_i18n(paramguard_i18n::I18n::new());
        let rules = RuleSet::new().field("a", RuleSpec::builder().mandatory().build().unwrap());
        let err = engine().with_catalog(catalog).validate(&json!({}), &rules);
        assert!(matches!(err, Err(I18nError::MessageNotFound { .. })));

        let passing = engine()
            .with_catalog(MessageCatalog::from_i18n(paramguard_i18n::I18n::new()))
            .validate(&json!({"a": 1}), &rules);
        assert!(passing.unwrap().is_success());
    }

    struct Strict;

    impl Coerce for Strict {
        fn coerce(&self, value: &Value, _tag: Option<TypeTag>) -> Result<Coerced, CoercionFailure> {
            value
                .as_str()
                .map(|s| Coerced::Text(s.to_string()))
                .ok_or(CoercionFailure::InvalidType)
        }
    }

    #[test]
    fn test_custom_coercer() {
        let rules = RuleSet::new().field("n", RuleSpec::integer().build().unwrap());
        let result = engine()
            .with_coercer(Strict)
            .validate(&json!({"n": 5}), &rules)
            .unwrap();
        assert_eq!(result.messages()[0], "It has an invalid data type");
    }
}
