// Message catalog for validation messages

use crate::Violation;
use paramguard_i18n::{
    I18n, I18nError, Locale, MessageBundle, PluralCategory, finish_sentence, substitute,
};
use std::fmt;

/// Template key for each kind of violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ParamIsMandatory,
    ParamHasInvalidType,
    ParamHasInvalidFormat,
    ParamHasInvalidEmail,
    ParamHasInvalidUrl,
    ParamIsTooShort,
    ParamIsTooLong,
    ParamIsTooSmall,
    ParamIsTooBig,
    ParamHasInvalidValue,
    ParamHasTooMuchLines,
    ListItemHasInvalidElement,
}

impl MessageKey {
    pub const ALL: [MessageKey; 12] = [
        MessageKey::ParamIsMandatory,
        MessageKey::ParamHasInvalidType,
        MessageKey::ParamHasInvalidFormat,
        MessageKey::ParamHasInvalidEmail,
        MessageKey::ParamHasInvalidUrl,
        MessageKey::ParamIsTooShort,
        MessageKey::ParamIsTooLong,
        MessageKey::ParamIsTooSmall,
        MessageKey::ParamIsTooBig,
        MessageKey::ParamHasInvalidValue,
        MessageKey::ParamHasTooMuchLines,
        MessageKey::ListItemHasInvalidElement,
    ];

    /// Key as it appears in message bundles.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::ParamIsMandatory => "PARAM_IS_MANDATORY",
            MessageKey::ParamHasInvalidType => "PARAM_HAS_INVALID_TYPE",
            MessageKey::ParamHasInvalidFormat => "PARAM_HAS_INVALID_FORMAT",
            MessageKey::ParamHasInvalidEmail => "PARAM_HAS_INVALID_EMAIL",
            MessageKey::ParamHasInvalidUrl => "PARAM_HAS_INVALID_URL",
            MessageKey::ParamIsTooShort => "PARAM_IS_TOO_SHORT",
            MessageKey::ParamIsTooLong => "PARAM_IS_TOO_LONG",
            MessageKey::ParamIsTooSmall => "PARAM_IS_TOO_SMALL",
            MessageKey::ParamIsTooBig => "PARAM_IS_TOO_BIG",
            MessageKey::ParamHasInvalidValue => "PARAM_HAS_INVALID_VALUE",
            MessageKey::ParamHasTooMuchLines => "PARAM_HAS_TOO_MUCH_LINES",
            MessageKey::ListItemHasInvalidElement => "LIST_ITEM_HAS_INVALID_ELEMENT",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bundle key of the subject used when a field has no label.
pub const ANONYMOUS_NAME_KEY: &str = "ANONYMOUS_NAME";

/// Bundle key (plural) of the "and N more" notice.
pub const MORE_MESSAGES_KEY: &str = "MORE_VALIDATION_ERRORS";

fn english() -> MessageBundle {
    MessageBundle::new()
        .with(ANONYMOUS_NAME_KEY, "It")
        .with("PARAM_IS_MANDATORY", "{name} is mandatory")
        .with("PARAM_HAS_INVALID_TYPE", "{name} has an invalid data type")
        .with("PARAM_HAS_INVALID_FORMAT", "{name} has an invalid format")
        .with("PARAM_HAS_INVALID_EMAIL", "{name} has an invalid e-mail format")
        .with("PARAM_HAS_INVALID_URL", "{name} has an invalid URL format")
        .with("PARAM_IS_TOO_SHORT", "{name} is too short (min. {minsize})")
        .with("PARAM_IS_TOO_LONG", "{name} is too long (max. {maxsize})")
        .with("PARAM_IS_TOO_SMALL", "{name} is too small (min. {minvalue})")
        .with("PARAM_IS_TOO_BIG", "{name} is too big (max. {maxvalue})")
        .with("PARAM_HAS_INVALID_VALUE", "{name} has a not valid value")
        .with("PARAM_HAS_TOO_MUCH_LINES", "{name} has too much lines (max. {maxlines} lines)")
        .with("LIST_ITEM_HAS_INVALID_ELEMENT", "{name} has an invalid element. {message}")
        .with_plural(MORE_MESSAGES_KEY, PluralCategory::One, "...and {total} more validation error")
        .with_plural(MORE_MESSAGES_KEY, PluralCategory::Other, "...and {total} more validation errors")
}

fn spanish() -> MessageBundle {
    MessageBundle::new()
        .with(ANONYMOUS_NAME_KEY, "")
        .with("PARAM_IS_MANDATORY", "{name} es obligatorio")
        .with("PARAM_HAS_INVALID_TYPE", "{name} tiene un tipo de dato no válido")
        .with("PARAM_HAS_INVALID_FORMAT", "{name} tiene un formato no válido")
        .with("PARAM_HAS_INVALID_EMAIL", "{name} tiene un formato de e-mail no válido")
        .with("PARAM_HAS_INVALID_URL", "{name} tiene un formato de URL no válido")
        .with("PARAM_IS_TOO_SHORT", "{name} es demasiado corto (mín. {minsize})")
        .with("PARAM_IS_TOO_LONG", "{name} es demasiado largo (máx. {maxsize})")
        .with("PARAM_IS_TOO_SMALL", "{name} es demasiado pequeño (mín. {minvalue})")
        .with("PARAM_IS_TOO_BIG", "{name} es demasiado grande (máx. {maxvalue})")
        .with("PARAM_HAS_INVALID_VALUE", "{name} tiene un valor no válido")
        .with("PARAM_HAS_TOO_MUCH_LINES", "{name} tiene demasiadas lineas (máx. {maxlines} lineas)")
        .with("LIST_ITEM_HAS_INVALID_ELEMENT", "{name} tiene un elemento no válido. {message}")
        .with_plural(MORE_MESSAGES_KEY, PluralCategory::One, "...y {total} error más")
        .with_plural(MORE_MESSAGES_KEY, PluralCategory::Other, "...y {total} errores más")
}

/// Renders violations into localized sentences.
///
/// Every rendering call takes the locale explicitly; pick it once per
/// validation call (see [`Locale::current`]) and pass it along.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    i18n: I18n,
}

impl MessageCatalog {
    /// Catalog with the built-in English (baseline) and Spanish templates.
    pub fn builtin() -> Self {
        let i18n = I18n::new()
            .with_fallback(Locale::baseline())
            .with_bundle(&Locale::en(), english())
            .with_bundle(&Locale::es(), spanish());
        Self { i18n }
    }

    /// Catalog over caller-provided bundles only. Use [`verify`](Self::verify)
    /// to make sure the baseline locale is complete.
    pub fn from_i18n(i18n: I18n) -> Self {
        Self { i18n }
    }

    /// Overlay templates for `locale`; existing keys are replaced.
    pub fn with_bundle(self, locale: &Locale, bundle: MessageBundle) -> Self {
        self.i18n.add_bundle(locale, bundle);
        self
    }

    /// Overlay templates for `locale` from a JSON object.
    pub fn with_json(self, locale: &Locale, json: &str) -> Result<Self, I18nError> {
        let bundle = MessageBundle::from_json(json)?;
        Ok(self.with_bundle(locale, bundle))
    }

    /// Check that the fallback locale can render every message.
    pub fn verify(&self) -> Result<(), I18nError> {
        let baseline = self.i18n.fallback().clone();
        for key in MessageKey::ALL {
            self.i18n.lookup(key.as_str(), &baseline)?;
        }
        self.i18n.lookup(ANONYMOUS_NAME_KEY, &baseline)?;
        self.i18n.lookup_plural(MORE_MESSAGES_KEY, 2, &baseline)?;
        Ok(())
    }

    /// Render `key` with `params`.
    ///
    /// The `name` parameter is shown quoted, or replaced with the locale's
    /// anonymous subject when `anonymize` is set. The result is trimmed and
    /// its first character capitalized.
    pub fn render(
        &self,
        key: MessageKey,
        params: &[(&str, &str)],
        anonymize: bool,
        locale: &Locale,
    ) -> Result<String, I18nError> {
        let template = self.i18n.lookup(key.as_str(), locale)?;
        let anonymous = if anonymize {
            Some(self.i18n.lookup(ANONYMOUS_NAME_KEY, locale)?)
        } else {
            None
        };

        let quoted: Vec<(&str, String)> = params
            .iter()
            .map(|(k, v)| match (*k, &anonymous) {
                ("name", Some(subject)) => (*k, subject.clone()),
                ("name", None) => (*k, format!("'{}'", v)),
                _ => (*k, v.to_string()),
            })
            .collect();
        let args: Vec<(&str, &str)> = quoted.iter().map(|(k, v)| (*k, v.as_str())).collect();

        Ok(finish_sentence(&substitute(&template, &args)))
    }

    /// Render a structured violation.
    pub fn render_violation(&self, violation: &Violation, locale: &Locale) -> Result<String, I18nError> {
        let name = violation.display_name();
        let kind_params = violation.kind().params();

        let mut params: Vec<(&str, &str)> = Vec::with_capacity(kind_params.len() + 1);
        params.push(("name", name));
        params.extend(kind_params.iter().map(|(k, v)| (*k, v.as_str())));

        self.render(violation.message_key(), &params, violation.is_anonymous(), locale)
    }

    /// Notice for `total` violations left out of a capped list.
    ///
    /// Empty when `total` is zero, otherwise starts with a single space so it
    /// can be appended to the preceding messages.
    pub fn render_overflow_notice(&self, total: usize, locale: &Locale) -> Result<String, I18nError> {
        if total == 0 {
            return Ok(String::new());
        }

        let template = self.i18n.lookup_plural(MORE_MESSAGES_KEY, total as f64, locale)?;
        let text = substitute(&template, &[("total", &total.to_string())]);
        Ok(format!(" {}", finish_sentence(&text)))
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
