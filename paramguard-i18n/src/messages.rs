//! Message bundles and locale-aware lookup.

use crate::{I18nError, Locale, PluralCategory, Result, plural_category, substitute};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Templates for a single locale.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
    plurals: HashMap<(String, PluralCategory), String>,
}

impl MessageBundle {
    /// Create a new empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON.
    ///
    /// String values are plain templates; object values whose keys are plural
    /// categories (`one`, `other`, ...) are plural forms.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut bundle = Self::new();

        for (key, value) in data {
            match value {
                serde_json::Value::String(s) => {
                    bundle.messages.insert(key, s);
                }
                serde_json::Value::Object(forms) => {
                    for (form, msg) in forms {
                        let serde_json::Value::String(s) = msg else {
                            return Err(I18nError::ParseError(format!(
                                "plural form {}.{} is not a string",
                                key, form
                            )));
                        };
                        let category = PluralCategory::from_str(&form)?;
                        bundle.plurals.insert((key.clone(), category), s);
                    }
                }
                other => {
                    return Err(I18nError::ParseError(format!(
                        "message {} must be a string or an object, got {}",
                        key, other
                    )));
                }
            }
        }

        Ok(bundle)
    }

    /// Add a message.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Builder form of [`MessageBundle::add`].
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(key, message);
        self
    }

    /// Add a plural form.
    pub fn add_plural(
        &mut self,
        key: impl Into<String>,
        category: PluralCategory,
        message: impl Into<String>,
    ) {
        self.plurals.insert((key.into(), category), message.into());
    }

    /// Builder form of [`MessageBundle::add_plural`].
    pub fn with_plural(
        mut self,
        key: impl Into<String>,
        category: PluralCategory,
        message: impl Into<String>,
    ) -> Self {
        self.add_plural(key, category, message);
        self
    }

    /// Get a message.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|s| s.as_str())
    }

    /// Get a plural form, falling back to `other`.
    pub fn get_plural(&self, key: &str, category: PluralCategory) -> Option<&str> {
        self.plurals
            .get(&(key.to_string(), category))
            .or_else(|| self.plurals.get(&(key.to_string(), PluralCategory::Other)))
            .map(|s| s.as_str())
    }

    /// Check if bundle has a plain message.
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Overlay `other` on top of this bundle; entries in `other` win.
    pub fn merge(&mut self, other: MessageBundle) {
        self.messages.extend(other.messages);
        self.plurals.extend(other.plurals);
    }

    /// Get all message keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.messages.keys()
    }
}

/// Bundles for several locales.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    bundles: HashMap<String, MessageBundle>,
}

impl Messages {
    /// Create a new messages collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle for a locale, merging into any bundle already there.
    pub fn add_bundle(&mut self, locale: &Locale, bundle: MessageBundle) {
        self.bundles.entry(locale.tag()).or_default().merge(bundle);
    }

    /// Get a bundle for a locale, trying the language alone after the full tag.
    pub fn get_bundle(&self, locale: &Locale) -> Option<&MessageBundle> {
        self.bundles.get(&locale.tag()).or_else(|| {
            locale
                .region
                .as_ref()
                .and_then(|_| self.bundles.get(&locale.language_only().tag()))
        })
    }

    /// Load `<tag>.json` files from a directory.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| I18nError::ParseError(format!("Invalid filename: {:?}", path)))?;

                let locale = Locale::parse(stem)?;
                let bundle = MessageBundle::from_json(&fs::read_to_string(&path)?)?;
                paramguard_log::info!(
                    target: "paramguard::i18n",
                    "loaded message bundle {} from {}",
                    locale,
                    path.display()
                );
                self.add_bundle(&locale, bundle);
            }
        }

        Ok(())
    }
}

/// Thread-safe lookup with a fallback locale.
///
/// Unlike a display-oriented translator, a missing key is an error here:
/// templates are part of the program and a gap means a broken catalog.
pub struct I18n {
    messages: Arc<RwLock<Messages>>,
    fallback: Locale,
}

impl I18n {
    /// Create an empty instance falling back to the baseline locale.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Messages::new())),
            fallback: Locale::baseline(),
        }
    }

    /// Set the fallback locale.
    pub fn with_fallback(mut self, locale: Locale) -> Self {
        self.fallback = locale;
        self
    }

    /// Add (or overlay) a bundle.
    pub fn with_bundle(self, locale: &Locale, bundle: MessageBundle) -> Self {
        self.add_bundle(locale, bundle);
        self
    }

    /// Load bundles from a directory.
    pub fn load_from_dir(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.messages.write().load_from_dir(dir)?;
        Ok(self)
    }

    /// Add (or overlay) a bundle.
    pub fn add_bundle(&self, locale: &Locale, bundle: MessageBundle) {
        self.messages.write().add_bundle(locale, bundle);
    }

    /// The fallback locale.
    pub fn fallback(&self) -> &Locale {
        &self.fallback
    }

    /// Resolve a template in `locale`, then in the fallback locale.
    pub fn lookup(&self, key: &str, locale: &Locale) -> Result<String> {
        let messages = self.messages.read();

        [locale, &self.fallback]
            .into_iter()
            .find_map(|l| messages.get_bundle(l).and_then(|b| b.get(key)))
            .map(str::to_string)
            .ok_or_else(|| I18nError::MessageNotFound {
                key: key.to_string(),
                locale: locale.tag(),
            })
    }

    /// Resolve the plural form of `key` for `count`.
    ///
    /// The category is computed with the rules of whichever locale actually
    /// provides the template.
    pub fn lookup_plural(&self, key: &str, count: impl Into<f64>, locale: &Locale) -> Result<String> {
        let n = count.into();
        let messages = self.messages.read();

        [locale, &self.fallback]
            .into_iter()
            .find_map(|l| {
                messages
                    .get_bundle(l)
                    .and_then(|b| b.get_plural(key, plural_category(n, l)))
            })
            .map(str::to_string)
            .ok_or_else(|| I18nError::MessageNotFound {
                key: key.to_string(),
                locale: locale.tag(),
            })
    }

    /// Resolve and substitute `{name}` placeholders.
    pub fn t_args(&self, key: &str, locale: &Locale, args: &[(&str, &str)]) -> Result<String> {
        Ok(substitute(&self.lookup(key, locale)?, args))
    }

    /// Check if `locale` itself (ignoring the fallback) has a message.
    pub fn has(&self, key: &str, locale: &Locale) -> bool {
        self.messages
            .read()
            .get_bundle(locale)
            .is_some_and(|b| b.has(key))
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for I18n {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            fallback: self.fallback.clone(),
        }
    }
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_i18n() -> I18n {
        let en = MessageBundle::new()
            .with("mandatory", "{name} is mandatory")
            .with("only_en", "English only")
            .with_plural("more", PluralCategory::One, "{total} more error")
            .with_plural("more", PluralCategory::Other, "{total} more errors");

        let es = MessageBundle::new()
            .with("mandatory", "{name} es obligatorio")
            .with_plural("more", PluralCategory::One, "{total} error más")
            .with_plural("more", PluralCategory::Other, "{total} errores más");

        I18n::new()
            .with_bundle(&Locale::en(), en)
            .with_bundle(&Locale::es(), es)
    }

    #[test]
    fn test_lookup_in_locale() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.lookup("mandatory", &Locale::es()).unwrap(), "{name} es obligatorio");
        assert_eq!(i18n.lookup("mandatory", &Locale::en()).unwrap(), "{name} is mandatory");
    }

    #[test]
    fn test_lookup_falls_back_to_baseline() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.lookup("only_en", &Locale::es()).unwrap(), "English only");
        assert_eq!(i18n.lookup("mandatory", &Locale::de()).unwrap(), "{name} is mandatory");
        assert_eq!(
            i18n.lookup("mandatory", &Locale::new("es", Some("MX"))).unwrap(),
            "{name} es obligatorio"
        );
    }

    #[test]
    fn test_lookup_missing_everywhere_is_error() {
        let i18n = create_test_i18n();
        let err = i18n.lookup("nope", &Locale::es()).unwrap_err();
        assert!(matches!(err, I18nError::MessageNotFound { ref key, ref locale } if key == "nope" && locale == "es"));
    }

    #[test]
    fn test_lookup_plural() {
        let i18n = create_test_i18n();
        assert_eq!(i18n.lookup_plural("more", 1, &Locale::en()).unwrap(), "{total} more error");
        assert_eq!(i18n.lookup_plural("more", 4, &Locale::en()).unwrap(), "{total} more errors");
        assert_eq!(i18n.lookup_plural("more", 2, &Locale::es()).unwrap(), "{total} errores más");
        assert!(i18n.lookup_plural("less", 2, &Locale::es()).is_err());
    }

    #[test]
    fn test_t_args() {
        let i18n = create_test_i18n();
        let msg = i18n.t_args("mandatory", &Locale::en(), &[("name", "'Email'")]).unwrap();
        assert_eq!(msg, "'Email' is mandatory");
    }

    #[test]
    fn test_has_ignores_fallback() {
        let i18n = create_test_i18n();
        assert!(i18n.has("only_en", &Locale::en()));
        assert!(!i18n.has("only_en", &Locale::es()));
    }

    #[test]
    fn test_overlay_bundle_overrides_entries() {
        let i18n = create_test_i18n();
        i18n.add_bundle(&Locale::en(), MessageBundle::new().with("mandatory", "{name} is required"));
        assert_eq!(i18n.lookup("mandatory", &Locale::en()).unwrap(), "{name} is required");
        assert_eq!(i18n.lookup("only_en", &Locale::en()).unwrap(), "English only");
    }

    #[test]
    fn test_message_bundle_from_json() {
        let json = r#"{
            "PARAM_IS_MANDATORY": "{name} is required",
            "OVERFLOW": { "one": "{total} more", "other": "{total} more" }
        }"#;

        let bundle = MessageBundle::from_json(json).unwrap();
        assert_eq!(bundle.get("PARAM_IS_MANDATORY"), Some("{name} is required"));
        assert_eq!(bundle.get_plural("OVERFLOW", PluralCategory::One), Some("{total} more"));
        assert_eq!(bundle.get_plural("OVERFLOW", PluralCategory::Few), Some("{total} more"));
    }

    #[test]
    fn test_message_bundle_from_json_rejects_bad_shapes() {
        assert!(MessageBundle::from_json(r#"{"a": 1}"#).is_err());
        assert!(MessageBundle::from_json(r#"{"a": {"lots": "x"}}"#).is_err());
        assert!(MessageBundle::from_json("not json").is_err());
    }
}
