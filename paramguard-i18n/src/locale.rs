//! Locales and the process-wide current locale.
//!
//! Rendering code never reads the global directly: callers resolve a
//! [`Locale`] once (usually via [`Locale::current`]) and pass it down.

use crate::{I18nError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static CURRENT: Lazy<RwLock<Locale>> = Lazy::new(|| RwLock::new(Locale::baseline()));

/// A language with an optional region, e.g. `es` or `en-GB`.
///
/// # Examples
///
/// ```
/// use paramguard_i18n::Locale;
///
/// let es = Locale::parse("es_ES").unwrap();
/// assert_eq!(es.tag(), "es-ES");
/// assert_eq!(es.language, "es");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// Two-letter language code (ISO 639-1)
    pub language: String,
    /// Optional region code (ISO 3166-1)
    pub region: Option<String>,
}

impl Locale {
    /// Create a locale, normalizing case.
    pub fn new(language: impl Into<String>, region: Option<impl Into<String>>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            region: region.map(|r| r.into().to_uppercase()),
        }
    }

    /// Parse a tag such as `en`, `en-US` or `es_ES`.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.trim().split(['-', '_']);

        let language = parts.next().unwrap_or_default().to_lowercase();
        if language.len() != 2 || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        let region = match parts.next() {
            None => None,
            Some(r) if r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(r.to_uppercase())
            }
            Some(_) => return Err(I18nError::InvalidLocale(tag.to_string())),
        };

        if parts.next().is_some() {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        Ok(Self { language, region })
    }

    /// Tag form, e.g. `en-US`.
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{}", self.language, region),
            None => self.language.clone(),
        }
    }

    /// Same language without the region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    /// The always-available fallback locale (`en`).
    pub fn baseline() -> Self {
        Self::en()
    }

    /// Whether this is the baseline language.
    pub fn is_baseline(&self) -> bool {
        self.language == Self::baseline().language
    }

    /// Snapshot of the process-wide current locale.
    pub fn current() -> Self {
        CURRENT.read().clone()
    }

    /// Replace the process-wide current locale.
    ///
    /// Calls already in flight keep the locale they resolved when they
    /// started.
    pub fn set_current(locale: Locale) {
        paramguard_log::debug!(target: "paramguard::i18n", "current locale set to {}", locale);
        *CURRENT.write() = locale;
    }

    /// Reset the process-wide locale to the baseline.
    pub fn reset_current() {
        Self::set_current(Self::baseline());
    }

    /// English
    pub fn en() -> Self {
        Self::new("en", None::<&str>)
    }

    /// Spanish
    pub fn es() -> Self {
        Self::new("es", None::<&str>)
    }

    /// French
    pub fn fr() -> Self {
        Self::new("fr", None::<&str>)
    }

    /// German
    pub fn de() -> Self {
        Self::new("de", None::<&str>)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::baseline()
    }
}
