//! Pluralization Rules
//!
//! CLDR-style plural categories for the languages message catalogs are
//! likely to ship. Languages without a dedicated rule use the English-like
//! one/other split.

use crate::{I18nError, Locale, Result};

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// Zero items
    Zero,
    /// One item
    One,
    /// Two items
    Two,
    /// Few items (Slavic languages)
    Few,
    /// Many items (Slavic languages)
    Many,
    /// All other cases
    Other,
}

impl PluralCategory {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "one" => Ok(Self::One),
            "two" => Ok(Self::Two),
            "few" => Ok(Self::Few),
            "many" => Ok(Self::Many),
            "other" => Ok(Self::Other),
            _ => Err(I18nError::InvalidPluralCategory(s.to_string())),
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plural rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// 1 is `one`, everything else `other` (English, Spanish, German, ...)
    OneOther,
    /// 0 and 1 are `one` (French)
    ZeroOneOther,
    /// A single form (Japanese, Chinese, ...)
    Invariant,
    /// one/few/many by last digits (Russian, Ukrainian)
    EastSlavic,
}

impl PluralRule {
    /// Rule family for a language code.
    pub fn for_language(language: &str) -> Self {
        match language {
            "ja" | "ko" | "zh" | "vi" | "th" | "id" | "ms" => Self::Invariant,
            "fr" => Self::ZeroOneOther,
            "ru" | "uk" | "be" => Self::EastSlavic,
            _ => Self::OneOther,
        }
    }

    /// Category of `n` under this rule.
    pub fn category(&self, n: f64) -> PluralCategory {
        let whole = n.fract() == 0.0;
        let i = n.abs() as i64;

        match self {
            Self::Invariant => PluralCategory::Other,
            Self::OneOther if whole && i == 1 => PluralCategory::One,
            Self::OneOther => PluralCategory::Other,
            Self::ZeroOneOther if whole && i <= 1 => PluralCategory::One,
            Self::ZeroOneOther => PluralCategory::Other,
            Self::EastSlavic if !whole => PluralCategory::Other,
            Self::EastSlavic => {
                let (mod10, mod100) = (i % 10, i % 100);
                if mod10 == 1 && mod100 != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
        }
    }
}

/// Get the plural category for a number in a locale.
///
/// # Example
///
/// ```
/// use paramguard_i18n::{plural_category, PluralCategory, Locale};
///
/// assert_eq!(plural_category(1, &Locale::es()), PluralCategory::One);
/// assert_eq!(plural_category(5, &Locale::es()), PluralCategory::Other);
/// assert_eq!(plural_category(0, &Locale::en()), PluralCategory::Other);
/// ```
pub fn plural_category(n: impl Into<f64>, locale: &Locale) -> PluralCategory {
    PluralRule::for_language(&locale.language).category(n.into())
}
