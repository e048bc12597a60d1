//! Internationalization support for paramguard
//!
//! A deliberately small i18n layer: flat key → template bundles per locale,
//! fallback to a baseline locale, CLDR-style plural selection and `{name}`
//! placeholder substitution.
//!
//! # Quick Start
//!
//! ```rust
//! use paramguard_i18n::{I18n, Locale, MessageBundle, PluralCategory};
//!
//! let i18n = I18n::new()
//!     .with_bundle(&Locale::en(), MessageBundle::new()
//!         .with("greeting", "Hello, {name}!")
//!         .with_plural("items", PluralCategory::One, "{n} item")
//!         .with_plural("items", PluralCategory::Other, "{n} items"))
//!     .with_bundle(&Locale::es(), MessageBundle::new()
//!         .with("greeting", "¡Hola, {name}!"));
//!
//! let msg = i18n.t_args("greeting", &Locale::es(), &[("name", "Ana")]).unwrap();
//! assert_eq!(msg, "¡Hola, Ana!");
//!
//! // Spanish has no "items" forms, so English answers.
//! let msg = i18n.lookup_plural("items", 3, &Locale::es()).unwrap();
//! assert_eq!(msg, "{n} items");
//! ```

mod error;
mod format;
mod locale;
mod messages;
mod plural;

pub use error::I18nError;
pub use format::{capitalize_first, finish_sentence, substitute};
pub use locale::Locale;
pub use messages::{I18n, MessageBundle, Messages};
pub use plural::{PluralCategory, PluralRule, plural_category};

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        I18n, I18nError, Locale, MessageBundle, PluralCategory, Result, plural_category,
        substitute,
    };
}
