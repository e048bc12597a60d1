//! Declarative parameter validation for paramguard
//!
//! Attach a [`RuleSpec`] to each named parameter, hand the raw values to a
//! [`ValidationEngine`], and get back every violation rendered as a
//! localized sentence.
//!
//! # Examples
//!
//! ## Rules and values
//!
//! ```
//! use paramguard_validation::{RuleSet, RuleSpec, ValidationEngine};
//! use paramguard_i18n::Locale;
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("token", RuleSpec::string()
//!         .label("Token")
//!         .min_size(8)
//!         .max_size(64)
//!         .pattern("[A-Za-z0-9+/]+=*")
//!         .build()
//!         .unwrap())
//!     .field("scores", RuleSpec::list_of(RuleSpec::positive().build().unwrap())
//!         .build()
//!         .unwrap());
//!
//! let engine = ValidationEngine::new().with_locale(Locale::en());
//! let result = engine
//!     .validate(&json!({"token": "short", "scores": [1, -2, 3]}), &rules)
//!     .unwrap();
//!
//! assert_eq!(result.total_count(), 2);
//! assert_eq!(result.messages()[0], "'Token' is too short (min. 8)");
//! assert_eq!(
//!     result.messages()[1],
//!     "It has an invalid element. 'scores[1]' has a not valid value"
//! );
//! ```
//!
//! ## Rules from a document
//!
//! ```
//! use paramguard_validation::{RuleSet, ValidationEngine};
//! use serde_json::json;
//!
//! let rules = RuleSet::from_toml_str(r#"
//!     [email]
//!     type = "email"
//!     mandatory = true
//!
//!     [bio]
//!     max-lines = 3
//! "#).unwrap();
//!
//! let engine = ValidationEngine::new();
//! assert!(engine.check(&json!({"email": "ana@example.com"}), &rules).is_ok());
//! ```

mod binding;
mod catalog;
mod coerce;
mod config;
mod engine;
mod errors;
mod pipe;
mod rules;
mod traits;
mod validators;

pub use binding::*;
pub use catalog::*;
pub use coerce::*;
pub use config::{
    ConfigError, ConfigLoader, DEFAULT_MAX_MESSAGES, EngineConfig, FileFormat, LOCALE_ENV,
    MAX_MESSAGES_ENV, ValidationDocument,
};
pub use engine::*;
pub use errors::*;
pub use pipe::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;

#[doc(hidden)]
pub use serde_json;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BindArguments, CallArgs, CheckError, EngineConfig, RuleSet, RuleSpec, Signature, TypeTag,
        ValidationEngine, ValidationError, ValidationResult,
    };
}
