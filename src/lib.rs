// paramguard - declarative parameter validation
//
// Rule specifications per named parameter, an engine that reports every broken
// field at once, and localized messages with an overflow notice.

// Re-export the validation engine
pub use paramguard_validation::*;

// Re-export supporting crates
pub use paramguard_i18n as i18n;
pub use paramguard_log as log;

pub use paramguard_i18n::{Locale, MessageBundle};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BindArguments, CallArgs, CheckError, EngineConfig, Locale, MessageCatalog, RuleSet,
        RuleSpec, Signature, TypeTag, ValidationDocument, ValidationEngine, ValidationError,
        ValidationResult, validate_args,
    };
}
