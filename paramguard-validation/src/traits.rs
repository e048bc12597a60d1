// Validation traits

use crate::{BindError, CallArgs, Coerced, CoercionFailure, MessageCatalog, TypeTag};
use indexmap::IndexMap;
use paramguard_i18n::Locale;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Ordered field name to raw value map, as produced by argument binding.
pub type FieldValues = IndexMap<String, Value>;

/// Trait for type coercion services
///
/// Turns a raw value into the shape named by its rule's type. `None` means
/// the rule has no type and the value should be taken as it is.
pub trait Coerce: Send + Sync {
    fn coerce(&self, value: &Value, tag: Option<TypeTag>) -> Result<Coerced, CoercionFailure>;
}

/// Trait for argument binding adapters
///
/// Maps the raw arguments of a call onto declared parameter names.
pub trait BindArguments {
    fn bind(&self, args: CallArgs) -> Result<FieldValues, BindError>;
}

/// Anything the engine can read raw field values from.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&Value>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

impl<S: BuildHasher> FieldSource for HashMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldSource for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: BuildHasher> FieldSource for IndexMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldSource for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// A JSON object is read field by field; any other value has no fields.
impl FieldSource for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(name))
    }
}

/// Everything a single validation call shares between field checks
///
/// The locale is resolved once when the context is created and used for
/// every message rendered during the call.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    locale: &'a Locale,
    catalog: &'a MessageCatalog,
    coercer: &'a dyn Coerce,
}

impl<'a> ValidationContext<'a> {
    pub fn new(locale: &'a Locale, catalog: &'a MessageCatalog, coercer: &'a dyn Coerce) -> Self {
        Self {
            locale,
            catalog,
            coercer,
        }
    }

    pub fn locale(&self) -> &'a Locale {
        self.locale
    }

    pub fn catalog(&self) -> &'a MessageCatalog {
        self.catalog
    }

    pub fn coercer(&self) -> &'a dyn Coerce {
        self.coercer
    }
}

impl std::fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("locale", self.locale)
            .finish_non_exhaustive()
    }
}
