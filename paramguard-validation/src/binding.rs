// Argument binding

use crate::{BindArguments, CheckError, FieldValues, RuleSet, ValidationEngine};
use paramguard_log::trace;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("{callable}() got an unexpected argument '{name}'")]
    UnknownArgument { callable: String, name: String },

    #[error("{callable}() got multiple values for argument '{name}'")]
    DuplicateArgument { callable: String, name: String },

    #[error("{callable}() takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        callable: String,
        expected: usize,
        given: usize,
    },
}

/// Raw arguments of one call: positional values followed by named ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Read command-line style arguments: `name=value` is a named argument,
    /// anything else is positional. Values that parse as JSON are taken as
    /// JSON, the rest as text.
    pub fn from_cli<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter().fold(Self::new(), |call, arg| {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((name, raw)) if !name.is_empty() => call.named(name.trim(), Self::cli_value(raw)),
                _ => call.arg(Self::cli_value(arg)),
            }
        })
    }

    fn cli_value(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_args(&self) -> &[(String, Value)] {
        &self.named
    }
}

/// Declared parameter names of a callable
///
/// ```
/// use paramguard_validation::{BindArguments, CallArgs, Signature};
/// use serde_json::json;
///
/// let signature = Signature::new("register", ["name", "age"]);
/// let values = signature
///     .bind(CallArgs::new().arg("Ana").named("age", 42))
///     .unwrap();
/// assert_eq!(values["name"], json!("Ana"));
/// assert_eq!(values["age"], json!(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<String>,
}

impl Signature {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// One parameter per rule, in rule order.
    pub fn from_rules(name: impl Into<String>, rules: &RuleSet) -> Self {
        Self::new(name, rules.names())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Bind `args` and check the bound values, returning them on success.
    pub fn check(
        &self,
        engine: &ValidationEngine,
        args: CallArgs,
        rules: &RuleSet,
    ) -> Result<FieldValues, CheckError> {
        let values = self.bind(args)?;
        engine.check(&values, rules)?;
        Ok(values)
    }
}

impl BindArguments for Signature {
    /// Positional arguments fill parameters in order, named arguments fill
    /// them by name. Parameters without an argument are left out so that the
    /// engine treats them as absent.
    fn bind(&self, args: CallArgs) -> Result<FieldValues, BindError> {
        if args.positional.len() > self.params.len() {
            return Err(BindError::TooManyPositional {
                callable: self.name.clone(),
                expected: self.params.len(),
                given: args.positional.len(),
            });
        }

        let mut given: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in given.iter_mut().zip(args.positional) {
            *slot = Some(value);
        }

        for (name, value) in args.named {
            let index = self
                .params
                .iter()
                .position(|p| *p == name)
                .ok_or_else(|| BindError::UnknownArgument {
                    callable: self.name.clone(),
                    name: name.clone(),
                })?;
            if given[index].is_some() {
                return Err(BindError::DuplicateArgument {
                    callable: self.name.clone(),
                    name,
                });
            }
            given[index] = Some(value);
        }

        let values: FieldValues = self
            .params
            .iter()
            .zip(given)
            .filter_map(|(name, value)| value.map(|v| (name.clone(), v)))
            .collect();
        trace!("bound {} of {} parameters of {}()", values.len(), self.params.len(), self.name);
        Ok(values)
    }
}

/// Check local variables against a rule set, named after the variables.
///
/// Values are converted with `serde_json::to_value`, so `None` counts as
/// absent. Evaluates to `Result<(), CheckError>`.
///
/// ```
/// use paramguard_validation::{RuleSet, RuleSpec, ValidationEngine, validate_args};
/// use paramguard_i18n::Locale;
///
/// let engine = ValidationEngine::new().with_locale(Locale::en());
/// let rules = RuleSet::new()
///     .field("email", RuleSpec::email().mandatory().build().unwrap())
///     .field("age", RuleSpec::positive().build().unwrap());
///
/// let email = "ana@example.com";
/// let age: Option<i64> = None;
/// assert!(validate_args!(engine, &rules, email, age).is_ok());
///
/// let email = "ana";
/// let err = validate_args!(engine, &rules, email, age).unwrap_err();
/// assert_eq!(err.to_string(), "It has an invalid e-mail format");
/// ```
#[macro_export]
macro_rules! validate_args {
    ($engine:expr, $rules:expr, $($arg:ident),+ $(,)?) => {{
        let values = (|| -> ::std::result::Result<$crate::FieldValues, $crate::serde_json::Error> {
            let mut values = $crate::FieldValues::new();
            $(
                values.insert(stringify!($arg).to_string(), $crate::serde_json::to_value(&$arg)?);
            )+
            Ok(values)
        })();
        match values {
            Ok(values) => $engine.check(&values, $rules),
            Err(e) => Err($crate::CheckError::from(e)),
        }
    }};
}
