// Rule specifications

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a rule.
///
/// These are programming or configuration mistakes, reported once when the
/// rule is built rather than on every validation call.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid regexp {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("min-size {min} is greater than max-size {max}")]
    InvertedSize { min: usize, max: usize },

    #[error("min-value {min} is greater than max-value {max}")]
    InvertedValue { min: f64, max: f64 },

    #[error("value bounds must be finite numbers")]
    NonFiniteBound,

    #[error("unknown type {0:?}")]
    UnknownType(String),

    #[error("element rules only apply to list fields, not {0}")]
    ElementOnScalar(TypeTag),

    #[error("element rules cannot carry element rules of their own")]
    NestedElementRule,

    #[error("failed to parse rules: {0}")]
    Parse(String),
}

/// Type a raw value must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Integer,
    Float,
    Boolean,
    Email,
    Url,
    /// Number strictly greater than zero
    Positive,
    /// Number strictly lower than zero
    Negative,
    List,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Boolean => "boolean",
            TypeTag::Email => "email",
            TypeTag::Url => "url",
            TypeTag::Positive => "positive",
            TypeTag::Negative => "negative",
            TypeTag::List => "list",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "string" | "str" | "text" => Ok(TypeTag::String),
            "integer" | "int" => Ok(TypeTag::Integer),
            "float" | "number" | "double" => Ok(TypeTag::Float),
            "boolean" | "bool" => Ok(TypeTag::Boolean),
            "email" | "e-mail" => Ok(TypeTag::Email),
            "url" => Ok(TypeTag::Url),
            "positive" | "positive-number" => Ok(TypeTag::Positive),
            "negative" | "negative-number" => Ok(TypeTag::Negative),
            "list" | "array" => Ok(TypeTag::List),
            _ => Err(RuleError::UnknownType(s.to_string())),
        }
    }
}

/// A compiled `regexp` constraint that must match the whole value.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, RuleError> {
        let source = source.into();
        let anchored = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            RuleError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            }
        })?;
        Ok(Self { source, anchored })
    }

    /// The expression as written in the rule.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` matches in full.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// Constraints attached to one field.
///
/// Built through [`RuleSpecBuilder`], which checks the rule once so that
/// validation never has to.
///
/// ```
/// use paramguard_validation::{RuleSpec, TypeTag};
///
/// let token = RuleSpec::builder()
///     .label("Token")
///     .min_size(8)
///     .max_size(64)
///     .pattern("[A-Za-z0-9+/]+=*")
///     .build()
///     .unwrap();
/// assert_eq!(token.label(), Some("Token"));
///
/// let scores = RuleSpec::list_of(RuleSpec::positive().build().unwrap()).mandatory().build().unwrap();
/// assert_eq!(scores.type_tag(), Some(TypeTag::List));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    label: Option<String>,
    mandatory: bool,
    type_tag: Option<TypeTag>,
    min_size: Option<usize>,
    max_size: Option<usize>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    pattern: Option<Pattern>,
    max_lines: Option<usize>,
    element: Option<Box<RuleSpec>>,
}

impl RuleSpec {
    /// Start an empty rule: optional, any type, no bounds.
    pub fn builder() -> RuleSpecBuilder {
        RuleSpecBuilder::default()
    }

    /// Rule requiring `tag`.
    pub fn of_type(tag: TypeTag) -> RuleSpecBuilder {
        Self::builder().type_tag(tag)
    }

    pub fn string() -> RuleSpecBuilder {
        Self::of_type(TypeTag::String)
    }

    pub fn integer() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Integer)
    }

    pub fn float() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Float)
    }

    pub fn boolean() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Boolean)
    }

    pub fn email() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Email)
    }

    pub fn url() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Url)
    }

    pub fn positive() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Positive)
    }

    pub fn negative() -> RuleSpecBuilder {
        Self::of_type(TypeTag::Negative)
    }

    /// List whose elements must each satisfy `element`.
    pub fn list_of(element: RuleSpec) -> RuleSpecBuilder {
        Self::of_type(TypeTag::List).element(element)
    }

    /// Display name used in messages; `None` renders an anonymous subject.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn type_tag(&self) -> Option<TypeTag> {
        self.type_tag
    }

    pub fn min_size(&self) -> Option<usize> {
        self.min_size
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    pub fn element(&self) -> Option<&RuleSpec> {
        self.element.as_deref()
    }
}

/// Builder for [`RuleSpec`].
#[derive(Debug, Clone, Default)]
pub struct RuleSpecBuilder {
    spec: RuleSpec,
    pattern_source: Option<String>,
}

impl RuleSpecBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.spec.label = Some(label.into());
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.spec.mandatory = true;
        self
    }

    pub fn required(mut self, mandatory: bool) -> Self {
        self.spec.mandatory = mandatory;
        self
    }

    pub fn type_tag(mut self, tag: TypeTag) -> Self {
        self.spec.type_tag = Some(tag);
        self
    }

    pub fn min_size(mut self, size: usize) -> Self {
        self.spec.min_size = Some(size);
        self
    }

    pub fn max_size(mut self, size: usize) -> Self {
        self.spec.max_size = Some(size);
        self
    }

    pub fn min_value(mut self, value: f64) -> Self {
        self.spec.min_value = Some(value);
        self
    }

    pub fn max_value(mut self, value: f64) -> Self {
        self.spec.max_value = Some(value);
        self
    }

    /// Regular expression the whole value must match. Compiled by `build`.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_source = Some(pattern.into());
        self
    }

    pub fn max_lines(mut self, lines: usize) -> Self {
        self.spec.max_lines = Some(lines);
        self
    }

    pub fn element(mut self, element: RuleSpec) -> Self {
        self.spec.element = Some(Box::new(element));
        self
    }

    /// Check the rule and compile its pattern.
    pub fn build(self) -> Result<RuleSpec, RuleError> {
        let mut spec = self.spec;

        if let (Some(min), Some(max)) = (spec.min_size, spec.max_size) {
            if min > max {
                return Err(RuleError::InvertedSize { min, max });
            }
        }

        if spec.min_value.iter().chain(spec.max_value.iter()).any(|v| !v.is_finite()) {
            return Err(RuleError::NonFiniteBound);
        }

        if let (Some(min), Some(max)) = (spec.min_value, spec.max_value) {
            if min > max {
                return Err(RuleError::InvertedValue { min, max });
            }
        }

        if let Some(element) = &spec.element {
            if element.element.is_some() {
                return Err(RuleError::NestedElementRule);
            }
            match spec.type_tag {
                None => spec.type_tag = Some(TypeTag::List),
                Some(TypeTag::List) => {}
                Some(other) => return Err(RuleError::ElementOnScalar(other)),
            }
        }

        if let Some(source) = self.pattern_source {
            spec.pattern = Some(Pattern::new(source)?);
        }

        Ok(spec)
    }
}

/// Flat rule configuration as found in TOML/JSON documents.
///
/// Recognized keys are `label`, `mandatory`, `type`, `min-size`, `max-size`,
/// `min-value`, `max-value`, `regexp`, `max-lines` and `element`; anything
/// else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RuleConfig {
    pub label: Option<String>,
    pub mandatory: bool,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    #[serde(alias = "min_size", alias = "minsize")]
    pub min_size: Option<usize>,
    #[serde(alias = "max_size", alias = "maxsize")]
    pub max_size: Option<usize>,
    #[serde(alias = "min_value", alias = "minvalue")]
    pub min_value: Option<f64>,
    #[serde(alias = "max_value", alias = "maxvalue")]
    pub max_value: Option<f64>,
    #[serde(alias = "pattern")]
    pub regexp: Option<String>,
    #[serde(alias = "max_lines", alias = "maxlines")]
    pub max_lines: Option<usize>,
    pub element: Option<Box<RuleConfig>>,
}

impl TryFrom<RuleConfig> for RuleSpec {
    type Error = RuleError;

    fn try_from(config: RuleConfig) -> Result<Self, Self::Error> {
        let mut builder = RuleSpec::builder().required(config.mandatory);

        if let Some(label) = config.label {
            builder = builder.label(label);
        }
        if let Some(name) = config.type_name {
            builder = builder.type_tag(name.parse()?);
        }
        if let Some(size) = config.min_size {
            builder = builder.min_size(size);
        }
        if let Some(size) = config.max_size {
            builder = builder.max_size(size);
        }
        if let Some(value) = config.min_value {
            builder = builder.min_value(value);
        }
        if let Some(value) = config.max_value {
            builder = builder.max_value(value);
        }
        if let Some(regexp) = config.regexp {
            builder = builder.pattern(regexp);
        }
        if let Some(lines) = config.max_lines {
            builder = builder.max_lines(lines);
        }
        if let Some(element) = config.element {
            builder = builder.element(RuleSpec::try_from(*element)?);
        }

        builder.build()
    }
}

/// Rules keyed by field name, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: IndexMap<String, RuleSpec>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for `name`. A replaced rule keeps its position.
    pub fn field(mut self, name: impl Into<String>, spec: RuleSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: RuleSpec) {
        self.fields.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build from flat configurations, keeping their order.
    pub fn from_config(configs: IndexMap<String, RuleConfig>) -> Result<Self, RuleError> {
        configs
            .into_iter()
            .map(|(name, config)| Ok((name, RuleSpec::try_from(config)?)))
            .collect::<Result<IndexMap<_, _>, RuleError>>()
            .map(|fields| Self { fields })
    }

    /// Parse a JSON object of `field -> rule`.
    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        let configs: IndexMap<String, RuleConfig> =
            serde_json::from_str(json).map_err(|e| RuleError::Parse(e.to_string()))?;
        Self::from_config(configs)
    }

    /// Convert an already-parsed JSON object.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RuleError> {
        let configs: IndexMap<String, RuleConfig> =
            serde_json::from_value(value).map_err(|e| RuleError::Parse(e.to_string()))?;
        Self::from_config(configs)
    }

    /// Parse a TOML document whose tables are fields.
    pub fn from_toml_str(toml: &str) -> Result<Self, RuleError> {
        let configs: IndexMap<String, RuleConfig> =
            toml::from_str(toml).map_err(|e| RuleError::Parse(e.to_string()))?;
        Self::from_config(configs)
    }
}

impl FromIterator<(String, RuleSpec)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, RuleSpec)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_tag_parse() {
        assert_eq!("email".parse::<TypeTag>().unwrap(), TypeTag::Email);
        assert_eq!("positive-number".parse::<TypeTag>().unwrap(), TypeTag::Positive);
        assert_eq!("NEGATIVE_NUMBER".parse::<TypeTag>().unwrap(), TypeTag::Negative);
        assert_eq!("int".parse::<TypeTag>().unwrap(), TypeTag::Integer);
        assert!(matches!("money".parse::<TypeTag>(), Err(RuleError::UnknownType(_))));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let pattern = Pattern::new("[a-z]+").unwrap();
        assert!(pattern.is_full_match("abc"));
        assert!(!pattern.is_full_match("abc1"));
        assert!(!pattern.is_full_match("1abc"));

        let alternation = Pattern::new("cat|dog").unwrap();
        assert!(alternation.is_full_match("dog"));
        assert!(!alternation.is_full_match("catdog"));

        let explicit = Pattern::new("^[A-Za-z0-9+/]+=*$").unwrap();
        assert!(explicit.is_full_match("abc+/=="));
        assert_eq!(explicit.as_str(), "^[A-Za-z0-9+/]+=*$");
    }

    #[test]
    fn test_builder_defaults() {
        let spec = RuleSpec::builder().build().unwrap();
        assert!(!spec.is_mandatory());
        assert_eq!(spec.label(), None);
        assert_eq!(spec.type_tag(), None);
        assert!(spec.pattern().is_none());
    }

    #[test]
    fn test_builder_rejects_invalid_pattern() {
        let err = RuleSpec::builder().pattern("([a-z]").build().unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_builder_rejects_inverted_bounds() {
        assert!(matches!(
            RuleSpec::builder().min_size(5).max_size(2).build(),
            Err(RuleError::InvertedSize { min: 5, max: 2 })
        ));
        assert!(matches!(
            RuleSpec::builder().min_value(1.0).max_value(0.0).build(),
            Err(RuleError::InvertedValue { .. })
        ));
        assert!(matches!(
            RuleSpec::builder().max_value(f64::NAN).build(),
            Err(RuleError::NonFiniteBound)
        ));
    }

    #[test]
    fn test_element_rules() {
        let element = RuleSpec::positive().build().unwrap();

        let implicit = RuleSpec::builder().element(element.clone()).build().unwrap();
        assert_eq!(implicit.type_tag(), Some(TypeTag::List));

        assert!(matches!(
            RuleSpec::string().element(element.clone()).build(),
            Err(RuleError::ElementOnScalar(TypeTag::String))
        ));

        let list = RuleSpec::list_of(element).build().unwrap();
        assert!(matches!(
            RuleSpec::list_of(list).build(),
            Err(RuleError::NestedElementRule)
        ));
    }

    #[test]
    fn test_rule_config_flat_keys() {
        let config: RuleConfig = serde_json::from_value(json!({
            "label": "Token",
            "mandatory": true,
            "min-size": 8,
            "max-size": 64,
            "regexp": "^[A-Za-z0-9+/]+=*$",
            "max-lines": 1,
            "colour": "ignored"
        }))
        .unwrap();

        let spec = RuleSpec::try_from(config).unwrap();
        assert_eq!(spec.label(), Some("Token"));
        assert!(spec.is_mandatory());
        assert_eq!(spec.min_size(), Some(8));
        assert_eq!(spec.max_size(), Some(64));
        assert_eq!(spec.max_lines(), Some(1));
        assert!(spec.pattern().is_some());
    }

    #[test]
    fn test_rule_set_keeps_declaration_order() {
        let rules = RuleSet::from_json_value(json!({
            "zeta": { "type": "integer" },
            "alpha": { "type": "email", "mandatory": true },
            "mid": { "type": "list", "element": { "type": "positive-number" } }
        }))
        .unwrap();

        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(rules.get("mid").and_then(|r| r.element()).and_then(|e| e.type_tag()), Some(TypeTag::Positive));
    }

    #[test]
    fn test_rule_set_from_toml() {
        let rules = RuleSet::from_toml_str(
            r#"
            [username]
            mandatory = true
            min-size = 3

            [age]
            type = "integer"
            min-value = 18
            "#,
        )
        .unwrap();

        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["username", "age"]);
        assert_eq!(rules.get("age").unwrap().min_value(), Some(18.0));
    }

    #[test]
    fn test_rule_set_reports_bad_type() {
        let err = RuleSet::from_json_str(r#"{"a": {"type": "money"}}"#).unwrap_err();
        assert!(matches!(err, RuleError::UnknownType(ref t) if t == "money"));
        assert!(matches!(RuleSet::from_json_str("[1, 2]"), Err(RuleError::Parse(_))));
    }

    #[test]
    fn test_rule_set_replace_keeps_position() {
        let rules = RuleSet::new()
            .field("a", RuleSpec::string().build().unwrap())
            .field("b", RuleSpec::string().build().unwrap())
            .field("a", RuleSpec::integer().build().unwrap());

        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rules.get("a").unwrap().type_tag(), Some(TypeTag::Integer));
    }
}
