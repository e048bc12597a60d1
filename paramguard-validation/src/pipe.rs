// Validation pipe for raw JSON payloads

use crate::{CheckError, RuleSet, ValidationEngine, ValidationError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parses JSON bodies and checks them against a fixed rule set
pub struct ValidationPipe {
    engine: ValidationEngine,
    rules: RuleSet,
}

impl ValidationPipe {
    pub fn new(engine: ValidationEngine, rules: RuleSet) -> Self {
        Self { engine, rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Parse and check a JSON body, returning the parsed value.
    pub fn parse(&self, body: &[u8]) -> Result<Value, CheckError> {
        let value: Value = serde_json::from_slice(body)?;
        self.engine.check(&value, &self.rules)?;
        Ok(value)
    }

    /// Parse, check, then deserialize into `T`.
    pub fn parse_into<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, CheckError> {
        let value = self.parse(body)?;
        Ok(serde_json::from_value(value)?)
    }

    /// JSON body describing a validation failure
    pub fn error_body(error: &ValidationError) -> Vec<u8> {
        error.to_json().to_string().into_bytes()
    }
}
