//! Merge weight extraction
//!
//! A config's weight comes from a string annotation parsed as a base-10
//! signed integer. Missing annotations get the default weight, which sorts
//! first (lowest precedence). A malformed annotation is always an error.

use std::collections::BTreeMap;
use std::num::ParseIntError;

use env_compose_types::ConfigObject;

use super::defaults::BuilderConstants;

/// Weight annotation present but not an integer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("config '{name}' has invalid weight '{value}': {source}")]
pub struct WeightParseError {
    pub name: String,
    pub value: String,
    #[source]
    pub source: ParseIntError,
}

/// Reads weights from object annotations
#[derive(Debug, Clone)]
pub struct WeightExtractor {
    key: String,
    default_weight: i64,
}

impl WeightExtractor {
    pub fn new(key: impl Into<String>, default_weight: i64) -> Self {
        Self {
            key: key.into(),
            default_weight,
        }
    }

    pub fn from_constants(constants: &BuilderConstants) -> Self {
        Self::new(constants.weight_annotation.clone(), constants.default_weight)
    }

    /// Weight of `object`
    pub fn extract(&self, object: &ConfigObject) -> Result<i64, WeightParseError> {
        self.from_annotations(object.name(), object.annotations())
    }

    pub fn from_annotations(
        &self,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<i64, WeightParseError> {
        match annotations.get(&self.key) {
            None => Ok(self.default_weight),
            Some(raw) => raw.parse::<i64>().map_err(|source| WeightParseError {
                name: name.to_string(),
                value: raw.clone(),
                source,
            }),
        }
    }
}

impl Default for WeightExtractor {
    fn default() -> Self {
        Self::from_constants(&BuilderConstants::default())
    }
}
