//! Environment resolution
//!
//! Builds a single environment for a consuming resource:
//! 1. Resolve references against a store (policy decides on missing ones)
//! 2. Stable-sort the resolved configs by ascending weight
//! 3. Left-fold deep merge of their data
//! 4. Stamp the result with the environment type tag

mod builder;
mod error;
mod fetcher;
mod resolver;
mod sort;

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use env_compose_types::TypeTag;

use crate::config::Tree;

pub use builder::EnvironmentBuilder;
pub use error::{BuildError, BuildStage};
pub use fetcher::{ApiEnvironmentFetcher, EnvironmentFetcher, NilEnvironmentFetcher};
pub use resolver::{ReferenceResolver, WeightedConfig};
pub use sort::sort_by_weight;

/// A config that contributed to an environment
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EnvironmentSource {
    pub name: String,
    pub weight: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged, type-tagged data produced for one consuming resource.
///
/// Serializes as the merged tree with `apiVersion` and `kind` set at the
/// top level. `sources` is provenance only and is not serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    type_tag: TypeTag,
    data: Tree,
    sources: Vec<EnvironmentSource>,
}

impl Environment {
    pub fn new(type_tag: TypeTag, data: Tree, sources: Vec<EnvironmentSource>) -> Self {
        Self {
            type_tag,
            data,
            sources,
        }
    }

    /// Environment with no data
    pub fn empty(type_tag: TypeTag) -> Self {
        Self::new(type_tag, Tree::new(), Vec::new())
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    /// The merged data, without the type tag
    pub fn data(&self) -> &Tree {
        &self.data
    }

    /// Contributing configs in merge order (lowest precedence first)
    pub fn sources(&self) -> &[EnvironmentSource] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a data value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.data.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// The stamped tree: data plus `apiVersion` and `kind`
    pub fn to_object(&self) -> Tree {
        let mut object = self.data.clone();
        object.insert(
            "apiVersion".to_string(),
            Value::String(self.type_tag.api_version()),
        );
        object.insert("kind".to_string(), Value::String(self.type_tag.kind.clone()));
        object
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_object().serialize(serializer)
    }
}
