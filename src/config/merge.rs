//! Deep merge of tree-shaped config data
//!
//! Merge semantics:
//! - Objects: deep-merge by key (recursive)
//! - Arrays: REPLACE (later wins entirely)
//! - Scalars: override (later wins)
//! - Type mismatch (object vs anything else): later wins entirely

use serde_json::{Map, Value};

/// A key/value tree, the unit the environment is merged from
pub type Tree = Map<String, Value>;

/// Payload normalization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("data of config '{name}' is a {found}, expected an object")]
    NotAMap { name: String, found: &'static str },
}

/// Merge `overlay` into `base`.
///
/// Keys present only in `base` are kept. For keys in both, two objects are
/// merged recursively and anything else is replaced by the overlay value.
pub fn merge_maps(mut base: Tree, overlay: Tree) -> Tree {
    for (key, overlay_value) in overlay {
        let merged = match (base.remove(&key), overlay_value) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                Value::Object(merge_maps(base_map, overlay_map))
            }
            (_, overlay_value) => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Left-fold `merge_maps` over `trees`, starting from the empty tree.
///
/// Later trees take precedence over earlier ones.
pub fn merge_all<I>(trees: I) -> Tree
where
    I: IntoIterator<Item = Tree>,
{
    trees.into_iter().fold(Tree::new(), merge_maps)
}

/// Deep merge two JSON values.
///
/// Two objects merge as in [`merge_maps`]; in every other case the overlay
/// wins, including `null`.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

/// Interpret a config's raw payload as a tree.
///
/// Absent and `null` payloads are the empty tree.
pub fn normalize_data(name: &str, data: Option<&Value>) -> Result<Tree, MergeError> {
    match data {
        None | Some(Value::Null) => Ok(Tree::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(MergeError::NotAMap {
            name: name.to_string(),
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
