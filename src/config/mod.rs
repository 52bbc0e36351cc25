//! Weighted merge engine
//!
//! - `merge`: deep merge of config trees
//! - `weight`: weight extraction from annotations
//! - `defaults`: well-known constants passed to the builder

mod convert;
mod defaults;
mod merge;
mod weight;

pub use convert::toml_to_json;
pub use defaults::BuilderConstants;
pub use merge::{
    deep_merge, merge_all, merge_layers, merge_maps, normalize_data, MergeError, Tree,
};
pub use weight::{WeightExtractor, WeightParseError};
