//! Environment Compose - weighted, layered environment resolution
//!
//! Resolves a consuming resource's ordered config references against a
//! store, orders the configs by weight and deep-merges their data into a
//! single type-tagged environment.

pub mod config;
pub mod environment;
pub mod fetch;
pub mod settings;
pub mod signal;

pub use env_compose_types as types;

pub use config::{
    merge_all, merge_maps, BuilderConstants, MergeError, WeightExtractor, WeightParseError,
};
pub use environment::{
    ApiEnvironmentFetcher, BuildError, BuildStage, Environment, EnvironmentBuilder,
    EnvironmentFetcher, EnvironmentSource, NilEnvironmentFetcher,
};
pub use fetch::{ConfigFetcher, DirectoryStore, FetchContext, FetchError, MemoryStore};
pub use types::{
    CompositeEnvironmentSpec, ConfigObject, ConfigReference, ResolutionPolicy, TypeTag,
};
