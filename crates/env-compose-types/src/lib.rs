//! Environment Compose Types
//!
//! Data model shared by the resolution engine and its stores: references,
//! stored configuration objects, resolution policy and the type tag stamped
//! on every produced environment.

pub mod object;
pub mod policy;
pub mod reference;
pub mod tag;

pub use object::{ConfigObject, ObjectMeta};
pub use policy::{
    CompositeEnvironmentSpec, EnvironmentConfiguration, EnvironmentPolicy, ResolutionPolicy,
};
pub use reference::ConfigReference;
pub use tag::TypeTag;

/// Annotation holding a config's merge weight. Higher weights override lower ones.
pub const WEIGHT_ANNOTATION: &str = "environmentconfig.crossplane.io/weight";

/// Weight assigned to configs without a weight annotation.
pub const DEFAULT_WEIGHT: i64 = -1;

/// Group of the type tag stamped on environments.
pub const ENVIRONMENT_GROUP: &str = "internal.crossplane.io";

/// Version of the type tag stamped on environments.
pub const ENVIRONMENT_VERSION: &str = "v1alpha1";

/// Kind of the type tag stamped on environments.
pub const ENVIRONMENT_KIND: &str = "Environment";
