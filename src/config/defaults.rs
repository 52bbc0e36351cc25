//! Well-known constants handed to the environment builder

use env_compose_types::{TypeTag, DEFAULT_WEIGHT, WEIGHT_ANNOTATION};

/// Fixed values the builder works with.
///
/// `Default` carries the well-known literals; tests and embedders may pass
/// their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConstants {
    /// Annotation key holding a config's weight
    pub weight_annotation: String,

    /// Weight of configs without the annotation
    pub default_weight: i64,

    /// Tag stamped on every produced environment
    pub type_tag: TypeTag,
}

impl Default for BuilderConstants {
    fn default() -> Self {
        Self {
            weight_annotation: WEIGHT_ANNOTATION.to_string(),
            default_weight: DEFAULT_WEIGHT,
            type_tag: TypeTag::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let constants = BuilderConstants::default();
        assert_eq!(constants.weight_annotation, "environmentconfig.crossplane.io/weight");
        assert_eq!(constants.default_weight, -1);
        assert_eq!(constants.type_tag.group, "internal.crossplane.io");
        assert_eq!(constants.type_tag.version, "v1alpha1");
        assert_eq!(constants.type_tag.kind, "Environment");
    }
}
