//! Type tag stamped on produced environments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-part type tag (group, version, kind).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl TypeTag {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// `group/version`, or just `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl Default for TypeTag {
    fn default() -> Self {
        Self::new(
            crate::ENVIRONMENT_GROUP,
            crate::ENVIRONMENT_VERSION,
            crate::ENVIRONMENT_KIND,
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tag() {
        let tag = TypeTag::default();
        assert_eq!(tag.api_version(), "internal.crossplane.io/v1alpha1");
        assert_eq!(tag.kind, "Environment");
        assert_eq!(tag.to_string(), "internal.crossplane.io/v1alpha1, Kind=Environment");
    }

    #[test]
    fn test_core_group_api_version() {
        let tag = TypeTag::new("", "v1", "ConfigMap");
        assert_eq!(tag.api_version(), "v1");
    }
}
