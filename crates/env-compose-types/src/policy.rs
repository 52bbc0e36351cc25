//! Resolution policy and the consuming resource's view of its environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::reference::ConfigReference;

/// Whether a missing referenced config is tolerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    /// A missing reference aborts the build
    #[default]
    #[serde(alias = "required")]
    Required,
    /// Missing references are skipped
    #[serde(alias = "optional")]
    Optional,
}

impl ResolutionPolicy {
    pub fn is_optional(&self) -> bool {
        matches!(self, ResolutionPolicy::Optional)
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "Required"),
            Self::Optional => write!(f, "Optional"),
        }
    }
}

impl FromStr for ResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            other => Err(format!(
                "unknown resolution policy '{}' (expected required or optional)",
                other
            )),
        }
    }
}

/// Policy block of an environment configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionPolicy>,
}

/// Environment section of a composition revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<EnvironmentPolicy>,
}

/// What a consuming resource contributes to environment resolution: its
/// ordered reference list and, optionally, the environment section of the
/// revision it was composed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeEnvironmentSpec {
    #[serde(default)]
    pub environment_config_refs: Vec<ConfigReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentConfiguration>,
}

impl CompositeEnvironmentSpec {
    pub fn new(refs: impl IntoIterator<Item = impl Into<ConfigReference>>) -> Self {
        Self {
            environment_config_refs: refs.into_iter().map(Into::into).collect(),
            environment: None,
        }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.environment = Some(EnvironmentConfiguration {
            policy: Some(EnvironmentPolicy {
                resolution: Some(policy),
            }),
        });
        self
    }

    pub fn references(&self) -> &[ConfigReference] {
        &self.environment_config_refs
    }

    /// Policy spelled out on the resource, if any
    pub fn explicit_resolution_policy(&self) -> Option<ResolutionPolicy> {
        self.environment
            .as_ref()
            .and_then(|env| env.policy.as_ref())
            .and_then(|policy| policy.resolution)
    }

    /// Effective policy; anything not spelled out is `Required`
    pub fn resolution_policy(&self) -> ResolutionPolicy {
        self.explicit_resolution_policy().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_defaults_to_required() {
        assert_eq!(ResolutionPolicy::default(), ResolutionPolicy::Required);

        let spec = CompositeEnvironmentSpec::new(["a"]);
        assert_eq!(spec.resolution_policy(), ResolutionPolicy::Required);
        assert_eq!(spec.explicit_resolution_policy(), None);

        let spec = CompositeEnvironmentSpec {
            environment_config_refs: vec![],
            environment: Some(EnvironmentConfiguration { policy: None }),
        };
        assert_eq!(spec.resolution_policy(), ResolutionPolicy::Required);

        let spec = CompositeEnvironmentSpec {
            environment_config_refs: vec![],
            environment: Some(EnvironmentConfiguration {
                policy: Some(EnvironmentPolicy { resolution: None }),
            }),
        };
        assert_eq!(spec.resolution_policy(), ResolutionPolicy::Required);
    }

    #[test]
    fn test_with_policy() {
        let spec =
            CompositeEnvironmentSpec::new(["a", "b"]).with_policy(ResolutionPolicy::Optional);
        assert!(spec.resolution_policy().is_optional());
        assert_eq!(spec.references().len(), 2);
        assert_eq!(spec.references()[1].name, "b");
    }

    #[test]
    fn test_deserialize_spec() {
        let spec: CompositeEnvironmentSpec = serde_json::from_value(json!({
            "environmentConfigRefs": [{"name": "base"}, {"name": "prod"}],
            "environment": {"policy": {"resolution": "Optional"}}
        }))
        .unwrap();

        assert_eq!(spec.references()[0].name, "base");
        assert_eq!(spec.resolution_policy(), ResolutionPolicy::Optional);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Optional".parse::<ResolutionPolicy>().unwrap(), ResolutionPolicy::Optional);
        assert_eq!("required".parse::<ResolutionPolicy>().unwrap(), ResolutionPolicy::Required);
        assert!("sometimes".parse::<ResolutionPolicy>().is_err());
    }
}
