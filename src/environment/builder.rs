//! Environment builder
//!
//! Orchestrates resolve → sort → merge → stamp for one consuming resource.

use tracing::debug;

use env_compose_types::{CompositeEnvironmentSpec, ConfigReference, ResolutionPolicy};

use super::{
    sort_by_weight, BuildError, Environment, EnvironmentSource, ReferenceResolver, WeightedConfig,
};
use crate::config::{merge_maps, normalize_data, BuilderConstants, Tree, WeightExtractor};
use crate::fetch::{ConfigFetcher, FetchContext};

/// Builds environments from configs held by a store
#[derive(Debug)]
pub struct EnvironmentBuilder<F> {
    fetcher: F,
    constants: BuilderConstants,
    weights: WeightExtractor,
}

impl<F: ConfigFetcher> EnvironmentBuilder<F> {
    /// Create a builder with the well-known constants
    pub fn new(fetcher: F) -> Self {
        Self::with_constants(fetcher, BuilderConstants::default())
    }

    pub fn with_constants(fetcher: F, constants: BuilderConstants) -> Self {
        let weights = WeightExtractor::from_constants(&constants);
        Self {
            fetcher,
            constants,
            weights,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn constants(&self) -> &BuilderConstants {
        &self.constants
    }

    /// Build the environment for a consuming resource
    pub fn build_for(
        &self,
        ctx: &FetchContext,
        composite: &CompositeEnvironmentSpec,
    ) -> Result<Environment, BuildError> {
        self.build(ctx, composite.references(), composite.resolution_policy())
    }

    /// Build the environment for an ordered reference list.
    ///
    /// An empty list produces the empty environment without touching the
    /// store. Otherwise either every step succeeds or the first error is
    /// returned; there is no partial environment.
    pub fn build(
        &self,
        ctx: &FetchContext,
        refs: &[ConfigReference],
        policy: ResolutionPolicy,
    ) -> Result<Environment, BuildError> {
        if refs.is_empty() {
            return Ok(Environment::empty(self.constants.type_tag.clone()));
        }

        let resolved = ReferenceResolver::new(&self.fetcher, &self.weights, policy)
            .resolve(ctx, refs)?;
        let sorted = sort_by_weight(resolved);

        debug!(
            order = ?sorted.iter().map(|c| c.object.name()).collect::<Vec<_>>(),
            "merging configs"
        );

        let (data, sources) = merge_configs(sorted)?;
        Ok(Environment::new(self.constants.type_tag.clone(), data, sources))
    }
}

/// Left-fold the configs' data in the given order
fn merge_configs(
    configs: Vec<WeightedConfig>,
) -> Result<(Tree, Vec<EnvironmentSource>), BuildError> {
    let mut merged = Tree::new();
    let mut sources = Vec::with_capacity(configs.len());

    for WeightedConfig { object, weight } in configs {
        let data = normalize_data(object.name(), object.data.as_ref())?;
        merged = merge_maps(merged, data);
        sources.push(EnvironmentSource {
            name: object.metadata.name,
            weight,
            digest: object.digest,
        });
    }

    Ok((merged, sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::BuildStage;
    use crate::fetch::MemoryStore;
    use env_compose_types::{ConfigObject, TypeTag, WEIGHT_ANNOTATION};
    use serde_json::{json, Value};

    fn weighted(name: &str, weight: Option<&str>, data: Value) -> ConfigObject {
        let obj = ConfigObject::new(name).with_data(data);
        match weight {
            Some(w) => obj.with_annotation(WEIGHT_ANNOTATION, w),
            None => obj,
        }
    }

    fn refs(names: &[&str]) -> Vec<ConfigReference> {
        names.iter().map(|n| ConfigReference::new(*n)).collect()
    }

    #[test]
    fn test_empty_refs_skip_store() {
        let builder = EnvironmentBuilder::new(MemoryStore::new());
        let env = builder
            .build(&FetchContext::new(), &[], ResolutionPolicy::Required)
            .unwrap();

        assert!(env.is_empty());
        assert_eq!(env.type_tag(), &TypeTag::default());
        assert_eq!(builder.fetcher().call_count(), 0);
    }

    #[test]
    fn test_empty_refs_ignore_cancellation() {
        let builder = EnvironmentBuilder::new(MemoryStore::new());
        let ctx = FetchContext::new();
        ctx.cancel();

        assert!(builder.build(&ctx, &[], ResolutionPolicy::Required).is_ok());
    }

    #[test]
    fn test_weighted_merge() {
        let store = MemoryStore::new()
            .with_object(weighted("a", Some("1"), json!({"x": 1, "y": {"a": 1}})))
            .with_object(weighted("b", Some("5"), json!({"y": {"b": 2}, "z": 3})));
        let builder = EnvironmentBuilder::new(store);

        let env = builder
            .build(&FetchContext::new(), &refs(&["b", "a"]), ResolutionPolicy::Required)
            .unwrap();

        assert_eq!(
            Value::Object(env.data().clone()),
            json!({"x": 1, "y": {"a": 1, "b": 2}, "z": 3})
        );
        let order: Vec<_> = env.sources().iter().map(|s| (s.name.as_str(), s.weight)).collect();
        assert_eq!(order, vec![("a", 1), ("b", 5)]);
    }

    #[test]
    fn test_unweighted_sorts_first() {
        let store = MemoryStore::new()
            .with_object(weighted("c", None, json!({"k": "from-c", "only_c": true})))
            .with_object(weighted("d", Some("0"), json!({"k": "from-d"})));
        let builder = EnvironmentBuilder::new(store);

        let env = builder
            .build(&FetchContext::new(), &refs(&["d", "c"]), ResolutionPolicy::Required)
            .unwrap();

        assert_eq!(env.get("k"), Some(&json!("from-d")));
        assert_eq!(env.get("only_c"), Some(&json!(true)));
    }

    #[test]
    fn test_equal_weights_keep_reference_order() {
        let store = MemoryStore::new()
            .with_object(weighted("one", Some("3"), json!({"k": 1})))
            .with_object(weighted("two", Some("3"), json!({"k": 2})));
        let builder = EnvironmentBuilder::new(store);

        let env = builder
            .build(&FetchContext::new(), &refs(&["two", "one"]), ResolutionPolicy::Required)
            .unwrap();
        assert_eq!(env.get("k"), Some(&json!(1)));

        let env = builder
            .build(&FetchContext::new(), &refs(&["one", "two"]), ResolutionPolicy::Required)
            .unwrap();
        assert_eq!(env.get("k"), Some(&json!(2)));
    }

    #[test]
    fn test_nil_data_contributes_nothing() {
        let store = MemoryStore::new()
            .with_object(weighted("full", Some("1"), json!({"k": "v"})))
            .with_object(ConfigObject::new("blank").with_annotation(WEIGHT_ANNOTATION, "9"))
            .with_object(weighted("null", Some("10"), Value::Null));
        let builder = EnvironmentBuilder::new(store);

        let env = builder
            .build(
                &FetchContext::new(),
                &refs(&["full", "blank", "null"]),
                ResolutionPolicy::Required,
            )
            .unwrap();

        assert_eq!(Value::Object(env.data().clone()), json!({"k": "v"}));
        assert_eq!(env.sources().len(), 3);
    }

    #[test]
    fn test_non_object_data_fails_merge() {
        let store = MemoryStore::new().with_object(weighted("list", None, json!(["a"])));
        let builder = EnvironmentBuilder::new(store);

        let err = builder
            .build(&FetchContext::new(), &refs(&["list"]), ResolutionPolicy::Optional)
            .unwrap_err();
        assert_eq!(err.stage(), BuildStage::Merge);
        assert!(err.to_string().starts_with("failed to merge data"));
    }

    #[test]
    fn test_required_missing_fails() {
        let builder = EnvironmentBuilder::new(MemoryStore::new());
        let err = builder
            .build(&FetchContext::new(), &refs(&["ghost"]), ResolutionPolicy::Required)
            .unwrap_err();

        assert_eq!(err.stage(), BuildStage::Fetch);
        assert!(err.to_string().starts_with("failed to get config from reference"));
    }

    #[test]
    fn test_optional_all_missing_is_empty() {
        let builder = EnvironmentBuilder::new(MemoryStore::new());
        let env = builder
            .build(&FetchContext::new(), &refs(&["x", "y"]), ResolutionPolicy::Optional)
            .unwrap();

        assert!(env.is_empty());
        assert!(env.sources().is_empty());
        assert_eq!(builder.fetcher().call_count(), 2);
    }

    #[test]
    fn test_custom_constants() {
        let constants = BuilderConstants {
            weight_annotation: "example.org/rank".to_string(),
            default_weight: 100,
            type_tag: TypeTag::new("example.org", "v1", "Settings"),
        };
        let store = MemoryStore::new()
            .with_object(weighted("plain", None, json!({"k": "plain"})))
            .with_object(
                ConfigObject::new("ranked")
                    .with_annotation("example.org/rank", "50")
                    .with_data(json!({"k": "ranked"})),
            );
        let builder = EnvironmentBuilder::with_constants(store, constants);

        let env = builder
            .build(&FetchContext::new(), &refs(&["plain", "ranked"]), ResolutionPolicy::Required)
            .unwrap();

        // plain defaults to 100, so it outranks 50
        assert_eq!(env.get("k"), Some(&json!("plain")));
        assert_eq!(env.to_value()["apiVersion"], "example.org/v1");
        assert_eq!(env.to_value()["kind"], "Settings");
    }

    #[test]
    fn test_build_for_uses_composite_policy() {
        let store = MemoryStore::new().with_object(weighted("a", None, json!({"a": 1})));
        let builder = EnvironmentBuilder::new(store);

        let required = CompositeEnvironmentSpec::new(["a", "ghost"]);
        assert!(builder.build_for(&FetchContext::new(), &required).is_err());

        let optional = required.with_policy(ResolutionPolicy::Optional);
        let env = builder.build_for(&FetchContext::new(), &optional).unwrap();
        assert_eq!(env.get("a"), Some(&json!(1)));
    }
}
