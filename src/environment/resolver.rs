//! Reference resolution
//!
//! Fetches references one at a time, in list order. A missing reference is
//! skipped under the optional policy and aborts the build otherwise. Any
//! other fetch failure, including cancellation, and any malformed weight
//! abort the build regardless of policy.

use tracing::{debug, warn};

use env_compose_types::{ConfigObject, ConfigReference, ResolutionPolicy};

use super::BuildError;
use crate::config::WeightExtractor;
use crate::fetch::{ConfigFetcher, FetchContext};

/// A fetched config with its merge weight
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedConfig {
    pub object: ConfigObject,
    pub weight: i64,
}

/// Resolves references against a store
pub struct ReferenceResolver<'a, F: ConfigFetcher + ?Sized> {
    fetcher: &'a F,
    weights: &'a WeightExtractor,
    policy: ResolutionPolicy,
}

impl<'a, F: ConfigFetcher + ?Sized> ReferenceResolver<'a, F> {
    pub fn new(fetcher: &'a F, weights: &'a WeightExtractor, policy: ResolutionPolicy) -> Self {
        Self {
            fetcher,
            weights,
            policy,
        }
    }

    /// Fetch and weigh every reference
    ///
    /// Returns configs in fetch order, or the first fatal error.
    pub fn resolve(
        &self,
        ctx: &FetchContext,
        refs: &[ConfigReference],
    ) -> Result<Vec<WeightedConfig>, BuildError> {
        let mut resolved = Vec::with_capacity(refs.len());

        for reference in refs {
            let fetched = ctx
                .check()
                .and_then(|()| self.fetcher.get(ctx, &reference.name));

            let object = match fetched {
                Ok(object) => object,
                Err(err) if self.policy.is_optional() && err.is_not_found() => {
                    warn!(reference = %reference.name, "skipping missing optional config");
                    continue;
                }
                Err(source) => {
                    return Err(BuildError::Fetch {
                        name: reference.name.clone(),
                        source,
                    })
                }
            };

            let weight = self.weights.extract(&object)?;
            debug!(reference = %reference.name, weight, "resolved config");

            resolved.push(WeightedConfig { object, weight });
        }

        Ok(resolved)
    }
}
