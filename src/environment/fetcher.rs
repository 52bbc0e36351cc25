//! Environment fetchers
//!
//! The seam a composition controller calls into. `NilEnvironmentFetcher`
//! disables environments entirely; `ApiEnvironmentFetcher` builds them from
//! a config store.

use env_compose_types::CompositeEnvironmentSpec;

use super::{BuildError, Environment, EnvironmentBuilder};
use crate::fetch::{ConfigFetcher, FetchContext};

/// Produces the environment of a consuming resource, if any
pub trait EnvironmentFetcher {
    fn fetch(
        &self,
        ctx: &FetchContext,
        composite: &CompositeEnvironmentSpec,
    ) -> Result<Option<Environment>, BuildError>;
}

/// Always returns no environment
#[derive(Debug, Clone, Copy, Default)]
pub struct NilEnvironmentFetcher;

impl NilEnvironmentFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentFetcher for NilEnvironmentFetcher {
    fn fetch(
        &self,
        _ctx: &FetchContext,
        _composite: &CompositeEnvironmentSpec,
    ) -> Result<Option<Environment>, BuildError> {
        Ok(None)
    }
}

/// Builds environments from a config store
#[derive(Debug)]
pub struct ApiEnvironmentFetcher<F> {
    builder: EnvironmentBuilder<F>,
}

impl<F: ConfigFetcher> ApiEnvironmentFetcher<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            builder: EnvironmentBuilder::new(fetcher),
        }
    }

    pub fn builder(&self) -> &EnvironmentBuilder<F> {
        &self.builder
    }
}

impl<F: ConfigFetcher> EnvironmentFetcher for ApiEnvironmentFetcher<F> {
    fn fetch(
        &self,
        ctx: &FetchContext,
        composite: &CompositeEnvironmentSpec,
    ) -> Result<Option<Environment>, BuildError> {
        self.builder.build_for(ctx, composite).map(Some)
    }
}
