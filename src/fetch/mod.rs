//! Config retrieval
//!
//! Abstracts the backing store for testability. Provides:
//! - ConfigFetcher trait: interface for named config lookup
//! - FetchContext: cancellation and deadline passed through every fetch
//! - MemoryStore: in-process store with failure injection
//! - DirectoryStore: JSON/TOML documents in a directory

mod context;
mod directory;
mod error;
mod memory;

use std::sync::Arc;

use env_compose_types::ConfigObject;

pub use context::FetchContext;
pub use directory::DirectoryStore;
pub use error::FetchError;
pub use memory::MemoryStore;

/// Retrieves named configuration objects.
///
/// Implementations should honor `ctx` for blocking work. The caller does not
/// retry; every error is final for the build that triggered it.
pub trait ConfigFetcher: Send + Sync {
    fn get(&self, ctx: &FetchContext, name: &str) -> Result<ConfigObject, FetchError>;
}

impl<T: ConfigFetcher + ?Sized> ConfigFetcher for &T {
    fn get(&self, ctx: &FetchContext, name: &str) -> Result<ConfigObject, FetchError> {
        (**self).get(ctx, name)
    }
}

impl<T: ConfigFetcher + ?Sized> ConfigFetcher for Box<T> {
    fn get(&self, ctx: &FetchContext, name: &str) -> Result<ConfigObject, FetchError> {
        (**self).get(ctx, name)
    }
}

impl<T: ConfigFetcher + ?Sized> ConfigFetcher for Arc<T> {
    fn get(&self, ctx: &FetchContext, name: &str) -> Result<ConfigObject, FetchError> {
        (**self).get(ctx, name)
    }
}
