//! In-process config store
//!
//! Holds objects in memory, records every lookup and supports per-name
//! failure injection for exercising error paths.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use env_compose_types::ConfigObject;

use super::{ConfigFetcher, FetchContext, FetchError};

/// In-memory [`ConfigFetcher`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<String, ConfigObject>,
    failures: Mutex<HashMap<String, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `object` under its metadata name, replacing any previous one
    pub fn insert(&mut self, object: ConfigObject) {
        self.objects.insert(object.name().to_string(), object);
    }

    pub fn with_object(mut self, object: ConfigObject) -> Self {
        self.insert(object);
        self
    }

    /// Make every lookup of `name` fail with `error`
    pub fn inject_error(&self, name: impl Into<String>, error: FetchError) {
        lock(&self.failures).insert(name.into(), error);
    }

    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
    }

    /// Names looked up so far, in call order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ConfigFetcher for MemoryStore {
    fn get(&self, ctx: &FetchContext, name: &str) -> Result<ConfigObject, FetchError> {
        lock(&self.calls).push(name.to_string());

        ctx.check()?;

        let injected = lock(&self.failures).get(name).cloned();
        if let Some(error) = injected {
            return Err(error);
        }

        self.objects
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::not_found(name))
    }
}

// A panicking test must not turn later injections into silent no-ops.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
