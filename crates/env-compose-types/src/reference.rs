//! References from a consuming resource to stored configs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names a stored configuration object.
///
/// A resource's reference list order is the fetch order, and the tie-break
/// order for configs of equal weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigReference {
    pub name: String,
}

impl ConfigReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for ConfigReference {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ConfigReference {
    fn from(name: String) -> Self {
        Self { name }
    }
}

impl fmt::Display for ConfigReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
