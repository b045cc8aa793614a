//! Version values and version providers.
//!
//! A [`Version`] is a plain string value with a distinguished unspecified
//! sentinel. The core never orders versions itself: conflict resolution
//! ordering is supplied by the caller, only same-value equality is
//! intrinsic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::module::ModuleId;

/// A string-backed version value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version {
    value: String,
}

impl Version {
    /// Sentinel for a dependency declared without a version.
    pub const UNSPECIFIED: &'static str = "";

    pub fn of(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn unspecified() -> Self {
        Self::of(Self::UNSPECIFIED)
    }

    pub fn is_unspecified(&self) -> bool {
        self.value == Self::UNSPECIFIED
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            f.write_str("unspecified")
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A mapping from module id to version, used to fill in dependencies
/// declared without a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionProvider {
    versions: BTreeMap<ModuleId, Version>,
}

impl VersionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider holding a single entry.
    pub fn of(module_id: ModuleId, version: Version) -> Self {
        let mut versions = BTreeMap::new();
        versions.insert(module_id, version);
        Self { versions }
    }

    /// Left-biased union: on key collision the entry of `self` is kept.
    ///
    /// Composition is associative but not commutative.
    pub fn and(&self, other: &VersionProvider) -> Self {
        let mut versions = other.versions.clone();
        for (id, version) in &self.versions {
            versions.insert(id.clone(), version.clone());
        }
        Self { versions }
    }

    /// Add a single entry, keeping any existing one for the same module.
    pub fn and_version(&self, module_id: ModuleId, version: Version) -> Self {
        self.and(&VersionProvider::of(module_id, version))
    }

    pub fn version_of(&self, module_id: &ModuleId) -> Option<&Version> {
        self.versions.get(module_id)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &Version)> {
        self.versions.iter()
    }
}
