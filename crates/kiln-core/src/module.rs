use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Identity of a publishable module: group plus name, without version.
///
/// Used as a map/set key throughout resolution; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    pub group: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse `"group:name"` into a module id.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }

    /// Pair this id with a version.
    pub fn with_version(&self, version: Version) -> VersionedModule {
        VersionedModule {
            module_id: self.clone(),
            version,
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// A module id paired with a concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionedModule {
    pub module_id: ModuleId,
    pub version: Version,
}

impl fmt::Display for VersionedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module_id, self.version)
    }
}

/// Policy for reconciling two declared version constraints on the same
/// module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    /// Surface an error naming the module and both versions.
    Fail,
    /// The earliest-declared entry silently wins.
    TakeFirst,
}
