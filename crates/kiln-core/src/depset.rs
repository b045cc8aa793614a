//! Ordered sets of qualified dependency declarations.
//!
//! Declaration order is semantically meaningful: traversal-based
//! algorithms break ties in favor of the earliest declared entry.

use std::collections::BTreeSet;
use std::fmt;

use kiln_util::errors::{KilnError, KilnResult};

use crate::dependency::{Dependency, Exclusion, ModuleDependency};
use crate::module::{ConflictStrategy, ModuleId};
use crate::version::VersionProvider;

/// A dependency declaration tagged with an opaque qualifier.
///
/// The qualifier is a scope name, an Ivy configuration-mapping expression,
/// or absent. The core never interprets its syntax, only compares and
/// propagates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedDependency {
    pub qualifier: Option<String>,
    pub dependency: Dependency,
}

impl QualifiedDependency {
    pub fn of(qualifier: Option<String>, dependency: Dependency) -> Self {
        Self {
            qualifier,
            dependency,
        }
    }

    pub fn with_qualifier(&self, qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            dependency: self.dependency.clone(),
        }
    }

    pub fn as_module(&self) -> Option<&ModuleDependency> {
        self.dependency.as_module()
    }
}

impl fmt::Display for QualifiedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}: {}", qualifier, self.dependency),
            None => self.dependency.fmt(f),
        }
    }
}

/// An ordered list of qualified dependencies plus the global exclusions
/// and version provider that apply when resolving them.
///
/// Global exclusions only apply to transitively fetched dependencies,
/// never to entries declared here. All mutators return a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifiedDependencySet {
    entries: Vec<QualifiedDependency>,
    global_exclusions: BTreeSet<Exclusion>,
    version_provider: VersionProvider,
}

impl QualifiedDependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set of unqualified entries.
    pub fn of_dependencies(dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        Self {
            entries: dependencies
                .into_iter()
                .map(|dependency| QualifiedDependency::of(None, dependency))
                .collect(),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[QualifiedDependency] {
        &self.entries
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter().map(|entry| &entry.dependency)
    }

    pub fn module_dependencies(&self) -> impl Iterator<Item = &ModuleDependency> {
        self.entries.iter().filter_map(QualifiedDependency::as_module)
    }

    pub fn global_exclusions(&self) -> &BTreeSet<Exclusion> {
        &self.global_exclusions
    }

    pub fn version_provider(&self) -> &VersionProvider {
        &self.version_provider
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append an entry, preserving the existing ones.
    pub fn and(&self, qualifier: Option<&str>, dependency: Dependency) -> Self {
        self.and_qualified(QualifiedDependency::of(
            qualifier.map(str::to_string),
            dependency,
        ))
    }

    pub fn and_qualified(&self, entry: QualifiedDependency) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self {
            entries,
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.clone(),
        }
    }

    /// Remove every entry whose dependency is structurally equal to the
    /// argument. No error if absent.
    pub fn remove(&self, dependency: &Dependency) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.dependency != *dependency)
                .cloned()
                .collect(),
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.clone(),
        }
    }

    /// Replace the qualifier of every entry matching `dependency`,
    /// preserving positions. Non-matching entries pass through unchanged.
    pub fn replace_qualifier(&self, dependency: &Dependency, qualifier: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|entry| {
                    if entry.dependency == *dependency {
                        entry.with_qualifier(qualifier)
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.clone(),
        }
    }

    /// Union the given exclusions into the existing global set.
    pub fn with_global_exclusions(&self, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        let mut global_exclusions = self.global_exclusions.clone();
        global_exclusions.extend(exclusions);
        Self {
            entries: self.entries.clone(),
            global_exclusions,
            version_provider: self.version_provider.clone(),
        }
    }

    /// Compose the version provider, keeping existing entries on
    /// collision.
    pub fn with_version_provider(&self, provider: &VersionProvider) -> Self {
        Self {
            entries: self.entries.clone(),
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.and(provider),
        }
    }

    /// Substitute the provider's version into every module dependency
    /// declared without one. Dependencies the provider has no entry for
    /// are left unspecified.
    pub fn replace_unspecified_versions_with_provider(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry.as_module() {
                Some(module_dep) if module_dep.version.is_unspecified() => {
                    match self.version_provider.version_of(&module_dep.module_id) {
                        Some(version) => QualifiedDependency::of(
                            entry.qualifier.clone(),
                            Dependency::Module(module_dep.clone().with_version(version.clone())),
                        ),
                        None => entry.clone(),
                    }
                }
                _ => entry.clone(),
            })
            .collect();
        Self {
            entries,
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.clone(),
        }
    }

    /// Entries standing for a module dependency on the given module.
    pub fn find_by_module(&self, module_id: &ModuleId) -> Vec<&QualifiedDependency> {
        self.entries
            .iter()
            .filter(|entry| entry.dependency.module_id() == Some(module_id))
            .collect()
    }

    /// Dependencies whose qualifier equals one of the given strings.
    pub fn dependencies_having_qualifier(&self, qualifiers: &[&str]) -> Vec<&Dependency> {
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .qualifier
                    .as_deref()
                    .map_or(false, |qualifier| qualifiers.contains(&qualifier))
            })
            .map(|entry| &entry.dependency)
            .collect()
    }

    /// Keep only entries standing for module dependencies.
    pub fn with_module_dependencies_only(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.dependency.is_module())
                .cloned()
                .collect(),
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.clone(),
        }
    }

    /// Error if any module dependency is still declared without a
    /// version.
    pub fn assert_no_unspecified_version(self) -> KilnResult<Self> {
        for module_dep in self.module_dependencies() {
            if module_dep.version.is_unspecified() {
                return Err(KilnError::UnresolvedVersion {
                    module: module_dep.module_id.to_string(),
                });
            }
        }
        Ok(self)
    }

    /// Reduce to one entry per module id.
    ///
    /// Duplicate declarations of a module with the same version collapse
    /// to the earliest entry. Differing versions follow the strategy:
    /// `Fail` errors naming the module and both versions, `TakeFirst`
    /// keeps the earliest declared. Non-module entries pass through in
    /// order.
    pub fn normalized(&self, strategy: ConflictStrategy) -> KilnResult<Self> {
        let mut entries: Vec<QualifiedDependency> = Vec::new();
        for entry in &self.entries {
            let Some(module_dep) = entry.as_module() else {
                if !entries.contains(entry) {
                    entries.push(entry.clone());
                }
                continue;
            };
            let earlier = entries
                .iter()
                .find_map(|kept| kept.as_module().filter(|m| m.module_id == module_dep.module_id));
            match earlier {
                None => entries.push(entry.clone()),
                Some(kept) => {
                    if kept.version != module_dep.version && strategy == ConflictStrategy::Fail {
                        return Err(KilnError::VersionConflict {
                            module: module_dep.module_id.to_string(),
                            left: kept.version.to_string(),
                            right: module_dep.version.to_string(),
                        });
                    }
                }
            }
        }
        Ok(Self {
            entries,
            global_exclusions: self.global_exclusions.clone(),
            version_provider: self.version_provider.clone(),
        })
    }
}
