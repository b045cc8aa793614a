//! Pairwise union of two dependency sets.
//!
//! The merge is set-based on dependency identity (module id plus declared
//! constraint, never the resolved version), so the same module declared
//! in two tiers is recognized as one entry. The absence sets it derives
//! drive scope classification.

use crate::dependency::Dependency;
use crate::depset::QualifiedDependencySet;

/// The outcome of merging two dependency sets.
#[derive(Debug, Clone)]
pub struct DependencySetMerge {
    /// Every entry of the left set, then every right entry absent from
    /// the left, each exactly once by dependency identity.
    pub result: QualifiedDependencySet,
    /// Dependencies of the right set with no match in the left.
    pub absent_from_left: Vec<Dependency>,
    /// Dependencies of the left set with no match in the right.
    pub absent_from_right: Vec<Dependency>,
}

impl DependencySetMerge {
    pub fn absent_from_left_contains(&self, dependency: &Dependency) -> bool {
        self.absent_from_left.contains(dependency)
    }

    pub fn absent_from_right_contains(&self, dependency: &Dependency) -> bool {
        self.absent_from_right.contains(dependency)
    }
}

impl QualifiedDependencySet {
    /// Merge with `other`, tracking which dependencies are exclusive to
    /// each side.
    ///
    /// Global exclusions are unioned; version providers compose with this
    /// set's entries winning on collision.
    pub fn merge(&self, other: &QualifiedDependencySet) -> DependencySetMerge {
        let left_deps: Vec<&Dependency> = self.dependencies().collect();
        let right_deps: Vec<&Dependency> = other.dependencies().collect();

        let absent_from_right: Vec<Dependency> = left_deps
            .iter()
            .filter(|dep| !right_deps.contains(dep))
            .map(|dep| (*dep).clone())
            .collect();
        let absent_from_left: Vec<Dependency> = right_deps
            .iter()
            .filter(|dep| !left_deps.contains(dep))
            .map(|dep| (*dep).clone())
            .collect();

        let mut result = self.clone();
        for entry in other.entries() {
            if !left_deps.contains(&&entry.dependency) {
                result = result.and_qualified(entry.clone());
            }
        }
        result = result
            .with_global_exclusions(other.global_exclusions().iter().cloned())
            .with_version_provider(other.version_provider());

        DependencySetMerge {
            result,
            absent_from_left,
            absent_from_right,
        }
    }
}
