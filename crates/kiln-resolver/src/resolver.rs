//! Tree construction from declared dependencies.
//!
//! The repository access itself is out of scope: it is supplied through
//! [`ModuleResolver`], invoked synchronously once per distinct module
//! encountered. This module walks declarations depth-first in declaration
//! order, applies the conflict strategy (first declared version wins, or
//! fail fast), combines transitivity requests reaching the same module,
//! propagates exclusions, and re-attaches file dependencies into the
//! resolved tree.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use kiln_core::dependency::{is_excluded, Dependency, Exclusion, ModuleDependency};
use kiln_core::depset::QualifiedDependencySet;
use kiln_core::module::{ConflictStrategy, ModuleId, VersionedModule};
use kiln_core::transitivity::Transitivity;
use kiln_core::version::Version;
use kiln_util::errors::{KilnError, KilnResult};

use crate::conflict::{ConflictReport, VersionConflict};
use crate::tree::{ModuleNodeInfo, ResolvedDependencyNode};

/// What the external repository resolver returns for one module.
#[derive(Debug, Clone, Default)]
pub struct ResolvedModule {
    pub artifact_files: Vec<PathBuf>,
    /// The module's own declared dependencies, filtered by the requested
    /// transitivity.
    pub dependencies: Vec<ModuleDependency>,
}

/// The external collaborator wrapping a Maven/Ivy-compatible repository.
pub trait ModuleResolver {
    fn resolve(
        &self,
        module_id: &ModuleId,
        version: &Version,
        transitivity: Transitivity,
        exclusions: &[Exclusion],
    ) -> KilnResult<ResolvedModule>;
}

/// The output of a dependency resolution.
#[derive(Debug)]
pub struct Resolution {
    pub root: ResolvedDependencyNode,
    pub conflicts: ConflictReport,
}

/// Transitive fetch depth applied to a declared dependency without an
/// explicit override.
const DEFAULT_TRANSITIVITY: Transitivity = Transitivity::Runtime;

/// Builds resolved dependency trees out of qualified dependency sets.
pub struct DependencyResolver<R> {
    module_resolver: R,
}

struct ResolveState {
    /// Winning version per module, in first-encounter order.
    resolved: HashMap<ModuleId, Version>,
    /// Artifact files of the winning version, reused on re-encounters.
    files: HashMap<ModuleId, Vec<PathBuf>>,
    /// Deepest transitivity a module has been fetched with so far.
    fetched_transitivity: HashMap<ModuleId, Transitivity>,
    conflicts: ConflictReport,
    strategy: ConflictStrategy,
}

impl<R: ModuleResolver> DependencyResolver<R> {
    pub fn new(module_resolver: R) -> Self {
        Self { module_resolver }
    }

    /// Resolve every declared dependency of the set into a tree rooted at
    /// `root_module` (or an anonymous root).
    ///
    /// Unspecified versions are substituted from the set's version
    /// provider first; a module dependency still unspecified afterwards
    /// aborts the resolution.
    pub fn resolve(
        &self,
        root_module: Option<&VersionedModule>,
        dependencies: &QualifiedDependencySet,
        strategy: ConflictStrategy,
    ) -> KilnResult<Resolution> {
        let dependencies = dependencies
            .replace_unspecified_versions_with_provider()
            .assert_no_unspecified_version()?;

        let mut state = ResolveState {
            resolved: HashMap::new(),
            files: HashMap::new(),
            fetched_transitivity: HashMap::new(),
            conflicts: ConflictReport::new(),
            strategy,
        };
        let global_exclusions: Vec<Exclusion> =
            dependencies.global_exclusions().iter().cloned().collect();

        let mut children = Vec::new();
        for entry in dependencies.entries() {
            let Some(module_dep) = entry.as_module() else {
                continue;
            };
            let root_qualifiers: BTreeSet<String> =
                entry.qualifier.iter().cloned().collect();
            let node = self.resolve_module(
                module_dep,
                &root_qualifiers,
                &[],
                &global_exclusions,
                &mut state,
            )?;
            children.push(node);
        }

        let root_info = match root_module {
            Some(versioned) => ModuleNodeInfo::of_root(versioned),
            None => ModuleNodeInfo::of_anonymous_root(),
        };
        let declared: Vec<Dependency> = dependencies.dependencies().cloned().collect();
        let root = ResolvedDependencyNode::of_module_dep(root_info, children)
            .merge_non_modules(&declared);

        Ok(Resolution {
            root,
            conflicts: state.conflicts,
        })
    }

    fn resolve_module(
        &self,
        dependency: &ModuleDependency,
        root_qualifiers: &BTreeSet<String>,
        inherited_exclusions: &[Exclusion],
        global_exclusions: &[Exclusion],
        state: &mut ResolveState,
    ) -> KilnResult<ResolvedDependencyNode> {
        let module_id = &dependency.module_id;
        let requested = dependency.transitivity.unwrap_or(DEFAULT_TRANSITIVITY);

        if let Some(winner) = state.resolved.get(module_id).cloned() {
            if winner != dependency.version {
                // A different version already won this module.
                if state.strategy == ConflictStrategy::Fail {
                    return Err(KilnError::VersionConflict {
                        module: module_id.to_string(),
                        left: winner.to_string(),
                        right: dependency.version.to_string(),
                    });
                }
                tracing::warn!(
                    "Evicting {}:{}, already resolved at {}",
                    module_id,
                    dependency.version,
                    winner
                );
                state.conflicts.add(VersionConflict {
                    module_id: module_id.clone(),
                    requested: dependency.version.clone(),
                    resolved: winner.clone(),
                    reason: "first declaration wins".to_string(),
                });
                return Ok(ResolvedDependencyNode::of_module_dep(
                    ModuleNodeInfo::new(
                        module_id.clone(),
                        dependency.version.clone(),
                        root_qualifiers.clone(),
                        root_qualifiers.clone(),
                        None,
                        Vec::new(),
                    ),
                    Vec::new(),
                ));
            }

            let fetched = state.fetched_transitivity[module_id];
            if requested <= fetched {
                // Same version reached through another path: render as a
                // leaf, files are already contributed once.
                return Ok(ResolvedDependencyNode::of_module_dep(
                    ModuleNodeInfo::new(
                        module_id.clone(),
                        dependency.version.clone(),
                        root_qualifiers.clone(),
                        root_qualifiers.clone(),
                        Some(winner),
                        state.files[module_id].clone(),
                    ),
                    Vec::new(),
                ));
            }
            // A deeper transitivity request: re-fetch so this path gets
            // the transitive dependencies the shallower one omitted.
        }

        let exclusions: Vec<Exclusion> = inherited_exclusions
            .iter()
            .chain(&dependency.exclusions)
            .cloned()
            .collect();
        let resolved = self.module_resolver.resolve(
            module_id,
            &dependency.version,
            requested,
            &exclusions,
        )?;
        tracing::debug!(
            "Resolved {}:{} ({} artifacts, {} transitive deps)",
            module_id,
            dependency.version,
            resolved.artifact_files.len(),
            resolved.dependencies.len()
        );
        state
            .resolved
            .insert(module_id.clone(), dependency.version.clone());
        state
            .files
            .insert(module_id.clone(), resolved.artifact_files.clone());
        state
            .fetched_transitivity
            .insert(module_id.clone(), requested);

        let mut children = Vec::new();
        if requested != Transitivity::None {
            for child_dep in &resolved.dependencies {
                if is_excluded(&exclusions, &child_dep.module_id)
                    || is_excluded(global_exclusions, &child_dep.module_id)
                {
                    continue;
                }
                children.push(self.resolve_module(
                    child_dep,
                    root_qualifiers,
                    &exclusions,
                    global_exclusions,
                    state,
                )?);
            }
        }

        Ok(ResolvedDependencyNode::of_module_dep(
            ModuleNodeInfo::new(
                module_id.clone(),
                dependency.version.clone(),
                root_qualifiers.clone(),
                root_qualifiers.clone(),
                Some(dependency.version.clone()),
                resolved.artifact_files,
            ),
            children,
        ))
    }
}
