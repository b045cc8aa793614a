//! Scope classification.
//!
//! Derives publication/consumption scopes from a three-way comparison of
//! the compile, runtime, and test dependency tiers. This is the single
//! place deciding what scope a dependency gets published or consumed
//! under; both algorithms are deterministic and side-effect-free.

use kiln_util::errors::KilnResult;

use crate::dependency::Dependency;
use crate::depset::QualifiedDependencySet;
use crate::module::ConflictStrategy;
use crate::transitivity::Transitivity;
use crate::version::VersionProvider;

/// Compile scope for published dependencies.
pub const COMPILE_SCOPE: &str = "compile";
/// Runtime scope for published dependencies.
pub const RUNTIME_SCOPE: &str = "runtime";
/// Provided scope for published dependencies.
pub const PROVIDED_SCOPE: &str = "provided";
/// Test scope for published dependencies.
pub const TEST_SCOPE: &str = "test";

pub const MASTER_TARGET_CONF: &str = "archives(master)";
pub const COMPILE_TARGET_CONF: &str = "compile(default)";
pub const RUNTIME_TARGET_CONF: &str = "runtime(default)";
pub const TEST_TARGET_CONF: &str = "test(default)";

/// The Ivy target configurations a transitivity request maps to.
pub fn ivy_target_configurations(transitivity: Transitivity) -> &'static str {
    match transitivity {
        Transitivity::None => "archives(master)",
        Transitivity::Compile => "archives(master), compile(default)",
        Transitivity::Runtime => "archives(master), compile(default), runtime(default)",
    }
}

/// Tag each dependency of the three tiers with a single Maven scope:
/// `compile`, `runtime`, `provided`, or `test`.
///
/// A dependency present in both compile and runtime is `compile`; present
/// in compile only it is `provided`; in runtime only, `runtime`;
/// everything else is `test`. Declared versions are substituted from the
/// merged version provider; a module left without a version fails.
pub fn compute_ide_dependencies(
    compile_deps: &QualifiedDependencySet,
    runtime_deps: &QualifiedDependencySet,
    test_deps: &QualifiedDependencySet,
    strategy: ConflictStrategy,
) -> KilnResult<QualifiedDependencySet> {
    let prod_merge = compile_deps.merge(runtime_deps);
    let test_merge = prod_merge.result.merge(test_deps);
    let normalized = test_merge.result.normalized(strategy)?;
    let provider = test_merge.result.version_provider().clone();

    let mut result = QualifiedDependencySet::new();
    for entry in normalized.entries() {
        let dependency = &entry.dependency;
        let scope = if prod_merge.result.dependencies().any(|dep| dep == dependency) {
            if prod_merge.absent_from_right_contains(dependency) {
                PROVIDED_SCOPE
            } else if prod_merge.absent_from_left_contains(dependency) {
                RUNTIME_SCOPE
            } else {
                COMPILE_SCOPE
            }
        } else {
            TEST_SCOPE
        };
        result = result.and(Some(scope), versioned(dependency, &provider));
    }
    result
        .with_global_exclusions(test_merge.result.global_exclusions().iter().cloned())
        .with_version_provider(&provider)
        .assert_no_unspecified_version()
}

/// Tag each module dependency of the three tiers with a combined Ivy
/// configuration-mapping expression `"<sourceScopes> -> <targetConfigs>"`
/// for Ivy-format publication metadata.
///
/// An explicit transitivity override on the dependency replaces the
/// target side with [`ivy_target_configurations`].
pub fn compute_ivy_publish_dependencies(
    compile_deps: &QualifiedDependencySet,
    runtime_deps: &QualifiedDependencySet,
    test_deps: &QualifiedDependencySet,
    strategy: ConflictStrategy,
) -> KilnResult<QualifiedDependencySet> {
    let prod_merge = compile_deps.merge(runtime_deps);
    let test_merge = prod_merge.result.merge(test_deps);
    let normalized = test_merge.result.normalized(strategy)?;
    let provider = test_merge.result.version_provider().clone();

    let mut result = QualifiedDependencySet::new();
    for entry in normalized.entries() {
        let Some(module_dep) = entry.as_module() else {
            continue;
        };
        let dependency = &entry.dependency;
        let (source, mut target) = if prod_merge.result.dependencies().any(|dep| dep == dependency)
        {
            if prod_merge.absent_from_right_contains(dependency) {
                (
                    COMPILE_SCOPE.to_string(),
                    format!("{MASTER_TARGET_CONF}, {COMPILE_TARGET_CONF}"),
                )
            } else if prod_merge.absent_from_left_contains(dependency) {
                (
                    RUNTIME_SCOPE.to_string(),
                    format!("{MASTER_TARGET_CONF}, {RUNTIME_TARGET_CONF}"),
                )
            } else {
                (
                    format!("{COMPILE_SCOPE},{RUNTIME_SCOPE}"),
                    format!("{MASTER_TARGET_CONF}, {COMPILE_TARGET_CONF}, {RUNTIME_TARGET_CONF}"),
                )
            }
        } else {
            (
                TEST_SCOPE.to_string(),
                format!(
                    "{MASTER_TARGET_CONF}, {COMPILE_TARGET_CONF}, {RUNTIME_TARGET_CONF}, {TEST_TARGET_CONF}"
                ),
            )
        };
        if let Some(transitivity) = module_dep.transitivity {
            target = ivy_target_configurations(transitivity).to_string();
        }
        let configuration = format!("{source} -> {target}");
        result = result.and(Some(&configuration), versioned(dependency, &provider));
    }
    result
        .with_global_exclusions(test_merge.result.global_exclusions().iter().cloned())
        .with_version_provider(&provider)
        .assert_no_unspecified_version()
}

/// Substitute the provider's version into a module dependency declared
/// without one.
fn versioned(dependency: &Dependency, provider: &VersionProvider) -> Dependency {
    match dependency {
        Dependency::Module(module_dep) if module_dep.version.is_unspecified() => {
            match provider.version_of(&module_dep.module_id) {
                Some(version) => {
                    Dependency::Module(module_dep.clone().with_version(version.clone()))
                }
                None => dependency.clone(),
            }
        }
        _ => dependency.clone(),
    }
}
