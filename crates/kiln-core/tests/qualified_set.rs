use kiln_core::dependency::{Dependency, Exclusion};
use kiln_core::depset::QualifiedDependencySet;
use kiln_core::module::{ConflictStrategy, ModuleId};
use kiln_core::scope::{compute_ide_dependencies, compute_ivy_publish_dependencies};
use kiln_core::version::{Version, VersionProvider};

fn module(descriptor: &str) -> Dependency {
    Dependency::module(descriptor).unwrap()
}

fn set(descriptors: &[&str]) -> QualifiedDependencySet {
    QualifiedDependencySet::of_dependencies(descriptors.iter().map(|d| module(d)))
}

fn qualifier_of<'a>(set: &'a QualifiedDependencySet, descriptor: &str) -> &'a str {
    let dep = module(descriptor);
    set.entries()
        .iter()
        .find(|entry| entry.dependency == dep)
        .and_then(|entry| entry.qualifier.as_deref())
        .unwrap()
}

#[test]
fn bom_style_versions_flow_into_classification() {
    // Versions come from a provider (a BOM import), declarations stay
    // version-less.
    let provider = VersionProvider::of(
        ModuleId::new("com.google.guava", "guava"),
        Version::of("33.0.0-jre"),
    )
    .and_version(
        ModuleId::new("org.slf4j", "slf4j-api"),
        Version::of("2.0.9"),
    )
    .and_version(ModuleId::new("junit", "junit"), Version::of("4.13.2"));

    let compile = set(&["com.google.guava:guava", "org.slf4j:slf4j-api"])
        .with_version_provider(&provider);
    let runtime = set(&["com.google.guava:guava"]);
    let test = set(&["com.google.guava:guava", "junit:junit"]);

    let classified =
        compute_ide_dependencies(&compile, &runtime, &test, ConflictStrategy::Fail).unwrap();

    assert_eq!(
        qualifier_of(&classified, "com.google.guava:guava:33.0.0-jre"),
        "compile"
    );
    assert_eq!(
        qualifier_of(&classified, "org.slf4j:slf4j-api:2.0.9"),
        "provided"
    );
    assert_eq!(qualifier_of(&classified, "junit:junit:4.13.2"), "test");
    for dep in classified.module_dependencies() {
        assert!(!dep.version.is_unspecified());
    }
}

#[test]
fn global_exclusions_survive_merge_and_classification() {
    let excl = Exclusion::of_group("commons-logging");
    let compile = set(&["org.springframework:spring-core:6.1.0"])
        .with_global_exclusions([excl.clone()]);
    let classified =
        compute_ide_dependencies(&compile, &set(&[]), &set(&[]), ConflictStrategy::Fail).unwrap();
    assert!(classified.global_exclusions().contains(&excl));
}

#[test]
fn duplicate_declarations_across_tiers_fail_on_version_divergence() {
    let compile = set(&["org.a:a:1.0"]);
    let test = set(&["org.a:a:2.0"]);
    assert!(compute_ide_dependencies(&compile, &set(&[]), &test, ConflictStrategy::Fail).is_err());
}

#[test]
fn duplicate_declarations_across_tiers_take_first_keeps_compile_version() {
    let compile = set(&["org.a:a:1.0"]);
    let test = set(&["org.a:a:2.0"]);
    let classified =
        compute_ide_dependencies(&compile, &set(&[]), &test, ConflictStrategy::TakeFirst).unwrap();
    assert_eq!(
        classified.module_dependencies().next().unwrap().version,
        Version::of("1.0")
    );
}

#[test]
fn ide_and_ivy_classification_agree_on_entry_order() {
    let compile = set(&["org.a:a:1.0"]);
    let runtime = set(&["org.a:a:1.0", "org.b:b:1.0"]);
    let test = set(&["org.a:a:1.0", "org.b:b:1.0", "junit:junit:4.13.2"]);

    let ide =
        compute_ide_dependencies(&compile, &runtime, &test, ConflictStrategy::Fail).unwrap();
    let ivy =
        compute_ivy_publish_dependencies(&compile, &runtime, &test, ConflictStrategy::Fail)
            .unwrap();

    let ide_order: Vec<_> = ide.dependencies().cloned().collect();
    let ivy_order: Vec<_> = ivy.dependencies().cloned().collect();
    assert_eq!(ide_order, ivy_order);
}

#[test]
fn set_building_round_trip() {
    let set = QualifiedDependencySet::new()
        .and(Some("compile"), module("org.a:a:1.0"))
        .and(None, module("org.b:b:2.0"))
        .and(Some("test"), module("org.c:c:3.0"));

    assert_eq!(set.len(), 3);
    assert_eq!(
        set.dependencies_having_qualifier(&["compile", "test"]).len(),
        2
    );

    let trimmed = set.remove(&module("org.b:b:2.0"));
    assert_eq!(trimmed.len(), 2);
    assert_eq!(
        trimmed
            .find_by_module(&ModuleId::new("org.c", "c"))
            .len(),
        1
    );
}
