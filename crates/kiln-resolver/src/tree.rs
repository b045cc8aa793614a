//! The resolved dependency tree.
//!
//! Trees are immutable and built functionally: every node owns its
//! children outright, there is no parent back-reference, and every
//! "mutator" returns a new tree sharing unchanged subtrees. A node whose
//! resolved version is absent is *evicted*: it lost a version conflict,
//! contributes nothing to the effective classpath, but stays visible in
//! the tree so conflict reports can explain why it lost.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;

use kiln_core::dependency::{ComputedDependency, Dependency};
use kiln_core::module::{ModuleId, VersionedModule};
use kiln_core::version::{Version, VersionProvider};
use kiln_util::errors::{KilnError, KilnResult};

const INDENT: &str = "    ";

/// Resolution information of a module node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNodeInfo {
    pub module_id: ModuleId,
    pub declared_version: Version,
    /// Qualifiers on the declaration that brought this module in.
    pub declared_qualifiers: BTreeSet<String>,
    /// Qualifiers through which this node was reached from the tree root.
    pub root_qualifiers: BTreeSet<String>,
    /// Absent when this node lost a version conflict (evicted).
    pub resolved_version: Option<Version>,
    pub files: Vec<PathBuf>,
    tree_root: bool,
}

impl ModuleNodeInfo {
    pub fn new(
        module_id: ModuleId,
        declared_version: Version,
        declared_qualifiers: BTreeSet<String>,
        root_qualifiers: BTreeSet<String>,
        resolved_version: Option<Version>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self {
            module_id,
            declared_version,
            declared_qualifiers,
            root_qualifiers,
            resolved_version,
            files,
            tree_root: false,
        }
    }

    /// Info for the root of a resolution tree. The root renders specially
    /// and contributes no version to aggregation.
    pub fn of_root(versioned_module: &VersionedModule) -> Self {
        Self {
            module_id: versioned_module.module_id.clone(),
            declared_version: versioned_module.version.clone(),
            declared_qualifiers: BTreeSet::new(),
            root_qualifiers: BTreeSet::new(),
            resolved_version: Some(versioned_module.version.clone()),
            files: Vec::new(),
            tree_root: true,
        }
    }

    pub fn of_anonymous_root() -> Self {
        Self::of_root(
            &ModuleId::new("anonymousGroup", "anonymousName").with_version(Version::unspecified()),
        )
    }

    pub fn is_tree_root(&self) -> bool {
        self.tree_root
    }

    /// An evicted module lost a version conflict: it contributes no
    /// files, no resolved module, and does not satisfy `contains`.
    pub fn is_evicted(&self) -> bool {
        self.resolved_version.is_none()
    }

    /// Module id paired with the resolved version, absent when evicted.
    pub fn resolved_versioned_module(&self) -> Option<VersionedModule> {
        self.resolved_version
            .as_ref()
            .map(|version| self.module_id.with_version(version.clone()))
    }
}

fn qualifiers_label(qualifiers: &BTreeSet<String>) -> String {
    let mut label = String::from("[");
    for (i, qualifier) in qualifiers.iter().enumerate() {
        if i > 0 {
            label.push_str(", ");
        }
        label.push_str(qualifier);
    }
    label.push(']');
    label
}

impl fmt::Display for ModuleNodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tree_root {
            return f.write_str("Root");
        }
        let resolved_label = match &self.resolved_version {
            Some(version) => version.to_string(),
            None => "(evicted)".to_string(),
        };
        let declared_label = if self.declared_version.to_string() == resolved_label {
            String::new()
        } else {
            format!(" as {}", self.declared_version)
        };
        write!(
            f,
            "{}:{} (present in {}) (declared{} {})",
            self.module_id,
            resolved_label,
            qualifiers_label(&self.root_qualifiers),
            declared_label,
            qualifiers_label(&self.declared_qualifiers)
        )
    }
}

/// Resolution information of a file node: files contributed directly,
/// optionally produced by a computed dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNodeInfo {
    pub files: Vec<PathBuf>,
    pub qualifiers: BTreeSet<String>,
    origin: Option<ComputedDependency>,
}

impl FileNodeInfo {
    pub fn new(
        files: Vec<PathBuf>,
        qualifiers: BTreeSet<String>,
        origin: Option<ComputedDependency>,
    ) -> Self {
        Self {
            files,
            qualifiers,
            origin,
        }
    }

    /// True if this node comes from a computed dependency.
    pub fn is_computed(&self) -> bool {
        self.origin.is_some()
    }

    /// The computed dependency this node comes from, if any.
    pub fn computation_origin(&self) -> Option<&ComputedDependency> {
        self.origin.as_ref()
    }
}

impl fmt::Display for FileNodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.files)?;
        if self.is_computed() {
            f.write_str(" (computed)")?;
        }
        Ok(())
    }
}

/// Per-node resolution information. Closed set: downstream logic matches
/// exhaustively on the two kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeInfo {
    Module(ModuleNodeInfo),
    File(FileNodeInfo),
}

impl NodeInfo {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            NodeInfo::Module(info) => &info.files,
            NodeInfo::File(info) => &info.files,
        }
    }

    pub fn declared_qualifiers(&self) -> &BTreeSet<String> {
        match self {
            NodeInfo::Module(info) => &info.declared_qualifiers,
            NodeInfo::File(info) => &info.qualifiers,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            NodeInfo::Module(_) => "module",
            NodeInfo::File(_) => "file",
        }
    }
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeInfo::Module(info) => info.fmt(f),
            NodeInfo::File(info) => info.fmt(f),
        }
    }
}

/// A node in the resolved dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependencyNode {
    info: NodeInfo,
    children: Vec<ResolvedDependencyNode>,
    resolved_versions: VersionProvider,
}

impl ResolvedDependencyNode {
    fn new(info: NodeInfo, children: Vec<ResolvedDependencyNode>) -> Self {
        let resolved_versions = aggregate_versions(&info, &children);
        Self {
            info,
            children,
            resolved_versions,
        }
    }

    /// Node for a resolved module with the given children.
    pub fn of_module_dep(info: ModuleNodeInfo, children: Vec<ResolvedDependencyNode>) -> Self {
        Self::new(NodeInfo::Module(info), children)
    }

    /// Leaf node wrapping a file-system or computed dependency.
    ///
    /// Fails fast on a module dependency: module nodes carry resolution
    /// results and are built with [`Self::of_module_dep`].
    pub fn of_file_dep(
        dependency: &Dependency,
        qualifiers: BTreeSet<String>,
    ) -> KilnResult<Self> {
        let info = file_node_info(dependency, qualifiers).ok_or_else(|| KilnError::NodeKind {
            expected: "file".to_string(),
            actual: "module".to_string(),
        })?;
        Ok(Self::new(NodeInfo::File(info), Vec::new()))
    }

    pub fn node_info(&self) -> &NodeInfo {
        &self.info
    }

    pub fn children(&self) -> &[ResolvedDependencyNode] {
        &self.children
    }

    pub fn is_module_node(&self) -> bool {
        matches!(self.info, NodeInfo::Module(_))
    }

    /// Module resolution info of this node; fails fast on a file node,
    /// never silently coerced.
    pub fn module_info(&self) -> KilnResult<&ModuleNodeInfo> {
        match &self.info {
            NodeInfo::Module(info) => Ok(info),
            other => Err(KilnError::NodeKind {
                expected: "module".to_string(),
                actual: other.kind().to_string(),
            }),
        }
    }

    fn module_id(&self) -> Option<&ModuleId> {
        match &self.info {
            NodeInfo::Module(info) => Some(&info.module_id),
            NodeInfo::File(_) => None,
        }
    }

    /// True if this node or one of its descendants stands for the module.
    /// Evicted nodes are not taken into account.
    pub fn contains(&self, module_id: &ModuleId) -> bool {
        if let NodeInfo::Module(info) = &self.info {
            if info.module_id == *module_id && !info.is_evicted() {
                return true;
            }
        }
        self.children.iter().any(|child| child.contains(module_id))
    }

    /// Resolved versions of this node and all its descendants, aggregated
    /// eagerly at construction. The union is left-biased and depth-first:
    /// on a key collision the first-encountered version wins.
    pub fn resolved_versions(&self) -> &VersionProvider {
        &self.resolved_versions
    }

    /// All files of this node followed by each child's, recursively,
    /// without duplicates.
    pub fn resolved_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.collect_files(&mut files);
        files
    }

    fn collect_files(&self, files: &mut Vec<PathBuf>) {
        for file in self.info.files() {
            if !files.contains(file) {
                files.push(file.clone());
            }
        }
        for child in &self.children {
            child.collect_files(files);
        }
    }

    /// All descendant nodes, deep-first in child order; this node is
    /// excluded.
    pub fn flatten(&self) -> Vec<&ResolvedDependencyNode> {
        let mut result = Vec::new();
        for child in &self.children {
            result.push(child);
            result.extend(child.flatten());
        }
        result
    }

    /// This node if it stands for the module, else the first descendant
    /// that does, deep-first.
    pub fn get_first(&self, module_id: &ModuleId) -> Option<&ResolvedDependencyNode> {
        if self.module_id() == Some(module_id) {
            return Some(self);
        }
        self.flatten()
            .into_iter()
            .find(|node| node.module_id() == Some(module_id))
    }

    /// Direct children standing for the module.
    pub fn children_of(&self, module_id: &ModuleId) -> Vec<&ResolvedDependencyNode> {
        self.children
            .iter()
            .filter(|child| child.module_id() == Some(module_id))
            .collect()
    }

    /// The first direct child standing for the module.
    pub fn child(&self, module_id: &ModuleId) -> Option<&ResolvedDependencyNode> {
        self.children
            .iter()
            .find(|child| child.module_id() == Some(module_id))
    }

    /// All non-evicted resolved modules in the subtree, root excluded.
    pub fn child_modules(&self) -> BTreeSet<VersionedModule> {
        let mut result = BTreeSet::new();
        for child in &self.children {
            child.collect_modules(&mut result);
        }
        result
    }

    fn collect_modules(&self, result: &mut BTreeSet<VersionedModule>) {
        if let NodeInfo::Module(info) = &self.info {
            if let Some(versioned) = info.resolved_versioned_module() {
                result.insert(versioned);
            }
        }
        for child in &self.children {
            child.collect_modules(result);
        }
    }

    /// Union of this tree with `other`, assumed to share the same logical
    /// root: all of this tree's children are kept, children of `other`
    /// are appended unless a direct child module with the same id already
    /// exists. First tree wins on direct-child collisions; no deeper
    /// merging is attempted.
    pub fn with_merging(&self, other: &ResolvedDependencyNode) -> Self {
        let mut children = self.children.clone();
        for other_child in &other.children {
            let collides = other_child
                .module_id()
                .map_or(false, |id| self.direct_children_contain(id));
            if !collides {
                children.push(other_child.clone());
            }
        }
        Self::new(self.info.clone(), children)
    }

    fn direct_children_contain(&self, module_id: &ModuleId) -> bool {
        self.children
            .iter()
            .any(|child| child.module_id() == Some(module_id))
    }

    /// Re-attach the file and computed dependencies of a declaration list
    /// into this already-resolved module tree.
    ///
    /// Ivy-style resolvers do not model file dependencies as graph nodes,
    /// so they are inserted here: each file dependency is placed before
    /// the module-node child it precedes in declaration order; file
    /// dependencies declared after the last module dependency attach at
    /// the end. A file dependency is never attached twice.
    pub fn merge_non_modules(&self, dependencies: &[Dependency]) -> Self {
        let mut children = Vec::new();
        let mut attached: HashSet<&Dependency> = HashSet::new();
        for child in &self.children {
            if let Some(module_id) = child.module_id() {
                attach_file_deps(dependencies, Some(module_id), &mut children, &mut attached);
                children.push(child.clone());
            }
        }
        attach_file_deps(dependencies, None, &mut children, &mut attached);
        Self::new(self.info.clone(), children)
    }

    /// Indented textual rendering of the subtree, the root line excluded.
    ///
    /// The first encounter of a module expands its subtree; later
    /// encounters of the same module render as a leaf, keeping the output
    /// bounded on diamond dependencies.
    pub fn to_strings(&self) -> Vec<String> {
        match &self.info {
            NodeInfo::Module(_) => {
                let mut expanded = BTreeSet::new();
                self.to_strings_rec(false, 0, &mut expanded)
            }
            NodeInfo::File(info) => vec![info.to_string()],
        }
    }

    fn to_strings_rec(
        &self,
        show_self: bool,
        indent_level: usize,
        expanded: &mut BTreeSet<ModuleId>,
    ) -> Vec<String> {
        let mut result = Vec::new();
        if show_self {
            result.push(format!("{}{}", INDENT.repeat(indent_level), self.info));
        }
        let expand = match self.module_id() {
            Some(module_id) => expanded.insert(module_id.clone()),
            None => !show_self,
        };
        if expand {
            let child_indent = if show_self { indent_level + 1 } else { indent_level };
            for child in &self.children {
                result.extend(child.to_strings_rec(true, child_indent, expanded));
            }
        }
        result
    }

    /// The complete rendering, one line per node.
    pub fn to_string_tree(&self) -> String {
        let mut tree = String::new();
        for line in self.to_strings() {
            tree.push_str(&line);
            tree.push('\n');
        }
        tree
    }
}

impl fmt::Display for ResolvedDependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.info.fmt(f)
    }
}

fn file_node_info(dependency: &Dependency, qualifiers: BTreeSet<String>) -> Option<FileNodeInfo> {
    match dependency {
        Dependency::FileSystem(dep) => {
            Some(FileNodeInfo::new(dep.files().to_vec(), qualifiers, None))
        }
        Dependency::Computed(dep) => Some(FileNodeInfo::new(
            dep.files().to_vec(),
            qualifiers,
            Some(dep.clone()),
        )),
        Dependency::Module(_) => None,
    }
}

fn attach_file_deps<'a>(
    dependencies: &'a [Dependency],
    before: Option<&ModuleId>,
    children: &mut Vec<ResolvedDependencyNode>,
    attached: &mut HashSet<&'a Dependency>,
) {
    for dependency in file_deps_until_last(dependencies, before) {
        if attached.insert(dependency) {
            if let Some(info) = file_node_info(dependency, BTreeSet::new()) {
                children.push(ResolvedDependencyNode::new(NodeInfo::File(info), Vec::new()));
            }
        }
    }
}

/// File dependencies preceding each occurrence of module `to` in the
/// declaration list, or the trailing ones when `to` is absent.
fn file_deps_until_last<'a>(
    dependencies: &'a [Dependency],
    to: Option<&ModuleId>,
) -> Vec<&'a Dependency> {
    let mut result = Vec::new();
    let mut pending = Vec::new();
    for dependency in dependencies {
        match dependency {
            Dependency::Module(module_dep) => {
                if Some(&module_dep.module_id) == to {
                    result.append(&mut pending);
                }
            }
            _ => pending.push(dependency),
        }
    }
    if to.is_none() {
        result.append(&mut pending);
    }
    result
}

/// Eager aggregation of resolved versions: this node's own contribution
/// (module nodes only, root and evicted excluded), then the children's,
/// depth-first and left-biased.
fn aggregate_versions(info: &NodeInfo, children: &[ResolvedDependencyNode]) -> VersionProvider {
    let mut result = VersionProvider::new();
    if let NodeInfo::Module(module_info) = info {
        if !module_info.is_tree_root() && !module_info.is_evicted() {
            if let Some(version) = &module_info.resolved_version {
                result = result.and_version(module_info.module_id.clone(), version.clone());
            }
        }
    }
    for child in children {
        result = result.and(&child.resolved_versions);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(name: &str) -> ModuleId {
        ModuleId::new("org.example", name)
    }

    fn info(name: &str, version: &str) -> ModuleNodeInfo {
        ModuleNodeInfo::new(
            id(name),
            Version::of(version),
            BTreeSet::new(),
            BTreeSet::new(),
            Some(Version::of(version)),
            vec![PathBuf::from(format!("{name}-{version}.jar"))],
        )
    }

    fn evicted(name: &str, declared: &str) -> ModuleNodeInfo {
        ModuleNodeInfo::new(
            id(name),
            Version::of(declared),
            BTreeSet::new(),
            BTreeSet::new(),
            None,
            Vec::new(),
        )
    }

    fn leaf(name: &str, version: &str) -> ResolvedDependencyNode {
        ResolvedDependencyNode::of_module_dep(info(name, version), Vec::new())
    }

    fn root(children: Vec<ResolvedDependencyNode>) -> ResolvedDependencyNode {
        ResolvedDependencyNode::of_module_dep(ModuleNodeInfo::of_anonymous_root(), children)
    }

    /// a -> c and b -> c: two paths to the same resolved module.
    fn diamond() -> ResolvedDependencyNode {
        let c_under_a =
            ResolvedDependencyNode::of_module_dep(info("c", "3.0"), vec![leaf("d", "4.0")]);
        let c_under_b =
            ResolvedDependencyNode::of_module_dep(info("c", "3.0"), vec![leaf("d", "4.0")]);
        let a = ResolvedDependencyNode::of_module_dep(info("a", "1.0"), vec![c_under_a]);
        let b = ResolvedDependencyNode::of_module_dep(info("b", "2.0"), vec![c_under_b]);
        root(vec![a, b])
    }

    #[test]
    fn resolved_files_has_no_duplicates_on_diamond() {
        let files = diamond().resolved_files();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a-1.0.jar"),
                PathBuf::from("c-3.0.jar"),
                PathBuf::from("d-4.0.jar"),
                PathBuf::from("b-2.0.jar"),
            ]
        );
    }

    #[test]
    fn to_string_tree_expands_each_module_once() {
        let rendered = diamond().to_string_tree();
        let c_lines = rendered.lines().filter(|l| l.contains("org.example:c")).count();
        let d_lines = rendered.lines().filter(|l| l.contains("org.example:d")).count();
        assert_eq!(c_lines, 2);
        assert_eq!(d_lines, 1);
    }

    #[test]
    fn to_string_tree_indents_by_depth() {
        let tree = root(vec![ResolvedDependencyNode::of_module_dep(
            info("a", "1.0"),
            vec![leaf("b", "2.0")],
        )]);
        let rendered = tree.to_string_tree();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("org.example:a"));
        assert!(lines[1].starts_with("    org.example:b"));
    }

    #[test]
    fn evicted_node_renders_marker() {
        let node = ResolvedDependencyNode::of_module_dep(evicted("a", "2.0"), Vec::new());
        let line = node.to_string();
        assert!(line.contains("(evicted)"));
        assert!(line.contains("as 2.0"));
    }

    #[test]
    fn contains_skips_evicted_nodes() {
        let tree = root(vec![
            leaf("m", "1.0"),
            ResolvedDependencyNode::of_module_dep(evicted("m", "2.0"), Vec::new()),
            ResolvedDependencyNode::of_module_dep(evicted("gone", "1.0"), Vec::new()),
        ]);
        assert!(tree.contains(&id("m")));
        assert!(!tree.contains(&id("gone")));
    }

    #[test]
    fn child_modules_excludes_root_and_evicted() {
        let tree = root(vec![
            leaf("a", "1.0"),
            ResolvedDependencyNode::of_module_dep(evicted("b", "2.0"), Vec::new()),
        ]);
        let modules = tree.child_modules();
        assert_eq!(modules.len(), 1);
        assert!(modules.contains(&id("a").with_version(Version::of("1.0"))));
    }

    #[test]
    fn evicted_children_are_still_traversed() {
        let evicted_with_child =
            ResolvedDependencyNode::of_module_dep(evicted("b", "2.0"), vec![leaf("c", "3.0")]);
        let tree = root(vec![evicted_with_child]);
        assert!(tree.contains(&id("c")));
        assert!(tree.resolved_files().contains(&PathBuf::from("c-3.0.jar")));
        assert_eq!(
            tree.resolved_versions().version_of(&id("c")),
            Some(&Version::of("3.0"))
        );
        assert_eq!(tree.resolved_versions().version_of(&id("b")), None);
    }

    #[test]
    fn resolved_versions_first_encountered_wins() {
        // Same module resolved at two versions in separate subtrees: the
        // depth-first, left-biased union keeps the first.
        let a = ResolvedDependencyNode::of_module_dep(info("a", "1.0"), vec![leaf("x", "1.0")]);
        let b = ResolvedDependencyNode::of_module_dep(info("b", "1.0"), vec![leaf("x", "9.0")]);
        let tree = root(vec![a, b]);
        assert_eq!(
            tree.resolved_versions().version_of(&id("x")),
            Some(&Version::of("1.0"))
        );
    }

    #[test]
    fn flatten_is_deep_first_and_excludes_root() {
        let tree = diamond();
        let names: Vec<String> = tree
            .flatten()
            .iter()
            .map(|node| node.module_info().unwrap().module_id.name.clone())
            .collect();
        assert_eq!(names, ["a", "c", "d", "b", "c", "d"]);
    }

    #[test]
    fn get_first_returns_first_in_deep_first_order() {
        let tree = diamond();
        let found = tree.get_first(&id("c")).unwrap();
        // The occurrence under `a`, not under `b`.
        assert_eq!(
            found.module_info().unwrap().resolved_version,
            Some(Version::of("3.0"))
        );
        let flat = tree.flatten();
        assert!(std::ptr::eq(*flat.get(1).unwrap(), found));
        assert!(tree.get_first(&id("missing")).is_none());
    }

    #[test]
    fn with_merging_identical_tree_is_idempotent() {
        let tree = diamond();
        let merged = tree.with_merging(&tree);
        assert_eq!(merged.resolved_files(), tree.resolved_files());
        assert_eq!(merged.children().len(), tree.children().len());
    }

    #[test]
    fn with_merging_appends_only_new_direct_modules() {
        let left = root(vec![leaf("a", "1.0")]);
        let right = root(vec![leaf("a", "9.9"), leaf("b", "2.0")]);
        let merged = left.with_merging(&right);
        assert_eq!(merged.children().len(), 2);
        // First tree wins on the direct-child collision.
        assert_eq!(
            merged.child(&id("a")).unwrap().module_info().unwrap().resolved_version,
            Some(Version::of("1.0"))
        );
        assert!(merged.contains(&id("b")));
    }

    #[test]
    fn module_info_fails_fast_on_file_node() {
        let dep = Dependency::files(vec![PathBuf::from("lib/extra.jar")]);
        let node = ResolvedDependencyNode::of_file_dep(&dep, BTreeSet::new()).unwrap();
        assert!(matches!(
            node.module_info(),
            Err(KilnError::NodeKind { .. })
        ));
    }

    #[test]
    fn of_file_dep_rejects_module_dependency() {
        let dep = Dependency::module("org.example:a:1.0").unwrap();
        assert!(ResolvedDependencyNode::of_file_dep(&dep, BTreeSet::new()).is_err());
    }

    #[test]
    fn of_file_dep_keeps_computation_origin() {
        let computed = ComputedDependency::of(
            "sibling build",
            vec![PathBuf::from("out/sibling.jar")],
            Arc::new(|| {}),
        );
        let node = ResolvedDependencyNode::of_file_dep(
            &Dependency::Computed(computed.clone()),
            BTreeSet::new(),
        )
        .unwrap();
        match node.node_info() {
            NodeInfo::File(info) => {
                assert!(info.is_computed());
                assert_eq!(info.computation_origin(), Some(&computed));
                assert!(node.to_string().contains("(computed)"));
            }
            NodeInfo::Module(_) => panic!("expected a file node"),
        }
    }

    #[test]
    fn merge_non_modules_preserves_declaration_positions() {
        let file1 = Dependency::files(vec![PathBuf::from("libs/first.jar")]);
        let file2 = Dependency::files(vec![PathBuf::from("libs/second.jar")]);
        let file3 = Dependency::files(vec![PathBuf::from("libs/third.jar")]);
        let declarations = vec![
            file1.clone(),
            Dependency::module("org.example:a:1.0").unwrap(),
            file2.clone(),
            Dependency::module("org.example:b:2.0").unwrap(),
            file3.clone(),
        ];
        let tree = root(vec![leaf("a", "1.0"), leaf("b", "2.0")]);
        let merged = tree.merge_non_modules(&declarations);

        let kinds: Vec<String> = merged
            .children()
            .iter()
            .map(|child| match child.node_info() {
                NodeInfo::Module(info) => info.module_id.name.clone(),
                NodeInfo::File(info) => info.files[0].display().to_string(),
            })
            .collect();
        assert_eq!(
            kinds,
            ["libs/first.jar", "a", "libs/second.jar", "b", "libs/third.jar"]
        );
    }

    #[test]
    fn merge_non_modules_never_duplicates_a_file_dependency() {
        let shared = Dependency::files(vec![PathBuf::from("libs/shared.jar")]);
        let declarations = vec![
            shared.clone(),
            Dependency::module("org.example:a:1.0").unwrap(),
            Dependency::module("org.example:a:1.0").unwrap(),
        ];
        let tree = root(vec![leaf("a", "1.0"), leaf("a", "1.0")]);
        let merged = tree.merge_non_modules(&declarations);
        let file_nodes = merged
            .children()
            .iter()
            .filter(|child| !child.is_module_node())
            .count();
        assert_eq!(file_nodes, 1);
    }
}
