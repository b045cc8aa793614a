//! The closed set of dependency variants.
//!
//! A dependency is either a module coordinate resolved against a
//! repository, a list of files already on disk, or a computed set of files
//! generated on demand by a build action. Downstream logic exhaustively
//! matches on [`Dependency`]; keep the set closed.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use kiln_util::errors::{KilnError, KilnResult};
use kiln_util::fs;

use crate::module::ModuleId;
use crate::transitivity::Transitivity;
use crate::version::Version;

/// A transitive dependency to exclude, group-wide when `name` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Exclusion {
    pub group: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Exclusion {
    pub fn of_module(module_id: &ModuleId) -> Self {
        Self {
            group: module_id.group.clone(),
            name: Some(module_id.name.clone()),
        }
    }

    pub fn of_group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: None,
        }
    }

    pub fn matches(&self, module_id: &ModuleId) -> bool {
        self.group == module_id.group
            && self.name.as_ref().map_or(true, |name| *name == module_id.name)
    }
}

/// A dependency on a module published in a binary repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleDependency {
    pub module_id: ModuleId,
    pub version: Version,
    pub classifier: Option<String>,
    pub extension: Option<String>,
    pub exclusions: Vec<Exclusion>,
    /// Explicit override of how deep the transitive fetch goes; `None`
    /// means the resolver default applies.
    pub transitivity: Option<Transitivity>,
}

impl ModuleDependency {
    pub fn new(module_id: ModuleId, version: Version) -> Self {
        Self {
            module_id,
            version,
            classifier: None,
            extension: None,
            exclusions: Vec::new(),
            transitivity: None,
        }
    }

    /// Parse `"group:name"` or `"group:name:version"`.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let parts: Vec<&str> = descriptor.split(':').collect();
        match parts.as_slice() {
            [group, name] => Some(Self::new(
                ModuleId::new(*group, *name),
                Version::unspecified(),
            )),
            [group, name, version] => Some(Self::new(
                ModuleId::new(*group, *name),
                Version::of(*version),
            )),
            _ => None,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_transitivity(mut self, transitivity: Transitivity) -> Self {
        self.transitivity = Some(transitivity);
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn and_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }
}

impl fmt::Display for ModuleDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_unspecified() {
            write!(f, "{}", self.module_id)
        } else {
            write!(f, "{}:{}", self.module_id, self.version)
        }
    }
}

/// A dependency on files already present on the file system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileSystemDependency {
    files: Vec<PathBuf>,
}

impl FileSystemDependency {
    /// Order-preserving and de-duplicating.
    pub fn of(files: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut unique = Vec::new();
        for file in files {
            if !unique.contains(&file) {
                unique.push(file);
            }
        }
        Self { files: unique }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// The declared files, verifying each one exists.
    pub fn resolve_files(&self) -> KilnResult<Vec<PathBuf>> {
        for file in &self.files {
            if !file.exists() {
                return Err(KilnError::MissingFile { path: file.clone() });
            }
        }
        Ok(self.files.clone())
    }
}

impl fmt::Display for FileSystemDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "files={:?}", self.files)
    }
}

/// The action a computed dependency runs to generate its missing files.
pub type BuildAction = Arc<dyn Fn() + Send + Sync>;

/// A dependency on files that may not exist yet and are generated on
/// demand by a build action, typically the build of another project.
///
/// This is the composition mechanism for multi-project (and multi-tool)
/// builds: the action can shell out to anything that produces the
/// expected files.
#[derive(Clone)]
pub struct ComputedDependency {
    label: String,
    files: Vec<PathBuf>,
    action: BuildAction,
}

impl ComputedDependency {
    pub fn of(
        label: impl Into<String>,
        files: impl IntoIterator<Item = PathBuf>,
        action: BuildAction,
    ) -> Self {
        Self {
            label: label.into(),
            files: files.into_iter().collect(),
            action,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Expected output files, whether or not they exist yet.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Expected outputs that are missing, or are directories containing
    /// no files.
    pub fn missing_files_or_empty_dirs(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|file| fs::is_missing_or_empty_dir(file))
            .cloned()
            .collect()
    }

    /// The expected files, running the build action first if any of them
    /// is missing. Fails if outputs are still missing afterwards; the
    /// action is not retried.
    pub fn resolve_files(&self) -> KilnResult<Vec<PathBuf>> {
        if !self.missing_files_or_empty_dirs().is_empty() {
            tracing::info!("Building depending project '{}'", self.label);
            (self.action)();
        }
        let missing = self.missing_files_or_empty_dirs();
        if !missing.is_empty() {
            return Err(KilnError::BuildActionFailed {
                dependency: self.label.clone(),
                missing,
            });
        }
        Ok(self.files.clone())
    }
}

// The action is opaque; identity is the label plus the expected outputs.
impl PartialEq for ComputedDependency {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.files == other.files
    }
}

impl Eq for ComputedDependency {}

impl Hash for ComputedDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.files.hash(state);
    }
}

impl fmt::Debug for ComputedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedDependency")
            .field("label", &self.label)
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ComputedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// A declared dependency. Exactly one variant is active per instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    Module(ModuleDependency),
    FileSystem(FileSystemDependency),
    Computed(ComputedDependency),
}

impl Dependency {
    pub fn module(descriptor: &str) -> Option<Self> {
        ModuleDependency::parse(descriptor).map(Self::Module)
    }

    pub fn files(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self::FileSystem(FileSystemDependency::of(paths))
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module(_))
    }

    pub fn as_module(&self) -> Option<&ModuleDependency> {
        match self {
            Self::Module(dep) => Some(dep),
            _ => None,
        }
    }

    /// Module id of a module dependency, if this is one.
    pub fn module_id(&self) -> Option<&ModuleId> {
        self.as_module().map(|dep| &dep.module_id)
    }

    /// Resolve the files of a file-backed dependency.
    ///
    /// Module dependencies resolve through a repository resolver instead
    /// and return an empty list here.
    pub fn resolve_files(&self) -> KilnResult<Vec<PathBuf>> {
        match self {
            Self::Module(_) => Ok(Vec::new()),
            Self::FileSystem(dep) => dep.resolve_files(),
            Self::Computed(dep) => dep.resolve_files(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(dep) => dep.fmt(f),
            Self::FileSystem(dep) => dep.fmt(f),
            Self::Computed(dep) => dep.fmt(f),
        }
    }
}

/// True when `module_id` is matched by any of `exclusions`.
pub fn is_excluded(exclusions: &[Exclusion], module_id: &ModuleId) -> bool {
    exclusions.iter().any(|excl| excl.matches(module_id))
}
