use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Kiln operations.
#[derive(Debug, Error, Diagnostic)]
pub enum KilnError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A module dependency still has an unspecified version after
    /// provider substitution.
    #[error("No version specified for module {module}")]
    #[diagnostic(help("Declare a version on the dependency or register one in a version provider"))]
    UnresolvedVersion { module: String },

    /// Two declared version constraints for the same module could not be
    /// reconciled under the `Fail` conflict strategy.
    #[error("Conflicting versions for module {module}: {left} vs {right}")]
    #[diagnostic(help("Align the declared versions or resolve with ConflictStrategy::TakeFirst"))]
    VersionConflict {
        module: String,
        left: String,
        right: String,
    },

    /// A file-system dependency lists a path that does not exist.
    #[error("Dependency file {path} does not exist")]
    MissingFile { path: PathBuf },

    /// A computed dependency's build action ran but some expected outputs
    /// are still missing.
    #[error("Build action '{dependency}' did not generate {missing:?}")]
    #[diagnostic(help("The build action completed without producing the expected files; it is not retried"))]
    BuildActionFailed {
        dependency: String,
        missing: Vec<PathBuf>,
    },

    /// A module-only tree query was invoked on a node of another kind.
    /// Programmer error: callers must check the node kind first.
    #[error("Expected a {expected} node but found {actual}")]
    NodeKind { expected: String, actual: String },
}

/// Convenience alias for results carrying a [`KilnError`].
pub type KilnResult<T> = Result<T, KilnError>;
