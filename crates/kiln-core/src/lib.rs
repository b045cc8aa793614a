//! Core dependency model for the Kiln build tool.
//!
//! This crate defines the declared-dependency side of dependency
//! management: module coordinates and versions, the closed set of
//! dependency variants (module, file-system, computed), ordered qualified
//! dependency sets with global exclusions and version providers, pairwise
//! set merging, and the scope-classification algorithms that derive
//! Maven scopes and Ivy configuration mappings from a three-tier
//! compile/runtime/test comparison.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod dependency;
pub mod depset;
pub mod merge;
pub mod module;
pub mod scope;
pub mod transitivity;
pub mod version;
