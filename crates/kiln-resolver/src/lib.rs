//! Dependency resolution engine: version-conflict-free tree construction,
//! eviction reporting, transitivity handling, and exclusion propagation.
//!
//! The actual repository access is supplied by the caller through the
//! [`resolver::ModuleResolver`] trait; this crate only assembles and
//! queries the resolved dependency tree.

pub mod conflict;
pub mod resolver;
pub mod tree;
