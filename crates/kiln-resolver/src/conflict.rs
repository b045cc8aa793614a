//! Version conflict detection and eviction reporting.
//!
//! Evictions are a normal resolution outcome, not errors: the report
//! explains why a version lost, it never aborts a resolution.

use std::fmt;

use kiln_core::module::ModuleId;
use kiln_core::version::Version;

/// A report of all version conflicts encountered during resolution.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single conflict where multiple versions of the same module were
/// requested and the losing one was evicted.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub module_id: ModuleId,
    pub requested: Version,
    pub resolved: Version,
    pub reason: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(
                f,
                "  {} requested {} but resolved {} ({})",
                c.module_id, c.requested, c.resolved, c.reason
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({})",
            self.module_id, self.requested, self.resolved, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn report_with_conflicts() {
        let mut report = ConflictReport::new();
        report.add(VersionConflict {
            module_id: ModuleId::new("org.example", "lib"),
            requested: Version::of("2.0"),
            resolved: Version::of("1.0"),
            reason: "first declaration wins".to_string(),
        });
        assert!(!report.is_empty());
        assert_eq!(report.len(), 1);
        let s = report.to_string();
        assert!(s.contains("org.example:lib"));
        assert!(s.contains("requested 2.0 but resolved 1.0"));
    }
}
