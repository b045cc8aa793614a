use serde::{Deserialize, Serialize};

/// How much of a dependency's own dependency graph to pull in.
///
/// Maven metadata publishes transitive dependencies under only two scopes,
/// `compile` and `runtime`. This enum controls which of them a dependency
/// fetch follows; the derived ordering (`None < Compile < Runtime`) ranks
/// requests from shallowest to deepest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transitivity {
    /// Fetch the dependency without any of its transitive dependencies.
    None,
    /// Fetch along transitive dependencies declared as `compile`.
    Compile,
    /// Fetch along transitive dependencies declared as `compile` or
    /// `runtime`.
    Runtime,
}

impl Transitivity {
    /// The deeper of two requested transitivities, treating an absent side
    /// as identity.
    ///
    /// Used when the same module is reached through two paths requesting
    /// different transitivity: the more inclusive request wins, otherwise
    /// one path would silently end up with an incomplete classpath.
    pub fn of_deepest(left: Option<Transitivity>, right: Option<Transitivity>) -> Option<Transitivity> {
        match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (Some(l), Some(r)) => Some(l.max(r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Option<Transitivity>; 4] = [
        None,
        Some(Transitivity::None),
        Some(Transitivity::Compile),
        Some(Transitivity::Runtime),
    ];

    #[test]
    fn ordering() {
        assert!(Transitivity::None < Transitivity::Compile);
        assert!(Transitivity::Compile < Transitivity::Runtime);
    }

    #[test]
    fn deepest_wins() {
        assert_eq!(
            Transitivity::of_deepest(Some(Transitivity::None), Some(Transitivity::Runtime)),
            Some(Transitivity::Runtime)
        );
        assert_eq!(
            Transitivity::of_deepest(Some(Transitivity::Compile), Some(Transitivity::None)),
            Some(Transitivity::Compile)
        );
    }

    #[test]
    fn absent_side_is_identity() {
        assert_eq!(Transitivity::of_deepest(None, Some(Transitivity::None)), Some(Transitivity::None));
        assert_eq!(Transitivity::of_deepest(Some(Transitivity::Runtime), None), Some(Transitivity::Runtime));
        assert_eq!(Transitivity::of_deepest(None, None), None);
    }

    #[test]
    fn commutative_and_idempotent() {
        for a in ALL {
            assert_eq!(Transitivity::of_deepest(a, a), a);
            for b in ALL {
                assert_eq!(Transitivity::of_deepest(a, b), Transitivity::of_deepest(b, a));
            }
        }
    }
}
