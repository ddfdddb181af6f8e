//! Enrichment phases.

use std::fmt;

/// Ordering bucket of an enricher.
///
/// Phases run in declaration order. Enrichers that do not pick a phase run in
/// [`Phase::Structure`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Seeds vocabularies later phases rely on (error types).
    Initialize,
    /// Adds structural facts and parameters.
    #[default]
    Structure,
    /// Derives facts from the finished structure.
    PostStructure,
    /// Wires infrastructure once everything else is known.
    Wiring,
}

impl Phase {
    /// Every phase, in execution order.
    pub const ALL: [Phase; 4] = [
        Phase::Initialize,
        Phase::Structure,
        Phase::PostStructure,
        Phase::Wiring,
    ];

    /// Returns the upper-case name of the phase.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Initialize => "INITIALIZE",
            Self::Structure => "STRUCTURE",
            Self::PostStructure => "POST_STRUCTURE",
            Self::Wiring => "WIRING",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_all() {
        let mut sorted = Phase::ALL;
        sorted.sort();
        assert_eq!(sorted, Phase::ALL);
        assert_eq!(Phase::default(), Phase::Structure);
        assert_eq!(Phase::PostStructure.to_string(), "POST_STRUCTURE");
    }
}
