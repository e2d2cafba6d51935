//! Result classification.
//!
//! Derives aggregate adjacency counts and the extra-worker count from a
//! list of assignments.

use crate::models::{AdjacencyClass, Assignment, Topology};

/// Aggregate counts over a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    /// Full-consecutive assignments.
    pub consecutive: usize,
    /// Partial-consecutive assignments.
    pub partial: usize,
    /// Assignments with no adjacent pair.
    pub none: usize,
    /// Assignments flagged extra.
    pub extra: usize,
}

/// Classifies assignments against a topology's ring.
#[derive(Debug, Clone, Copy)]
pub struct ResultClassifier<'a> {
    topology: &'a Topology,
}

impl<'a> ResultClassifier<'a> {
    /// Creates a classifier.
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Adjacency class of one assignment. Unknown slot IDs are ignored.
    pub fn classify(&self, assignment: &Assignment) -> AdjacencyClass {
        let positions: Vec<usize> = assignment
            .slots
            .iter()
            .filter_map(|id| self.topology.position(id))
            .collect();
        AdjacencyClass::classify(&positions, self.topology.len())
    }

    /// Counts per class plus extra workers.
    pub fn summarize(&self, assignments: &[Assignment]) -> ClassCounts {
        assignments
            .iter()
            .fold(ClassCounts::default(), |mut counts, assignment| {
                match self.classify(assignment) {
                    AdjacencyClass::Full => counts.consecutive += 1,
                    AdjacencyClass::Partial => counts.partial += 1,
                    AdjacencyClass::None => counts.none += 1,
                }
                if assignment.is_extra {
                    counts.extra += 1;
                }
                counts
            })
    }
}
