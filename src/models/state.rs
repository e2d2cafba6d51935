//! Per-run working state.
//!
//! Two parallel vectors over ring positions: remaining target (may go
//! negative once spare capacity is used) and remaining cap (never
//! negative). Candidates are scored against an immutable snapshot; only
//! the winner is committed, producing the next state.

/// Remaining target and capacity for one allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingState {
    target_remaining: Vec<i64>,
    max_remaining: Vec<i64>,
}

impl WorkingState {
    /// Creates a state from ring-ordered targets and caps.
    pub fn new(target_remaining: Vec<i64>, max_remaining: Vec<i64>) -> Self {
        debug_assert_eq!(target_remaining.len(), max_remaining.len());
        Self {
            target_remaining,
            max_remaining,
        }
    }

    /// Remaining target per position.
    pub fn target_remaining(&self) -> &[i64] {
        &self.target_remaining
    }

    /// Remaining cap per position.
    pub fn max_remaining(&self) -> &[i64] {
        &self.max_remaining
    }

    /// Target vector after hypothetically assigning `slots`.
    pub fn tentative_target(&self, slots: &[usize]) -> Vec<i64> {
        decremented(&self.target_remaining, slots)
    }

    /// Cap vector after hypothetically assigning `slots`.
    pub fn tentative_max(&self, slots: &[usize]) -> Vec<i64> {
        decremented(&self.max_remaining, slots)
    }

    /// Assigns one worker to `slots`, returning the next state.
    pub fn commit(&self, slots: &[usize]) -> Self {
        debug_assert!(self.has_capacity(slots), "committing beyond capacity");
        Self {
            target_remaining: self.tentative_target(slots),
            max_remaining: self.tentative_max(slots),
        }
    }

    /// Whether every member still has remaining target.
    pub fn all_under_target(&self, slots: &[usize]) -> bool {
        slots.iter().all(|&s| self.target_remaining[s] > 0)
    }

    /// Whether any member still has remaining target.
    pub fn any_under_target(&self, slots: &[usize]) -> bool {
        slots.iter().any(|&s| self.target_remaining[s] > 0)
    }

    /// Whether every member still has remaining capacity.
    pub fn has_capacity(&self, slots: &[usize]) -> bool {
        slots.iter().all(|&s| self.max_remaining[s] > 0)
    }

    /// Sum of remaining caps.
    pub fn total_max_remaining(&self) -> i64 {
        self.max_remaining.iter().sum()
    }

    /// Sum of positive remaining targets (the unmet shortfall).
    pub fn outstanding_target(&self) -> i64 {
        self.target_remaining.iter().map(|&t| t.max(0)).sum()
    }

    /// Whether every slot has reached its target.
    pub fn targets_met(&self) -> bool {
        self.target_remaining.iter().all(|&t| t <= 0)
    }
}

fn decremented(values: &[i64], slots: &[usize]) -> Vec<i64> {
    let mut next = values.to_vec();
    for &s in slots {
        next[s] -= 1;
    }
    next
}
