//! Feasibility oracle.
//!
//! Decides whether a remaining-demand vector could still be exhausted by
//! K-slot combinations.
//!
//! # Conditions
//!
//! 1. **Divisibility**: `sum(r) mod K == 0`.
//! 2. **Hall condition**: for every slot `s` with `r[s] > 0`,
//!    `r[s] × (K − 1) ≤ Σ_{p≠s} r[p]`. Each unit of demand at `s` needs
//!    `K − 1` partners drawn from other slots.
//!
//! Both are necessary, not sufficient in general. A "feasible" verdict is
//! permission to continue, not a guarantee of completion. Negative entries
//! count as zero.
//!
//! On multi-method topologies the Hall condition is checked per method over
//! that method's eligible slots, and divisibility is waived: mixed arities
//! reach totals a single K cannot.
//!
//! # Reference
//! Hall (1935), "On Representatives of Subsets"

use crate::models::{partner_capacity_within, Topology};

/// Feasibility checks bound to a topology.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityOracle<'a> {
    topology: &'a Topology,
}

impl<'a> FeasibilityOracle<'a> {
    /// Creates an oracle for a topology.
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Full check (divisibility and Hall) for workers of `method`.
    pub fn is_feasible(&self, remaining: &[i64], method: usize) -> bool {
        self.is_divisible(remaining, method) && self.hall_satisfied(remaining, method)
    }

    /// Divisibility by the method arity; always true on multi-method topologies.
    pub fn is_divisible(&self, remaining: &[i64], method: usize) -> bool {
        if !self.topology.is_single_method() {
            return true;
        }
        let arity = self.topology.methods()[method].arity() as i64;
        arity > 0 && positive_sum(remaining) % arity == 0
    }

    /// Hall condition over the method's eligible slots.
    pub fn hall_satisfied(&self, remaining: &[i64], method: usize) -> bool {
        let layout = &self.topology.methods()[method];
        hall_condition(remaining, layout.arity(), layout.eligible())
    }

    /// Plain single-arity check over every slot of `remaining`.
    ///
    /// # Example
    /// ```
    /// use u_shift::feasibility::FeasibilityOracle;
    ///
    /// assert!(FeasibilityOracle::check(&[6, 2, 4, 9, 9, 15], 3));
    /// assert!(!FeasibilityOracle::check(&[6, 2, 4, 9, 8, 15], 3)); // 44 not divisible
    /// assert!(!FeasibilityOracle::check(&[1, 1, 1, 0, 0, 6], 3)); // 6 × 2 > 3
    /// ```
    pub fn check(remaining: &[i64], arity: usize) -> bool {
        if arity == 0 || positive_sum(remaining) % arity as i64 != 0 {
            return false;
        }
        let all: Vec<usize> = (0..remaining.len()).collect();
        hall_condition(remaining, arity, &all)
    }
}

fn positive_sum(remaining: &[i64]) -> i64 {
    remaining.iter().map(|&r| r.max(0)).sum()
}

fn hall_condition(remaining: &[i64], arity: usize, eligible: &[usize]) -> bool {
    let partners_needed = arity.saturating_sub(1) as i64;
    eligible.iter().all(|&s| {
        let demand = remaining[s].max(0);
        demand == 0 || demand * partners_needed <= partner_capacity_within(s, remaining, eligible)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Method, SlotGroup};

    fn six() -> Topology {
        Topology::ring(["A", "B", "C", "D", "E", "F"], 3).unwrap()
    }

    fn day_night() -> Topology {
        let night = ["N1", "N2", "N3", "N4", "N5"];
        Topology::new(
            ["D1", "D2", "D3", "N1", "N2", "N3", "N4", "N5"],
            vec![
                Method::new("day-night")
                    .with_group(SlotGroup::new(["D1", "D2", "D3"], 1))
                    .with_group(SlotGroup::new(night, 2)),
                Method::uniform("night-only", night, 5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_tight_hall_is_feasible() {
        // Slot F needs every other unit as a partner: 15 × 2 = 30.
        let ring = six();
        let oracle = FeasibilityOracle::new(&ring);
        assert!(oracle.is_feasible(&[6, 2, 4, 9, 9, 15], 0));
        assert!(!oracle.is_feasible(&[6, 2, 4, 9, 9, 16], 0));
    }

    #[test]
    fn test_divisibility() {
        let ring = six();
        let oracle = FeasibilityOracle::new(&ring);
        assert!(!oracle.is_divisible(&[1, 1, 0, 0, 0, 0], 0));
        assert!(oracle.hall_satisfied(&[1, 1, 0, 0, 0, 0], 0));
        assert!(!oracle.is_feasible(&[1, 1, 0, 0, 0, 0], 0));
        assert!(oracle.is_feasible(&[1, 1, 1, 0, 0, 0], 0));
    }

    #[test]
    fn test_hall_violation() {
        let ring = six();
        let oracle = FeasibilityOracle::new(&ring);
        // 5 × 2 = 10 > 4 partners.
        assert!(!oracle.hall_satisfied(&[5, 1, 1, 1, 0, 1], 0));
    }

    #[test]
    fn test_negative_entries_clamped() {
        assert!(FeasibilityOracle::check(&[-2, 1, 1, 1, 0, 0], 3));
        assert!(FeasibilityOracle::check(&[0, 0, 0, 0, 0, 0], 3));
        assert!(FeasibilityOracle::check(&[-1, -1], 2));
    }

    #[test]
    fn test_pairs() {
        assert!(FeasibilityOracle::check(&[2, 2, 2, 2, 2], 2));
        assert!(!FeasibilityOracle::check(&[9, 1, 1, 1, 1], 2));
        assert!(!FeasibilityOracle::check(&[1, 1, 1, 0, 0], 2));
    }

    #[test]
    fn test_multi_method_uses_eligible_slots() {
        let topology = day_night();
        let oracle = FeasibilityOracle::new(&topology);

        // Day demand is invisible to the night-only method.
        let remaining = [9, 9, 9, 4, 4, 4, 4, 4];
        assert!(oracle.hall_satisfied(&remaining, 1));
        assert!(oracle.is_divisible(&[1, 0, 0, 0, 0, 0, 0, 0], 1));

        // Night-only needs 4 partners per unit.
        assert!(!oracle.hall_satisfied(&[0, 0, 0, 5, 1, 1, 1, 1], 1));
        assert!(oracle.hall_satisfied(&[0, 0, 0, 1, 1, 1, 1, 1], 1));

        // Day-night covers all eight slots.
        assert!(!oracle.hall_satisfied(&[9, 0, 0, 1, 1, 0, 0, 0], 0));
    }
}
