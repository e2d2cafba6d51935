//! Built-in candidate scorers.
//!
//! # Phases
//!
//! - **Fill**: [`SmallInstance`], [`LargeInstance`]
//! - **Rescue**: [`ShortfallRescue`]
//! - **Extra workers**: [`SpareCapacity`]
//!
//! # Score Convention
//! All scorers return higher scores for better candidates.

use super::{bottleneck, global_balance, CandidateScore, CandidateScorer, ScoreContext};
use crate::models::AdjacencyClass;

// ======================== Fill profiles ========================

/// Fill scoring for small instances.
///
/// `+1000 + 10 × Σ member demand` for a full run, no bonus otherwise,
/// minus `5 × bottleneck(tentative target)`.
#[derive(Debug, Clone, Copy)]
pub struct SmallInstance;

impl CandidateScorer for SmallInstance {
    fn name(&self) -> &'static str {
        "SMALL"
    }

    fn score(&self, ctx: &ScoreContext<'_>) -> CandidateScore {
        let mut score = 0.0;
        if ctx.combination.class() == AdjacencyClass::Full {
            let target = ctx.state.target_remaining();
            let pressure: i64 = ctx.combination.slots().iter().map(|&s| target[s]).sum();
            score += (1000 + 10 * pressure) as f64;
        }
        score -= 5.0 * bottleneck(ctx.tentative_target);
        score
    }

    fn description(&self) -> &'static str {
        "Small instance: consecutive runs relieving the most demand"
    }
}

/// Fill scoring for large instances.
///
/// Strict tiers: full `+10000`, partial `+5000`, none `0`. No secondary
/// term can cross a tier gap. Secondary terms:
/// - `−100 × bottleneck(tentative max)`: spare capacity, not raw target,
///   decides whether a slot is heading for a dead end.
/// - `+200 × global_balance(tentative target)`.
/// - `+300` when the combination takes the slot with the largest remaining
///   target (and that target is still positive).
/// - `+200` when it takes both the largest and the smallest.
#[derive(Debug, Clone, Copy)]
pub struct LargeInstance;

impl CandidateScorer for LargeInstance {
    fn name(&self) -> &'static str {
        "LARGE"
    }

    fn score(&self, ctx: &ScoreContext<'_>) -> CandidateScore {
        let combination = ctx.combination;
        let mut score = match combination.class() {
            AdjacencyClass::Full => 10_000.0,
            AdjacencyClass::Partial => 5_000.0,
            AdjacencyClass::None => 0.0,
        };
        score -= 100.0 * bottleneck(ctx.tentative_max);
        score += 200.0 * global_balance(ctx.tentative_target);

        let target = ctx.state.target_remaining();
        if let (Some(hi), Some(lo)) = (largest(target), smallest(target)) {
            if target[hi] > 0 && combination.contains(hi) {
                score += 300.0;
            }
            if hi != lo && combination.contains(hi) && combination.contains(lo) {
                score += 200.0;
            }
        }
        score
    }

    fn description(&self) -> &'static str {
        "Large instance: adjacency tiers with capacity and balance terms"
    }
}

// ======================== Rescue ========================

/// Rescue scoring: relieve as many under-target members as possible.
///
/// `500 × (members under target) + 10 × (their remaining target) + adjacency bonus`.
#[derive(Debug, Clone, Copy)]
pub struct ShortfallRescue;

impl CandidateScorer for ShortfallRescue {
    fn name(&self) -> &'static str {
        "RESCUE"
    }

    fn score(&self, ctx: &ScoreContext<'_>) -> CandidateScore {
        let target = ctx.state.target_remaining();
        let (count, demand) = ctx
            .combination
            .slots()
            .iter()
            .map(|&s| target[s])
            .filter(|&t| t > 0)
            .fold((0i64, 0i64), |(n, sum), t| (n + 1, sum + t));
        (500 * count + 10 * demand) as f64 + ctx.combination.class().bonus()
    }

    fn description(&self) -> &'static str {
        "Shortfall rescue using spare capacity"
    }
}

// ======================== Extra workers ========================

/// Extra-worker scoring: adjacency plus even use of spare capacity.
///
/// `bonus + 10 / (min + 1) + 15 × balance` with
/// `balance = 1 − (max − min) / (max + min + 1)` over the members'
/// tentative remaining caps.
#[derive(Debug, Clone, Copy)]
pub struct SpareCapacity;

impl CandidateScorer for SpareCapacity {
    fn name(&self) -> &'static str {
        "SPARE"
    }

    fn score(&self, ctx: &ScoreContext<'_>) -> CandidateScore {
        let values = ctx.combination.slots().iter().map(|&s| ctx.tentative_max[s]);
        let max = values.clone().max().unwrap_or(0);
        let min = values.min().unwrap_or(0);
        let balance = 1.0 - (max - min) as f64 / (max + min + 1) as f64;
        ctx.combination.class().bonus() + 10.0 / (min + 1) as f64 + 15.0 * balance
    }

    fn description(&self) -> &'static str {
        "Spare capacity balance for workers beyond target"
    }
}

/// First position holding the largest value.
fn largest(values: &[i64]) -> Option<usize> {
    (0..values.len()).fold(None, |best, i| match best {
        Some(b) if values[b] >= values[i] => Some(b),
        _ => Some(i),
    })
}

/// First position holding the smallest value.
fn smallest(values: &[i64]) -> Option<usize> {
    (0..values.len()).fold(None, |best, i| match best {
        Some(b) if values[b] <= values[i] => Some(b),
        _ => Some(i),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CombinationCatalog, Topology, WorkingState};

    fn six() -> (Topology, CombinationCatalog) {
        let t = Topology::ring(["A", "B", "C", "D", "E", "F"], 3).unwrap();
        let c = CombinationCatalog::new(&t);
        (t, c)
    }

    fn score_for(
        scorer: &dyn CandidateScorer,
        catalog: &CombinationCatalog,
        state: &WorkingState,
        slots: &[usize],
    ) -> f64 {
        let combination = catalog
            .all()
            .iter()
            .find(|c| c.slots() == slots)
            .unwrap();
        let tt = state.tentative_target(slots);
        let tm = state.tentative_max(slots);
        scorer.score(&ScoreContext {
            combination,
            state,
            tentative_target: &tt,
            tentative_max: &tm,
        })
    }

    #[test]
    fn test_extremes() {
        assert_eq!(largest(&[1, 5, 5, 0]), Some(1));
        assert_eq!(smallest(&[1, 0, 5, 0]), Some(1));
        assert_eq!(largest(&[]), None);
    }

    #[test]
    fn test_large_tiers_dominate() {
        let (_, catalog) = six();
        let state = WorkingState::new(vec![6, 2, 4, 9, 9, 15], vec![9, 3, 6, 18, 18, 30]);
        let full = score_for(&LargeInstance, &catalog, &state, &[0, 1, 2]);
        let partial = score_for(&LargeInstance, &catalog, &state, &[0, 1, 3]);
        let none = score_for(&LargeInstance, &catalog, &state, &[0, 2, 4]);
        assert!(full > partial);
        assert!(partial > none);
        assert!(full >= 9_000.0 && full < 11_000.0);
        assert!(partial >= 4_000.0 && partial < 6_000.0);
    }

    #[test]
    fn test_large_prefers_largest_slot() {
        let (_, catalog) = six();
        let state = WorkingState::new(vec![6, 2, 4, 9, 9, 15], vec![9, 3, 6, 18, 18, 30]);
        let with_f = score_for(&LargeInstance, &catalog, &state, &[3, 4, 5]);
        let without_f = score_for(&LargeInstance, &catalog, &state, &[2, 3, 4]);
        assert!(with_f > without_f);
    }

    #[test]
    fn test_small_full_bonus() {
        let (_, catalog) = six();
        let state = WorkingState::new(vec![1, 1, 1, 1, 1, 1], vec![1, 1, 1, 1, 1, 1]);
        let full = score_for(&SmallInstance, &catalog, &state, &[0, 1, 2]);
        let none = score_for(&SmallInstance, &catalog, &state, &[0, 2, 4]);
        // 1000 + 10 × 3, minus 5 × (3 × 1 / (2 + 1)).
        assert!((full - 1025.0).abs() < 1e-10);
        assert!((none + 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rescue_score() {
        let (_, catalog) = six();
        let state = WorkingState::new(vec![2, 0, -1, 0, 0, 1], vec![3, 3, 3, 3, 3, 3]);
        // Members 0 and 5 under target: 500 × 2 + 10 × 3 + full (F,A,B wraps) 100.
        let s = score_for(&ShortfallRescue, &catalog, &state, &[0, 1, 5]);
        assert!((s - 1130.0).abs() < 1e-10);
        // Only member 0 under target, partial pair A-B.
        let s = score_for(&ShortfallRescue, &catalog, &state, &[0, 1, 3]);
        assert!((s - 550.0).abs() < 1e-10);
    }

    #[test]
    fn test_spare_capacity_score() {
        let (_, catalog) = six();
        let state = WorkingState::new(vec![0; 6], vec![3, 3, 3, 1, 5, 2]);
        // Tentative caps 2,2,2 → 100 + 10/3 + 15.
        let s = score_for(&SpareCapacity, &catalog, &state, &[0, 1, 2]);
        assert!((s - (115.0 + 10.0 / 3.0)).abs() < 1e-10);
        // Tentative caps 0,4,1 on D,E,F → 100 + 10 + 15 × (1 − 4/5).
        let s = score_for(&SpareCapacity, &catalog, &state, &[3, 4, 5]);
        assert!((s - 113.0).abs() < 1e-10);
    }
}
