//! Candidate scoring for the greedy allocator.
//!
//! Every allocation step scores each accepted combination against an
//! immutable snapshot of the working state and commits the best one.
//! Scorers are side-effect free: they see the snapshot and the tentative
//! vectors, never the live state.
//!
//! # Score Convention
//! **Higher score = better candidate.**
//!
//! # Profiles
//!
//! | Profile | Used when | Scorer |
//! |---------|-----------|--------|
//! | Small | `ceil(Σ target / K) < threshold` | [`rules::SmallInstance`] |
//! | Large | otherwise | [`rules::LargeInstance`] |
//!
//! The rescue and extra-worker phases use [`rules::ShortfallRescue`] and
//! [`rules::SpareCapacity`] regardless of profile.

pub mod rules;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::models::{partner_capacity, Combination, WorkingState};

/// Score assigned to a candidate combination.
pub type CandidateScore = f64;

/// Everything a scorer may look at for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    /// The candidate.
    pub combination: &'a Combination,
    /// State before the candidate is applied.
    pub state: &'a WorkingState,
    /// Target vector after applying the candidate.
    pub tentative_target: &'a [i64],
    /// Cap vector after applying the candidate.
    pub tentative_max: &'a [i64],
}

/// A scoring rule for candidate combinations.
pub trait CandidateScorer: Send + Sync + Debug {
    /// Rule name.
    fn name(&self) -> &'static str;

    /// Scores a candidate; higher is better.
    fn score(&self, ctx: &ScoreContext<'_>) -> CandidateScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Fill-phase scoring profile, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringProfile {
    /// Few workers needed: reward full runs, light bottleneck penalty.
    Small,
    /// Many workers needed: strict adjacency tiers plus balance terms.
    Large,
}

impl ScoringProfile {
    /// Selects the profile from the workers needed to cover every target.
    ///
    /// # Example
    /// ```
    /// use u_shift::scoring::ScoringProfile;
    ///
    /// assert_eq!(ScoringProfile::select(42, 3, 15), ScoringProfile::Small);
    /// assert_eq!(ScoringProfile::select(45, 3, 15), ScoringProfile::Large);
    /// ```
    pub fn select(total_target: i64, shifts_per_worker: usize, threshold: usize) -> Self {
        let k = shifts_per_worker.max(1) as i64;
        let riders_for_full_target = if total_target <= 0 {
            0
        } else {
            (total_target + k - 1) / k
        };
        if riders_for_full_target < threshold as i64 {
            ScoringProfile::Small
        } else {
            ScoringProfile::Large
        }
    }

    /// The scorer implementing this profile.
    pub fn scorer(self) -> &'static dyn CandidateScorer {
        match self {
            ScoringProfile::Small => &rules::SmallInstance,
            ScoringProfile::Large => &rules::LargeInstance,
        }
    }
}

/// `Σ v[s] / (partner(s) + 1)` over slots with positive `v[s]`.
///
/// Large when some slot's demand dwarfs what its partners can absorb.
pub fn bottleneck(remaining: &[i64]) -> f64 {
    remaining
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0)
        .map(|(s, &v)| v as f64 / (partner_capacity(s, remaining) + 1) as f64)
        .sum()
}

/// `1 − (max − min) / (Σ + 1)` over non-negative remaining values.
pub fn global_balance(remaining: &[i64]) -> f64 {
    let clamped = remaining.iter().map(|&v| v.max(0));
    let max = clamped.clone().max().unwrap_or(0);
    let min = clamped.clone().min().unwrap_or(0);
    let sum: i64 = clamped.sum();
    1.0 - (max - min) as f64 / (sum + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_threshold() {
        assert_eq!(ScoringProfile::select(0, 3, 15), ScoringProfile::Small);
        assert_eq!(ScoringProfile::select(42, 3, 15), ScoringProfile::Small);
        // ceil(43 / 3) = 15
        assert_eq!(ScoringProfile::select(43, 3, 15), ScoringProfile::Large);
        assert_eq!(ScoringProfile::select(45, 3, 15), ScoringProfile::Large);
        assert_eq!(ScoringProfile::select(45, 3, 16), ScoringProfile::Small);
        assert_eq!(ScoringProfile::Small.scorer().name(), "SMALL");
        assert_eq!(ScoringProfile::Large.scorer().name(), "LARGE");
    }

    #[test]
    fn test_bottleneck() {
        // 3 / (1 + 1) + 1 / (3 + 1)
        assert!((bottleneck(&[3, 1, 0]) - 1.75).abs() < 1e-10);
        assert!((bottleneck(&[0, 0]) - 0.0).abs() < 1e-10);
        assert!((bottleneck(&[2, -1]) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_global_balance() {
        assert!((global_balance(&[2, 2, 2]) - 1.0).abs() < 1e-10);
        // 1 − 4 / 7
        assert!((global_balance(&[4, 0, 2]) - 3.0 / 7.0).abs() < 1e-10);
        assert!((global_balance(&[-3, 1]) - 0.5).abs() < 1e-10);
    }
}
