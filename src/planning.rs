//! Coverage planning for single-method topologies.
//!
//! On a topology where every worker takes any `K` distinct slots, a
//! demand vector `c` can be split into exactly `w` workers iff
//! `Σ c = K × w` and `c[s] ≤ w` for every slot. A vector meeting both is
//! *decomposable*. The planner turns raw targets into the decomposable
//! vector the fill phase should cover, so greedy fill never strands a slot.
//!
//! # Algorithm
//! 1. `capacity` = the most workers the caps can host:
//!    the largest `w ≤ riders` with `Σ min(cap[s], w) ≥ K × w`.
//! 2. `cover` = the fewest workers that can reach every target:
//!    `max(⌈Σ target / K⌉, max target)`.
//! 3. `w = min(capacity, cover)`; each entry starts at `min(target, w)`.
//! 4. Trim the largest entries, or pad the slots with the most unmet real
//!    demand (then the most spare cap), until the sum is `K × w`.
//!
//! Padding never passes `min(cap[s], w)`, so the plan stays within caps.
//! A plan covers the targets whenever any `w ≤ riders` could.
//!
//! # Why greedy fill completes a plan
//! Taking one unit from each of the `K` largest entries of a decomposable
//! vector leaves it decomposable, and such a combination always passes the
//! feasibility oracle on the remaining target.

use std::cmp::Reverse;

use tracing::debug;

/// Plans decomposable fill targets for workers of `K` slots each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPlanner {
    shifts_per_worker: usize,
}

impl TargetPlanner {
    /// Creates a planner for workers taking `shifts_per_worker` slots each.
    pub fn new(shifts_per_worker: usize) -> Self {
        Self { shifts_per_worker }
    }

    /// Most workers the caps can host, up to `limit`.
    ///
    /// `Σ min(cap, w) − K × w` is concave in `w` and zero at `w = 0`, so
    /// the hostable counts form a prefix and a binary search finds its end.
    ///
    /// # Example
    /// ```
    /// use u_shift::planning::TargetPlanner;
    ///
    /// let planner = TargetPlanner::new(2);
    /// assert_eq!(planner.capacity_workers(&[3, 3, 3, 3, 3], 100), 7);
    /// assert_eq!(planner.capacity_workers(&[9, 1, 0, 0, 0], 100), 1);
    /// assert_eq!(planner.capacity_workers(&[3, 3, 3, 3, 3], 4), 4);
    /// ```
    pub fn capacity_workers(&self, caps: &[i64], limit: usize) -> usize {
        let k = self.shifts_per_worker as i64;
        if k == 0 {
            return 0;
        }
        let hosts = |w: i64| caps.iter().map(|&c| c.clamp(0, w)).sum::<i64>() >= k * w;

        let total: i64 = caps.iter().map(|&c| c.max(0)).sum();
        let (mut lo, mut hi) = (0_i64, (limit as i64).min(total / k));
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if hosts(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo as usize
    }

    /// Fewest workers that can reach every target.
    pub fn cover_workers(&self, targets: &[i64]) -> usize {
        let k = self.shifts_per_worker as i64;
        if k == 0 {
            return 0;
        }
        let total: i64 = targets.iter().map(|&t| t.max(0)).sum();
        let widest = targets.iter().copied().max().unwrap_or(0).max(0);
        ((total + k - 1) / k).max(widest) as usize
    }

    /// Decomposable fill targets for at most `rider_count` workers.
    ///
    /// `targets` are the targets to cover (already reduced under
    /// scarcity), `caps` the working caps and `demand` the real targets,
    /// which steer where extra units land.
    ///
    /// # Example
    /// ```
    /// use u_shift::planning::TargetPlanner;
    ///
    /// let planner = TargetPlanner::new(3);
    /// // 35 units need 12 workers; the missing unit goes to the slot with
    /// // the most spare cap.
    /// let targets = [5, 6, 11, 3, 8, 2];
    /// let plan = planner.plan(&targets, &[7, 6, 12, 3, 15, 5], &targets, 20);
    /// assert_eq!(plan, vec![5, 6, 11, 3, 9, 2]);
    /// ```
    pub fn plan(
        &self,
        targets: &[i64],
        caps: &[i64],
        demand: &[i64],
        rider_count: usize,
    ) -> Vec<i64> {
        let k = self.shifts_per_worker as i64;
        let capacity = self.capacity_workers(caps, rider_count);
        let cover = self.cover_workers(targets);
        let workers = capacity.min(cover) as i64;

        let bounds: Vec<i64> = caps.iter().map(|&c| c.clamp(0, workers)).collect();
        let mut plan: Vec<i64> = targets
            .iter()
            .zip(&bounds)
            .map(|(&t, &b)| t.clamp(0, b))
            .collect();

        let goal = k * workers;
        let mut total: i64 = plan.iter().sum();
        while total > goal {
            let Some(p) = (0..plan.len()).max_by_key(|&p| (plan[p], Reverse(p))) else {
                break;
            };
            plan[p] -= 1;
            total -= 1;
        }
        while total < goal {
            let Some(p) = (0..plan.len())
                .filter(|&p| plan[p] < bounds[p])
                .max_by_key(|&p| {
                    let unmet = demand.get(p).copied().unwrap_or(0) - plan[p];
                    (unmet, caps[p] - plan[p], Reverse(p))
                })
            else {
                break;
            };
            plan[p] += 1;
            total += 1;
        }

        debug!(capacity, cover, ?plan, "fill targets planned");
        plan
    }
}

/// Whether `plan` splits into exactly `Σ plan / K` workers of `K` slots.
pub fn is_decomposable(plan: &[i64], shifts_per_worker: usize) -> bool {
    let k = shifts_per_worker as i64;
    if k == 0 || plan.iter().any(|&c| c < 0) {
        return false;
    }
    let total: i64 = plan.iter().sum();
    total % k == 0 && plan.iter().all(|&c| c * k <= total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisible_targets_unchanged() {
        let planner = TargetPlanner::new(3);
        let targets = [6, 2, 4, 9, 9, 15];
        let plan = planner.plan(&targets, &[9, 3, 6, 18, 18, 30], &targets, 15);
        assert_eq!(plan, targets.to_vec());
    }

    #[test]
    fn test_uneven_total_padded_within_caps() {
        let planner = TargetPlanner::new(3);
        let targets = [5, 6, 11, 3, 8, 2];
        let caps = [7, 6, 12, 3, 15, 5];
        let plan = planner.plan(&targets, &caps, &targets, 30);

        assert_eq!(plan.iter().sum::<i64>(), 36);
        assert!(is_decomposable(&plan, 3));
        for p in 0..6 {
            assert!(plan[p] >= targets[p]);
            assert!(plan[p] <= caps[p]);
        }
    }

    #[test]
    fn test_overweight_slot_trimmed() {
        // Sub-targets for 5 workers put 6 units on the last slot; no worker
        // takes a slot twice, so the plan moves the excess elsewhere.
        let planner = TargetPlanner::new(3);
        let caps = [4, 4, 0, 11, 1, 12];
        let plan = planner.plan(&[2, 2, 0, 5, 0, 6], &caps, &[4, 4, 0, 11, 1, 12], 5);

        assert_eq!(plan.iter().sum::<i64>(), 15);
        assert!(plan.iter().all(|&c| c <= 5));
        assert!(plan.iter().zip(&caps).all(|(c, m)| c <= m));
        assert!(is_decomposable(&plan, 3));
    }

    #[test]
    fn test_capacity_limits_workers() {
        let planner = TargetPlanner::new(2);
        // Target equals cap with an odd total: only 7 workers fit.
        let targets = [3, 3, 3, 3, 3];
        assert_eq!(planner.capacity_workers(&targets, 10), 7);
        let plan = planner.plan(&targets, &targets, &targets, 10);
        assert_eq!(plan.iter().sum::<i64>(), 14);
        assert!(is_decomposable(&plan, 2));
    }

    #[test]
    fn test_riders_limit_workers() {
        let planner = TargetPlanner::new(3);
        let plan = planner.plan(&[4, 4, 4, 4, 4, 4], &[4; 6], &[4; 6], 2);
        assert_eq!(plan.iter().sum::<i64>(), 6);
        assert!(plan.iter().all(|&c| c <= 2));
    }

    #[test]
    fn test_cover_workers() {
        let planner = TargetPlanner::new(3);
        assert_eq!(planner.cover_workers(&[5, 6, 11, 3, 8, 2]), 12);
        // One slot alone needs 12 distinct workers.
        assert_eq!(planner.cover_workers(&[12, 1, 1, 0, 0, 0]), 12);
        assert_eq!(planner.cover_workers(&[0; 6]), 0);
    }

    #[test]
    fn test_is_decomposable() {
        assert!(is_decomposable(&[2, 2, 2], 3));
        assert!(!is_decomposable(&[3, 1, 2], 3));
        assert!(!is_decomposable(&[2, 2, 1], 3));
        assert!(is_decomposable(&[], 3));
    }
}
