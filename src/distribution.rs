//! Proportional target distribution under scarcity.
//!
//! When workers cannot cover the full target (`riders × K < Σ target`),
//! each slot receives a sub-target proportional to its share of demand,
//! using largest-remainder apportionment.
//!
//! # Algorithm
//! 1. `available = riders × K`.
//! 2. `exact[s] = target[s] × available / Σ target`; take the floor.
//! 3. Hand the `available − Σ floor` leftover units to the largest
//!    fractional remainders, ties to the larger original target, then the
//!    earlier ring position.
//! 4. Clamp each sub-target to its original target.
//!
//! The sub-targets sum to `available` exactly and never exceed the real
//! target, so a low-demand slot can never take workers a starved slot needs.
//!
//! Arithmetic is integral: remainders are compared as `target × available
//! mod Σ target`, which orders them exactly like the fractional parts.
//!
//! # Reference
//! Balinski & Young (2001), "Fair Representation", Ch. 2 (Hamilton method)

use tracing::debug;

/// Largest-remainder apportionment of worker shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProportionalDistributor {
    shifts_per_worker: usize,
}

impl ProportionalDistributor {
    /// Creates a distributor for workers taking `shifts_per_worker` slots each.
    pub fn new(shifts_per_worker: usize) -> Self {
        Self { shifts_per_worker }
    }

    /// Shifts `rider_count` workers can supply.
    pub fn available(&self, rider_count: usize) -> i64 {
        (rider_count as i64).saturating_mul(self.shifts_per_worker as i64)
    }

    /// Whether the riders cannot cover the total target.
    pub fn is_under_supplied(&self, rider_count: usize, targets: &[i64]) -> bool {
        self.available(rider_count) < targets.iter().sum::<i64>()
    }

    /// Effective targets for `rider_count` workers.
    ///
    /// Returns `targets` unchanged when supply is sufficient.
    ///
    /// # Example
    /// ```
    /// use u_shift::distribution::ProportionalDistributor;
    ///
    /// let d = ProportionalDistributor::new(3);
    /// assert_eq!(d.distribute(6, &[6, 2, 4, 9, 9, 15]), vec![2, 1, 1, 4, 4, 6]);
    /// assert_eq!(d.distribute(15, &[6, 2, 4, 9, 9, 15]), vec![6, 2, 4, 9, 9, 15]);
    /// ```
    pub fn distribute(&self, rider_count: usize, targets: &[i64]) -> Vec<i64> {
        let total: i64 = targets.iter().sum();
        let available = self.available(rider_count);
        if available >= total || total <= 0 {
            return targets.to_vec();
        }

        let total = i128::from(total);
        let scaled: Vec<i128> = targets
            .iter()
            .map(|&t| i128::from(t) * i128::from(available))
            .collect();

        let mut shares: Vec<i64> = scaled.iter().map(|&x| (x / total) as i64).collect();
        let leftover = available - shares.iter().sum::<i64>();

        let mut order: Vec<usize> = (0..targets.len()).collect();
        order.sort_by(|&a, &b| {
            let ra = scaled[a] % total;
            let rb = scaled[b] % total;
            rb.cmp(&ra)
                .then_with(|| targets[b].cmp(&targets[a]))
                .then_with(|| a.cmp(&b))
        });
        for &s in order.iter().take(leftover.max(0) as usize) {
            shares[s] += 1;
        }

        for (share, &target) in shares.iter_mut().zip(targets) {
            *share = (*share).min(target);
        }

        debug!(
            rider_count,
            available,
            total_target = total as i64,
            ?shares,
            "proportional fallback applied"
        );
        shares
    }
}
