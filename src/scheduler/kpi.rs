//! Schedule coverage metrics (KPIs).
//!
//! Compares a finished schedule with the demand it was built for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Shortfall | Σ max(0, target − assigned) |
//! | Overflow | Σ max(0, assigned − target) |
//! | Fill Rate | Σ min(assigned, target) / Σ target |
//! | Consecutive Rate | Full-consecutive workers / all workers |
//! | Extra Rate | Extra workers / all workers |

use serde::{Deserialize, Serialize};

use crate::error::ShiftResult;
use crate::models::{DemandVector, ScheduleResult, SlotConfig, Topology};

/// Coverage of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCoverage {
    /// Slot ID.
    pub slot_id: String,
    /// Required workers.
    pub target: i64,
    /// Allowed workers.
    pub max: i64,
    /// Assigned workers.
    pub assigned: i64,
}

impl SlotCoverage {
    /// Workers missing to reach target.
    pub fn shortfall(&self) -> i64 {
        (self.target - self.assigned).max(0)
    }

    /// Workers beyond target.
    pub fn overflow(&self) -> i64 {
        (self.assigned - self.target).max(0)
    }

    /// Whether the cap holds.
    pub fn within_max(&self) -> bool {
        self.assigned <= self.max
    }
}

/// Schedule coverage indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleKpi {
    /// Per-slot coverage in ring order.
    pub slots: Vec<SlotCoverage>,
    /// Σ shortfall.
    pub total_shortfall: i64,
    /// Σ overflow.
    pub total_overflow: i64,
    /// Fraction of target covered (1.0 when Σ target is zero).
    pub fill_rate: f64,
    /// Fraction of workers on a full run (0.0 with no workers).
    pub consecutive_rate: f64,
    /// Fraction of workers flagged extra (0.0 with no workers).
    pub extra_rate: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a result against the demand it was built for.
    pub fn calculate(result: &ScheduleResult, demand: &DemandVector, topology: &Topology) -> Self {
        let assigned = result.assigned_counts(topology);

        let slots: Vec<SlotCoverage> = topology
            .slot_ids()
            .iter()
            .enumerate()
            .map(|(p, id)| SlotCoverage {
                slot_id: id.clone(),
                target: demand.targets.get(p).copied().unwrap_or(0),
                max: demand.maxes.get(p).copied().unwrap_or(0),
                assigned: assigned[p] as i64,
            })
            .collect();

        let total_shortfall = slots.iter().map(SlotCoverage::shortfall).sum();
        let total_overflow = slots.iter().map(SlotCoverage::overflow).sum();

        let total_target: i64 = slots.iter().map(|s| s.target).sum();
        let covered: i64 = slots.iter().map(|s| s.assigned.min(s.target)).sum();
        let fill_rate = if total_target <= 0 {
            1.0
        } else {
            covered as f64 / total_target as f64
        };

        let workers = result.worker_count();
        let (consecutive_rate, extra_rate) = if workers == 0 {
            (0.0, 0.0)
        } else {
            (
                result.consecutive_count as f64 / workers as f64,
                result.extra_worker_count as f64 / workers as f64,
            )
        };

        Self {
            slots,
            total_shortfall,
            total_overflow,
            fill_rate,
            consecutive_rate,
            extra_rate,
        }
    }

    /// Computes KPIs against a slot config.
    pub fn from_config(
        result: &ScheduleResult,
        config: &SlotConfig,
        topology: &Topology,
    ) -> ShiftResult<Self> {
        let demand = DemandVector::resolve(config, topology)?;
        Ok(Self::calculate(result, &demand, topology))
    }

    /// Whether every slot reached its target.
    pub fn meets_targets(&self) -> bool {
        self.total_shortfall == 0
    }

    /// Whether every slot stayed within its cap.
    pub fn within_caps(&self) -> bool {
        self.slots.iter().all(SlotCoverage::within_max)
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_shortfall: i64, min_consecutive_rate: f64) -> bool {
        self.total_shortfall <= max_shortfall && self.consecutive_rate >= min_consecutive_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    fn ring() -> Topology {
        Topology::ring(["A", "B", "C", "D"], 2).unwrap()
    }

    fn result() -> ScheduleResult {
        let mut r = ScheduleResult::empty();
        r.schedule.push(Assignment::new(1, ["A", "B"], "standard"));
        r.schedule.push(Assignment::new(2, ["A", "C"], "standard"));
        r.schedule.push(Assignment::new(3, ["A", "B"], "standard").with_extra(true));
        r.consecutive_count = 2;
        r.none_count = 1;
        r.extra_worker_count = 1;
        r
    }

    #[test]
    fn test_kpi_basic() {
        let demand = DemandVector::new(vec![2, 2, 1, 1], vec![3, 2, 1, 1]);
        let kpi = ScheduleKpi::calculate(&result(), &demand, &ring());

        assert_eq!(kpi.slots[0].assigned, 3);
        assert_eq!(kpi.slots[0].overflow(), 1);
        assert_eq!(kpi.slots[3].shortfall(), 1);
        assert_eq!(kpi.total_shortfall, 1);
        assert_eq!(kpi.total_overflow, 1);
        // covered = 2 + 2 + 1 + 0 over 6
        assert!((kpi.fill_rate - 5.0 / 6.0).abs() < 1e-10);
        assert!((kpi.consecutive_rate - 2.0 / 3.0).abs() < 1e-10);
        assert!((kpi.extra_rate - 1.0 / 3.0).abs() < 1e-10);
        assert!(!kpi.meets_targets());
        assert!(kpi.within_caps());
    }

    #[test]
    fn test_kpi_caps() {
        let demand = DemandVector::new(vec![1, 1, 1, 0], vec![2, 1, 1, 0]);
        let kpi = ScheduleKpi::calculate(&result(), &demand, &ring());
        assert!(!kpi.within_caps());
    }

    #[test]
    fn test_kpi_empty() {
        let demand = DemandVector::new(vec![0; 4], vec![0; 4]);
        let kpi = ScheduleKpi::calculate(&ScheduleResult::empty(), &demand, &ring());
        assert!((kpi.fill_rate - 1.0).abs() < 1e-10);
        assert!((kpi.consecutive_rate - 0.0).abs() < 1e-10);
        assert!(kpi.meets_targets());
    }

    #[test]
    fn test_from_config() {
        let config =
            crate::models::slot_config([("A", 2, 3), ("B", 2, 2), ("C", 1, 1), ("D", 1, 1)]);
        let kpi = ScheduleKpi::from_config(&result(), &config, &ring()).unwrap();
        assert_eq!(kpi.total_shortfall, 1);

        let unknown = crate::models::slot_config([("A", 1, 1), ("Z", 1, 1)]);
        assert!(ScheduleKpi::from_config(&result(), &unknown, &ring()).is_err());
    }

    #[test]
    fn test_meets_thresholds() {
        let demand = DemandVector::new(vec![2, 2, 1, 1], vec![3, 2, 1, 1]);
        let kpi = ScheduleKpi::calculate(&result(), &demand, &ring());
        assert!(kpi.meets_thresholds(1, 0.5));
        assert!(!kpi.meets_thresholds(0, 0.5));
        assert!(!kpi.meets_thresholds(1, 0.9));
    }
}
