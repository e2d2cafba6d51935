//! Schedule (solution) model.
//!
//! A schedule is the ordered list of worker assignments produced by one
//! allocation run, plus aggregate adjacency and extra-worker counts.
//! Serializes to the camelCase wire shape consumed by presentation layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Topology;

/// One worker and the slots it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Sequential worker ID, starting at 1.
    pub worker_id: usize,
    /// Assigned slot IDs, in ring order.
    pub slots: Vec<String>,
    /// Whether every slot had already met its target when this worker was committed.
    pub is_extra: bool,
    /// Method the worker was assigned under.
    pub method: String,
}

/// Outcome of an allocation run.
///
/// Scarcity never produces an error: it shows up as fewer assignments than
/// requested or as slots below target, with an optional warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// Always `true`; degraded outcomes are described by the other fields.
    pub success: bool,
    /// Assignments in commit order.
    pub schedule: Vec<Assignment>,
    /// Assignments whose slots form one consecutive run.
    pub consecutive_count: usize,
    /// Assignments with an adjacent pair but no full run.
    pub partial_count: usize,
    /// Assignments with no adjacent slots.
    pub none_count: usize,
    /// Assignments flagged `is_extra`.
    pub extra_worker_count: usize,
    /// Explanation of a degraded outcome.
    pub warning: Option<String>,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new<S: Into<String>>(
        worker_id: usize,
        slots: impl IntoIterator<Item = S>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            worker_id,
            slots: slots.into_iter().map(Into::into).collect(),
            is_extra: false,
            method: method.into(),
        }
    }

    /// Marks the assignment as extra.
    pub fn with_extra(mut self, is_extra: bool) -> Self {
        self.is_extra = is_extra;
        self
    }

    /// Whether the worker covers a slot.
    pub fn covers(&self, slot_id: &str) -> bool {
        self.slots.iter().any(|s| s == slot_id)
    }
}

impl ScheduleResult {
    /// An empty, successful result.
    pub fn empty() -> Self {
        Self {
            success: true,
            schedule: Vec::new(),
            consecutive_count: 0,
            partial_count: 0,
            none_count: 0,
            extra_worker_count: 0,
            warning: None,
        }
    }

    /// Number of workers placed.
    pub fn worker_count(&self) -> usize {
        self.schedule.len()
    }

    /// Total slot-shifts assigned.
    pub fn total_shifts(&self) -> usize {
        self.schedule.iter().map(|a| a.slots.len()).sum()
    }

    /// Workers per slot ID (slots with no workers are absent).
    pub fn assigned_by_slot(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.schedule {
            for slot in &a.slots {
                *counts.entry(slot.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Workers per ring position of `topology`.
    pub fn assigned_counts(&self, topology: &Topology) -> Vec<usize> {
        let mut counts = vec![0; topology.len()];
        for a in &self.schedule {
            for slot in &a.slots {
                if let Some(p) = topology.position(slot) {
                    counts[p] += 1;
                }
            }
        }
        counts
    }

    /// Assignments made under a method.
    pub fn assignments_for_method(&self, method: &str) -> Vec<&Assignment> {
        self.schedule.iter().filter(|a| a.method == method).collect()
    }
}

impl Default for ScheduleResult {
    fn default() -> Self {
        Self::empty()
    }
}
