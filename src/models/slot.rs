//! Slot demand model.
//!
//! Each slot carries a minimum staffing level (`target`) and a hard cap
//! (`max`). A [`SlotConfig`] maps slot IDs to their demand; it is resolved
//! against a [`Topology`] into ring-ordered vectors before allocation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Topology;
use crate::error::{ShiftError, ShiftResult};

/// Staffing bounds for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotDemand {
    /// Minimum workers required.
    pub target: u32,
    /// Maximum workers allowed (expected ≥ `target`).
    pub max: u32,
}

impl SlotDemand {
    /// Creates a demand.
    pub fn new(target: u32, max: u32) -> Self {
        Self { target, max }
    }

    /// A demand whose cap equals its target.
    pub fn exact(target: u32) -> Self {
        Self::new(target, target)
    }
}

/// Slot ID → demand.
pub type SlotConfig = BTreeMap<String, SlotDemand>;

/// Builds a [`SlotConfig`] from `(id, target, max)` triples.
pub fn slot_config<S: Into<String>>(entries: impl IntoIterator<Item = (S, u32, u32)>) -> SlotConfig {
    entries
        .into_iter()
        .map(|(id, target, max)| (id.into(), SlotDemand::new(target, max)))
        .collect()
}

/// Targets and caps resolved into ring order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandVector {
    /// Target per ring position.
    pub targets: Vec<i64>,
    /// Cap per ring position.
    pub maxes: Vec<i64>,
}

impl DemandVector {
    /// Creates a demand vector directly from ring-ordered values.
    pub fn new(targets: Vec<i64>, maxes: Vec<i64>) -> Self {
        Self { targets, maxes }
    }

    /// Resolves a config against a topology.
    ///
    /// Every topology slot must be present and every config key must be a
    /// topology slot.
    pub fn resolve(config: &SlotConfig, topology: &Topology) -> ShiftResult<Self> {
        if let Some(unknown) = config.keys().find(|id| topology.position(id).is_none()) {
            return Err(ShiftError::UnknownSlot(unknown.clone()));
        }

        let mut targets = Vec::with_capacity(topology.len());
        let mut maxes = Vec::with_capacity(topology.len());
        for id in topology.slot_ids() {
            let demand = config
                .get(id)
                .ok_or_else(|| ShiftError::MissingSlot(id.clone()))?;
            targets.push(i64::from(demand.target));
            maxes.push(i64::from(demand.max));
        }

        Ok(Self { targets, maxes })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Sum of targets.
    pub fn total_target(&self) -> i64 {
        self.targets.iter().sum()
    }

    /// Sum of caps.
    pub fn total_max(&self) -> i64 {
        self.maxes.iter().sum()
    }
}
