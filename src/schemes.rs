//! Preset shift schemes.
//!
//! | Scheme | Slots | Methods |
//! |--------|-------|---------|
//! | `FiveSlot` | S1..S5 | standard, 2 slots per worker |
//! | `SixSlot` | S1..S6 | standard, 3 slots per worker |
//! | `EightSlot` | D1..D3, N1..N5 | day-night (1 day + 2 night), night-only (5 night) |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ShiftResult;
use crate::models::{Topology, WorkPattern};

const DAY_SLOTS: [&str; 3] = ["D1", "D2", "D3"];
const NIGHT_SLOTS: [&str; 5] = ["N1", "N2", "N3", "N4", "N5"];

/// A named preset topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scheme {
    /// Five slots, two per worker.
    FiveSlot,
    /// Six slots, three per worker.
    SixSlot,
    /// Three day and five night slots with two worker patterns.
    EightSlot,
}

impl Scheme {
    /// All presets.
    pub const ALL: [Scheme; 3] = [Scheme::FiveSlot, Scheme::SixSlot, Scheme::EightSlot];

    /// Slot IDs in ring order.
    pub fn slot_ids(self) -> Vec<String> {
        match self {
            Scheme::FiveSlot => numbered(5),
            Scheme::SixSlot => numbered(6),
            Scheme::EightSlot => DAY_SLOTS
                .iter()
                .chain(NIGHT_SLOTS.iter())
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Builds the scheme's topology.
    pub fn topology(self) -> ShiftResult<Topology> {
        match self {
            Scheme::FiveSlot => Topology::ring(self.slot_ids(), 2),
            Scheme::SixSlot => Topology::ring(self.slot_ids(), 3),
            Scheme::EightSlot => {
                let methods = vec![
                    WorkPattern::DayNight {
                        day_slots: DAY_SLOTS.iter().map(|s| s.to_string()).collect(),
                        night_slots: NIGHT_SLOTS.iter().map(|s| s.to_string()).collect(),
                    }
                    .into_method(),
                    WorkPattern::NightOnly {
                        night_slots: NIGHT_SLOTS.iter().map(|s| s.to_string()).collect(),
                    }
                    .into_method(),
                ];
                Topology::new(self.slot_ids(), methods)
            }
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::FiveSlot => write!(f, "5-slot"),
            Scheme::SixSlot => write!(f, "6-slot"),
            Scheme::EightSlot => write!(f, "8-slot"),
        }
    }
}

fn numbered(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("S{i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_schemes() {
        let five = Scheme::FiveSlot.topology().unwrap();
        assert_eq!(five.len(), 5);
        assert_eq!(five.shifts_per_worker(), 2);
        assert!(five.is_single_method());
        assert_eq!(five.slot_id(4), Some("S5"));

        let six = Scheme::SixSlot.topology().unwrap();
        assert_eq!(six.slot_ids(), Scheme::SixSlot.slot_ids().as_slice());
        assert_eq!(six.shifts_per_worker(), 3);
    }

    #[test]
    fn test_eight_slot() {
        let eight = Scheme::EightSlot.topology().unwrap();
        assert_eq!(eight.len(), 8);
        assert!(!eight.is_single_method());
        assert_eq!(eight.shifts_per_worker(), 5);
        assert_eq!(eight.min_arity(), 3);
        assert_eq!(eight.position("N1"), Some(3));

        let methods = eight.methods();
        assert_eq!(methods[0].name(), "day-night");
        assert_eq!(methods[0].exclusive(), &[0, 1, 2]);
        assert_eq!(methods[1].name(), "night-only");
        assert!(methods[1].exclusive().is_empty());
    }

    #[test]
    fn test_all_build() {
        for scheme in Scheme::ALL {
            assert!(scheme.topology().is_ok(), "{scheme}");
        }
    }

    #[test]
    fn test_serde() {
        assert_eq!(
            serde_json::to_string(&Scheme::EightSlot).unwrap(),
            "\"eightSlot\""
        );
        let s: Scheme = serde_json::from_str("\"fiveSlot\"").unwrap();
        assert_eq!(s, Scheme::FiveSlot);
    }
}
