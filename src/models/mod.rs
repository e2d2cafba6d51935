//! Shift-scheme domain models.
//!
//! Provides the data types shared by every allocation component: the slot
//! ring and its worker methods, the combination catalog, slot demand, the
//! per-run working state, and the resulting schedule.
//!
//! # Domain Mappings
//!
//! | u-shift | Delivery | Hospital | Call Centre |
//! |---------|----------|----------|-------------|
//! | Slot | Delivery window | Ward shift | Phone block |
//! | Worker | Rider | Nurse | Agent |
//! | Method | Day/night contract | Rotation type | Contract type |
//! | Combination | Rider's windows | Nurse's shifts | Agent's blocks |

mod combination;
mod schedule;
mod slot;
mod state;
mod topology;

pub use combination::{AdjacencyClass, Combination, CombinationCatalog};
pub use schedule::{Assignment, ScheduleResult};
pub use slot::{slot_config, DemandVector, SlotConfig, SlotDemand};
pub use state::WorkingState;
pub use topology::{
    partner_capacity, partner_capacity_within, Method, MethodLayout, SlotGroup, Topology,
    WorkPattern,
};
