//! Greedy shift allocation, result classification and KPI evaluation.
//!
//! # Algorithm
//!
//! `GreedyAllocator` runs three phases (fill target, rescue with max,
//! extra workers), consulting the combination catalog, the feasibility
//! oracle and a scoring profile at every step. It is a heuristic: it does
//! not guarantee the maximum number of consecutive assignments.
//!
//! # KPI
//!
//! `ScheduleKpi` compares a result with its demand: shortfall, overflow,
//! fill rate, consecutive rate.

mod allocator;
mod classify;
mod kpi;

pub use allocator::{AllocatorConfig, GreedyAllocator, Phase, ShiftRequest};
pub use classify::{ClassCounts, ResultClassifier};
pub use kpi::{ScheduleKpi, SlotCoverage};
