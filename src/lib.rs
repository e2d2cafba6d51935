//! Shift allocation engine for the U-Engine ecosystem.
//!
//! Assigns a fixed number of workers to a cyclic ring of time slots so that
//! per-slot targets are met, per-slot caps are never exceeded, and each
//! worker's slots sit as close together on the ring as possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Topology`, `Method`, `CombinationCatalog`,
//!   `SlotDemand`, `WorkingState`, `Assignment`, `ScheduleResult`
//! - **`feasibility`**: Divisibility and Hall-condition checks on remaining demand
//! - **`distribution`**: Proportional target reduction when workers are scarce
//! - **`planning`**: Decomposable fill targets for single-method topologies
//! - **`scoring`**: Candidate scorers (small/large profiles, rescue, spare capacity)
//! - **`scheduler`**: `GreedyAllocator`, result classification, KPIs
//! - **`schemes`**: Preset 5-, 6- and 8-slot topologies
//! - **`validation`**: Input errors and advisories
//!
//! # Example
//!
//! ```
//! use u_shift::models::slot_config;
//! use u_shift::scheduler::GreedyAllocator;
//! use u_shift::schemes::Scheme;
//!
//! let allocator = GreedyAllocator::new(Scheme::FiveSlot.topology()?);
//! let config = slot_config([
//!     ("S1", 2, 3), ("S2", 2, 3), ("S3", 2, 3), ("S4", 2, 3), ("S5", 2, 3),
//! ]);
//! let result = allocator.allocate(5, &config)?;
//! assert_eq!(result.worker_count(), 5);
//! # Ok::<(), u_shift::ShiftError>(())
//! ```
//!
//! # Logging
//!
//! The engine emits `tracing` events (`debug` per committed worker, `info`
//! per run, `warn` on degraded outcomes). It never installs a subscriber.
//!
//! # References
//!
//! - Hall (1935), "On Representatives of Subsets"
//! - Balinski & Young (2001), "Fair Representation" (largest remainder method)

pub mod distribution;
pub mod error;
pub mod feasibility;
pub mod models;
pub mod planning;
pub mod scheduler;
pub mod schemes;
pub mod scoring;
pub mod validation;

pub use error::{ShiftError, ShiftResult};
