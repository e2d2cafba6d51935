//! Input validation for shift allocation.
//!
//! Checks a request against a topology before allocation. Two levels:
//! - **Errors** ([`validate_input`]): the request cannot be allocated as
//!   given (no workers, slots missing or unknown, `max < target`).
//! - **Advisories** ([`advisories`]): the request is valid but the outcome
//!   will fall short somewhere (targets not divisible into whole workers,
//!   too few or too many workers, capacity no worker can reach).
//!
//! The allocator does not call this module; callers run it first.

use crate::models::{partner_capacity_within, SlotConfig, Topology};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No workers requested.
    ZeroRiders,
    /// A topology slot has no entry in the config.
    MissingSlot,
    /// The config names a slot the topology doesn't have.
    UnknownSlot,
    /// A slot's max is below its target.
    MaxBelowTarget,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A non-fatal finding about a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    /// Advisory category.
    pub kind: AdvisoryKind,
    /// Human-readable description.
    pub message: String,
    /// Slot concerned, if any.
    pub slot: Option<String>,
}

/// Categories of advisories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryKind {
    /// Σ target is not a multiple of the slots per worker.
    TotalNotDivisible,
    /// Fewer workers than needed to cover Σ target.
    BelowMinimumRiders,
    /// More workers than Σ max can host.
    AboveMaximumRiders,
    /// A slot's max exceeds what its partner slots can support.
    StrandedCapacity,
}

impl Advisory {
    fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            slot: None,
        }
    }

    fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }
}

/// Validates a request against a topology.
///
/// Checks:
/// 1. At least one worker is requested
/// 2. Every topology slot has a config entry
/// 3. Every config entry names a topology slot
/// 4. `max ≥ target` for every entry
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    rider_count: usize,
    config: &SlotConfig,
    topology: &Topology,
) -> ValidationResult {
    let mut errors = Vec::new();

    if rider_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroRiders,
            "Rider count must be at least 1",
        ));
    }

    for id in topology.slot_ids() {
        if !config.contains_key(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingSlot,
                format!("Slot '{id}' has no demand entry"),
            ));
        }
    }

    for (id, demand) in config {
        if topology.position(id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSlot,
                format!("Unknown slot '{id}'"),
            ));
        }
        if demand.max < demand.target {
            errors.push(ValidationError::new(
                ValidationErrorKind::MaxBelowTarget,
                format!(
                    "Slot '{id}' max {} is below its target {}",
                    demand.max, demand.target
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reports soft findings about a request.
///
/// Slots missing from the config count as zero demand; unknown entries
/// are ignored.
///
/// # Checks
/// - Σ target divisible by the slots per worker (single-method topologies)
/// - `rider_count ≥ ⌈Σ target / K⌉`
/// - `rider_count ≤ ⌊Σ max / K_min⌋`
/// - `max[s] × (K − 1) ≤ Σ max of the other eligible slots`, for at least
///   one method that may use `s`
pub fn advisories(rider_count: usize, config: &SlotConfig, topology: &Topology) -> Vec<Advisory> {
    let mut found = Vec::new();

    let (targets, maxes): (Vec<i64>, Vec<i64>) = topology
        .slot_ids()
        .iter()
        .map(|id| {
            config
                .get(id)
                .map(|d| (i64::from(d.target), i64::from(d.max)))
                .unwrap_or((0, 0))
        })
        .unzip();
    let total_target: i64 = targets.iter().sum();
    let total_max: i64 = maxes.iter().sum();
    let k = topology.shifts_per_worker() as i64;
    let k_min = topology.min_arity() as i64;
    let riders = rider_count as i64;

    if topology.is_single_method() && total_target % k != 0 {
        found.push(Advisory::new(
            AdvisoryKind::TotalNotDivisible,
            format!(
                "Total target {total_target} is not a multiple of {k}; \
                 {} slot-shift(s) cannot be covered exactly",
                total_target % k
            ),
        ));
    }

    let minimum = (total_target + k - 1) / k;
    if riders < minimum {
        found.push(Advisory::new(
            AdvisoryKind::BelowMinimumRiders,
            format!(
                "{rider_count} rider(s) cannot cover total target {total_target}; \
                 at least {minimum} needed"
            ),
        ));
    }

    let maximum = total_max / k_min;
    if riders > maximum {
        found.push(Advisory::new(
            AdvisoryKind::AboveMaximumRiders,
            format!(
                "Total max {total_max} hosts at most {maximum} rider(s); \
                 {rider_count} requested"
            ),
        ));
    }

    for (p, id) in topology.slot_ids().iter().enumerate() {
        let max = maxes[p];
        if max <= 0 {
            continue;
        }
        let reachable = topology
            .methods()
            .iter()
            .filter(|m| m.eligible().contains(&p))
            .any(|m| {
                max * (m.arity() as i64 - 1) <= partner_capacity_within(p, &maxes, m.eligible())
            });
        if !reachable {
            found.push(
                Advisory::new(
                    AdvisoryKind::StrandedCapacity,
                    format!("Slot '{id}' max {max} exceeds what its partner slots can support"),
                )
                .with_slot(id.clone()),
            );
        }
    }

    found
}
