//! Three-phase greedy shift allocator.
//!
//! # Algorithm
//!
//! 1. **Fill target**: commit combinations whose members are all still
//!    under target and that keep either the target vector or the cap
//!    vector feasible, preferring the former.
//! 2. **Rescue with max**: if targets remain unmet, commit combinations
//!    with spare capacity that relieve at least one under-target slot and
//!    keep the cap vector feasible.
//! 3. **Extra workers**: place the remaining requested workers on spare
//!    capacity, favouring runs and even capacity use.
//!
//! Each step scores candidates against an immutable snapshot and commits
//! exactly one winner, chosen by a side-effect-free fold. The run stops
//! when the worker budget is spent, no phase finds a candidate, or the
//! total remaining capacity cannot host one more worker.
//!
//! Under scarcity (`riders × K < Σ target`) targets are first reduced by
//! proportional distribution and caps are clamped to the true targets.
//! On single-method topologies the fill phase works on a
//! [planned](crate::planning::TargetPlanner) target vector, which it always
//! completes; rescue and extra placement then measure against the real
//! targets again.
//!
//! On multi-method topologies a run that cannot place every requested
//! worker is compared with smaller runs extended by extra workers, and the
//! one placing the most workers is kept. More riders therefore never place
//! fewer workers.
//!
//! # Complexity
//! O(r × c × N) where r = riders, c = catalog size, N = slots. A stalled
//! multi-method run adds up to r further runs.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ResultClassifier;
use crate::distribution::ProportionalDistributor;
use crate::error::{ShiftError, ShiftResult};
use crate::feasibility::FeasibilityOracle;
use crate::models::{
    Assignment, CombinationCatalog, DemandVector, ScheduleResult, SlotConfig, Topology,
    WorkingState,
};
use crate::planning::TargetPlanner;
use crate::scoring::rules::{ShortfallRescue, SpareCapacity};
use crate::scoring::{CandidateScore, CandidateScorer, ScoreContext, ScoringProfile};

/// Input container for one allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequest {
    /// Workers to place.
    pub rider_count: usize,
    /// Demand per slot ID.
    pub slot_config: SlotConfig,
}

impl ShiftRequest {
    /// Creates a request.
    pub fn new(rider_count: usize, slot_config: SlotConfig) -> Self {
        Self {
            rider_count,
            slot_config,
        }
    }

    /// Parses a request from its JSON wire form.
    ///
    /// ```
    /// use u_shift::scheduler::ShiftRequest;
    ///
    /// let request = ShiftRequest::from_json_str(
    ///     r#"{"riderCount": 2, "slotConfig": {"A": {"target": 1, "max": 2}}}"#,
    /// ).unwrap();
    /// assert_eq!(request.rider_count, 2);
    /// ```
    pub fn from_json_str(json: &str) -> ShiftResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Allocator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocatorConfig {
    /// Workers-for-full-target below which the small scoring profile is used.
    pub profile_threshold: usize,
    /// Maximum candidate evaluations per run; `None` = unlimited.
    pub iteration_budget: Option<usize>,
    /// Keep filling and rescuing with candidates that fail the full
    /// feasibility check.
    ///
    /// Off by default: fill then admits only candidates whose tentative
    /// target or cap vector is feasible and ends when none is, and rescue
    /// admits only candidates whose tentative cap vector is feasible. When
    /// on, fill falls back to candidates passing the Hall condition on the
    /// target vector and then to any candidate still under target, and
    /// rescue to candidates passing the Hall condition on the cap vector.
    pub relaxed_acceptance: bool,
}

impl AllocatorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            profile_threshold: 15,
            iteration_budget: None,
            relaxed_acceptance: false,
        }
    }

    /// Sets the profile threshold.
    pub fn with_profile_threshold(mut self, threshold: usize) -> Self {
        self.profile_threshold = threshold;
        self
    }

    /// Caps candidate evaluations per run.
    pub fn with_iteration_budget(mut self, budget: usize) -> Self {
        self.iteration_budget = Some(budget);
        self
    }

    /// Enables the relaxed fill and rescue fallbacks.
    pub fn with_relaxed_acceptance(mut self, relaxed: bool) -> Self {
        self.relaxed_acceptance = relaxed;
        self
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Allocation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Cover targets with combinations fully under target.
    FillTarget,
    /// Cover remaining shortfall using spare capacity.
    RescueWithMax,
    /// Place remaining workers on spare capacity.
    ExtraWorkers,
    /// Finished.
    Done,
}

/// Why a candidate was admitted; lower is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Acceptance {
    /// Tentative target vector passes the oracle.
    Target,
    /// Tentative cap vector passes the oracle.
    Max,
    /// Relaxed only: the Hall condition alone passes.
    Hall,
    /// Relaxed fill only, and extra placement: no check applies.
    Unchecked,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    acceptance: Acceptance,
    score: CandidateScore,
}

impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        self.acceptance < other.acceptance
            || (self.acceptance == other.acceptance && self.score > other.score)
    }
}

/// Picks the best candidate; earlier catalog entries win exact ties.
fn best(candidates: impl Iterator<Item = Candidate>) -> Option<Candidate> {
    candidates.fold(None, |best, c| match best {
        Some(b) if !c.beats(&b) => Some(b),
        _ => Some(c),
    })
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    index: usize,
    is_extra: bool,
}

/// Greedy allocator for one shift scheme.
///
/// Holds the topology and its combination catalog; each call to
/// [`allocate`](Self::allocate) owns its own working state, so one
/// allocator can serve many requests.
///
/// # Example
///
/// ```
/// use u_shift::models::{slot_config, Topology};
/// use u_shift::scheduler::GreedyAllocator;
///
/// let ring = Topology::ring(["S1", "S2", "S3", "S4", "S5", "S6"], 3).unwrap();
/// let config = slot_config([
///     ("S1", 6, 9), ("S2", 2, 3), ("S3", 4, 6),
///     ("S4", 9, 18), ("S5", 9, 18), ("S6", 15, 30),
/// ]);
///
/// let allocator = GreedyAllocator::new(ring);
/// let result = allocator.allocate(15, &config).unwrap();
/// assert_eq!(result.worker_count(), 15);
/// assert_eq!(result.extra_worker_count, 0);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyAllocator {
    topology: Topology,
    catalog: CombinationCatalog,
    config: AllocatorConfig,
}

impl GreedyAllocator {
    /// Creates an allocator with the default configuration.
    pub fn new(topology: Topology) -> Self {
        let catalog = CombinationCatalog::new(&topology);
        Self {
            topology,
            catalog,
            config: AllocatorConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AllocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// The topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The combination catalog.
    pub fn catalog(&self) -> &CombinationCatalog {
        &self.catalog
    }

    /// The configuration.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates `rider_count` workers against a slot config.
    ///
    /// Fails only when the config does not match the topology's slots.
    pub fn allocate(&self, rider_count: usize, config: &SlotConfig) -> ShiftResult<ScheduleResult> {
        let demand = DemandVector::resolve(config, &self.topology)?;
        self.allocate_demand(rider_count, &demand)
    }

    /// Allocates from a request.
    pub fn allocate_request(&self, request: &ShiftRequest) -> ShiftResult<ScheduleResult> {
        self.allocate(request.rider_count, &request.slot_config)
    }

    /// Allocates against ring-ordered demand.
    ///
    /// # Errors
    /// [`ShiftError::DemandLength`] if either demand vector's length differs
    /// from the topology's slot count.
    pub fn allocate_demand(
        &self,
        rider_count: usize,
        demand: &DemandVector,
    ) -> ShiftResult<ScheduleResult> {
        let expected = self.topology.len();
        for actual in [demand.targets.len(), demand.maxes.len()] {
            if actual != expected {
                return Err(ShiftError::DemandLength { expected, actual });
            }
        }

        let mut run = self.run(rider_count, demand);
        if !self.topology.is_single_method()
            && run.placed() < rider_count
            && !run.budget_exhausted
        {
            for smaller in (1..rider_count).rev() {
                let mut carried = self.run(smaller, demand);
                carried.extend_to(rider_count);
                if carried.placed() > run.placed() {
                    debug!(smaller, placed = carried.placed(), "smaller run carried forward");
                    run = carried;
                    if run.placed() == rider_count {
                        break;
                    }
                }
            }
        }

        Ok(run.finish())
    }

    /// Runs the phase state machine for `rider_count` workers.
    fn run(&self, rider_count: usize, demand: &DemandVector) -> Run<'_> {
        let mut run = Run::new(self, rider_count, demand);

        let mut phase = Phase::FillTarget;
        while phase != Phase::Done {
            phase = match phase {
                Phase::FillTarget => {
                    run.fill_target();
                    run.restore_targets();
                    if run.state.outstanding_target() > 0 {
                        Phase::RescueWithMax
                    } else {
                        Phase::ExtraWorkers
                    }
                }
                Phase::RescueWithMax => {
                    run.rescue_with_max();
                    Phase::ExtraWorkers
                }
                Phase::ExtraWorkers => {
                    run.extra_workers();
                    Phase::Done
                }
                Phase::Done => Phase::Done,
            };
        }

        run
    }
}

/// State of one allocation run.
struct Run<'a> {
    allocator: &'a GreedyAllocator,
    oracle: FeasibilityOracle<'a>,
    profile: ScoringProfile,
    rider_count: usize,
    /// Targets after the scarcity reduction, before planning.
    targets: Vec<i64>,
    state: WorkingState,
    placements: Vec<Placement>,
    evaluations: usize,
    budget_exhausted: bool,
}

impl<'a> Run<'a> {
    fn new(allocator: &'a GreedyAllocator, rider_count: usize, demand: &DemandVector) -> Self {
        let topology = &allocator.topology;
        let distributor = ProportionalDistributor::new(topology.shifts_per_worker());

        let maxes: Vec<i64> = if distributor.is_under_supplied(rider_count, &demand.targets) {
            demand
                .maxes
                .iter()
                .zip(&demand.targets)
                .map(|(&m, &t)| m.min(t))
                .collect()
        } else {
            demand.maxes.clone()
        };
        let targets: Vec<i64> = distributor
            .distribute(rider_count, &demand.targets)
            .into_iter()
            .zip(&maxes)
            .map(|(t, &m)| t.min(m))
            .collect();

        let planned = if topology.is_single_method() {
            TargetPlanner::new(topology.shifts_per_worker()).plan(
                &targets,
                &maxes,
                &demand.targets,
                rider_count,
            )
        } else {
            targets.clone()
        };

        let profile = ScoringProfile::select(
            demand.total_target(),
            topology.shifts_per_worker(),
            allocator.config.profile_threshold,
        );
        debug!(rider_count, ?profile, ?targets, ?planned, ?maxes, "allocation started");

        Self {
            allocator,
            oracle: FeasibilityOracle::new(topology),
            profile,
            rider_count,
            targets,
            state: WorkingState::new(planned, maxes),
            placements: Vec::new(),
            evaluations: 0,
            budget_exhausted: false,
        }
    }

    fn placed(&self) -> usize {
        self.placements.len()
    }

    /// Whether another worker may be attempted.
    fn can_continue(&mut self) -> bool {
        if self.placements.len() >= self.rider_count {
            return false;
        }
        if self.state.total_max_remaining() < self.allocator.topology.min_arity() as i64 {
            return false;
        }
        if let Some(budget) = self.allocator.config.iteration_budget {
            if self.evaluations >= budget {
                self.budget_exhausted = true;
                return false;
            }
        }
        true
    }

    /// Methods to try this fill step.
    ///
    /// A method is active when each of its groups can still draw from
    /// slots under target. Methods with exclusive slots still under target
    /// take precedence, so shared slots are not spent before them.
    fn fill_methods(&self) -> Vec<bool> {
        let topology = &self.allocator.topology;
        let target = self.state.target_remaining();
        let max = self.state.max_remaining();
        let open = |p: usize| target[p] > 0 && max[p] > 0;

        let active: Vec<bool> = topology
            .methods()
            .iter()
            .map(|m| m.can_draw(open))
            .collect();
        let pressing: Vec<bool> = topology
            .methods()
            .iter()
            .zip(&active)
            .map(|(m, &a)| a && m.exclusive().iter().any(|&p| target[p] > 0))
            .collect();

        if pressing.iter().any(|&p| p) {
            pressing
        } else {
            active
        }
    }

    fn fill_target(&mut self) {
        let scorer = self.profile.scorer();
        let relaxed = self.allocator.config.relaxed_acceptance;
        while self.can_continue() {
            let methods = self.fill_methods();
            let state = &self.state;
            let oracle = self.oracle;
            let catalog = self.allocator.catalog.all();
            self.evaluations += catalog.len();

            let winner = best(
                catalog
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| {
                        methods[c.method()]
                            && state.all_under_target(c.slots())
                            && state.has_capacity(c.slots())
                    })
                    .filter_map(|(index, c)| {
                        let tentative_target = state.tentative_target(c.slots());
                        let tentative_max = state.tentative_max(c.slots());
                        let acceptance = if oracle.is_feasible(&tentative_target, c.method()) {
                            Acceptance::Target
                        } else if oracle.is_feasible(&tentative_max, c.method()) {
                            Acceptance::Max
                        } else if !relaxed {
                            return None;
                        } else if oracle.hall_satisfied(&tentative_target, c.method()) {
                            Acceptance::Hall
                        } else {
                            Acceptance::Unchecked
                        };
                        let score = scorer.score(&ScoreContext {
                            combination: c,
                            state,
                            tentative_target: &tentative_target,
                            tentative_max: &tentative_max,
                        });
                        Some(Candidate {
                            index,
                            acceptance,
                            score,
                        })
                    }),
            );

            let Some(winner) = winner else {
                debug!(placed = self.placements.len(), "fill phase exhausted");
                break;
            };
            self.commit(Phase::FillTarget, winner, false);
        }
    }

    /// Measures remaining target against the unplanned targets again.
    fn restore_targets(&mut self) {
        let catalog = &self.allocator.catalog;
        let mut unmet = self.targets.clone();
        for combination in self.placements.iter().filter_map(|p| catalog.get(p.index)) {
            for &s in combination.slots() {
                unmet[s] -= 1;
            }
        }
        self.state = WorkingState::new(unmet, self.state.max_remaining().to_vec());
    }

    fn rescue_with_max(&mut self) {
        let relaxed = self.allocator.config.relaxed_acceptance;
        while self.can_continue() {
            let state = &self.state;
            let oracle = self.oracle;
            let catalog = self.allocator.catalog.all();
            self.evaluations += catalog.len();

            let winner = best(
                catalog
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| {
                        state.has_capacity(c.slots()) && state.any_under_target(c.slots())
                    })
                    .filter_map(|(index, c)| {
                        let tentative_max = state.tentative_max(c.slots());
                        let acceptance = if oracle.is_feasible(&tentative_max, c.method()) {
                            Acceptance::Max
                        } else if relaxed && oracle.hall_satisfied(&tentative_max, c.method()) {
                            Acceptance::Hall
                        } else {
                            return None;
                        };
                        let tentative_target = state.tentative_target(c.slots());
                        let score = ShortfallRescue.score(&ScoreContext {
                            combination: c,
                            state,
                            tentative_target: &tentative_target,
                            tentative_max: &tentative_max,
                        });
                        Some(Candidate {
                            index,
                            acceptance,
                            score,
                        })
                    }),
            );

            let Some(winner) = winner else {
                debug!(placed = self.placements.len(), "rescue phase exhausted");
                break;
            };
            self.commit(Phase::RescueWithMax, winner, false);
        }
    }

    fn extra_workers(&mut self) {
        while self.can_continue() {
            let state = &self.state;
            let catalog = self.allocator.catalog.all();
            self.evaluations += catalog.len();

            let winner = best(
                catalog
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| state.has_capacity(c.slots()))
                    .map(|(index, c)| {
                        let tentative_target = state.tentative_target(c.slots());
                        let tentative_max = state.tentative_max(c.slots());
                        let score = SpareCapacity.score(&ScoreContext {
                            combination: c,
                            state,
                            tentative_target: &tentative_target,
                            tentative_max: &tentative_max,
                        });
                        Candidate {
                            index,
                            acceptance: Acceptance::Unchecked,
                            score,
                        }
                    }),
            );

            let Some(winner) = winner else {
                break;
            };
            let is_extra = self.state.targets_met();
            self.commit(Phase::ExtraWorkers, winner, is_extra);
        }
    }

    /// Raises the worker budget of a finished run and places extra workers.
    fn extend_to(&mut self, rider_count: usize) {
        self.rider_count = rider_count;
        self.extra_workers();
    }

    fn commit(&mut self, phase: Phase, candidate: Candidate, is_extra: bool) {
        let catalog = &self.allocator.catalog;
        let Some(combination) = catalog.get(candidate.index) else {
            return;
        };
        self.state = self.state.commit(combination.slots());
        self.placements.push(Placement {
            index: candidate.index,
            is_extra,
        });
        debug!(
            ?phase,
            worker = self.placements.len(),
            slots = ?combination.slots(),
            score = candidate.score,
            acceptance = ?candidate.acceptance,
            is_extra,
            "worker committed"
        );
    }

    fn finish(self) -> ScheduleResult {
        let topology = &self.allocator.topology;
        let catalog = &self.allocator.catalog;

        let schedule: Vec<Assignment> = self
            .placements
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let combination = catalog.get(p.index)?;
                let slots = combination
                    .slots()
                    .iter()
                    .filter_map(|&s| topology.slot_id(s));
                let method = topology.methods()[combination.method()].name();
                Some(Assignment::new(i + 1, slots, method).with_extra(p.is_extra))
            })
            .collect();

        let placed = schedule.len();
        let min_arity = topology.min_arity();
        let capacity = self.state.total_max_remaining();
        let warning = if placed == 0 && self.rider_count > 0 && capacity < min_arity as i64 {
            Some(format!(
                "insufficient capacity: total max {capacity} is below the {min_arity} slots \
                 one worker needs; no workers placed"
            ))
        } else if self.budget_exhausted {
            Some(format!(
                "iteration budget exhausted after placing {placed} of {} requested workers",
                self.rider_count
            ))
        } else if placed < self.rider_count {
            Some(format!(
                "placed {placed} of {} requested workers; remaining capacity cannot host \
                 another worker",
                self.rider_count
            ))
        } else {
            None
        };

        if let Some(message) = &warning {
            warn!(placed, requested = self.rider_count, "{message}");
        }

        let counts = ResultClassifier::new(topology).summarize(&schedule);
        info!(
            placed,
            requested = self.rider_count,
            consecutive = counts.consecutive,
            partial = counts.partial,
            none = counts.none,
            extra = counts.extra,
            shortfall = self.state.outstanding_target(),
            "allocation finished"
        );

        ScheduleResult {
            success: true,
            schedule,
            consecutive_count: counts.consecutive,
            partial_count: counts.partial,
            none_count: counts.none,
            extra_worker_count: counts.extra,
            warning,
        }
    }
}
