//! Slot ring topology.
//!
//! A topology is a cyclic ring of named slots plus the worker *methods*
//! allowed on it. Each method draws a fixed number of slots from one or
//! more slot groups; the simple ring schemes use a single method whose only
//! group is the whole ring.
//!
//! Adjacency is cyclic distance 1: the last slot neighbours the first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ShiftError, ShiftResult};

/// A group of slots a method draws `take` members from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
    /// Eligible slot IDs.
    pub slots: Vec<String>,
    /// How many distinct slots one worker takes from this group.
    pub take: usize,
}

/// A worker archetype: which slots a worker may be given, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name (reported on every assignment).
    pub name: String,
    /// Slot groups; a worker takes `take` slots from each.
    pub groups: Vec<SlotGroup>,
}

/// Named worker patterns of the day/night scheme.
///
/// | Pattern | Slots per worker |
/// |---------|------------------|
/// | `DayNight` | 1 day slot + 2 night slots |
/// | `NightOnly` | 5 night slots |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkPattern {
    /// One day slot paired with two night slots.
    DayNight {
        /// Slots the single day shift is drawn from.
        day_slots: Vec<String>,
        /// Slots the two night shifts are drawn from.
        night_slots: Vec<String>,
    },
    /// Five night slots.
    NightOnly {
        /// Slots the five night shifts are drawn from.
        night_slots: Vec<String>,
    },
}

impl SlotGroup {
    /// Creates a slot group.
    pub fn new<S: Into<String>>(slots: impl IntoIterator<Item = S>, take: usize) -> Self {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
            take,
        }
    }
}

impl Method {
    /// Creates a method with no groups.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Creates a method taking `arity` slots from anywhere in `slots`.
    pub fn uniform<S: Into<String>>(
        name: impl Into<String>,
        slots: impl IntoIterator<Item = S>,
        arity: usize,
    ) -> Self {
        Self::new(name).with_group(SlotGroup::new(slots, arity))
    }

    /// Adds a slot group.
    pub fn with_group(mut self, group: SlotGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Slots per worker (sum of group takes).
    pub fn arity(&self) -> usize {
        self.groups.iter().map(|g| g.take).sum()
    }
}

impl WorkPattern {
    /// Converts the pattern into a method definition.
    pub fn into_method(self) -> Method {
        match self {
            WorkPattern::DayNight {
                day_slots,
                night_slots,
            } => Method::new("day-night")
                .with_group(SlotGroup::new(day_slots, 1))
                .with_group(SlotGroup::new(night_slots, 2)),
            WorkPattern::NightOnly { night_slots } => {
                Method::new("night-only").with_group(SlotGroup::new(night_slots, 5))
            }
        }
    }
}

/// A method resolved to ring positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLayout {
    name: String,
    groups: Vec<(Vec<usize>, usize)>,
    arity: usize,
    eligible: Vec<usize>,
    exclusive: Vec<usize>,
}

impl MethodLayout {
    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Groups as (ring positions, take) pairs.
    pub fn groups(&self) -> &[(Vec<usize>, usize)] {
        &self.groups
    }

    /// Slots per worker.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// All ring positions this method can use, ascending.
    pub fn eligible(&self) -> &[usize] {
        &self.eligible
    }

    /// Positions no other method can cover, ascending.
    pub fn exclusive(&self) -> &[usize] {
        &self.exclusive
    }

    /// Whether every group still has `take` positions satisfying `open`.
    pub fn can_draw(&self, open: impl Fn(usize) -> bool) -> bool {
        self.groups
            .iter()
            .all(|(positions, take)| positions.iter().filter(|&&p| open(p)).count() >= *take)
    }
}

/// Static ring of slots and the methods that may be assigned on it.
///
/// # Example
/// ```
/// use u_shift::models::Topology;
///
/// let ring = Topology::ring(["A", "B", "C", "D", "E", "F"], 3).unwrap();
/// assert_eq!(ring.len(), 6);
/// assert!(ring.is_adjacent(0, 5));
/// assert_eq!(ring.shifts_per_worker(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Topology {
    slots: Vec<String>,
    positions: HashMap<String, usize>,
    methods: Vec<MethodLayout>,
}

impl Topology {
    /// Builds a topology from slot IDs in ring order and a list of methods.
    pub fn new<S: Into<String>>(
        slots: impl IntoIterator<Item = S>,
        methods: Vec<Method>,
    ) -> ShiftResult<Self> {
        let slots: Vec<String> = slots.into_iter().map(Into::into).collect();
        if slots.is_empty() {
            return Err(ShiftError::EmptyTopology);
        }

        let mut positions = HashMap::with_capacity(slots.len());
        for (i, id) in slots.iter().enumerate() {
            if positions.insert(id.clone(), i).is_some() {
                return Err(ShiftError::DuplicateSlot(id.clone()));
            }
        }

        if methods.is_empty() {
            return Err(ShiftError::NoMethods);
        }

        let mut layouts = Vec::with_capacity(methods.len());
        for method in &methods {
            layouts.push(Self::layout(method, &positions)?);
        }

        // Exclusive positions: eligible for exactly one method.
        let mut coverage = vec![0usize; slots.len()];
        for layout in &layouts {
            for &p in &layout.eligible {
                coverage[p] += 1;
            }
        }
        for layout in &mut layouts {
            layout.exclusive = layout
                .eligible
                .iter()
                .copied()
                .filter(|&p| coverage[p] == 1)
                .collect();
        }

        Ok(Self {
            slots,
            positions,
            methods: layouts,
        })
    }

    /// Builds a single-method ring where each worker takes `arity` slots.
    pub fn ring<S: Into<String>>(
        slots: impl IntoIterator<Item = S>,
        arity: usize,
    ) -> ShiftResult<Self> {
        let slots: Vec<String> = slots.into_iter().map(Into::into).collect();
        let method = Method::uniform("standard", slots.clone(), arity);
        Self::new(slots, vec![method])
    }

    fn layout(method: &Method, positions: &HashMap<String, usize>) -> ShiftResult<MethodLayout> {
        let mut groups = Vec::with_capacity(method.groups.len());
        let mut eligible = Vec::new();

        for group in &method.groups {
            let mut resolved = Vec::with_capacity(group.slots.len());
            for id in &group.slots {
                let &p = positions
                    .get(id)
                    .ok_or_else(|| ShiftError::UnknownMethodSlot {
                        method: method.name.clone(),
                        slot: id.clone(),
                    })?;
                if eligible.contains(&p) {
                    return Err(ShiftError::RepeatedMethodSlot {
                        method: method.name.clone(),
                        slot: id.clone(),
                    });
                }
                eligible.push(p);
                resolved.push(p);
            }
            if group.take == 0 || group.take > resolved.len() {
                return Err(ShiftError::InvalidGroupTake {
                    method: method.name.clone(),
                    take: group.take,
                    available: resolved.len(),
                });
            }
            resolved.sort_unstable();
            groups.push((resolved, group.take));
        }

        if groups.is_empty() {
            return Err(ShiftError::InvalidGroupTake {
                method: method.name.clone(),
                take: 0,
                available: 0,
            });
        }

        eligible.sort_unstable();
        Ok(MethodLayout {
            name: method.name.clone(),
            arity: method.arity(),
            groups,
            eligible,
            exclusive: Vec::new(),
        })
    }

    /// Number of slots (N).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; construction rejects empty rings.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot IDs in ring order.
    pub fn slot_ids(&self) -> &[String] {
        &self.slots
    }

    /// Slot ID at a ring position.
    pub fn slot_id(&self, position: usize) -> Option<&str> {
        self.slots.get(position).map(String::as_str)
    }

    /// Ring position of a slot ID.
    pub fn position(&self, slot_id: &str) -> Option<usize> {
        self.positions.get(slot_id).copied()
    }

    /// Resolved methods, in declaration order.
    pub fn methods(&self) -> &[MethodLayout] {
        &self.methods
    }

    /// Whether the topology has exactly one method.
    pub fn is_single_method(&self) -> bool {
        self.methods.len() == 1
    }

    /// Largest method arity; the most shifts one worker can absorb.
    pub fn shifts_per_worker(&self) -> usize {
        self.methods.iter().map(|m| m.arity).max().unwrap_or(0)
    }

    /// Smallest method arity; below this much spare capacity no worker fits.
    pub fn min_arity(&self) -> usize {
        self.methods.iter().map(|m| m.arity).min().unwrap_or(0)
    }

    /// Cyclic distance between two ring positions.
    pub fn cyclic_distance(&self, a: usize, b: usize) -> usize {
        let n = self.len();
        let d = a.abs_diff(b) % n;
        d.min(n - d)
    }

    /// Whether two positions are ring neighbours.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        a != b && self.cyclic_distance(a, b) == 1
    }
}

/// Sum of the (non-negative) remaining values of every slot other than `slot`.
///
/// Any other slot may share a worker with `slot`, so partners are not
/// limited to ring neighbours.
pub fn partner_capacity(slot: usize, remaining: &[i64]) -> i64 {
    remaining
        .iter()
        .enumerate()
        .filter(|&(p, _)| p != slot)
        .map(|(_, &v)| v.max(0))
        .sum()
}

/// Like [`partner_capacity`], restricted to the `eligible` positions.
pub fn partner_capacity_within(slot: usize, remaining: &[i64], eligible: &[usize]) -> i64 {
    eligible
        .iter()
        .filter(|&&p| p != slot)
        .map(|&p| remaining[p].max(0))
        .sum()
}
