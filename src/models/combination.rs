//! Combination catalog.
//!
//! Enumerates every slot set a single worker can be given and classifies
//! each by how tightly it sits on the ring.
//!
//! # Ordering
//! Methods appear in declaration order. Within a method, full-consecutive
//! combinations come first, then the rest, each in lexicographic order of
//! ring positions. Order only breaks exact score ties; preference itself
//! comes from scoring.

use serde::{Deserialize, Serialize};

use super::Topology;

/// How tightly a combination sits on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjacencyClass {
    /// One unbroken run of consecutive positions (wrap-around included).
    Full,
    /// At least one adjacent pair, but not a single run.
    Partial,
    /// No two members are adjacent.
    None,
}

impl AdjacencyClass {
    /// Classifies a set of distinct ring positions on a ring of `ring_len` slots.
    pub fn classify(positions: &[usize], ring_len: usize) -> Self {
        let k = positions.len();
        if k == 0 || ring_len == 0 {
            return AdjacencyClass::None;
        }

        let is_run = (0..ring_len).any(|start| {
            (0..k).all(|i| positions.contains(&((start + i) % ring_len)))
        });
        if is_run {
            return AdjacencyClass::Full;
        }

        let has_pair = positions.iter().any(|&p| {
            let next = (p + 1) % ring_len;
            let prev = (p + ring_len - 1) % ring_len;
            (next != p && positions.contains(&next)) || (prev != p && positions.contains(&prev))
        });
        if has_pair {
            AdjacencyClass::Partial
        } else {
            AdjacencyClass::None
        }
    }

    /// Adjacency bonus used by the rescue and extra-worker phases.
    pub fn bonus(self) -> f64 {
        match self {
            AdjacencyClass::Full => 100.0,
            AdjacencyClass::Partial => 30.0,
            AdjacencyClass::None => 0.0,
        }
    }
}

/// One slot set a worker of a given method can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    method: usize,
    slots: Vec<usize>,
    class: AdjacencyClass,
}

impl Combination {
    /// Index of the owning method in the topology.
    pub fn method(&self) -> usize {
        self.method
    }

    /// Member ring positions, ascending.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Adjacency class.
    pub fn class(&self) -> AdjacencyClass {
        self.class
    }

    /// Whether the combination contains a ring position.
    pub fn contains(&self, position: usize) -> bool {
        self.slots.contains(&position)
    }
}

/// Every combination of a topology, enumerated once.
///
/// # Example
/// ```
/// use u_shift::models::{AdjacencyClass, CombinationCatalog, Topology};
///
/// let ring = Topology::ring(["A", "B", "C", "D", "E", "F"], 3).unwrap();
/// let catalog = CombinationCatalog::new(&ring);
/// assert_eq!(catalog.len(), 20);
/// assert_eq!(catalog.count_class(AdjacencyClass::Full), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombinationCatalog {
    combinations: Vec<Combination>,
}

impl CombinationCatalog {
    /// Enumerates the combinations of every method of `topology`.
    pub fn new(topology: &Topology) -> Self {
        let n = topology.len();
        let mut combinations = Vec::new();

        for (method, layout) in topology.methods().iter().enumerate() {
            let mut sets: Vec<Vec<usize>> = vec![Vec::new()];
            for (positions, take) in layout.groups() {
                let picks = k_subsets(positions, *take);
                sets = sets
                    .iter()
                    .flat_map(|prefix| {
                        picks.iter().map(move |pick| {
                            let mut set = prefix.clone();
                            set.extend_from_slice(pick);
                            set
                        })
                    })
                    .collect();
            }
            for set in &mut sets {
                set.sort_unstable();
            }
            sets.sort();
            sets.dedup();

            let (full, rest): (Vec<_>, Vec<_>) = sets
                .into_iter()
                .map(|slots| {
                    let class = AdjacencyClass::classify(&slots, n);
                    Combination {
                        method,
                        slots,
                        class,
                    }
                })
                .partition(|c| c.class == AdjacencyClass::Full);

            combinations.extend(full);
            combinations.extend(rest);
        }

        Self { combinations }
    }

    /// All combinations in catalog order.
    pub fn all(&self) -> &[Combination] {
        &self.combinations
    }

    /// Combination at a catalog index.
    pub fn get(&self, index: usize) -> Option<&Combination> {
        self.combinations.get(index)
    }

    /// Combinations belonging to one method.
    pub fn for_method(&self, method: usize) -> impl Iterator<Item = &Combination> {
        self.combinations.iter().filter(move |c| c.method == method)
    }

    /// Number of combinations.
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Number of combinations with the given class.
    pub fn count_class(&self, class: AdjacencyClass) -> usize {
        self.combinations.iter().filter(|c| c.class == class).count()
    }
}

/// All `k`-element subsets of `items`, in lexicographic index order.
fn k_subsets(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| items[i]).collect());

        // Advance the rightmost index that still has room.
        let Some(i) = (0..k).rev().find(|&i| idx[i] < n - k + i) else {
            break;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
    out
}
