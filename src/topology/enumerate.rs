//! Exhaustive search for closure operators on the powerset of a finite set.
//!
//! A closure operator is determined by its images of the atomic elements
//! (singletons). The search assigns those images one atom at a time, in
//! canonical order, and after each choice prunes the candidate images of the
//! atoms still unassigned:
//!
//! 1. if atom `q` lies in the image `I` chosen for atom `p`, the image of `q`
//!    must stay inside `I`;
//! 2. if atom `p` lies in a candidate `c` for `q`, then `I` must stay inside
//!    `c`.
//!
//! A branch dies as soon as some unassigned atom has no candidates left.
//! Every complete assignment is a [`ClosurePreoperator`]; completing its
//! images under meet and join yields a [`ClosureOperator`] and from it a
//! [`Topology`](crate::topology::Topology).
//!
//! Candidate tables are owned per branch: a descent receives a pruned copy
//! and never mutates its parent's table. A table holds one bound per
//! unassigned atom plus the assignments made so far, never the candidate
//! subsets themselves, so its size is linear in the number of points.

use tracing::{debug, info};

use crate::{
    config::EnumerationConfig,
    error::{Error, Result},
    lattices::{
        lattice::{JoinSemiLattice, MeetSemiLattice},
        subset::{BaseSet, Subset},
    },
    topology::{
        closure::ClosureOperator,
        finite::TopologySet,
    },
};

/// The images each unassigned atom may still take.
///
/// Rows are not materialized. A row keeps an upper bound, the intersection
/// of every chosen image that contains its atom, and all rows share the
/// assigned pairs `(p, I)`: a candidate containing `p` must contain `I`.
/// Only atoms after the last assigned one have a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateImages {
    first: usize,
    upper: Vec<Subset>,
    assigned: Vec<(Subset, Subset)>,
}

impl CandidateImages {
    /// Every subset containing the atom, for every atom.
    pub fn new(base: &BaseSet) -> Self {
        Self {
            first: 0,
            upper: vec![base.full(); base.size()],
            assigned: Vec::new(),
        }
    }

    /// Candidates for `atom` in ascending order; empty for atoms already
    /// assigned.
    pub fn candidates(&self, atom_index: usize) -> Candidates<'_> {
        let bound = atom_index
            .checked_sub(self.first)
            .and_then(|row| self.upper.get(row));
        let q = bound.map_or(Subset::EMPTY, |_| atom(atom_index));
        Candidates {
            atom: q,
            free: bound.map_or(0, |b| b.bits() & !q.bits()),
            next: bound.map(|_| 0),
            assigned: &self.assigned,
        }
    }

    /// The table left after atom `assigned` takes `image`, or `None` when some
    /// later atom is left without candidates.
    pub fn restricted(&self, assigned: usize, image: Subset) -> Option<Self> {
        let p = atom(assigned);
        let mut pairs = Vec::with_capacity(self.assigned.len() + 1);
        pairs.extend_from_slice(&self.assigned);
        pairs.push((p, image));

        let skip = (assigned + 1).saturating_sub(self.first);
        let mut upper = Vec::with_capacity(self.upper.len().saturating_sub(skip));
        for (offset, &bound) in self.upper.iter().enumerate().skip(skip) {
            let q = atom(self.first + offset);
            let bound = if q <= image { bound.meet(&image) } else { bound };
            if !least_candidate(q, &pairs).is_subset_of(bound) {
                return None;
            }
            upper.push(bound);
        }

        Some(Self {
            first: assigned + 1,
            upper,
            assigned: pairs,
        })
    }
}

/// Smallest superset of `q` closed under the implications `p ∈ c ⇒ I ⊆ c`.
/// Every candidate for `q` contains it, so the row is empty exactly when it
/// overflows the row's upper bound.
fn least_candidate(q: Subset, assigned: &[(Subset, Subset)]) -> Subset {
    let mut c = q;
    loop {
        let grown = assigned
            .iter()
            .filter(|(p, _)| *p <= c)
            .fold(c, |acc, (_, image)| acc.join(image));
        if grown == c {
            return c;
        }
        c = grown;
    }
}

/// Lazy walk over the supersets of an atom inside its row's upper bound,
/// skipping those that break an implication.
pub struct Candidates<'a> {
    atom: Subset,
    free: u64,
    next: Option<u64>,
    assigned: &'a [(Subset, Subset)],
}

impl Iterator for Candidates<'_> {
    type Item = Subset;

    fn next(&mut self) -> Option<Subset> {
        while let Some(extra) = self.next {
            // submasks of `free` in increasing order
            self.next = (extra != self.free).then(|| extra.wrapping_sub(self.free) & self.free);

            let c = Subset::from_bits(self.atom.bits() | extra);
            if self
                .assigned
                .iter()
                .all(|&(p, image)| !conflicts(self.atom, c, p, image))
            {
                return Some(c);
            }
        }
        None
    }
}

#[inline]
fn atom(index: usize) -> Subset {
    Subset::from_bits(1 << index)
}

/// Whether candidate `c` for atom `q` is incompatible with atom `p` having
/// image `image`.
#[inline]
fn conflicts(q: Subset, c: Subset, p: Subset, image: Subset) -> bool {
    (q <= image && c.join(&image) != image) || (p <= c && c.join(&image) != c)
}

/// Images fixed so far, one per atom in canonical order.
///
/// Every two fixed pairs satisfy the pruning rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialAssignment {
    images: Vec<Subset>,
}

impl PartialAssignment {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[Subset] {
        &self.images
    }

    fn push(&mut self, image: Subset) {
        self.images.push(image);
    }

    fn pop(&mut self) {
        self.images.pop();
    }

    fn is_consistent(&self) -> bool {
        self.images.iter().enumerate().all(|(i, &image_p)| {
            self.images
                .iter()
                .enumerate()
                .skip(i + 1)
                .all(|(j, &image_q)| !conflicts(atom(j), image_q, atom(i), image_p))
        })
    }
}

/// A complete assignment: one image per atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosurePreoperator {
    base: BaseSet,
    images: Vec<Subset>,
}

impl ClosurePreoperator {
    pub fn images(&self) -> &[Subset] {
        &self.images
    }

    pub fn complete(&self) -> ClosureOperator {
        ClosureOperator::complete(self.base, &self.images)
    }
}

/// Counters for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Candidate images tried.
    pub nodes: u64,
    /// Choices whose pruning emptied some later atom's candidates.
    pub dead_branches: u64,
    /// Complete assignments reached.
    pub preoperators: u64,
}

/// Backtracking enumerator of closure preoperators on one base set.
pub struct ClosureEnumerator {
    base: BaseSet,
    config: EnumerationConfig,
    statistics: SearchStatistics,
}

impl ClosureEnumerator {
    pub fn new(base: BaseSet, config: EnumerationConfig) -> Self {
        Self {
            base,
            config,
            statistics: SearchStatistics::default(),
        }
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.statistics
    }

    /// Calls `visit` on every closure preoperator.
    ///
    /// Fails only when the node budget runs out.
    pub fn for_each_preoperator<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(ClosurePreoperator),
    {
        let candidates = CandidateImages::new(&self.base);
        let mut assignment = PartialAssignment::default();
        self.descend(&candidates, &mut assignment, &mut visit)
    }

    fn descend<F>(
        &mut self,
        candidates: &CandidateImages,
        assignment: &mut PartialAssignment,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(ClosurePreoperator),
    {
        let depth = assignment.len();
        if depth == self.base.size() {
            debug_assert!(assignment.is_consistent());
            self.statistics.preoperators += 1;
            visit(ClosurePreoperator {
                base: self.base,
                images: assignment.images().to_vec(),
            });
            return Ok(());
        }

        for image in candidates.candidates(depth) {
            self.statistics.nodes += 1;
            if let Some(budget) = self.config.node_budget {
                if self.statistics.nodes > budget {
                    return Err(Error::ResourceExhausted {
                        reason: format!("search exceeded its budget of {budget} nodes"),
                    });
                }
            }

            let Some(restricted) = candidates.restricted(depth, image) else {
                self.statistics.dead_branches += 1;
                continue;
            };

            assignment.push(image);
            let descended = self.descend(&restricted, assignment, visit);
            assignment.pop();
            descended?;
        }
        Ok(())
    }

    /// Every closure preoperator, in search order.
    pub fn preoperators(&mut self) -> Result<Vec<ClosurePreoperator>> {
        let mut found = Vec::new();
        self.for_each_preoperator(|pre| found.push(pre))?;
        Ok(found)
    }

    /// Every distinct topology, completed from the preoperators.
    pub fn topologies(&mut self) -> Result<TopologySet> {
        info!(n = self.base.size(), "enumerating topologies");

        let mut topologies = TopologySet::new();
        self.for_each_preoperator(|pre| {
            topologies.insert(pre.complete().into_topology());
        })?;

        let stats = self.statistics;
        debug!(
            nodes = stats.nodes,
            dead_branches = stats.dead_branches,
            preoperators = stats.preoperators,
            "search finished"
        );
        info!(
            n = self.base.size(),
            topologies = topologies.len(),
            "enumeration complete"
        );
        Ok(topologies)
    }
}

/// All topologies on `{0, ..., n-1}`.
///
/// `n = 0` yields the single topology `{∅}`. Fails only when `n` exceeds the
/// subset width.
pub fn enumerate_topologies(n: usize) -> Result<TopologySet> {
    enumerate_topologies_with(n, EnumerationConfig::default())
}

pub fn enumerate_topologies_with(n: usize, config: EnumerationConfig) -> Result<TopologySet> {
    let base = BaseSet::new(n)?;
    ClosureEnumerator::new(base, config).topologies()
}
