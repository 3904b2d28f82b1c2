use std::{cmp::Ordering, fmt};

use crate::{
    error::{Error, Result},
    lattices::{
        bit_vector::BitVector,
        lattice::{JoinSemiLattice, MeetSemiLattice},
        set::Set,
        subset::{BaseSet, Subset},
    },
    topology::closure::meet_join_closure,
};

/// A topology on a finite labeled base set.
///
/// Open sets are recorded in a table of `2^n` bits indexed by [`Subset`], so
/// equality and hashing are structural. Once built a topology is never
/// mutated.
///
/// Topologies are ordered by inclusion of their open-set collections:
/// - Meet: intersection of the collections (the infimum)
/// - Join: the union closed under `∪` and `∩` (the supremum)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Topology {
    base: BaseSet,
    open: BitVector,
}

/// A collection of topologies, deduplicated structurally.
pub type TopologySet = Set<Topology>;

impl Topology {
    /// Every subset open.
    pub fn discrete(base: BaseSet) -> Self {
        Self {
            base,
            open: BitVector::filled(base.powerset_len()),
        }
    }

    /// Only `∅` and the base set open.
    pub fn indiscrete(base: BaseSet) -> Self {
        let mut open = BitVector::new(base.powerset_len());
        open.set(Subset::EMPTY.index(), true);
        open.set(base.full().index(), true);
        Self { base, open }
    }

    /// Collects the given subsets as open sets without checking the topology
    /// axioms; see [`Topology::is_topology`].
    pub fn from_open_sets<I>(base: BaseSet, open_sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = Subset>,
    {
        let mut open = BitVector::new(base.powerset_len());
        for set in open_sets {
            if !set.is_subset_of(base.full()) {
                let point = set.points().find(|&p| p >= base.size()).unwrap_or_default();
                return Err(Error::PointOutOfRange { point });
            }
            open.set(set.index(), true);
        }
        Ok(Self { base, open })
    }

    pub(crate) fn from_closed_values<I>(base: BaseSet, closed: I) -> Self
    where
        I: IntoIterator<Item = Subset>,
    {
        let mut open = BitVector::new(base.powerset_len());
        open.set(Subset::EMPTY.index(), true);
        for value in closed {
            open.set(value.index(), true);
        }
        Self { base, open }
    }

    pub fn base(&self) -> &BaseSet {
        &self.base
    }

    /// Number of open sets.
    pub fn len(&self) -> usize {
        self.open.count_ones()
    }

    /// Never true for a valid topology, which always contains `∅`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, set: Subset) -> bool {
        self.open.get(set.index()).unwrap_or(false)
    }

    /// Open sets in ascending numeric order.
    pub fn open_sets(&self) -> impl Iterator<Item = Subset> + '_ {
        self.open.ones().map(|idx| Subset::from_bits(idx as u64))
    }

    /// Open sets containing `point`, smallest first.
    pub fn neighbourhoods(&self, point: usize) -> Vec<Subset> {
        let mut nbhs: Vec<Subset> = self.open_sets().filter(|s| s.contains(point)).collect();
        nbhs.sort_by_key(|s| (s.len(), s.bits()));
        nbhs
    }

    pub fn is_discrete(&self) -> bool {
        self.len() == self.base.powerset_len()
    }

    pub fn is_indiscrete(&self) -> bool {
        *self == Self::indiscrete(self.base)
    }

    /// Checks the axioms: `∅` and the base set are open, and the open sets
    /// are closed under pairwise union and intersection.
    pub fn is_topology(&self) -> bool {
        if !self.contains(Subset::EMPTY) || !self.contains(self.base.full()) {
            return false;
        }
        let open: Vec<Subset> = self.open_sets().collect();
        open.iter().enumerate().all(|(i, a)| {
            open[i..]
                .iter()
                .all(|b| self.contains(a.join(b)) && self.contains(a.meet(b)))
        })
    }
}

impl PartialOrd for Topology {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.base != other.base {
            return None;
        }
        self.open.partial_cmp(&other.open)
    }

    fn le(&self, other: &Self) -> bool {
        self.base == other.base && self.open.le(&other.open)
    }

    fn ge(&self, other: &Self) -> bool {
        other.le(self)
    }
}

impl MeetSemiLattice for Topology {
    /// Topological infimum. Both operands must share a base set.
    fn meet(&self, other: &Self) -> Self {
        debug_assert_eq!(self.base, other.base);
        Self {
            base: self.base,
            open: self.open.meet(&other.open),
        }
    }
}

impl JoinSemiLattice for Topology {
    /// Topological supremum. Both operands must share a base set.
    fn join(&self, other: &Self) -> Self {
        debug_assert_eq!(self.base, other.base);
        if self <= other {
            return other.clone();
        }
        if other <= self {
            return self.clone();
        }
        let union: Set<Subset> = self.open_sets().chain(other.open_sets()).collect();
        let closed = meet_join_closure(&self.base, union);
        Self::from_closed_values(self.base, closed)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut open: Vec<Subset> = self.open_sets().collect();
        open.sort_by_key(|s| (s.len(), s.bits()));
        f.write_str("{")?;
        for (i, set) in open.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if set.is_empty() {
                f.write_str("∅")?;
            } else {
                write!(f, "{set}")?;
            }
        }
        f.write_str("}")
    }
}

/// Topologies sorted by ascending cardinality, ties broken by open sets.
pub fn ordered_by_cardinality(topologies: &TopologySet) -> Vec<Topology> {
    let mut ordered: Vec<Topology> = topologies.iter().cloned().collect();
    ordered.sort_by(|a, b| {
        a.len().cmp(&b.len()).then_with(|| {
            a.open_sets()
                .map(Subset::bits)
                .cmp(b.open_sets().map(Subset::bits))
        })
    });
    ordered
}
