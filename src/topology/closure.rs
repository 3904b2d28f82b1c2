use std::hash::Hash;

use tracing::trace;

use crate::{
    lattices::{
        kleene::fixpoint_increasing,
        lattice::Lattice,
        set::Set,
        subset::{BaseSet, Subset},
    },
    topology::finite::Topology,
};

/// Closes `seed` under pairwise meet and join in any lattice, giving up
/// after `max_rounds`. The flag reports whether a fixpoint was reached.
pub fn close_under_meet_and_join<L>(seed: Set<L>, max_rounds: usize) -> (Set<L>, bool)
where
    L: Lattice + Clone + Eq + Hash,
{
    fixpoint_increasing(
        seed,
        |values: &Set<L>| {
            let mut next = Set::with_capacity(values.len() * 2);
            for a in values {
                for b in values {
                    next.insert(a.meet(b));
                    next.insert(a.join(b));
                }
            }
            next
        },
        max_rounds,
    )
}

/// Closes a family of subsets of `base` under intersection and union.
///
/// The result can grow to the whole powerset of `base`, so at most `2^n`
/// rounds are ever needed.
pub fn meet_join_closure(base: &BaseSet, seed: Set<Subset>) -> Set<Subset> {
    let (closed, converged) = close_under_meet_and_join(seed, base.powerset_len() + 1);
    debug_assert!(converged, "closure exceeded the powerset size");
    closed
}

/// A closure operator, kept as its set of closed values.
///
/// Built by completing a preoperator's atomic images under meet and join.
/// Idempotence, monotonicity and extensivity follow from the construction
/// and are not re-checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosureOperator {
    base: BaseSet,
    closed: Set<Subset>,
}

impl ClosureOperator {
    pub fn complete(base: BaseSet, atomic_images: &[Subset]) -> Self {
        let seed: Set<Subset> = atomic_images.iter().copied().collect();
        let closed = meet_join_closure(&base, seed);
        trace!(
            atoms = atomic_images.len(),
            closed = closed.len(),
            "completed closure operator"
        );
        Self { base, closed }
    }

    pub fn closed_values(&self) -> &Set<Subset> {
        &self.closed
    }

    /// Decodes every closed value into an open set and adds `∅`.
    pub fn into_topology(self) -> Topology {
        Topology::from_closed_values(self.base, self.closed.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattices::bit_vector::BitVector;

    fn subsets(bits: &[u64]) -> Set<Subset> {
        bits.iter().copied().map(Subset::from_bits).collect()
    }

    #[test]
    fn closure_of_chain_is_unchanged() {
        let base = BaseSet::new(3).unwrap();
        let chain = subsets(&[0b001, 0b011, 0b111]);
        assert_eq!(meet_join_closure(&base, chain.clone()), chain);
    }

    #[test]
    fn closure_adds_meets_and_joins() {
        let base = BaseSet::new(3).unwrap();
        let closed = meet_join_closure(&base, subsets(&[0b011, 0b110]));
        assert_eq!(closed, subsets(&[0b011, 0b110, 0b010, 0b111]));
    }

    #[test]
    fn atoms_generate_the_whole_powerset() {
        let base = BaseSet::new(3).unwrap();
        let closed = meet_join_closure(&base, base.atoms().collect());
        // meets of distinct atoms give the empty set
        assert_eq!(closed.len(), 8);
    }

    #[test]
    fn closure_works_over_any_lattice() {
        let vectors: Set<BitVector> = [
            BitVector::from(vec![true, true, false]),
            BitVector::from(vec![false, true, true]),
        ]
        .into_iter()
        .collect();
        let (closed, converged) = close_under_meet_and_join(vectors, 4);
        assert!(converged);
        assert!(closed.contains(&BitVector::from(vec![false, true, false])));
        assert!(closed.contains(&BitVector::from(vec![true, true, true])));
        assert_eq!(closed.len(), 4);
    }

    #[test]
    fn round_limit_is_reported() {
        let base = BaseSet::new(3).unwrap();
        let (_, converged) = close_under_meet_and_join(base.atoms().collect(), 1);
        assert!(!converged);
    }

    #[test]
    fn discrete_preoperator_completes_to_discrete_topology() {
        let base = BaseSet::new(2).unwrap();
        let atoms: Vec<Subset> = base.atoms().collect();
        let topology = ClosureOperator::complete(base, &atoms).into_topology();
        assert!(topology.is_discrete());
    }
}
