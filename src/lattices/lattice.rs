use crate::lattices::partial_order::PartialOrder;

/// A join-semilattice: every pair of elements has a least upper bound.
///
/// # Laws
///
/// For all `a, b, c`:
///
/// * **Associativity**: `a.join(&b).join(&c) == a.join(&b.join(&c))`
/// * **Commutativity**: `a.join(&b) == b.join(&a)`
/// * **Idempotence**:   `a.join(&a) == a`
///
/// In terms of the order `⊑` given by [`PartialOrder`], `a.join(&b)` is above
/// both `a` and `b`, and below every common upper bound of them.
///
/// For [`Subset`](crate::lattices::subset::Subset) the join is set union; for
/// [`Topology`](crate::topology::Topology) it is the topological supremum.
pub trait JoinSemiLattice: PartialOrder + Sized {
    /// Returns the least upper bound of `self` and `other`.
    fn join(&self, other: &Self) -> Self;
}

/// A meet-semilattice: every pair of elements has a greatest lower bound.
///
/// # Laws
///
/// For all `a, b, c`:
///
/// * **Associativity**: `a.meet(&b).meet(&c) == a.meet(&b.meet(&c))`
/// * **Commutativity**: `a.meet(&b) == b.meet(&a)`
/// * **Idempotence**:   `a.meet(&a) == a`
pub trait MeetSemiLattice: PartialOrder + Sized {
    /// Returns the greatest lower bound of `self` and `other`.
    fn meet(&self, other: &Self) -> Self;
}

/// Both a join- and a meet-semilattice.
///
/// Implemented automatically for every type that has both operations.
pub trait Lattice: JoinSemiLattice + MeetSemiLattice {}

impl<T: JoinSemiLattice + MeetSemiLattice> Lattice for T {}
