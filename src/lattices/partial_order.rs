/// Marker for types whose [`PartialOrd`] is a genuine partial order
/// (reflexive, antisymmetric, transitive).
///
/// Inclusion of subsets and inclusion of topologies are both partial orders
/// in which most pairs are incomparable, so `partial_cmp` returning `None`
/// is the common case rather than an error.
///
/// No methods are added; the lattice traits use it as a bound so that `<=`
/// reads as `⊆` throughout the crate.
pub trait PartialOrder: PartialEq + PartialOrd {}

impl<T: PartialEq + PartialOrd + ?Sized> PartialOrder for T {}
