pub mod closure;
pub mod enumerate;
pub mod finite;

pub use closure::ClosureOperator;
pub use enumerate::{enumerate_topologies, enumerate_topologies_with, ClosureEnumerator};
pub use finite::{ordered_by_cardinality, Topology, TopologySet};
