pub mod bit_vector;
pub mod kleene;
pub mod lattice;
pub mod partial_order;
pub mod set;
pub mod subset;
