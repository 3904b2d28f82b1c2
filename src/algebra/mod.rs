pub mod builtin;
pub mod operation;
pub mod tuples;

pub use operation::{make_operation, FnOperation, Operand, Operation};
