pub mod filter;
pub mod oracle;

pub use filter::{filter_compatible, FilterOutcome, ParallelFilter};
pub use oracle::is_compatible;
