//! Enumeration of the topologies on a small labeled set, and filtering of
//! those topologies by continuity of a finite operation.
//!
//! ```
//! use toposearch::{algebra::builtin, continuity::filter_compatible, lattices::subset::BaseSet};
//! use toposearch::topology::enumerate_topologies;
//!
//! let x = BaseSet::new(2)?;
//! let topologies = enumerate_topologies(2)?;
//! assert_eq!(topologies.len(), 4);
//!
//! let kept = filter_compatible(&x, &topologies, &builtin::max(2)?)?;
//! assert_eq!(kept.len(), 4);
//! # Ok::<(), toposearch::Error>(())
//! ```

pub mod algebra;
pub mod config;
pub mod continuity;
pub mod error;
pub mod lattices;
pub mod topology;

pub use error::{Error, Result};
