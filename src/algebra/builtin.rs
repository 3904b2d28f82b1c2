//! Ready-made operations on `{0, ..., n-1}`.

use crate::{
    algebra::operation::{FnOperation, Operation},
    error::Result,
};

/// Pointwise maximum of `arity` points (disjunction on `{0, 1}`).
pub fn max(arity: usize) -> Result<impl Operation> {
    FnOperation::new("max", |xs: &[usize]| xs.iter().copied().max().unwrap_or(0), arity)
}

/// Pointwise minimum of `arity` points (conjunction on `{0, 1}`).
pub fn min(arity: usize) -> Result<impl Operation> {
    FnOperation::new("min", |xs: &[usize]| xs.iter().copied().min().unwrap_or(0), arity)
}

/// `min(x + y, bound)`.
pub fn bounded_sum(bound: usize) -> Result<impl Operation> {
    FnOperation::new(
        "bounded-sum",
        move |xs: &[usize]| (xs[0] + xs[1]).min(bound),
        2,
    )
}

/// `min(x·y mod m + z·t mod m, bound)`.
pub fn bounded_sum_of_products(modulus: usize, bound: usize) -> Result<impl Operation> {
    let modulus = modulus.max(1);
    FnOperation::new(
        "bounded-sum-of-products",
        move |xs: &[usize]| ((xs[0] * xs[1]) % modulus + (xs[2] * xs[3]) % modulus).min(bound),
        4,
    )
}
