use std::fmt;

use crate::{
    algebra::tuples::Tuples,
    error::{Error, Result},
    lattices::subset::Subset,
};

/// One operand of [`Operation::apply`]: a point of the base set or a subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Point(usize),
    Subset(Subset),
}

/// A `k`-ary operation on the points of a base set, lifted to subsets.
///
/// Implementors supply [`arity`](Operation::arity) and
/// [`apply_points`](Operation::apply_points). The subset extension
///
/// ```text
/// f(A_1, ..., A_k) = { f(x_1, ..., x_k) : x_i ∈ A_i }
/// ```
///
/// is derived from them over the full Cartesian product of the operands.
///
/// Operations are shared read-only by every worker of the parallel filter,
/// hence the `Send + Sync` bound.
pub trait Operation: Send + Sync {
    fn arity(&self) -> usize;

    /// Label used in logs.
    fn name(&self) -> &str {
        "operation"
    }

    /// `f(x_1, ..., x_k)` for points of the base set.
    fn apply_points(&self, points: &[usize]) -> Result<usize>;

    /// Fails with [`Error::ArityMismatch`] unless exactly `arity` operands
    /// were given.
    fn check_arity(&self, found: usize) -> Result<()> {
        let expected = self.arity();
        if found != expected {
            return Err(Error::ArityMismatch { expected, found });
        }
        Ok(())
    }

    /// The pointwise image of `operands` under the operation.
    fn apply_subsets(&self, operands: &[Subset]) -> Result<Subset> {
        self.check_arity(operands.len())?;

        let points: Vec<Vec<usize>> = operands.iter().map(|s| s.points().collect()).collect();
        let mut tuples = Tuples::new(points.iter().map(Vec::as_slice).collect());

        let mut image = Subset::EMPTY;
        while let Some(tuple) = tuples.next_tuple() {
            let value = self.apply_points(tuple)?;
            image = Subset::from_bits(image.bits() | Subset::singleton(value)?.bits());
        }
        Ok(image)
    }

    /// Whether `f(operands) ⊆ bound`, stopping at the first value that
    /// escapes `bound`.
    fn image_within(&self, operands: &[Subset], bound: Subset) -> Result<bool> {
        self.check_arity(operands.len())?;

        let points: Vec<Vec<usize>> = operands.iter().map(|s| s.points().collect()).collect();
        let mut tuples = Tuples::new(points.iter().map(Vec::as_slice).collect());

        while let Some(tuple) = tuples.next_tuple() {
            if !bound.contains(self.apply_points(tuple)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Applies the operation to all-point or all-subset operands.
    ///
    /// Mixed operand kinds fail with [`Error::InvalidOperandKind`].
    fn apply(&self, operands: &[Operand]) -> Result<Operand> {
        self.check_arity(operands.len())?;

        let points: Option<Vec<usize>> = operands
            .iter()
            .map(|op| match op {
                Operand::Point(p) => Some(*p),
                Operand::Subset(_) => None,
            })
            .collect();
        if let Some(points) = points {
            return self.apply_points(&points).map(Operand::Point);
        }

        let subsets: Option<Vec<Subset>> = operands
            .iter()
            .map(|op| match op {
                Operand::Subset(s) => Some(*s),
                Operand::Point(_) => None,
            })
            .collect();
        match subsets {
            Some(subsets) => self.apply_subsets(&subsets).map(Operand::Subset),
            None => Err(Error::InvalidOperandKind),
        }
    }
}

/// An [`Operation`] backed by a closure over point tuples.
pub struct FnOperation<F> {
    name: String,
    arity: usize,
    f: F,
}

impl<F> FnOperation<F>
where
    F: Fn(&[usize]) -> usize + Send + Sync,
{
    /// Arity is checked here, once, rather than on every call.
    pub fn new(name: impl Into<String>, f: F, arity: usize) -> Result<Self> {
        if arity == 0 {
            return Err(Error::InvalidArity);
        }
        Ok(Self {
            name: name.into(),
            arity,
            f,
        })
    }
}

impl<F> Operation for FnOperation<F>
where
    F: Fn(&[usize]) -> usize + Send + Sync,
{
    fn arity(&self) -> usize {
        self.arity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply_points(&self, points: &[usize]) -> Result<usize> {
        self.check_arity(points.len())?;
        Ok((self.f)(points))
    }
}

impl<F> fmt::Debug for FnOperation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperation")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Wraps a scalar function of the given arity as an [`Operation`].
pub fn make_operation<F>(f: F, arity: usize) -> Result<FnOperation<F>>
where
    F: Fn(&[usize]) -> usize + Send + Sync,
{
    FnOperation::new("custom", f, arity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn max2() -> FnOperation<impl Fn(&[usize]) -> usize + Send + Sync> {
        make_operation(|xs: &[usize]| xs[0].max(xs[1]), 2).unwrap()
    }

    fn subset(points: &[usize]) -> Subset {
        points.iter().copied().collect()
    }

    #[test]
    fn zero_arity_is_rejected() {
        assert_eq!(
            make_operation(|_: &[usize]| 0, 0).unwrap_err(),
            Error::InvalidArity
        );
    }

    #[test]
    fn scalar_application() {
        let op = max2();
        assert_eq!(
            op.apply(&[Operand::Point(1), Operand::Point(3)]),
            Ok(Operand::Point(3))
        );
    }

    #[test]
    fn subset_application_covers_the_product() {
        let op = make_operation(|xs: &[usize]| xs[0] + xs[1], 2).unwrap();
        let image = op
            .apply(&[
                Operand::Subset(subset(&[0, 1])),
                Operand::Subset(subset(&[0, 4])),
            ])
            .unwrap();
        assert_eq!(image, Operand::Subset(subset(&[0, 1, 4, 5])));
    }

    #[test]
    fn empty_operand_has_empty_image() {
        let op = max2();
        assert_eq!(
            op.apply_subsets(&[Subset::EMPTY, subset(&[1])]),
            Ok(Subset::EMPTY)
        );
    }

    #[test]
    fn arity_mismatch() {
        let op = max2();
        assert_eq!(
            op.apply(&[Operand::Point(1)]),
            Err(Error::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            op.apply_subsets(&[subset(&[0]); 3]),
            Err(Error::ArityMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn mixed_operands_are_rejected() {
        let op = max2();
        assert_eq!(
            op.apply(&[Operand::Point(1), Operand::Subset(subset(&[0]))]),
            Err(Error::InvalidOperandKind)
        );
    }

    #[test]
    fn unrepresentable_result_is_reported() {
        let op = make_operation(|_: &[usize]| 100, 1).unwrap();
        assert_eq!(op.apply_points(&[0]), Ok(100));
        assert_eq!(
            op.apply_subsets(&[subset(&[0])]),
            Err(Error::PointOutOfRange { point: 100 })
        );
    }

    #[test]
    fn image_within_short_circuits_consistently() {
        let op = max2();
        let a = subset(&[0, 2]);
        let b = subset(&[1]);
        // image is {1, 2}
        assert_eq!(op.image_within(&[a, b], subset(&[1, 2])), Ok(true));
        assert_eq!(op.image_within(&[a, b], subset(&[1])), Ok(false));
    }

    proptest! {
        #[test]
        fn prop_image_within_agrees_with_image(a in 0u64..64, b in 0u64..64, w in 0u64..64) {
            let op = max2();
            let (a, b, w) = (Subset::from_bits(a), Subset::from_bits(b), Subset::from_bits(w));
            let image = op.apply_subsets(&[a, b]).unwrap();
            prop_assert_eq!(op.image_within(&[a, b], w).unwrap(), image <= w);
        }

        #[test]
        fn prop_extension_is_monotone(a in 0u64..64, b in 0u64..64, extra in 0u64..64) {
            let op = max2();
            let (a, b) = (Subset::from_bits(a), Subset::from_bits(b));
            let bigger = Subset::from_bits(a.bits() | extra);
            let small = op.apply_subsets(&[a, b]).unwrap();
            let large = op.apply_subsets(&[bigger, b]).unwrap();
            prop_assert!(small <= large);
        }
    }
}
