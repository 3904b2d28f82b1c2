use std::{cmp::Ordering, fmt};

use crate::{
    error::{Error, Result},
    lattices::lattice::{JoinSemiLattice, MeetSemiLattice},
};

/// A subset of a finite base set, encoded as a bit pattern.
///
/// Bit `i` is set iff point `i` is a member. The powerset of an `n`-point base
/// set is exactly the patterns `0..2^n`, so a subset doubles as an index into
/// any table over the powerset.
///
/// - Order: `a ⊑ b` iff `a & b == a`
/// - Join: bitwise OR
/// - Meet: bitwise AND
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Subset(u64);

impl Subset {
    /// Number of representable points. One bit is kept free so that `2^n`
    /// itself still fits a `u64`.
    pub const WIDTH: usize = 63;

    pub const EMPTY: Subset = Subset(0);

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// The singleton `{point}`, the atomic element for that point.
    pub fn singleton(point: usize) -> Result<Self> {
        if point >= Self::WIDTH {
            return Err(Error::PointOutOfRange { point });
        }
        Ok(Self(1 << point))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn contains(self, point: usize) -> bool {
        point < Self::WIDTH && self.0 & (1 << point) != 0
    }

    #[inline]
    pub fn is_subset_of(self, other: Subset) -> bool {
        self.0 & other.0 == self.0
    }

    /// Points of the subset in ascending order.
    pub fn points(self) -> impl Iterator<Item = usize> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let point = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(point)
        })
    }
}

impl FromIterator<usize> for Subset {
    /// Points at or beyond [`Subset::WIDTH`] are ignored.
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|&p| p < Self::WIDTH)
                .fold(0, |acc, p| acc | (1 << p)),
        )
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, point) in self.points().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{point}")?;
        }
        f.write_str("}")
    }
}

impl PartialOrd for Subset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_subset_of(*other), other.is_subset_of(*self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }

    fn le(&self, other: &Self) -> bool {
        self.is_subset_of(*other)
    }

    fn ge(&self, other: &Self) -> bool {
        other.is_subset_of(*self)
    }
}

impl JoinSemiLattice for Subset {
    #[inline]
    fn join(&self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl MeetSemiLattice for Subset {
    #[inline]
    fn meet(&self, other: &Self) -> Self {
        Self(self.0 & other.0)
    }
}

/// The labeled base set `{0, ..., n-1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BaseSet {
    size: usize,
}

impl BaseSet {
    pub fn new(size: usize) -> Result<Self> {
        if size > Subset::WIDTH {
            return Err(Error::ResourceExhausted {
                reason: format!(
                    "base set of {size} points exceeds the {}-point subset width",
                    Subset::WIDTH
                ),
            });
        }
        Ok(Self { size })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `2^n`, the number of subsets.
    #[inline]
    pub fn powerset_len(&self) -> usize {
        1 << self.size
    }

    /// The whole base set as a subset.
    #[inline]
    pub fn full(&self) -> Subset {
        Subset((1u64 << self.size) - 1)
    }

    pub fn points(&self) -> std::ops::Range<usize> {
        0..self.size
    }

    /// Every subset, in ascending numeric order.
    pub fn powerset(&self) -> impl Iterator<Item = Subset> {
        (0..self.powerset_len() as u64).map(Subset)
    }

    /// The atomic elements (singletons) in canonical order.
    pub fn atoms(&self) -> impl Iterator<Item = Subset> {
        self.points().map(|p| Subset(1 << p))
    }
}
