use bit_vec::BitVec;
use std::cmp::Ordering;

use crate::lattices::lattice::{JoinSemiLattice, MeetSemiLattice};

/// Lattice over fixed-length bit-vectors.
///
/// - Universe: `{0, ..., len-1}`
/// - Order: `a ⊑ b` iff for all `i`, `a[i] => b[i]`
/// - Join: bitwise OR
/// - Meet: bitwise AND
///
/// Vectors of different lengths describe different universes and are
/// incomparable. A topology on `n` points keeps its open sets in one of these
/// of length `2^n`, indexed by [`Subset`](crate::lattices::subset::Subset).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct BitVector(BitVec);

impl BitVector {
    pub fn new(len: usize) -> Self {
        Self(BitVec::from_elem(len, false))
    }

    pub fn filled(len: usize) -> Self {
        Self(BitVec::from_elem(len, true))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<bool> {
        self.0.get(idx)
    }

    /// Sets bit `idx`; returns `false` when `idx` lies outside the universe.
    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) -> bool {
        if idx >= self.0.len() {
            return false;
        }
        self.0.set(idx, value);
        true
    }

    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|bit| *bit).count()
    }

    /// Indices of set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(idx, bit)| bit.then_some(idx))
    }
}

impl From<Vec<bool>> for BitVector {
    fn from(value: Vec<bool>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl PartialOrd for BitVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.0.len() != other.0.len() {
            return None;
        }

        let mut less = false;
        let mut greater = false;

        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match (a, b) {
                (false, true) => less = true,
                (true, false) => greater = true,
                _ => {}
            }
            if less && greater {
                return None;
            }
        }

        match (less, greater) {
            (false, false) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (true, true) => None,
        }
    }

    fn le(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| !a || b)
    }

    fn ge(&self, other: &Self) -> bool {
        other.le(self)
    }
}

impl JoinSemiLattice for BitVector {
    /// Bitwise OR. Both vectors must share a universe.
    fn join(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        let mut join = self.0.clone();
        join.or(&other.0);
        Self(join)
    }
}

impl MeetSemiLattice for BitVector {
    /// Bitwise AND. Both vectors must share a universe.
    fn meet(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        let mut meet = self.0.clone();
        meet.and(&other.0);
        Self(meet)
    }
}
