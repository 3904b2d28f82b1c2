use std::{
    cmp::Ordering,
    collections::hash_set::{IntoIter, Iter},
    hash::Hash,
    iter::FromIterator,
};

use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::lattices::lattice::{JoinSemiLattice, MeetSemiLattice};

/// Hash set ordered by inclusion.
///
/// Used both for the working set of closed values while completing a closure
/// operator and for collections of topologies, where structural
/// deduplication comes from `T: Eq + Hash`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Set<T: Eq + Hash>(FxHashSet<T>);

impl<T: Eq + Hash> Set<T> {
    pub fn new() -> Self {
        Self(FxHashSet::with_hasher(FxBuildHasher))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(FxHashSet::with_capacity_and_hasher(capacity, FxBuildHasher))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.0.iter()
    }

    pub fn insert(&mut self, value: T) -> bool {
        self.0.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.0.is_superset(&other.0)
    }
}

impl<T: Eq + Hash> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T: Eq + Hash> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Eq + Hash> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<T: Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(FxHashSet::from_iter(iter))
    }
}

impl<T: Eq + Hash> PartialOrd for Set<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_subset(other), other.is_subset(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }

    fn le(&self, other: &Self) -> bool {
        self.is_subset(other)
    }

    fn ge(&self, other: &Self) -> bool {
        self.is_superset(other)
    }
}

impl<T: Eq + Hash + Clone> JoinSemiLattice for Set<T> {
    fn join(&self, other: &Self) -> Self {
        if other.is_empty() || self.is_superset(other) {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let mut set = Set::with_capacity(self.len() + other.len());
        set.extend(self.iter().cloned());
        set.extend(other.iter().cloned());
        set
    }
}

impl<T: Eq + Hash + Clone> MeetSemiLattice for Set<T> {
    fn meet(&self, other: &Self) -> Self {
        // Iterate smaller, look up in larger
        let (small, big) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        small.iter().filter(|v| big.contains(v)).cloned().collect()
    }
}
