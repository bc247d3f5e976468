//! A bucketed associative container keyed by a caller-defined hash and equality.
//!
//! Unlike [`std::collections::HashMap`], the key decides both how it is hashed and
//! what "equal" means through the [`BucketKey`] trait. This lets two keys which are
//! not bit-identical share an entry, eg. the fanin pairs `(a, b)` and `(b, a)` of a
//! commutative AND gate ([`FaninKey`]), or a simulation value and its bitwise
//! complement ([`SimValueKey`]).

use crate::{AigEdge, aig::Literal};

/// The hash/equality contract of a [`BucketMap`] key.
///
/// Keys which are [`bucket_eq`] must return the same [`bucket_hash`].
///
/// [`bucket_eq`]: BucketKey::bucket_eq
/// [`bucket_hash`]: BucketKey::bucket_hash
pub trait BucketKey {
    fn bucket_hash(&self) -> usize;
    fn bucket_eq(&self, other: &Self) -> bool;
}

/// Order-independent key of the two fanins of an AND gate.
#[derive(Debug, Clone, Copy)]
pub struct FaninKey {
    lits: [Literal; 2],
}

impl FaninKey {
    pub fn new(fanin0: AigEdge, fanin1: AigEdge) -> Self {
        FaninKey {
            lits: [fanin0.literal(), fanin1.literal()],
        }
    }
}

impl BucketKey for FaninKey {
    fn bucket_hash(&self) -> usize {
        self.lits[0].wrapping_add(self.lits[1])
    }

    fn bucket_eq(&self, other: &Self) -> bool {
        (self.lits[0] == other.lits[0] && self.lits[1] == other.lits[1])
            || (self.lits[0] == other.lits[1] && self.lits[1] == other.lits[0])
    }
}

/// Key of a simulation value, equal to its own bitwise complement.
#[derive(Debug, Clone, Copy)]
pub struct SimValueKey(pub u64);

impl BucketKey for SimValueKey {
    fn bucket_hash(&self) -> usize {
        // Both polarities hash to the representative in the lower half.
        let v = if self.0 > u64::MAX / 2 { !self.0 } else { self.0 };
        v as usize
    }

    fn bucket_eq(&self, other: &Self) -> bool {
        self.0 == other.0 || self.0 == !other.0
    }
}

/// The bucketed map.
///
/// The number of buckets is fixed at creation. Entries within a bucket keep
/// their insertion order, and iteration goes bucket by bucket.
#[derive(Debug, Clone)]
pub struct BucketMap<K, V> {
    buckets: Vec<Vec<(K, V)>>,
}

impl<K: BucketKey, V> BucketMap<K, V> {
    /// Creates a map with `num_buckets` buckets (at least one).
    pub fn new(num_buckets: usize) -> Self {
        let mut buckets = Vec::with_capacity(num_buckets.max(1));
        buckets.resize_with(num_buckets.max(1), Vec::new);
        BucketMap { buckets }
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_num(&self, key: &K) -> usize {
        key.bucket_hash() % self.buckets.len()
    }

    fn position(&self, key: &K) -> (usize, Option<usize>) {
        let b = self.bucket_num(key);
        (b, self.buckets[b].iter().position(|(k, _)| k.bucket_eq(key)))
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.position(key).1.is_some()
    }

    pub fn query(&self, key: &K) -> Option<&V> {
        let (b, i) = self.position(key);
        i.map(|i| &self.buckets[b][i].1)
    }

    pub fn query_mut(&mut self, key: &K) -> Option<&mut V> {
        let (b, i) = self.position(key);
        i.map(|i| &mut self.buckets[b][i].1)
    }

    /// Inserts the entry if no equal key is present.
    /// Returns false (and drops nothing from the map) if the key was already there.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.position(&key) {
            (_, Some(_)) => false,
            (b, None) => {
                self.buckets[b].push((key, value));
                true
            }
        }
    }

    /// Overwrites the value of an equal key, or inserts a new entry.
    /// Returns true if an entry was overwritten.
    pub fn update(&mut self, key: K, value: V) -> bool {
        match self.position(&key) {
            (b, Some(i)) => {
                self.buckets[b][i].1 = value;
                true
            }
            (b, None) => {
                self.buckets[b].push((key, value));
                false
            }
        }
    }

    /// Returns the value of an equal key, inserting `value` first if there was none.
    /// The boolean is true if the key was already present.
    pub fn query_or_insert(&mut self, key: K, value: V) -> (&mut V, bool) {
        match self.position(&key) {
            (b, Some(i)) => (&mut self.buckets[b][i].1, true),
            (b, None) => {
                self.buckets[b].push((key, value));
                let last = self.buckets[b].len() - 1;
                (&mut self.buckets[b][last].1, false)
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (b, i) = self.position(key);
        i.map(|i| self.buckets[b].remove(i).1)
    }

    pub fn bucket(&self, i: usize) -> &[(K, V)] {
        &self.buckets[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.buckets.iter().flatten()
    }
}

impl<K, V> IntoIterator for BucketMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Vec<(K, V)>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter().flatten()
    }
}
