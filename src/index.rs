//! Inverted index keyed by lattice hash codes.
//!
//! [`AstarIndex`] layers ordered element lists under the bucket keys the
//! engine produces: `put` stores an element under the hash of the lattice
//! point nearest its vector, and `get_extended` fans a query out to every
//! bucket of the extended probe sequence. Distance re-ranking of the
//! returned candidates is the caller's job.

use std::collections::HashMap;

use crate::engine::{AstarLsh, ProbeCallback};
use crate::error::Result;
use crate::types::{CElem, Dim, Distance, HashCode, K, NumShells, VElem};

/// Receiver of index matches.
pub trait IndexCallback<T> {
    /// Called once per element matching the query, with the bucket hash
    /// it was found under. Failing aborts the query.
    fn on_match(&mut self, hash_code: HashCode, elem: &T) -> Result<()>;
}

/// Collects matching elements by clone.
#[derive(Debug)]
pub struct KeepElems<T> {
    elems: Vec<T>,
}

impl<T> KeepElems<T> {
    pub fn new() -> Self {
        KeepElems { elems: Vec::new() }
    }

    pub fn elems(&self) -> &[T] {
        &self.elems
    }

    pub fn into_elems(self) -> Vec<T> {
        self.elems
    }
}

impl<T> Default for KeepElems<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> IndexCallback<T> for KeepElems<T> {
    fn on_match(&mut self, _hash_code: HashCode, elem: &T) -> Result<()> {
        self.elems.push(elem.clone());
        Ok(())
    }
}

/// A vector index over [`AstarLsh`] bucket hashes.
#[derive(Debug)]
pub struct AstarIndex<T> {
    lsh: AstarLsh,
    map: HashMap<HashCode, Vec<T>>,
    num_elements: usize,
}

impl<T> AstarIndex<T> {
    /// Create an index; parameters as [`AstarLsh::new`].
    pub fn new(dim: Dim, packing_radius: Distance, num_shells: NumShells) -> Result<Self> {
        Ok(AstarIndex {
            lsh: AstarLsh::new(dim, packing_radius, num_shells)?,
            map: HashMap::new(),
            num_elements: 0,
        })
    }

    /// Store `elem` under the bucket of the lattice point nearest to
    /// `vector`.
    pub fn put(&mut self, vector: &[VElem], elem: T) -> Result<()> {
        let hash_code = self.lsh.nearest_hash(vector)?;
        self.put_hash(hash_code, elem);
        Ok(())
    }

    /// Store several elements under the bucket of `vector`.
    pub fn put_many(&mut self, vector: &[VElem], elems: impl IntoIterator<Item = T>) -> Result<()> {
        let hash_code = self.lsh.nearest_hash(vector)?;
        for elem in elems {
            self.put_hash(hash_code, elem);
        }
        Ok(())
    }

    /// Store `elem` directly under `hash_code`.
    pub fn put_hash(&mut self, hash_code: HashCode, elem: T) {
        self.map.entry(hash_code).or_default().push(elem);
        self.num_elements += 1;
    }

    /// Call `callback` for each element found in the extended probe
    /// buckets of `vector`.
    pub fn get_extended<C: IndexCallback<T>>(
        &self,
        vector: &[VElem],
        callback: &mut C,
    ) -> Result<()> {
        let mut fanout = HashFanout {
            index: self,
            callback,
        };
        self.lsh.extended(vector, &mut fanout)
    }

    /// Number of elements in the extended probe buckets of `vector`.
    pub fn count_extended(&self, vector: &[VElem]) -> Result<usize> {
        let mut counter = HashCounter {
            index: self,
            count: 0,
        };
        self.lsh.extended(vector, &mut counter)?;
        Ok(counter.count)
    }

    /// Call `callback` for each element stored under `hash_code`.
    pub fn get_hash<C: IndexCallback<T>>(
        &self,
        hash_code: HashCode,
        callback: &mut C,
    ) -> Result<()> {
        if let Some(list) = self.map.get(&hash_code) {
            for elem in list {
                callback.on_match(hash_code, elem)?;
            }
        }
        Ok(())
    }

    /// Number of elements stored under `hash_code`.
    pub fn count_hash(&self, hash_code: HashCode) -> usize {
        self.map.get(&hash_code).map_or(0, Vec::len)
    }

    /// Bucket hash for `vector` (the nearest lattice point's hash).
    pub fn hash(&self, vector: &[VElem]) -> Result<HashCode> {
        self.lsh.nearest_hash(vector)
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.map.clear();
        self.num_elements = 0;
    }

    /// Remove the elements stored under the bucket of `vector`.
    pub fn clear_vector(&mut self, vector: &[VElem]) -> Result<()> {
        let hash_code = self.lsh.nearest_hash(vector)?;
        self.clear_hash(hash_code);
        Ok(())
    }

    /// Remove the elements stored under `hash_code`.
    pub fn clear_hash(&mut self, hash_code: HashCode) {
        if let Some(list) = self.map.remove(&hash_code) {
            self.num_elements -= list.len();
        }
    }

    /// Total number of stored elements.
    pub fn len(&self) -> usize {
        self.num_elements
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of distinct buckets holding at least one element.
    pub fn num_hashes(&self) -> usize {
        self.map.len()
    }

    /// Dimensionality of indexed vectors.
    pub fn dim(&self) -> Dim {
        self.lsh.dim()
    }

    /// The packing radius the underlying engine was configured with.
    pub fn packing_radius(&self) -> Distance {
        self.lsh.packing_radius()
    }

    /// Number of extended shells probed by queries.
    pub fn num_shells(&self) -> NumShells {
        self.lsh.num_shells()
    }

    /// Number of buckets probed per extended query.
    pub fn num_probes(&self) -> usize {
        self.lsh.num_probes()
    }
}

/// Hash-only probe callback fanning each bucket out to an IndexCallback.
struct HashFanout<'a, T, C: IndexCallback<T>> {
    index: &'a AstarIndex<T>,
    callback: &'a mut C,
}

impl<T, C: IndexCallback<T>> ProbeCallback for HashFanout<'_, T, C> {
    const NEED_CVECTOR: bool = false;
    const NEED_HASH: bool = true;
    const NEED_POINT: bool = false;

    fn on_match(&mut self, hash_code: HashCode, _k: K, _c: &[CElem], _point: &[VElem]) -> Result<()> {
        self.index.get_hash(hash_code, self.callback)
    }
}

/// Hash-only probe callback summing bucket sizes.
struct HashCounter<'a, T> {
    index: &'a AstarIndex<T>,
    count: usize,
}

impl<T> ProbeCallback for HashCounter<'_, T> {
    const NEED_CVECTOR: bool = false;
    const NEED_HASH: bool = true;
    const NEED_POINT: bool = false;

    fn on_match(&mut self, hash_code: HashCode, _k: K, _c: &[CElem], _point: &[VElem]) -> Result<()> {
        self.count += self.index.count_hash(hash_code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get_hash() {
        let mut index: AstarIndex<u32> = AstarIndex::new(2, 1.0, 1).unwrap();
        index.put(&[0.0, 0.0], 7).unwrap();
        index.put(&[0.0, 0.0], 8).unwrap();

        let h = index.hash(&[0.0, 0.0]).unwrap();
        assert_eq!(index.count_hash(h), 2);
        assert_eq!(index.len(), 2);
        assert_eq!(index.num_hashes(), 1);

        let mut keep = KeepElems::new();
        index.get_hash(h, &mut keep).unwrap();
        assert_eq!(keep.elems(), &[7, 8]);
    }

    #[test]
    fn test_extended_finds_nearby_buckets() {
        let mut index: AstarIndex<&str> = AstarIndex::new(2, 1.0, 1).unwrap();
        index.put(&[0.1, -0.05], "near origin").unwrap();

        let mut keep = KeepElems::new();
        index.get_extended(&[0.0, 0.0], &mut keep).unwrap();
        assert_eq!(keep.elems(), &["near origin"]);
        assert_eq!(index.count_extended(&[0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_clear_hash_updates_len() {
        let mut index: AstarIndex<u8> = AstarIndex::new(3, 1.0, 0).unwrap();
        index.put(&[0.0, 0.0, 0.0], 1).unwrap();
        index.put(&[5.0, 5.0, -1.0], 2).unwrap();
        assert_eq!(index.len(), 2);

        index.clear_vector(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(index.len(), 1);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_put_many() {
        let mut index: AstarIndex<u32> = AstarIndex::new(2, 1.0, 0).unwrap();
        index.put_many(&[1.0, 1.0], [1, 2, 3]).unwrap();
        let h = index.hash(&[1.0, 1.0]).unwrap();
        assert_eq!(index.count_hash(h), 3);
        assert_eq!(index.len(), 3);
    }
}
