//! Query callback shapes and standard collectors.

use crate::error::Result;
use crate::types::{CElem, Dim, HashCode, K, VElem};

/// Receiver of query matches.
///
/// The three associated consts declare the shape of the callback: which
/// per-match data it wants. Queries are monomorphized per shape, so the
/// flags are compile-time and the inner probe loops do exactly the work
/// the shape asks for: a hash-only walk never touches the c-vector and a
/// c-vector-only walk never computes a hash.
///
/// Slices not requested by the shape arrive empty in [`on_match`]; the
/// remainder `k` is always passed since it is a by-product of every walk.
/// Requesting points implies the c-vector walk internally (points are
/// derived from `(c, k)`), but the c-vector is still withheld from
/// `on_match` unless `NEED_CVECTOR` is set.
///
/// [`on_match`]: ProbeCallback::on_match
pub trait ProbeCallback {
    /// Deliver c-vectors to `on_match`.
    const NEED_CVECTOR: bool;
    /// Compute and deliver hash codes.
    const NEED_HASH: bool;
    /// Compute and deliver lattice point coordinates.
    const NEED_POINT: bool;

    /// Called once at the start of a query with the query vector mapped
    /// into the lattice representation space (length n+1). The slice is
    /// only valid for the duration of the call.
    fn init(&mut self, mapped: &[VElem]) -> Result<()> {
        let _ = mapped;
        Ok(())
    }

    /// Called once per matching lattice point.
    ///
    /// Failing aborts the walk; the error surfaces to the query caller
    /// unchanged. Wrap foreign failures with
    /// [`AstarError::in_callback`](crate::AstarError::in_callback).
    fn on_match(&mut self, hash_code: HashCode, k: K, c: &[CElem], point: &[VElem]) -> Result<()>;
}

/// Collects matching hash codes.
#[derive(Debug, Default)]
pub struct KeepHashes {
    hashes: Vec<HashCode>,
}

impl KeepHashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        KeepHashes {
            hashes: Vec::with_capacity(capacity),
        }
    }

    pub fn hashes(&self) -> &[HashCode] {
        &self.hashes
    }

    pub fn into_hashes(self) -> Vec<HashCode> {
        self.hashes
    }
}

impl ProbeCallback for KeepHashes {
    const NEED_CVECTOR: bool = false;
    const NEED_HASH: bool = true;
    const NEED_POINT: bool = false;

    fn on_match(&mut self, hash_code: HashCode, _k: K, _c: &[CElem], _point: &[VElem]) -> Result<()> {
        self.hashes.push(hash_code);
        Ok(())
    }
}

/// Collects matching c-vectors and their remainder values.
#[derive(Debug)]
pub struct KeepCVectors {
    dimp: usize,
    cvectors: Vec<CElem>,
    ks: Vec<K>,
}

impl KeepCVectors {
    pub fn new(dim: Dim) -> Self {
        KeepCVectors {
            dimp: dim as usize + 1,
            cvectors: Vec::new(),
            ks: Vec::new(),
        }
    }

    /// Number of collected matches.
    pub fn len(&self) -> usize {
        self.ks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ks.is_empty()
    }

    /// The i-th collected c-vector.
    pub fn cvector(&self, i: usize) -> &[CElem] {
        &self.cvectors[i * self.dimp..(i + 1) * self.dimp]
    }

    pub fn remainders(&self) -> &[K] {
        &self.ks
    }
}

impl ProbeCallback for KeepCVectors {
    const NEED_CVECTOR: bool = true;
    const NEED_HASH: bool = false;
    const NEED_POINT: bool = false;

    fn on_match(&mut self, _hash_code: HashCode, k: K, c: &[CElem], _point: &[VElem]) -> Result<()> {
        self.cvectors.extend_from_slice(c);
        self.ks.push(k);
        Ok(())
    }
}

/// Collects hash codes together with c-vectors and remainders.
#[derive(Debug)]
pub struct KeepProbes {
    dimp: usize,
    hashes: Vec<HashCode>,
    cvectors: Vec<CElem>,
    ks: Vec<K>,
}

impl KeepProbes {
    pub fn new(dim: Dim) -> Self {
        KeepProbes {
            dimp: dim as usize + 1,
            hashes: Vec::new(),
            cvectors: Vec::new(),
            ks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn hashes(&self) -> &[HashCode] {
        &self.hashes
    }

    pub fn cvector(&self, i: usize) -> &[CElem] {
        &self.cvectors[i * self.dimp..(i + 1) * self.dimp]
    }

    pub fn remainders(&self) -> &[K] {
        &self.ks
    }
}

impl ProbeCallback for KeepProbes {
    const NEED_CVECTOR: bool = true;
    const NEED_HASH: bool = true;
    const NEED_POINT: bool = false;

    fn on_match(&mut self, hash_code: HashCode, k: K, c: &[CElem], _point: &[VElem]) -> Result<()> {
        self.hashes.push(hash_code);
        self.cvectors.extend_from_slice(c);
        self.ks.push(k);
        Ok(())
    }
}

/// Collects lattice point coordinates in the representation space.
#[derive(Debug)]
pub struct KeepPoints {
    dimp: usize,
    points: Vec<VElem>,
}

impl KeepPoints {
    pub fn new(dim: Dim) -> Self {
        KeepPoints {
            dimp: dim as usize + 1,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len() / self.dimp
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, i: usize) -> &[VElem] {
        &self.points[i * self.dimp..(i + 1) * self.dimp]
    }
}

impl ProbeCallback for KeepPoints {
    const NEED_CVECTOR: bool = false;
    const NEED_HASH: bool = false;
    const NEED_POINT: bool = true;

    fn on_match(&mut self, _hash_code: HashCode, _k: K, _c: &[CElem], point: &[VElem]) -> Result<()> {
        self.points.extend_from_slice(point);
        Ok(())
    }
}
