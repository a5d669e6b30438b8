//! The query engine.
//!
//! [`AstarLsh`] binds the lattice kernel, the hash kernel and the
//! precompiled probe stream into the three query surfaces:
//!
//! - [`nearest`](AstarLsh::nearest): the single lattice point whose
//!   Voronoi cell contains the query,
//! - [`delaunay`](AstarLsh::delaunay): the n+1 vertices of the Delaunay
//!   simplex containing the query,
//! - [`extended`](AstarLsh::extended): every lattice point of the first
//!   `num_shells + 1` shells around the hole nearest the query.
//!
//! Construction does all the heavy lifting (probe generation and diff
//! stream compilation); queries allocate only a small scratch arena and
//! run branch-free per-shape inner loops.

mod callback;
mod walk;

pub use callback::{KeepCVectors, KeepHashes, KeepPoints, KeepProbes, ProbeCallback};

use crate::error::{AstarError, Result};
use crate::hash::RadixPowers;
use crate::lattice;
use crate::probes;
use crate::types::{Dim, Distance, HashCode, NumShells, Order, VElem};

/// A* lattice hasher with multi-probe queries.
///
/// An engine is created for a fixed `(dim, packing_radius, num_shells)`
/// configuration and is immutable afterwards: the probe diff stream and
/// the hash power table are precomputed once. Queries take `&self` and
/// are safe to issue from multiple threads concurrently.
///
/// # Example
///
/// ```
/// use astral::{AstarLsh, KeepHashes};
///
/// # fn main() -> astral::Result<()> {
/// let lsh = AstarLsh::new(2, 1.0, 1)?;
/// assert_eq!(lsh.num_probes(), 6);
///
/// let mut buckets = KeepHashes::new();
/// lsh.extended(&[10.1, -0.2], &mut buckets)?;
/// assert_eq!(buckets.hashes().len(), 6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AstarLsh {
    dim: Dim,
    packing_radius: Distance,
    num_shells: NumShells,
    scale: Distance,
    num_probes: usize,
    stream: Vec<Order>,
    powers: RadixPowers,
}

impl AstarLsh {
    /// Build an engine for `dim`-dimensional queries on an A* lattice
    /// with the given packing radius, probing `num_shells` extended
    /// shells.
    ///
    /// Fails with `InvalidDim`, `InvalidPackingRadius` or
    /// `InvalidNumShells` on out-of-range parameters, and `MemFail` if
    /// the probe precomputation cannot allocate.
    pub fn new(dim: Dim, packing_radius: Distance, num_shells: NumShells) -> Result<Self> {
        if dim == 0 || dim as usize + 1 >= Order::MAX as usize {
            return Err(AstarError::InvalidDim);
        }
        if num_shells > probes::MAX_NUM_SHELLS {
            return Err(AstarError::InvalidNumShells {
                max: probes::MAX_NUM_SHELLS,
            });
        }
        if !(packing_radius > 0.0) || !packing_radius.is_finite() {
            return Err(AstarError::InvalidPackingRadius);
        }

        let scale = lattice::rho(dim) / packing_radius;
        let num_probes = probes::num_probes(dim, num_shells)?;

        let probe_array = probes::generate_probes(dim, num_shells)?;
        let expected = probes::size_probe_stream(dim, num_probes, &probe_array);
        let stream = probes::generate_probe_diffs(dim, num_probes, &probe_array)?;
        if stream.len() != expected {
            return Err(AstarError::Unknown);
        }

        Ok(AstarLsh {
            dim,
            packing_radius,
            num_shells,
            scale,
            num_probes,
            stream,
            powers: RadixPowers::new(dim)?,
        })
    }

    /// Dimensionality of query vectors.
    pub fn dim(&self) -> Dim {
        self.dim
    }

    /// The packing radius the engine was configured with.
    pub fn packing_radius(&self) -> Distance {
        self.packing_radius
    }

    /// Internal scaling between the configured packing radius and the
    /// lattice's native one.
    pub fn scale(&self) -> Distance {
        self.scale
    }

    /// Number of extended shells probed by [`extended`](Self::extended).
    pub fn num_shells(&self) -> NumShells {
        self.num_shells
    }

    /// Number of probes visited by [`extended`](Self::extended).
    pub fn num_probes(&self) -> usize {
        self.num_probes
    }

    /// Call `callback` exactly once with the lattice point nearest to
    /// `vector`.
    pub fn nearest<C: ProbeCallback>(&self, vector: &[VElem], callback: &mut C) -> Result<()> {
        self.check_vector(vector)?;
        walk::nearest(self.dim, self.scale, vector, callback)
    }

    /// Call `callback` for each of the n+1 vertices of the Delaunay cell
    /// containing `vector`, in remainder order 0..=n.
    pub fn delaunay<C: ProbeCallback>(&self, vector: &[VElem], callback: &mut C) -> Result<()> {
        self.check_vector(vector)?;
        walk::delaunay(self.dim, self.scale, vector, callback)
    }

    /// Call `callback` for each lattice point in the extended shells
    /// around the hole nearest to `vector`, exactly
    /// [`num_probes`](Self::num_probes) times.
    pub fn extended<C: ProbeCallback>(&self, vector: &[VElem], callback: &mut C) -> Result<()> {
        self.check_vector(vector)?;
        walk::extended(
            self.dim,
            self.scale,
            &self.stream,
            &self.powers,
            vector,
            callback,
        )
    }

    /// Hash code of the lattice point nearest to `vector`.
    pub fn nearest_hash(&self, vector: &[VElem]) -> Result<HashCode> {
        let mut keep = KeepHashes::with_capacity(1);
        self.nearest(vector, &mut keep)?;
        keep.into_hashes().pop().ok_or(AstarError::Unknown)
    }

    fn check_vector(&self, vector: &[VElem]) -> Result<()> {
        if vector.len() != self.dim as usize {
            return Err(AstarError::InvalidDim);
        }
        Ok(())
    }
}
