//! astral: A* lattice locality-sensitive hashing.
//!
//! Hashes real-valued vectors to buckets defined by the A* lattice, the
//! dual of the root lattice A_n and the best lattice quantizer known for
//! small dimensions. Three query surfaces answer three geometric
//! questions about a vector:
//!
//! - **Nearest** ([`AstarLsh::nearest`]): which lattice point's Voronoi
//!   cell contains it,
//! - **Delaunay** ([`AstarLsh::delaunay`]): which n+1 lattice points span
//!   the Delaunay simplex around it,
//! - **Extended** ([`AstarLsh::extended`]): which lattice points lie in
//!   the first `num_shells + 1` shells around its nearest lattice hole,
//!   the multi-probe sequence for high-recall lookups.
//!
//! Each visited lattice point is identified by a compact integer
//! c-vector and a 64-bit hash code suitable as a hash map key.
//! [`AstarIndex`] is a ready-made inverted index on those keys.
//!
//! # Quick Start
//!
//! ```
//! use astral::{AstarIndex, KeepElems};
//!
//! # fn main() -> astral::Result<()> {
//! // 4-dimensional vectors, unit packing radius, 2 extended shells.
//! let mut index: AstarIndex<u32> = AstarIndex::new(4, 1.0, 2)?;
//!
//! index.put(&[0.9, 0.0, -0.3, 0.2], 1)?;
//! index.put(&[-40.0, 25.0, 0.0, 10.0], 2)?;
//!
//! // Multi-probe lookup: fans out over nearby lattice buckets.
//! let mut found = KeepElems::new();
//! index.get_extended(&[0.9, 0.0, -0.3, 0.2], &mut found)?;
//! assert_eq!(found.elems(), &[1]);
//! # Ok(())
//! # }
//! ```
//!
//! # How It Works
//!
//! A query vector is lifted onto the hyperplane `sum(x) = 0` in R^(n+1)
//! where the lattice lives. The closest-point and Delaunay-cell
//! computations are integer algorithms running in O(n) to O(n log n)
//! time. The extended probe sequence is precompiled at engine
//! construction into a differential instruction stream, so a multi-probe
//! query maintains one rolling c-vector and one rolling hash code with a
//! few adds per probe, regardless of how many shells it spans.
//!
//! Callbacks choose how much per-match data they want
//! ([`ProbeCallback`]'s shape consts); queries are monomorphized so
//! unrequested work is compiled out, not skipped at runtime.
//!
//! # References
//!
//! - McKilliam, Clarkson, Smith & Quinn (2008): "Linear-time nearest
//!   point algorithms for Coxeter lattices"
//! - Lv et al. (2007): "Multi-probe LSH: efficient indexing for
//!   high-dimensional similarity search"
//! - Conway & Sloane: "Sphere Packings, Lattices and Groups"

pub mod arena;
pub mod engine;
pub mod hash;
pub mod index;
pub mod lattice;
pub mod probes;

mod error;
mod types;

pub use engine::{AstarLsh, KeepCVectors, KeepHashes, KeepPoints, KeepProbes, ProbeCallback};
pub use error::{AstarError, Result};
pub use index::{AstarIndex, IndexCallback, KeepElems};
pub use probes::MAX_NUM_SHELLS;
pub use types::{CElem, Dim, Distance, HashCode, K, NumShells, Order, VElem};
