//! Element types shared across the crate.
//!
//! The lattice code is deliberately explicit about integer widths: hash
//! codes rely on unsigned 64-bit modular arithmetic, c-vectors are signed
//! 32-bit, and permutation indices are kept at 16 bits to halve the
//! footprint of the precompiled probe stream.

/// Dimensionality of caller vectors, n. The lattice itself lives in n+1
/// coordinates.
pub type Dim = u32;

/// An index into dimensions, e.g. an element of a permutation of
/// {0, .., n}. Also the element type of the probe diff stream, where the
/// all-bits-set value is reserved as a sentinel.
pub type Order = u16;

/// Element type of real-valued vectors.
pub type VElem = f64;

/// Element type of the c-vector integer representation of lattice points.
pub type CElem = i32;

/// The remainder value, k, of a lattice point: `(-sum(c)) mod (n+1)`.
pub type K = i32;

/// Number of extended probe shells.
pub type NumShells = u32;

/// Hash code of a lattice point.
///
/// Must be unsigned: hash codes are computed modulo 2^64 and the wrap is
/// relied upon, so all arithmetic on them is `wrapping_*`.
pub type HashCode = u64;

/// Packing radius, scale factor or distance.
pub type Distance = f64;
