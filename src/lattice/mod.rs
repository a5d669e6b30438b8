//! A* lattice geometry.
//!
//! The A* lattice in n dimensions is the dual of the root lattice A_n.
//! Its points live on the hyperplane `sum(x) = 0` in R^(n+1), so callers'
//! n-vectors are first lifted into that representation space
//! ([`to_lattice_space`]) and results are projected back
//! ([`from_lattice_space`]).
//!
//! Inside the representation space a lattice point is identified by its
//! c-vector: an (n+1)-vector of integers c with remainder
//! `k = (-sum(c)) mod (n+1)` and coordinates `p[i] = -((n+1)*c[i] + k)`.
//! The two geometric primitives are [`closest_point`] (which Voronoi cell
//! contains a vector) and [`delaunay_origin`] (the remainder-0 vertex of
//! the Delaunay simplex containing it, plus the residual sort order that
//! generates the remaining vertices).
//!
//! # References
//!
//! - McKilliam, Clarkson, Smith & Quinn (2008): "Linear-time nearest
//!   point algorithms for Coxeter lattices"
//! - Conway & Sloane: "Sphere Packings, Lattices and Groups", ch. 4

mod closest;
mod delaunay;
mod sort;

pub use closest::closest_point;
pub use delaunay::delaunay_origin;
pub(crate) use sort::sort_order;

use crate::types::{CElem, Dim, Distance, K, VElem};

/// Native packing radius of the n-dimensional A* lattice:
/// `sqrt(n * (n + 1)) / 2`.
///
/// An engine built with a user packing radius `r` rescales vectors by
/// `rho(n) / r` on the way in.
pub fn rho(dim: Dim) -> Distance {
    (dim as f64 * (dim as f64 + 1.0)).sqrt() / 2.0
}

/// Round half-up to an integer: `floor(x + 0.5)`.
///
/// Exact half-integers round toward positive infinity, including the
/// negative ones (`round_up(-2.5) == -2`). The float path is branch-free;
/// the comparison fixes truncation-toward-zero for negative inputs.
pub(crate) fn round_up(x: f64) -> CElem {
    let y = x + 0.5;
    let mut i = y as CElem;
    i -= (y < i as f64) as CElem;
    i
}

/// Lift an n-vector into the (n+1)-dimensional lattice representation
/// space, applying `scale`.
///
/// The output lies on the hyperplane `sum(x) = 0`.
pub fn to_lattice_space(scale: Distance, v_in: &[VElem], v_out: &mut [VElem]) {
    let dim = v_in.len();
    debug_assert_eq!(v_out.len(), dim + 1);

    let sum: f64 = v_in.iter().sum();
    // The norm of the all-ones (n+1)-vector.
    let norm = (dim as f64 + 1.0).sqrt();
    let v_n = -sum / norm;
    let t = (v_n + sum) / dim as f64;

    for (out, &x) in v_out[..dim].iter_mut().zip(v_in) {
        *out = scale * (x - t);
    }
    v_out[dim] = scale * v_n;
}

/// Project an (n+1)-vector from the lattice representation space back to
/// the caller's n-dimensional space, undoing `scale`.
///
/// Inverse of [`to_lattice_space`].
pub fn from_lattice_space(scale: Distance, v_in: &[VElem], v_out: &mut [VElem]) {
    let dim = v_out.len();
    debug_assert_eq!(v_in.len(), dim + 1);

    let norm = (dim as f64 + 1.0).sqrt();
    let t = v_in[dim] * (norm - dim as f64 - 1.0) / dim as f64 / norm;

    for (out, &x) in v_out.iter_mut().zip(&v_in[..dim]) {
        *out = (x + t) / scale;
    }
}

/// Representation-space coordinates of the lattice point identified by
/// `(c, k)`: `p[i] = -((n+1)*c[i] + k)`.
pub fn cvector_k_to_point(c: &[CElem], k: K, v_out: &mut [VElem]) {
    debug_assert_eq!(c.len(), v_out.len());
    let dimp = c.len() as CElem;
    for (out, &ci) in v_out.iter_mut().zip(c) {
        *out = -((ci * dimp + k) as VElem);
    }
}

/// Representation-space coordinates of the lattice point identified by
/// `c`, deriving the remainder `k = (-sum(c)) mod (n+1)`.
pub fn cvector_to_point(c: &[CElem], v_out: &mut [VElem]) {
    let k = remainder_of(c);
    cvector_k_to_point(c, k, v_out);
}

/// The remainder value of a c-vector, always in `0..=n`.
pub fn remainder_of(c: &[CElem]) -> K {
    let dimp = c.len() as i64;
    let sum: i64 = c.iter().map(|&ci| ci as i64).sum();
    (((-sum) % dimp + dimp) % dimp) as K
}
