//! Closest lattice point search.

use crate::arena::ArenaStack;
use crate::error::Result;
use crate::lattice::round_up;
use crate::types::{CElem, K, Order, VElem};

/// Sentinel terminating a bucket chain.
const END: Order = Order::MAX;

/// Find the A* lattice point whose Voronoi cell contains `v`.
///
/// `v` must already be in the lattice representation space (length n+1,
/// zero coordinate sum). The point's c-vector is written to `c` and its
/// remainder value returned.
///
/// This is a variation on Algorithm 2 of McKilliam, Clarkson, Smith &
/// Quinn (2008). Rounding `v / (n+1)` per coordinate gives a first guess
/// on the superlattice Z^(n+1); the residuals `z` are then bucket-sorted
/// by value and bucket prefixes are evaluated incrementally to find the
/// rank cut whose rounding adjustment minimizes the distance functional
/// `beta * (n+1) - alpha^2`. Runs in O(n) plus the bucketing pass, using
/// three scratch slots.
pub fn closest_point(v: &[VElem], c: &mut [CElem], stack: &mut ArenaStack<'_>) -> Result<K> {
    let dimp = v.len();
    let dim = dimp - 1;
    let dimpd = dimp as f64;

    let z = stack.take::<VElem>()?;
    let link = stack.take::<Order>()?;
    let bucket = stack.take::<Order>()?;
    bucket[..dimp].fill(END);

    let mut sum: i64 = 0;
    let mut alpha = 0.0;
    let mut beta = 0.0;

    for i in 0..dimp {
        let y_i = v[i] / dimpd;
        let y_round = round_up(y_i);
        let z_i = y_i - y_round as f64; // -0.5 <= z_i < 0.5

        sum += y_round as i64;
        c[i] = y_round;
        z[i] = z_i;
        alpha += z_i;
        beta += z_i * z_i;

        // Bucket index by rank group; the truncation is a floor since
        // z_i + 0.5 is in [0, 1).
        let b = dim - (dimpd * (z_i + 0.5)) as usize;
        link[i] = bucket[b];
        bucket[b] = i as Order;
    }

    let mut best = beta * dimpd - alpha * alpha;
    let mut cut: Option<usize> = None;

    // Walk buckets in descending-z order, moving one rank group at a time
    // from "round down" to "round up" and tracking the best cut.
    for b in 0..dimp {
        let mut t = bucket[b];
        if t == END {
            continue;
        }
        while t != END {
            alpha -= 1.0;
            beta = beta - 2.0 * z[t as usize] + 1.0;
            t = link[t as usize];
        }
        let d = beta * dimpd - alpha * alpha;
        if d < best {
            best = d;
            cut = Some(b);
        }
    }

    // Apply the winning prefix of adjustments, if any bucket beat the
    // unadjusted rounding.
    if let Some(cut) = cut {
        for b in 0..=cut {
            let mut t = bucket[b];
            while t != END {
                c[t as usize] += 1;
                sum += 1;
                t = link[t as usize];
            }
        }
    }

    // Convert the superlattice coordinates into c-vector form.
    let dimp_i = dimp as i64;
    let k = ((-sum % dimp_i) + dimp_i) % dimp_i;
    let s_k = ((sum + k) / dimp_i) as CElem;
    for ci in c[..dimp].iter_mut() {
        *ci -= s_k;
    }

    Ok(k as K)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::lattice::{cvector_to_point, remainder_of, to_lattice_space};

    fn run(dim: usize, mapped: &[VElem]) -> (K, Vec<CElem>) {
        let mut arena = Arena::new(dim as u32, 4).unwrap();
        let mut stack = arena.stack();
        let mut c = vec![0; dim + 1];
        let k = closest_point(mapped, &mut c, &mut stack).unwrap();
        (k, c)
    }

    /// Sheet coordinates a c-vector resolves against:
    /// `(n+1)*c[i] + k`. [`cvector_to_point`] returns these negated.
    fn embed(c: &[CElem]) -> Vec<VElem> {
        let k = remainder_of(c);
        let dimp = c.len() as CElem;
        c.iter().map(|&ci| (ci * dimp + k) as VElem).collect()
    }

    #[test]
    fn test_origin_maps_to_origin() {
        let (k, c) = run(3, &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(k, 0);
        assert_eq!(c, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_returned_remainder_matches_cvector() {
        let v = [0.3, -1.7, 2.2, 0.9];
        let mut mapped = [0.0; 5];
        to_lattice_space(1.0, &v, &mut mapped);
        let (k, c) = run(4, &mapped);
        assert_eq!(k, remainder_of(&c));
    }

    #[test]
    fn test_exact_lattice_point_is_its_own_nearest() {
        let c_in = [1, -2, 0, 1];
        let (k, c) = run(3, &embed(&c_in));
        assert_eq!(c, c_in.to_vec());
        assert_eq!(k, remainder_of(&c_in));
    }

    #[test]
    fn test_point_output_is_the_reflected_embedding() {
        let c_in = [1, -2, 0, 1];
        let mut p = [0.0; 4];
        cvector_to_point(&c_in, &mut p);
        let l = embed(&c_in);
        for (a, b) in p.iter().zip(&l) {
            assert_eq!(*a, -b);
        }
    }

    #[test]
    fn test_nearby_queries_snap_to_same_point() {
        let c_in = [0, 1, -1];
        let l = embed(&c_in);
        // Perturb within the Voronoi cell; packing radius of A*_2 in
        // native units is sqrt(6)/2, so 0.1 is safely interior.
        let jittered = [l[0] + 0.1, l[1] - 0.07, l[2] - 0.03];
        let (_, c) = run(2, &jittered);
        assert_eq!(c, c_in.to_vec());
    }
}
