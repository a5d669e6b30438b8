//! Delaunay cell location.

use crate::arena::ArenaStack;
use crate::error::Result;
use crate::lattice::{round_up, sort_order};
use crate::types::{CElem, Order, VElem};

/// Find the remainder-0 vertex of the Delaunay simplex containing `v`.
///
/// `v` must be in the lattice representation space. On return `c` holds
/// the origin vertex's c-vector (with `sum(c) == 0`), `xmod` the
/// residuals `v[i] - c[i]*(n+1)` after adjustment, and `order` the
/// permutation sorting the residuals ascending. The walk from vertex
/// k-1 to vertex k is then a single decrement of `c[order[k-1]]`, which
/// is how the query engine emits the remaining n vertices.
///
/// Rounding `v / (n+1)` coordinate-wise gives a candidate c-vector whose
/// element sum `h` is generally nonzero. When it is, the `|h|` residuals
/// cheapest to move are shifted by one superlattice step (smallest
/// residuals downward for `h > 0`, largest upward for `h < 0`) and the
/// sorted permutation is rotated so it stays ascending over the adjusted
/// residuals.
pub fn delaunay_origin(
    v: &[VElem],
    xmod: &mut [VElem],
    c: &mut [CElem],
    order: &mut [Order],
    stack: &mut ArenaStack<'_>,
) -> Result<()> {
    let dimp = v.len();
    let dimpd = dimp as f64;

    let mut h: i64 = 0;
    for i in 0..dimp {
        let cx = round_up(v[i] / dimpd);
        c[i] = cx;
        xmod[i] = v[i] - cx as f64 * dimpd;
        h += cx as i64;
    }

    if h == 0 {
        for (i, o) in order.iter_mut().enumerate() {
            *o = i as Order;
        }
        sort_order(xmod, order);
        return Ok(());
    }

    let sortord = stack.take::<Order>()?;
    for (i, o) in sortord[..dimp].iter_mut().enumerate() {
        *o = i as Order;
    }
    sort_order(xmod, &mut sortord[..dimp]);

    if h > 0 {
        let h = h as usize;
        for &idx in &sortord[..h] {
            c[idx as usize] -= 1;
            xmod[idx as usize] += dimpd;
        }
        let part = dimp - h;
        order[..part].copy_from_slice(&sortord[h..dimp]);
        order[part..].copy_from_slice(&sortord[..h]);
    } else {
        let h = (-h) as usize;
        let part = dimp - h;
        for &idx in &sortord[part..dimp] {
            c[idx as usize] += 1;
            xmod[idx as usize] -= dimpd;
        }
        order[..h].copy_from_slice(&sortord[part..dimp]);
        order[h..].copy_from_slice(&sortord[..part]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::lattice::to_lattice_space;

    fn run_mapped(mapped: &[VElem]) -> (Vec<CElem>, Vec<VElem>, Vec<Order>) {
        let dim = mapped.len() - 1;
        let mut arena = Arena::new(dim as u32, 4).unwrap();
        let mut stack = arena.stack();
        let mut xmod = vec![0.0; dim + 1];
        let mut c = vec![0; dim + 1];
        let mut order = vec![0; dim + 1];
        delaunay_origin(mapped, &mut xmod, &mut c, &mut order, &mut stack).unwrap();
        (c, xmod, order)
    }

    fn run(dim: usize, v: &[VElem]) -> (Vec<CElem>, Vec<VElem>, Vec<Order>) {
        let mut mapped = vec![0.0; dim + 1];
        to_lattice_space(1.0, v, &mut mapped);
        run_mapped(&mapped)
    }

    fn check(out: &(Vec<CElem>, Vec<VElem>, Vec<Order>)) {
        let (c, xmod, order) = out;

        let sum: i64 = c.iter().map(|&x| x as i64).sum();
        assert_eq!(sum, 0, "origin vertex must be remainder-0");

        for w in order.windows(2) {
            assert!(
                xmod[w[0] as usize] <= xmod[w[1] as usize],
                "order {order:?} not ascending over residuals {xmod:?}"
            );
        }

        let mut seen = vec![false; c.len()];
        for &o in order.iter() {
            assert!(!seen[o as usize]);
            seen[o as usize] = true;
        }
    }

    #[test]
    fn test_origin_query() {
        let (c, _, _) = run(2, &[0.0, 0.0]);
        assert_eq!(c, vec![0, 0, 0]);
    }

    #[test]
    fn test_invariants_across_offsets() {
        check(&run(2, &[0.5, 0.5]));
        check(&run(2, &[-0.5, -0.5]));
        check(&run(3, &[1.9, 1.9, 1.9]));
        check(&run(3, &[-2.1, -1.9, -2.0]));
        check(&run(5, &[0.3, -4.6, 2.2, 0.0, 1.7]));
        check(&run(7, &[10.1, -0.2, 3.9, -7.4, 0.6, 2.2, -1.1]));
    }

    #[test]
    fn test_positive_h_rotation() {
        // Per-coordinate ratios (0.6, 0.6, 0.6, -1.8) round to
        // (1, 1, 1, -2), so h = 1 and the smallest residual is shifted.
        let mapped = [2.4, 2.4, 2.4, -7.2];
        let out = run_mapped(&mapped);
        check(&out);
        // Residuals start at (-1.6, -1.6, -1.6, 0.8); index 0 is first in
        // sorted order, absorbs the -1, and rotates to the tail.
        assert_eq!(out.0, vec![0, 1, 1, -2]);
        assert_eq!(out.2, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_negative_h_rotation() {
        // Ratios (0.4, 0.4, 0.4, -1.2) round to (0, 0, 0, -1), so h = -1
        // and the largest residual is shifted upward.
        let mapped = [1.6, 1.6, 1.6, -4.8];
        let out = run_mapped(&mapped);
        check(&out);
        assert_eq!(out.0.iter().sum::<CElem>(), 0);
        // The adjusted coordinate heads the rotated order.
        let adjusted = out.2[0] as usize;
        assert_eq!(out.0[adjusted], 1);
    }

    #[test]
    fn test_nonzero_h_needs_a_scratch_slot() {
        use crate::AstarError;
        let mapped = [2.4, 2.4, 2.4, -7.2];
        let mut arena = Arena::new(3, 1).unwrap();
        let mut stack = arena.stack();
        // Drain the only slot so the rotation path has nothing to borrow.
        stack.take::<Order>().unwrap();
        let mut xmod = vec![0.0; 4];
        let mut c = vec![0; 4];
        let mut order = vec![0; 4];
        assert_eq!(
            delaunay_origin(&mapped, &mut xmod, &mut c, &mut order, &mut stack).unwrap_err(),
            AstarError::InsufficientBuffers
        );
    }
}
