//! Differential encoding of the probe sequence.
//!
//! The extended query visits every probe of every shell, but materializing
//! each probe's c-vector would cost O(n) per probe. Consecutive probes
//! differ in only a few coordinates once every second orbit is reversed,
//! so the whole sequence compiles into a stream of per-probe instructions:
//!
//! ```text
//! | k | C- .. | MARK | C+ .. | MARK |
//! ```
//!
//! where `k` is the probe's remainder value, each `C-`/`C+` entry is a
//! column (in residual-order space) to decrement/increment by one, and
//! `MARK` terminates each list. Probe 0 is not represented; the walk
//! starts from the Delaunay origin it computes directly.

use smallvec::SmallVec;

use crate::error::{AstarError, Result};
use crate::types::{CElem, Dim, Order};

/// Sentinel terminating the decrement and increment lists of each probe's
/// stream segment. Reserved: no valid column index reaches it.
pub const STREAM_MARK: Order = Order::MAX;

/// Map a walk position to its probe index in the generated array,
/// reversing every second orbit.
///
/// Adjacent orbits meet nose-to-tail under this order, which keeps the
/// coordinate diffs between consecutive walk positions small.
fn flip_index(i: usize, dimp: usize, dimp2: usize) -> usize {
    let j = i % dimp2;
    if j < dimp {
        i
    } else {
        i + dimp2 + dimp - 1 - j - j
    }
}

/// Remainder value of the probe at walk position `i`.
fn walk_remainder(i: usize, dim: usize, dimp: usize, dimp2: usize) -> Order {
    if i % dimp2 < dimp {
        (i % dimp) as Order
    } else {
        (dim - i % dimp) as Order
    }
}

/// Stream length needed to encode `probes`: a dry run of
/// [`generate_probe_diffs`].
pub fn size_probe_stream(dim: Dim, num_probes: usize, probes: &[CElem]) -> usize {
    let dimp = dim as usize + 1;
    let dimp2 = dimp * 2;

    // Every probe after the first contributes its remainder entry and two
    // marks; the rest is one entry per unit of coordinate change.
    let mut size = 3 * (num_probes - 1);
    for i in 1..num_probes {
        let s = flip_index(i - 1, dimp, dimp2) * dimp;
        let t = flip_index(i, dimp, dimp2) * dimp;
        for d in 0..dimp {
            size += (probes[t + d] - probes[s + d]).unsigned_abs() as usize;
        }
    }
    size
}

/// Compile `probes` (orbits concatenated in shell order, k-ascending
/// within each orbit) into the differential instruction stream.
pub fn generate_probe_diffs(dim: Dim, num_probes: usize, probes: &[CElem]) -> Result<Vec<Order>> {
    let dim = dim as usize;
    let dimp = dim + 1;
    let dimp2 = dimp * 2;

    let mut stream: Vec<Order> = Vec::new();
    stream
        .try_reserve_exact(size_probe_stream(dim as Dim, num_probes, probes))
        .map_err(|_| AstarError::MemFail)?;

    // Positive columns are stacked here until the negative list is
    // terminated, since the stream writes all decrements first.
    let mut pos_cols: SmallVec<[Order; 64]> = SmallVec::new();

    for i in 1..num_probes {
        let s = flip_index(i - 1, dimp, dimp2) * dimp;
        let t = flip_index(i, dimp, dimp2) * dimp;

        stream.push(walk_remainder(i, dim, dimp, dimp2));

        pos_cols.clear();
        for d in 0..dimp {
            let diff = probes[t + d] - probes[s + d];
            if diff < 0 {
                for _ in 0..diff.unsigned_abs() {
                    stream.push(d as Order);
                }
            } else {
                for _ in 0..diff {
                    pos_cols.push(d as Order);
                }
            }
        }
        stream.push(STREAM_MARK);
        stream.extend_from_slice(&pos_cols);
        stream.push(STREAM_MARK);
    }

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_reverses_every_second_orbit() {
        // dim = 2: orbits of 3, walk positions 0..12 over 4 orbits.
        let dimp = 3;
        let dimp2 = 6;
        let walked: Vec<usize> = (0..12).map(|i| flip_index(i, dimp, dimp2)).collect();
        assert_eq!(walked, vec![0, 1, 2, 5, 4, 3, 6, 7, 8, 11, 10, 9]);
    }

    #[test]
    fn test_flip_is_an_involution_on_positions() {
        let dimp = 5;
        let dimp2 = 10;
        for i in 0..200 {
            let f = flip_index(i, dimp, dimp2);
            assert_eq!(flip_index(f, dimp, dimp2), i, "position {i}");
        }
    }

    #[test]
    fn test_walk_remainders_cycle_up_then_down() {
        // dim = 3: ascending 0..=3 in even orbits, descending in odd.
        let got: Vec<Order> = (0..16).map(|i| walk_remainder(i, 3, 4, 8)).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn test_stream_reconstructs_probes() {
        // A hand-built probe array for dim = 1 (dimp = 2), remainder
        // values consistent with the walk positions.
        // Walk order: 0, 1, then the second orbit reversed: 3, 2.
        let probes: &[CElem] = &[
            0, 0, // probe 0, k=0
            -1, 0, // probe 1, k=1
            1, -1, // probe 2, k=0
            0, -1, // probe 3, k=1
        ];
        let stream = generate_probe_diffs(1, 4, probes).unwrap();
        assert_eq!(stream.len(), size_probe_stream(1, 4, probes));

        // Replay the stream from probe 0.
        let mut c = vec![0 as CElem, 0];
        let mut reconstructed = vec![c.clone()];
        let mut ks = vec![0 as Order];
        let mut pos = 0;
        while pos < stream.len() {
            ks.push(stream[pos]);
            pos += 1;
            loop {
                let col = stream[pos];
                pos += 1;
                if col == STREAM_MARK {
                    break;
                }
                c[col as usize] -= 1;
            }
            loop {
                let col = stream[pos];
                pos += 1;
                if col == STREAM_MARK {
                    break;
                }
                c[col as usize] += 1;
            }
            reconstructed.push(c.clone());
        }

        assert_eq!(ks, vec![0, 1, 1, 0]);
        assert_eq!(
            reconstructed,
            vec![vec![0, 0], vec![-1, 0], vec![0, -1], vec![1, -1]]
        );
    }
}
