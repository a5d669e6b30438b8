//! Shell-ordered enumeration of remainder-zero probes.

use std::collections::BinaryHeap;

use smallvec::SmallVec;

use crate::error::Result;
use crate::probes::cost_set::{Cost, CostSet};
use crate::probes::point_set::PointSet;
use crate::types::{CElem, Dim, NumShells};

/// Bound on remainder-zero probes per shell, sizing the duplicate set.
/// Extraordinarily large; no practical configuration approaches it.
const MAX_ZERO_PROBES_PER_SHELL: usize = 16 * 1024;

/// A candidate's c-vector, inline up to 16 coordinates.
type Code = SmallVec<[CElem; 16]>;

/// A probe candidate awaiting its turn in the cost-ordered queue.
struct Candidate {
    cost: Cost,
    code: Code,
    /// Move label this candidate was spawned from; successor generation
    /// resumes here so each unordered move pair is proposed once per
    /// ancestry chain.
    label: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; reverse to pop the cheapest shell
        // first.
        self.cost.cmp(&other.cost).reverse()
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Decompose a move label into its upper-triangular pair.
///
/// Labels enumerate ordered pairs row by row: label 0 -> (0,0), labels
/// 1,2 -> (1,0),(0,1), labels 3,4,5 -> (2,0),(1,1),(0,2), and so on.
/// The float estimate of the row index is followed by an exact integer
/// fix-up, so large labels cannot go wrong on an imprecise sqrt.
fn move_pair(label: usize) -> (usize, usize) {
    const ETA: f64 = 1e-5;
    let mut k = ((2.0 * label as f64 + 2.25).sqrt() - 1.5 - ETA).ceil() as usize;
    while (k + 1) * (k + 2) / 2 <= label {
        k += 1;
    }
    let row_last = k * (k + 3) / 2;
    let i = row_last - label;
    (i, k - i)
}

/// Enumerate every remainder-zero probe of the first `num_shells + 1`
/// shells in ascending cost order, passing each to `emit` exactly once.
///
/// A probe's cost is `sum_i (n+1)/2 * c[i]^2 - i * c[i]`, an integer
/// proportional to its squared distance from shell zero. Starting from
/// the origin, candidates are expanded by increment/decrement move pairs
/// through a cost-ordered queue. Two prunings keep the queue small: move
/// pairs that walk away from the origin octant are skipped, and successor
/// costs already outside the retained smallest-cost horizon are dropped
/// before they are enqueued.
pub(crate) fn generate_zero_probes(
    dim: Dim,
    num_shells: NumShells,
    mut emit: impl FnMut(&[CElem]) -> Result<()>,
) -> Result<()> {
    let dim = dim as usize;
    let dimp = dim + 1;

    let mut points = PointSet::new(dim as Dim, MAX_ZERO_PROBES_PER_SHELL)?;
    let mut seen_costs = CostSet::new(num_shells as usize + 1)?;
    let mut queue: BinaryHeap<Candidate> = BinaryHeap::new();
    let mut shells_to_go = num_shells as i64;

    seen_costs.push_unique_small(0);
    queue.push(Candidate {
        cost: 0,
        code: Code::from_elem(0, dimp),
        label: 0,
    });

    // Cost of the shell currently being drained; -1 makes the origin
    // register as the first shell boundary.
    let mut shell_cost: Cost = -1;

    while let Some(cand) = queue.pop() {
        if cand.cost > shell_cost {
            // First candidate of a new shell: prior shells can no longer
            // produce duplicates, so the set restarts empty.
            points.clear();
            shell_cost = cand.cost;
            shells_to_go -= 1;
            if shells_to_go < -1 {
                break;
            }
        }

        if !points.insert(&cand.code)? {
            continue;
        }
        emit(&cand.code)?;

        let label_max = dimp * dim;
        let label_swap = label_max / 2;
        for label in cand.label..label_max {
            // The second half of the label range mirrors the first, which
            // spreads the increment end and decrement end of the pairs
            // evenly across dimensions.
            let (inc, dec) = if label < label_swap {
                let (i, j) = move_pair(label);
                (dim - i, j)
            } else {
                let (i, j) = move_pair(label_max - 1 - label);
                (i, dim - j)
            };

            let c_inc = cand.code[inc];
            if c_inc < 0 {
                continue;
            }
            let c_dec = cand.code[dec];
            if c_dec > 0 {
                continue;
            }

            let new_cost = cand.cost
                + dimp as Cost * (c_inc as Cost - c_dec as Cost + 1)
                + dec as Cost
                - inc as Cost;

            if seen_costs.push_unique_small(new_cost) {
                let mut code = cand.code.clone();
                code[inc] += 1;
                code[dec] -= 1;
                queue.push(Candidate {
                    cost: new_cost,
                    code,
                    label,
                });
            }
        }
    }

    Ok(())
}

/// Cost of a remainder-zero probe, as used for shell ordering:
/// `(n+1)/2 * sum(c^2) - sum(i * c[i])`. The square sum is even whenever
/// the coordinate sum is zero, so the division is exact.
#[cfg(test)]
pub(crate) fn zero_probe_cost(c: &[CElem]) -> Cost {
    let dimp = c.len() as Cost;
    let sq: Cost = c.iter().map(|&ci| ci as Cost * ci as Cost).sum();
    let lin: Cost = c
        .iter()
        .enumerate()
        .map(|(i, &ci)| i as Cost * ci as Cost)
        .sum();
    dimp * sq / 2 - lin
}
