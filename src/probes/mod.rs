//! Multi-probe sequence generation.
//!
//! An extended query examines the lattice points of the first
//! `num_shells + 1` shells around the Delaunay cell containing the query.
//! Every shell decomposes into orbits of n+1 points that share a
//! c-vector up to cyclic rotation and differ only in remainder label, so
//! the generator enumerates one remainder-zero representative per orbit
//! ([`generate::generate_zero_probes`]) and fans each out into its full
//! orbit ([`generate_probes`]).
//!
//! The probe array exists only at engine construction: it is immediately
//! compiled into the differential instruction stream
//! ([`generate_probe_diffs`]) that extended queries replay.

mod cost_set;
mod generate;
mod point_set;
mod stream;
mod table;

pub use stream::{generate_probe_diffs, size_probe_stream, STREAM_MARK};

use crate::error::{AstarError, Result};
use crate::types::{CElem, Dim, NumShells};

use table::PROBES_F;

/// Highest supported number of extended shells, bounded by the
/// precomputed probe count table.
pub const MAX_NUM_SHELLS: NumShells = 30;

/// Number of remainder-zero probes (equivalently, orbits) in the first
/// `num_shells + 1` shells.
pub fn num_zero_probes(dim: Dim, num_shells: NumShells) -> Result<usize> {
    if num_shells > MAX_NUM_SHELLS {
        return Err(AstarError::InvalidNumShells {
            max: MAX_NUM_SHELLS,
        });
    }
    let r = (dim as usize).min(num_shells as usize);
    Ok(PROBES_F[r][num_shells as usize - r])
}

/// Total number of probes in the first `num_shells + 1` shells:
/// `(dim + 1) * num_zero_probes`.
pub fn num_probes(dim: Dim, num_shells: NumShells) -> Result<usize> {
    Ok((dim as usize + 1) * num_zero_probes(dim, num_shells)?)
}

/// Generate the probe array for extended queries.
///
/// The result holds `num_probes(dim, num_shells)` c-vectors of `dim + 1`
/// elements each, flattened. Probes are arranged in orbit blocks of
/// `dim + 1`: within a block the first probe is remainder-0 and the probe
/// at offset k is remainder-k, so `k = index % (dim + 1)` throughout.
/// Blocks are in shell order; the first probe is always the origin.
pub fn generate_probes(dim: Dim, num_shells: NumShells) -> Result<Vec<CElem>> {
    let expected = num_probes(dim, num_shells)?;
    let dim = dim as usize;
    let dimp = dim + 1;
    let total = expected * dimp;

    let mut probes: Vec<CElem> = Vec::new();
    probes
        .try_reserve_exact(total)
        .map_err(|_| AstarError::MemFail)?;

    generate::generate_zero_probes(dim as Dim, num_shells, |zero| {
        if probes.len() + dimp * dimp > total {
            // More orbits than the count table promised.
            return Err(AstarError::Unknown);
        }

        // The representative is the orbit's k = 0 member.
        probes.extend_from_slice(zero);

        // Remainder k is the previous member rotated right by one with
        // the first coordinate dropped one unit.
        for _ in 1..dimp {
            let prev = probes.len() - dimp;
            let first = probes[prev + dim] - 1;
            probes.push(first);
            for d in 0..dim {
                let x = probes[prev + d];
                probes.push(x);
            }
        }
        Ok(())
    })?;

    if probes.len() != total {
        // Fewer orbits than the count table promised.
        return Err(AstarError::Unknown);
    }
    Ok(probes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::remainder_of;

    #[test]
    fn test_num_zero_probes_reads_the_table() {
        // Shell zero alone: just the origin orbit.
        assert_eq!(num_zero_probes(3, 0).unwrap(), 1);
        // n >= k: count independent of n.
        assert_eq!(num_zero_probes(2, 2).unwrap(), 4);
        assert_eq!(num_zero_probes(5, 2).unwrap(), 4);
        assert_eq!(num_zero_probes(50, 2).unwrap(), 4);
        // n < k: column shifts by the excess.
        assert_eq!(num_zero_probes(1, 3).unwrap(), 4);
    }

    #[test]
    fn test_num_probes_known_answers() {
        // 2 orbits of 3 for one shell in the plane; 12 orbits of 33 for
        // four shells at dim 32.
        assert_eq!(num_probes(2, 1).unwrap(), 6);
        assert_eq!(num_probes(32, 4).unwrap(), 396);
    }

    #[test]
    fn test_shell_limit_enforced() {
        assert!(num_zero_probes(4, 30).is_ok());
        assert_eq!(
            num_zero_probes(4, 31).unwrap_err(),
            AstarError::InvalidNumShells { max: 30 }
        );
        assert!(num_probes(4, 31).is_err());
    }

    #[test]
    fn test_generated_count_matches_table() {
        for (dim, shells) in [(1u32, 3u32), (2, 2), (3, 2), (4, 1), (7, 1)] {
            let probes = generate_probes(dim, shells).unwrap();
            let dimp = dim as usize + 1;
            assert_eq!(
                probes.len(),
                num_probes(dim, shells).unwrap() * dimp,
                "dim {dim} shells {shells}"
            );
        }
    }

    #[test]
    fn test_orbit_blocks_carry_ascending_remainders() {
        let dim = 3u32;
        let dimp = 4;
        let probes = generate_probes(dim, 2).unwrap();
        for (i, probe) in probes.chunks_exact(dimp).enumerate() {
            assert_eq!(
                remainder_of(probe) as usize,
                i % dimp,
                "probe {i}: {probe:?}"
            );
        }
    }

    #[test]
    fn test_first_probe_is_the_origin() {
        let probes = generate_probes(5, 1).unwrap();
        assert!(probes[..6].iter().all(|&x| x == 0));
    }

    #[test]
    fn test_orbit_members_are_rotations() {
        let dim = 2u32;
        let dimp = 3;
        let probes = generate_probes(dim, 2).unwrap();
        for orbit in probes.chunks_exact(dimp * dimp) {
            for k in 1..dimp {
                let prev = &orbit[(k - 1) * dimp..k * dimp];
                let cur = &orbit[k * dimp..(k + 1) * dimp];
                assert_eq!(cur[0], prev[dimp - 1] - 1);
                assert_eq!(&cur[1..], &prev[..dimp - 1]);
            }
        }
    }
}
