//! Polynomial hashing of c-vectors.
//!
//! A lattice point's bucket key is `H(c) = sum_i c[i] * RADIX^i mod 2^64`.
//! The wrap is deliberate: hash codes live in the full 64-bit ring, so
//! incrementing a single c-coordinate shifts the code by exactly one
//! power of RADIX. The extended query exploits this to maintain a rolling
//! hash across probes with one add or subtract per changed coordinate.
//!
//! Negative c-coordinates enter the sum as their two's-complement 64-bit
//! value; the per-coordinate hash delta is then the same for increments
//! from -1 to 0 as from 3 to 4.

use crate::error::{AstarError, Result};
use crate::types::{CElem, Dim, HashCode, Order};

/// Base of the polynomial hash.
pub const RADIX: HashCode = 31;

/// Hash a c-vector.
pub fn hash(c: &[CElem]) -> HashCode {
    let mut code: HashCode = 0;
    let mut mul: HashCode = 1;
    for &ci in c {
        code = code.wrapping_add((ci as i64 as u64).wrapping_mul(mul));
        mul = mul.wrapping_mul(RADIX);
    }
    code
}

/// Cache of `RADIX^0 ..= RADIX^dim` in 64-bit modular arithmetic.
///
/// Owned by the engine and grown to its dimensionality at construction,
/// so queries read it through `&self` with no synchronization.
#[derive(Debug)]
pub struct RadixPowers {
    pow: Vec<HashCode>,
}

impl RadixPowers {
    /// Build a power table covering dimensionality `dim`.
    pub fn new(dim: Dim) -> Result<Self> {
        let mut powers = RadixPowers { pow: Vec::new() };
        powers.grow(dim)?;
        Ok(powers)
    }

    /// Extend the table to cover dimensionality `dim`. Never shrinks.
    pub fn grow(&mut self, dim: Dim) -> Result<()> {
        let want = dim as usize + 1;
        if self.pow.len() >= want {
            return Ok(());
        }
        self.pow
            .try_reserve(want - self.pow.len())
            .map_err(|_| AstarError::MemFail)?;
        if self.pow.is_empty() {
            self.pow.push(1);
        }
        while self.pow.len() < want {
            let last = self.pow[self.pow.len() - 1];
            self.pow.push(last.wrapping_mul(RADIX));
        }
        Ok(())
    }

    /// The powers `RADIX^0 ..= RADIX^dim` in index order.
    ///
    /// The table must already cover `dim` (the engine grows it at
    /// construction).
    pub fn powers(&self, dim: Dim) -> &[HashCode] {
        &self.pow[..=dim as usize]
    }

    /// Write `RADIX^order[i]` into `out[i]` for a permutation `order` of
    /// {0, .., dim}.
    ///
    /// The extended walk updates its rolling hash per permuted column, so
    /// with this table a column increment is `hash += ordered[col]`.
    pub fn ordered(&self, order: &[Order], out: &mut [HashCode]) {
        debug_assert_eq!(order.len(), out.len());
        for (slot, &o) in out.iter_mut().zip(order) {
            *slot = self.pow[o as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_zero_vector_is_zero() {
        assert_eq!(hash(&[0, 0, 0]), 0);
    }

    #[test]
    fn test_hash_is_polynomial_in_radix() {
        // 2 + 3*31 + 5*31^2 = 4900
        assert_eq!(hash(&[2, 3, 5]), 4900);
    }

    #[test]
    fn test_hash_negative_wraps() {
        // -1 enters as 2^64 - 1.
        assert_eq!(hash(&[-1]), u64::MAX);
        // A (-1, +1) pair at adjacent coordinates: -1 + 31 = 30.
        assert_eq!(hash(&[-1, 1]), 30);
    }

    #[test]
    fn test_increment_shifts_by_power() {
        let powers = RadixPowers::new(7).unwrap();
        let c = [4, -2, 0, 9, -11, 3, 1, 0];
        for d in 0..c.len() {
            let mut bumped = c;
            bumped[d] += 1;
            assert_eq!(
                hash(&bumped).wrapping_sub(hash(&c)),
                powers.powers(7)[d],
                "coordinate {d}"
            );
        }
    }

    #[test]
    fn test_ordered_powers_permute() {
        let powers = RadixPowers::new(3).unwrap();
        let order: [Order; 4] = [2, 0, 3, 1];
        let mut out = [0u64; 4];
        powers.ordered(&order, &mut out);
        assert_eq!(out, [961, 1, 29791, 31]);
    }

    #[test]
    fn test_grow_is_monotone() {
        let mut powers = RadixPowers::new(2).unwrap();
        let r2 = powers.powers(2)[2];
        powers.grow(10).unwrap();
        assert_eq!(powers.powers(10)[2], r2);
        assert_eq!(powers.powers(10).len(), 11);
        powers.grow(4).unwrap();
        assert_eq!(powers.powers(10).len(), 11);
    }
}
