//! Shape-specialized query walks.
//!
//! Each walk is generic over the callback shape, so the compiler emits a
//! dedicated body per shape with the `C::NEED_*` branches resolved. The
//! extended walk in particular is a tight two-state loop over the probe
//! diff stream with one add/subtract per changed coordinate.

use crate::arena::Arena;
use crate::engine::callback::ProbeCallback;
use crate::error::Result;
use crate::hash::{self, RadixPowers};
use crate::lattice::{self, closest_point, delaunay_origin};
use crate::probes::STREAM_MARK;
use crate::types::{CElem, Dim, Distance, HashCode, K, Order, VElem};

/// Deliver one match, deriving the point coordinates when the shape wants
/// them and withholding the c-vector when it does not.
fn emit<C: ProbeCallback>(
    callback: &mut C,
    hash_code: HashCode,
    k: K,
    c: &[CElem],
    point_buf: &mut [VElem],
) -> Result<()> {
    let c_out: &[CElem] = if C::NEED_CVECTOR { c } else { &[] };
    if C::NEED_POINT {
        lattice::cvector_k_to_point(c, k, point_buf);
        callback.on_match(hash_code, k, c_out, point_buf)
    } else {
        callback.on_match(hash_code, k, c_out, &[])
    }
}

/// Slots needed by a nearest-point query.
pub(crate) const NEAREST_SLOTS: usize = 6;

/// Call `callback` once with the lattice point nearest to `vector`.
pub(crate) fn nearest<C: ProbeCallback>(
    dim: Dim,
    scale: Distance,
    vector: &[VElem],
    callback: &mut C,
) -> Result<()> {
    let mut arena = Arena::new(dim, NEAREST_SLOTS)?;
    let mut stack = arena.stack();

    let point_buf: &mut [VElem] = if C::NEED_POINT {
        stack.take::<VElem>()?
    } else {
        &mut []
    };
    let mapped = stack.take::<VElem>()?;
    let c = stack.take::<CElem>()?;

    lattice::to_lattice_space(scale, vector, mapped);
    callback.init(mapped)?;

    let k = closest_point(mapped, c, &mut stack)?;
    let hash_code = if C::NEED_HASH { hash::hash(c) } else { 0 };

    emit(callback, hash_code, k, c, point_buf)
}

/// Slots needed by a Delaunay query; the lattice point output needs one
/// more than the reference's count so the residual-rotation scratch slot
/// is still available.
pub(crate) fn delaunay_slots(need_point: bool) -> usize {
    5 + need_point as usize
}

/// Call `callback` for each vertex of the Delaunay cell containing
/// `vector`: the remainder-0 origin first, then remainders 1..=n.
pub(crate) fn delaunay<C: ProbeCallback>(
    dim: Dim,
    scale: Distance,
    vector: &[VElem],
    callback: &mut C,
) -> Result<()> {
    let mut arena = Arena::new(dim, delaunay_slots(C::NEED_POINT))?;
    let mut stack = arena.stack();

    let point_buf: &mut [VElem] = if C::NEED_POINT {
        stack.take::<VElem>()?
    } else {
        &mut []
    };
    let mapped = stack.take::<VElem>()?;
    let c = stack.take::<CElem>()?;
    let xmod = stack.take::<VElem>()?;
    let order = stack.take::<Order>()?;

    lattice::to_lattice_space(scale, vector, mapped);
    callback.init(mapped)?;

    delaunay_origin(mapped, xmod, c, order, &mut stack)?;

    let mut hash_code = if C::NEED_HASH { hash::hash(c) } else { 0 };
    emit(callback, hash_code, 0, c, point_buf)?;

    // Each next vertex drops one c-coordinate in residual order; a full
    // re-hash per vertex is fine at n+1 emissions per query.
    for k in 1..=dim as usize {
        c[order[k - 1] as usize] -= 1;
        if C::NEED_HASH {
            hash_code = hash::hash(c);
        }
        emit(callback, hash_code, k as K, c, point_buf)?;
    }

    Ok(())
}

/// Slots needed by an extended query.
pub(crate) const EXTENDED_SLOTS: usize = 7;

/// Call `callback` for every probe of the precompiled diff stream,
/// starting at the Delaunay origin of `vector`.
pub(crate) fn extended<C: ProbeCallback>(
    dim: Dim,
    scale: Distance,
    stream: &[Order],
    powers: &RadixPowers,
    vector: &[VElem],
    callback: &mut C,
) -> Result<()> {
    let mut arena = Arena::new(dim, EXTENDED_SLOTS)?;
    let mut stack = arena.stack();

    let point_buf: &mut [VElem] = if C::NEED_POINT {
        stack.take::<VElem>()?
    } else {
        &mut []
    };
    let mapped = stack.take::<VElem>()?;
    let c = stack.take::<CElem>()?;
    let xmod = stack.take::<VElem>()?;
    let order = stack.take::<Order>()?;
    let ordered_powers = stack.take::<HashCode>()?;

    lattice::to_lattice_space(scale, vector, mapped);
    callback.init(mapped)?;

    delaunay_origin(mapped, xmod, c, order, &mut stack)?;

    if C::NEED_HASH {
        powers.ordered(order, ordered_powers);
    }
    let mut hash_code = if C::NEED_HASH { hash::hash(c) } else { 0 };

    emit(callback, hash_code, 0, c, point_buf)?;

    // Replay the stream: per probe a remainder entry, a decrement list
    // and an increment list, each mark-terminated. Columns index the
    // residual order, which is what makes the precompiled stream valid
    // for every query.
    let mut pos = 0;
    while pos < stream.len() {
        let k = stream[pos] as K;
        pos += 1;

        loop {
            let col = stream[pos];
            pos += 1;
            if col == STREAM_MARK {
                break;
            }
            if C::NEED_CVECTOR || C::NEED_POINT {
                c[order[col as usize] as usize] -= 1;
            }
            if C::NEED_HASH {
                hash_code = hash_code.wrapping_sub(ordered_powers[col as usize]);
            }
        }

        loop {
            let col = stream[pos];
            pos += 1;
            if col == STREAM_MARK {
                break;
            }
            if C::NEED_CVECTOR || C::NEED_POINT {
                c[order[col as usize] as usize] += 1;
            }
            if C::NEED_HASH {
                hash_code = hash_code.wrapping_add(ordered_powers[col as usize]);
            }
        }

        emit(callback, hash_code, k, c, point_buf)?;
    }

    Ok(())
}
