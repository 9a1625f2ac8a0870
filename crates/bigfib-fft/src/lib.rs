//! # bigfib-fft
//!
//! Fourier-transform multiplication for `BigUint` operands.
//!
//! Schönhage-Strassen style pipeline: operands are split into fixed-width
//! pieces, transformed with a number-theoretic transform over Z/(2^shift + 1),
//! multiplied pointwise and reassembled. 2 is a root of unity in that ring,
//! so every twiddle factor costs only a bit shift.
//!
//! Operands below [`DIRECT_BITS`] fall back to the standard `num-bigint`
//! product. The mathematical result is identical on both paths.

mod fermat;
mod poly;
mod transform;

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::trace;

use crate::fermat::{plan_for, FermatRing};

/// Bit length below which the standard product is cheaper than a transform.
const DIRECT_BITS: usize = 8_192;

/// Multiply two values, routing large operands through the transform.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    let max_bits = a.bits().max(b.bits()) as usize;
    if max_bits >= DIRECT_BITS {
        ntt_mul(a, b)
    } else {
        a * b
    }
}

/// Square a value, reusing a single forward transform on the large path.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sqr(a: &BigUint) -> BigUint {
    if a.bits() as usize >= DIRECT_BITS {
        ntt_sqr(a)
    } else {
        a * a
    }
}

#[allow(clippy::cast_possible_truncation)]
fn ntt_mul(a: &BigUint, b: &BigUint) -> BigUint {
    if a.is_zero() || b.is_zero() {
        return BigUint::ZERO;
    }
    let plan = plan_for(a.bits() as usize, b.bits() as usize);
    trace!(
        piece_bits = plan.piece_bits,
        len = plan.len,
        shift = plan.shift,
        "NTT multiply"
    );
    let ring = FermatRing::new(plan.shift);

    let mut fa = poly::split(a, plan.len, plan.piece_bits);
    let mut fb = poly::split(b, plan.len, plan.piece_bits);
    transform::forward(&ring, &mut fa);
    transform::forward(&ring, &mut fb);

    for (x, y) in fa.iter_mut().zip(&fb) {
        *x = ring.mul(x, y);
    }

    transform::inverse(&ring, &mut fa);
    poly::assemble(&fa, plan.piece_bits)
}

#[allow(clippy::cast_possible_truncation)]
fn ntt_sqr(a: &BigUint) -> BigUint {
    if a.is_zero() {
        return BigUint::ZERO;
    }
    let plan = plan_for(a.bits() as usize, a.bits() as usize);
    let ring = FermatRing::new(plan.shift);

    let mut fa = poly::split(a, plan.len, plan.piece_bits);
    transform::forward(&ring, &mut fa);
    for x in fa.iter_mut() {
        *x = ring.mul(x, x);
    }
    transform::inverse(&ring, &mut fa);
    poly::assemble(&fa, plan.piece_bits)
}
