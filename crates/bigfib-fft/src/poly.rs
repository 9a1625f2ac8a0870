//! Splitting big integers into transform coefficients and back.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Split `value` into `len` little-endian pieces of `piece_bits` bits each,
/// zero-padded at the top.
pub(crate) fn split(value: &BigUint, len: usize, piece_bits: usize) -> Vec<BigUint> {
    let mask = (BigUint::one() << piece_bits) - BigUint::one();
    let mut pieces = Vec::with_capacity(len);
    let mut rest = value.clone();
    while pieces.len() < len && !rest.is_zero() {
        pieces.push(&rest & &mask);
        rest >>= piece_bits;
    }
    pieces.resize_with(len, BigUint::zero);
    pieces
}

/// Evaluate pieces at x = 2^piece_bits, highest first (Horner form).
///
/// Pieces may exceed `piece_bits` bits after a convolution; the additions
/// carry naturally.
pub(crate) fn assemble(pieces: &[BigUint], piece_bits: usize) -> BigUint {
    let mut acc = BigUint::zero();
    for piece in pieces.iter().rev() {
        acc <<= piece_bits;
        acc += piece;
    }
    acc
}
