//! Multiplication dispatch between the standard and FFT paths.
//!
//! A single pair of rules governs every product in the engines: the FFT
//! path is taken only when it is enabled (`fft_threshold > 0`) and both
//! operands are strictly larger than the threshold. Everything else goes
//! through `num-bigint`'s built-in multiplication.

use num_bigint::BigUint;

/// True when both operands qualify for the FFT path.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn use_fft(a: &BigUint, b: &BigUint, fft_threshold: usize) -> bool {
    fft_threshold > 0
        && a.bits() as usize > fft_threshold
        && b.bits() as usize > fft_threshold
}

/// Multiply two numbers, routing through FFT when both are large enough.
#[must_use]
pub fn mul(a: &BigUint, b: &BigUint, fft_threshold: usize) -> BigUint {
    if use_fft(a, b, fft_threshold) {
        bigfib_fft::mul(a, b)
    } else {
        a * b
    }
}

/// Square a number, routing through FFT when it is large enough.
#[must_use]
pub fn sqr(a: &BigUint, fft_threshold: usize) -> BigUint {
    if use_fft(a, a, fft_threshold) {
        bigfib_fft::sqr(a)
    } else {
        a * a
    }
}

/// Write `a * b` into `dest`.
pub fn mul_into(dest: &mut BigUint, a: &BigUint, b: &BigUint, fft_threshold: usize) {
    *dest = mul(a, b, fft_threshold);
}

/// Write `a * a` into `dest`.
pub fn sqr_into(dest: &mut BigUint, a: &BigUint, fft_threshold: usize) {
    *dest = sqr(a, fft_threshold);
}
