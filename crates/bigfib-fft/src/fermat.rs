//! Arithmetic in the ring Z/(2^shift + 1).
//!
//! In this ring 2^shift ≡ -1, so 2 is a root of unity of order 2*shift and
//! every transform twiddle factor is a plain bit shift. Elements are kept as
//! reduced `BigUint` values; the context owns the modulus so callers never
//! rebuild it.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Ring context for a fixed modulus 2^shift + 1.
///
/// All operations expect operands already reduced below the modulus and
/// return reduced results.
#[derive(Debug)]
pub(crate) struct FermatRing {
    shift: usize,
    modulus: BigUint,
    low_mask: BigUint,
}

impl FermatRing {
    pub(crate) fn new(shift: usize) -> Self {
        debug_assert!(shift > 0);
        Self {
            shift,
            modulus: (BigUint::one() << shift) + BigUint::one(),
            low_mask: (BigUint::one() << shift) - BigUint::one(),
        }
    }

    pub(crate) fn shift(&self) -> usize {
        self.shift
    }

    pub(crate) fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let sum = a + b;
        if sum >= self.modulus {
            sum - &self.modulus
        } else {
            sum
        }
    }

    pub(crate) fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b {
            a - b
        } else {
            &self.modulus - (b - a)
        }
    }

    pub(crate) fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Multiply by 2^k.
    ///
    /// Because 2^shift ≡ -1, the wide shift folds in one high/low split
    /// instead of a general division: hi·2^shift + lo ≡ lo - hi.
    pub(crate) fn mul_pow2(&self, a: &BigUint, k: usize) -> BigUint {
        let order = 2 * self.shift;
        let k = k % order;
        if k == 0 {
            return a.clone();
        }
        let (k, negate) = if k >= self.shift {
            (k - self.shift, true)
        } else {
            (k, false)
        };
        let folded = if k == 0 {
            a.clone()
        } else {
            let wide = a << k;
            let hi: BigUint = &wide >> self.shift;
            let lo = wide & &self.low_mask;
            self.sub(&lo, &hi)
        };
        if negate {
            self.neg(folded)
        } else {
            folded
        }
    }

    /// Divide by 2^k, i.e. multiply by the inverse power of the root.
    pub(crate) fn div_pow2(&self, a: &BigUint, k: usize) -> BigUint {
        let order = 2 * self.shift;
        let r = k % order;
        if r == 0 {
            a.clone()
        } else {
            self.mul_pow2(a, order - r)
        }
    }

    fn neg(&self, a: BigUint) -> BigUint {
        if a.is_zero() {
            a
        } else {
            &self.modulus - a
        }
    }
}

/// Transform plan: operands split into `len` pieces of `piece_bits` bits,
/// convolved in the ring Z/(2^shift + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Plan {
    pub piece_bits: usize,
    pub len: usize,
    pub shift: usize,
}

/// Pick transform parameters for operands of the given bit lengths.
///
/// `len` is the smallest power of two covering both operands' pieces, so the
/// cyclic convolution never wraps. `shift` must be a multiple of `len`/2
/// (every twiddle exponent 2*shift/size stays an integer bit count) and large
/// enough that a product coefficient, a sum of at most `len` terms of
/// 2*piece_bits each, stays below the modulus.
pub(crate) fn plan_for(a_bits: usize, b_bits: usize) -> Plan {
    let max_bits = a_bits.max(b_bits);
    let piece_bits = if max_bits < 16_384 {
        64
    } else if max_bits < 262_144 {
        256
    } else if max_bits < 2_097_152 {
        1024
    } else {
        4096
    };

    let pieces_a = a_bits.div_ceil(piece_bits);
    let pieces_b = b_bits.div_ceil(piece_bits);
    let len = (pieces_a + pieces_b).next_power_of_two().max(4);

    let log_len = len.trailing_zeros() as usize;
    let min_shift = 2 * piece_bits + log_len + 2;
    let half = len / 2;
    let shift = min_shift.div_ceil(half) * half;

    Plan {
        piece_bits,
        len,
        shift,
    }
}
