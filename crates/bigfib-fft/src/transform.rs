//! Iterative radix-2 number-theoretic transform over the Fermat ring.

use num_bigint::BigUint;

use crate::fermat::FermatRing;

/// In-place forward transform.
///
/// `data.len()` must be a power of two dividing 2*shift, so every butterfly
/// twiddle is an integer bit count.
pub(crate) fn forward(ring: &FermatRing, data: &mut [BigUint]) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two());
    debug_assert_eq!((2 * ring.shift()) % n, 0);

    bit_reverse(data);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let step = 2 * ring.shift() / size;
        for block in (0..n).step_by(size) {
            for j in 0..half {
                let lo = block + j;
                let hi = lo + half;
                let twiddled = ring.mul_pow2(&data[hi], step * j);
                let sum = ring.add(&data[lo], &twiddled);
                let diff = ring.sub(&data[lo], &twiddled);
                data[lo] = sum;
                data[hi] = diff;
            }
        }
        size *= 2;
    }
}

/// In-place inverse transform: reverse all but the first element, run the
/// forward pass, then divide by n (a power-of-two shift in this ring).
pub(crate) fn inverse(ring: &FermatRing, data: &mut [BigUint]) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    data[1..].reverse();
    forward(ring, data);
    let log_n = n.trailing_zeros() as usize;
    for value in data.iter_mut() {
        *value = ring.div_pow2(value, log_n);
    }
}

fn bit_reverse(data: &mut [BigUint]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}
