//! Matrix types for the Matrix Exponentiation algorithm.

use num_bigint::BigUint;

/// 2x2 matrix of `BigUint` values.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub a: BigUint, // [0][0]
    pub b: BigUint, // [0][1]
    pub c: BigUint, // [1][0]
    pub d: BigUint, // [1][1]
}

impl Matrix {
    /// Create the identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            a: BigUint::from(1u32),
            b: BigUint::ZERO,
            c: BigUint::ZERO,
            d: BigUint::from(1u32),
        }
    }

    /// Create the Fibonacci Q matrix [[1,1],[1,0]].
    #[must_use]
    pub fn fibonacci_q() -> Self {
        Self {
            a: BigUint::from(1u32),
            b: BigUint::from(1u32),
            c: BigUint::from(1u32),
            d: BigUint::ZERO,
        }
    }

    /// Check if this is the identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.a == BigUint::from(1u32)
            && self.b == BigUint::ZERO
            && self.c == BigUint::ZERO
            && self.d == BigUint::from(1u32)
    }
}

/// Scratch registers receiving the elementwise products of one matrix
/// multiplication. Eight for the general product, the first five for the
/// symmetric squaring.
pub struct MatrixTemps {
    pub t1: BigUint,
    pub t2: BigUint,
    pub t3: BigUint,
    pub t4: BigUint,
    pub t5: BigUint,
    pub t6: BigUint,
    pub t7: BigUint,
    pub t8: BigUint,
}

impl MatrixTemps {
    /// Create zeroed scratch registers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            t1: BigUint::ZERO,
            t2: BigUint::ZERO,
            t3: BigUint::ZERO,
            t4: BigUint::ZERO,
            t5: BigUint::ZERO,
            t6: BigUint::ZERO,
            t7: BigUint::ZERO,
            t8: BigUint::ZERO,
        }
    }
}

impl Default for MatrixTemps {
    fn default() -> Self {
        Self::new()
    }
}

/// State for matrix exponentiation computation.
///
/// `res` accumulates the answer, `power` holds the running Q^(2^i),
/// `temp` is the swap partner for both, and `temps` backs the
/// elementwise products.
pub struct MatrixState {
    pub res: Matrix,
    pub power: Matrix,
    pub temp: Matrix,
    pub temps: MatrixTemps,
}

impl MatrixState {
    /// Create a new matrix state ready to compute a power of Q.
    #[must_use]
    pub fn new() -> Self {
        Self {
            res: Matrix::identity(),
            power: Matrix::fibonacci_q(),
            temp: Matrix::identity(),
            temps: MatrixTemps::new(),
        }
    }

    /// Reset state for reuse. `temp` and `temps` are pure destinations
    /// and need no reinitialization.
    pub fn reset(&mut self) {
        self.res = Matrix::identity();
        self.power = Matrix::fibonacci_q();
    }
}

impl Default for MatrixState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matrix() {
        let m = Matrix::identity();
        assert!(m.is_identity());
    }

    #[test]
    fn fibonacci_q_matrix() {
        let q = Matrix::fibonacci_q();
        assert_eq!(q.a, BigUint::from(1u32));
        assert_eq!(q.b, BigUint::from(1u32));
        assert_eq!(q.c, BigUint::from(1u32));
        assert_eq!(q.d, BigUint::ZERO);
    }

    #[test]
    fn q_matrix_is_symmetric() {
        let q = Matrix::fibonacci_q();
        assert_eq!(q.b, q.c);
    }

    #[test]
    fn matrix_state_new() {
        let state = MatrixState::new();
        assert!(state.res.is_identity());
        assert!(!state.power.is_identity());
    }

    #[test]
    fn matrix_state_reset() {
        let mut state = MatrixState::new();
        state.res = Matrix::fibonacci_q();
        state.power = Matrix::identity();
        state.reset();
        assert!(state.res.is_identity());
        assert_eq!(state.power.b, BigUint::from(1u32));
    }
}
