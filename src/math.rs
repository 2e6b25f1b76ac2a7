// 2.0 math.rs: integer arithmetic for reserves and shares.
// amounts are u128; every product of two amounts is taken in U256 and narrowed with a check.
// all division is floor unless the function name says ceil.

use crate::types::{Amount, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("integer overflow")]
    Overflow,

    #[error("integer underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("pool has no reserves to price against")]
    EmptyReserves,
}

#[inline]
pub fn checked_add(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

#[inline]
pub fn checked_sub(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}

/// Exact product of two amounts.
#[inline]
pub fn full_mul(a: Amount, b: Amount) -> U256 {
    U256::from(a) * U256::from(b)
}

#[inline]
pub fn narrow(v: U256) -> Result<Amount, MathError> {
    if v > U256::from(u128::MAX) {
        Err(MathError::Overflow)
    } else {
        Ok(v.as_u128())
    }
}

/// floor(a * b / d)
pub fn mul_div_floor(a: Amount, b: Amount, d: Amount) -> Result<Amount, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    narrow(full_mul(a, b) / U256::from(d))
}

/// ceil(a * b / d)
pub fn mul_div_ceil(a: Amount, b: Amount, d: Amount) -> Result<Amount, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    let n = full_mul(a, b);
    let d = U256::from(d);
    let q = n / d;
    if (n % d).is_zero() {
        narrow(q)
    } else {
        narrow(q + U256::one())
    }
}

/// Floor square root, Babylonian iteration.
/// Starts above the root and stops as soon as the candidate no longer decreases.
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    if n <= U256::from(3u8) {
        return U256::one();
    }
    let mut z = n;
    let mut x = (n >> 1) + U256::one();
    while x < z {
        z = x;
        x = (n / x + x) >> 1;
    }
    z
}

/// floor(sqrt(a * b)) without intermediate overflow.
pub fn sqrt_product(a: Amount, b: Amount) -> Result<Amount, MathError> {
    narrow(isqrt(full_mul(a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isqrt_small_values() {
        let expected = [0u64, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3];
        for (n, root) in expected.iter().enumerate() {
            assert_eq!(isqrt(U256::from(n as u64)), U256::from(*root), "isqrt({})", n);
        }
    }

    #[test]
    fn isqrt_exact_for_perfect_squares() {
        for root in [1u128, 7, 100, 10_000, 1_000_000_007, u64::MAX as u128] {
            assert_eq!(isqrt(full_mul(root, root)), U256::from(root));
        }
    }

    #[test]
    fn isqrt_is_floor() {
        for n in [2_000_000u128, 99_999_999, 123_456_789_012_345] {
            let r = isqrt(U256::from(n));
            assert!(r * r <= U256::from(n));
            assert!((r + U256::one()) * (r + U256::one()) > U256::from(n));
        }
    }

    #[test]
    fn sqrt_product_of_max_amounts() {
        assert_eq!(sqrt_product(u128::MAX, u128::MAX).unwrap(), u128::MAX);
        assert_eq!(sqrt_product(1_000, 2_000).unwrap(), 1_414);
    }

    #[test]
    fn mul_div_rounding() {
        assert_eq!(mul_div_floor(7, 3, 2).unwrap(), 10);
        assert_eq!(mul_div_ceil(7, 3, 2).unwrap(), 11);
        assert_eq!(mul_div_ceil(4, 3, 2).unwrap(), 6);
        assert_eq!(mul_div_floor(1, 1, 0), Err(MathError::DivisionByZero));
    }

    #[test]
    fn mul_div_handles_wide_intermediates() {
        // product overflows u128 but the quotient fits
        let r = mul_div_floor(u128::MAX, u128::MAX, u128::MAX).unwrap();
        assert_eq!(r, u128::MAX);
        assert_eq!(mul_div_floor(u128::MAX, 2, 1), Err(MathError::Overflow));
    }

    #[test]
    fn checked_add_sub() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert_eq!(checked_add(u128::MAX, 1), Err(MathError::Overflow));
        assert_eq!(checked_sub(5, 3).unwrap(), 2);
        assert_eq!(checked_sub(0, 1), Err(MathError::Underflow));
    }
}
