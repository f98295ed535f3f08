//! Fixed-point scaling shared by every ledger quantity.
//!
//! Per-second flows multiply small rates by large time spans and then divide
//! by pool-wide totals, so balances are kept scaled by [`SCALE`] and every
//! `a × b / d` goes through [`mul_div`], which never overflows the product.

/// Scale factor applied to all internal balances and indices (1e9).
pub const SCALE: u128 = 1_000_000_000;

/// Scale an unscaled token amount.
///
/// # Example
/// ```
/// use superpool_interface::{SCALE, to_scaled};
///
/// assert_eq!(to_scaled(20_000), 20_000 * SCALE);
/// ```
#[inline]
pub const fn to_scaled(amount: u64) -> u128 {
    amount as u128 * SCALE
}

/// Convert a scaled value back to token units, rounding down.
///
/// Returns `None` when the unscaled value does not fit in a `u64`.
///
/// # Example
/// ```
/// use superpool_interface::{SCALE, from_scaled};
///
/// assert_eq!(from_scaled(3 * SCALE + SCALE / 2), Some(3));
/// assert_eq!(from_scaled(u128::MAX), None);
/// ```
#[inline]
pub fn from_scaled(value: u128) -> Option<u64> {
    u64::try_from(value / SCALE).ok()
}

/// Convert a scaled value back to token units, rounding up.
#[inline]
pub fn from_scaled_ceil(value: u128) -> Option<u64> {
    u64::try_from(value.div_ceil(SCALE)).ok()
}

/// Compute `floor(a × b / d)` with a 256-bit intermediate product.
///
/// # Returns
/// `None` if `d` is zero or the quotient does not fit in a `u128`.
///
/// # Example
/// ```
/// use superpool_interface::mul_div;
///
/// assert_eq!(mul_div(1000, 20, 30), Some(666));
/// // The product overflows u128 but the quotient does not.
/// assert_eq!(mul_div(u128::MAX, 3, 6), Some(u128::MAX / 2));
/// assert_eq!(mul_div(1, 1, 0), None);
/// ```
pub fn mul_div(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return Some(product / d);
    }

    let (hi, lo) = mul_wide(a, b);
    if hi >= d {
        return None;
    }

    // Restoring long division of (hi, lo) by d. `rem < d` holds on entry to
    // every iteration, so the quotient fits in 128 bits.
    let mut rem = hi;
    let mut quotient: u128 = 0;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= 1;
        }
    }
    Some(quotient)
}

/// Full 256-bit product of two `u128`s as `(high, low)` halves.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    let mid = (lo_lo >> 64) + (lo_hi & MASK) + (hi_lo & MASK);
    let low = (lo_lo & MASK) | (mid << 64);
    let high = hi_hi + (lo_hi >> 64) + (hi_lo >> 64) + (mid >> 64);
    (high, low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(6, 7, 4, Some(10) ; "fits in u128")]
    #[test_case(u128::MAX, u128::MAX, u128::MAX, Some(u128::MAX) ; "square over itself")]
    #[test_case(u128::MAX, 2, 4, Some(u128::MAX / 2) ; "wide product halved")]
    #[test_case(u128::MAX, 2, 1, None ; "quotient overflows")]
    #[test_case(5, 5, 0, None ; "zero divisor")]
    fn test_mul_div(a: u128, b: u128, d: u128, expected: Option<u128>) {
        assert_eq!(mul_div(a, b, d), expected);
    }

    #[test]
    fn test_mul_div_matches_narrow_path_near_boundary() {
        // 2^100 * 2^40 overflows, dividing by 2^20 lands at 2^120
        let a = 1u128 << 100;
        let b = 1u128 << 40;
        assert_eq!(mul_div(a, b, 1 << 20), Some(1u128 << 120));
        assert_eq!(mul_div(a, b, 3 << 13), Some((1u128 << 127) / 3));
        assert_eq!(mul_div(a, b, 3), None);
    }

    #[test]
    fn test_mul_wide_known_product() {
        let (hi, lo) = mul_wide(u128::MAX, u128::MAX);
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        assert_eq!(hi, u128::MAX - 1);
        assert_eq!(lo, 1);
    }

    #[test]
    fn test_scaled_conversions() {
        assert_eq!(to_scaled(0), 0);
        assert_eq!(from_scaled(SCALE - 1), Some(0));
        assert_eq!(from_scaled_ceil(SCALE + 1), Some(2));
        assert_eq!(from_scaled_ceil(2 * SCALE), Some(2));
    }
}
