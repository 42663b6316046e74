//! 128 and 256 bit unsigned integers.
//!
//! `U128`/`U256` are more efficient than the primitive `u128` for the
//! multiply-then-divide patterns the rest of `libraries` relies on, since
//! intermediate products never truncate.

use uint::construct_uint;

construct_uint! {
    pub struct U128(2);
}

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

/// Narrows `v` to `u64`, erroring rather than truncating (the `uint` crate's
/// own `as_u64` panics on overflow, which the engine never does).
pub fn u256_to_u64(v: U256) -> crate::error::Result<u64> {
    if v > U256::from(u64::MAX) {
        return Err(crate::error::EngineError::MathOverflow);
    }
    Ok(v.as_u64())
}

/// Narrows `v` to `u128`, erroring rather than truncating. Asset/numeraire
/// supply amounts are 18-decimal-scale and routinely exceed `u64::MAX`
/// (spec.md's own worked example, `100_000 * 1e18`, is one), so slug sizing
/// carries amounts in `u128` rather than `u64`.
pub fn u256_to_u128(v: U256) -> crate::error::Result<u128> {
    if v > U256::from(u128::MAX) {
        return Err(crate::error::EngineError::MathOverflow);
    }
    Ok(v.as_u128())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrows_in_range_value() {
        assert_eq!(u256_to_u64(U256::from(42u64)).unwrap(), 42);
    }

    #[test]
    fn rejects_value_above_u64_max() {
        assert!(u256_to_u64(U256::from(u64::MAX) + U256::from(1u64)).is_err());
    }

    #[test]
    fn narrows_u128_range_value() {
        let v = U256::from(100_000u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(u256_to_u128(v).unwrap(), 100_000u128 * 10u128.pow(18));
    }

    #[test]
    fn rejects_value_above_u128_max() {
        let over = U256::from(u128::MAX) + U256::from(1u64);
        assert!(u256_to_u128(over).is_err());
    }
}
