//! Conversions between liquidity and token amounts for a tick range.
//! Implements formulae 6.29 and 6.30 of the Uniswap v3 whitepaper.

use super::big_num::U128;
use super::fixed_point;
use super::full_math::MulDiv;
use crate::error::{EngineError, Result};

fn order(mut a: u128, mut b: u128) -> (u128, u128) {
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    (a, b)
}

/// `ΔL = Δx * (√P_upper * √P_lower) / (√P_upper - √P_lower)`.
///
/// `amount_0` is carried as `u128`, not `u64`: the engine's asset/numeraire
/// supplies are 18-decimal-scale token amounts (spec.md's own worked example
/// is `100_000 * 1e18`), routinely past `u64::MAX`.
pub fn liquidity_for_amount_0(sqrt_ratio_a_x64: u128, sqrt_ratio_b_x64: u128, amount_0: u128) -> Result<u128> {
    let (a, b) = order(sqrt_ratio_a_x64, sqrt_ratio_b_x64);
    let intermediate = U128::from(a)
        .mul_div_floor(U128::from(b), U128::from(fixed_point::Q64))
        .ok_or(EngineError::MathOverflow)?;
    U128::from(amount_0)
        .mul_div_floor(intermediate, U128::from(b - a))
        .map(|v| v.as_u128())
        .ok_or(EngineError::MathOverflow)
}

/// `ΔL = Δy / (√P_upper - √P_lower)`.
pub fn liquidity_for_amount_1(sqrt_ratio_a_x64: u128, sqrt_ratio_b_x64: u128, amount_1: u128) -> Result<u128> {
    let (a, b) = order(sqrt_ratio_a_x64, sqrt_ratio_b_x64);
    U128::from(amount_1)
        .mul_div_floor(U128::from(fixed_point::Q64), U128::from(b - a))
        .map(|v| v.as_u128())
        .ok_or(EngineError::MathOverflow)
}

/// The maximum liquidity obtainable for `amount_0`/`amount_1` at the given
/// current price and range, per spec.md's `liquidity_for_amounts` vocabulary.
pub fn liquidity_for_amounts(
    sqrt_ratio_x64: u128,
    sqrt_ratio_a_x64: u128,
    sqrt_ratio_b_x64: u128,
    amount_0: u128,
    amount_1: u128,
) -> Result<u128> {
    let (a, b) = order(sqrt_ratio_a_x64, sqrt_ratio_b_x64);
    if sqrt_ratio_x64 <= a {
        liquidity_for_amount_0(a, b, amount_0)
    } else if sqrt_ratio_x64 < b {
        Ok(u128::min(
            liquidity_for_amount_0(sqrt_ratio_x64, b, amount_0)?,
            liquidity_for_amount_1(a, sqrt_ratio_x64, amount_1)?,
        ))
    } else {
        liquidity_for_amount_1(a, b, amount_1)
    }
}

/// `Δx = ΔL * (1/√P_lower - 1/√P_upper)`, i.e. the engine's
/// `amount_for_liquidity_0`.
pub fn amount_for_liquidity_0(sqrt_ratio_a_x64: u128, sqrt_ratio_b_x64: u128, liquidity: u128) -> Result<u128> {
    let (a, b) = order(sqrt_ratio_a_x64, sqrt_ratio_b_x64);
    if a == 0 {
        return Err(EngineError::SqrtPriceOutOfRange);
    }
    let numerator = (U128::from(liquidity) << fixed_point::RESOLUTION)
        .mul_div_floor(U128::from(b - a), U128::from(b))
        .ok_or(EngineError::MathOverflow)?;
    Ok((numerator / U128::from(a)).as_u128())
}

/// `Δy = ΔL * (√P_upper - √P_lower)`, i.e. the engine's
/// `amount_for_liquidity_1`.
pub fn amount_for_liquidity_1(sqrt_ratio_a_x64: u128, sqrt_ratio_b_x64: u128, liquidity: u128) -> Result<u128> {
    let (a, b) = order(sqrt_ratio_a_x64, sqrt_ratio_b_x64);
    U128::from(liquidity)
        .mul_div_floor(U128::from(b - a), U128::from(fixed_point::Q64))
        .map(|v| v.as_u128())
        .ok_or(EngineError::MathOverflow)
}

/// The `(amount_0, amount_1)` value of `liquidity` placed between
/// `sqrt_ratio_a_x64` and `sqrt_ratio_b_x64` at the current price.
pub fn amounts_for_liquidity(
    sqrt_ratio_x64: u128,
    sqrt_ratio_a_x64: u128,
    sqrt_ratio_b_x64: u128,
    liquidity: u128,
) -> Result<(u128, u128)> {
    let (a, b) = order(sqrt_ratio_a_x64, sqrt_ratio_b_x64);
    if sqrt_ratio_x64 <= a {
        Ok((amount_for_liquidity_0(a, b, liquidity)?, 0))
    } else if sqrt_ratio_x64 < b {
        Ok((
            amount_for_liquidity_0(sqrt_ratio_x64, b, liquidity)?,
            amount_for_liquidity_1(a, sqrt_ratio_x64, liquidity)?,
        ))
    } else {
        Ok((0, amount_for_liquidity_1(a, b, liquidity)?))
    }
}
