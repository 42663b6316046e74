//! Tick <-> sqrt-price conversion. Q64.64 fixed point, same bit-shift
//! approximation Uniswap v3 (and this crate's teacher) uses.

use super::big_num::U128;
use crate::error::{EngineError, Result};

/// The minimum tick.
pub const MIN_TICK: i32 = -307200;
/// The maximum tick.
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_price_at_tick(MIN_TICK)`.
pub const MIN_SQRT_PRICE_X64: u128 = 3939943522091;
/// `get_sqrt_price_at_tick(MAX_TICK)`.
pub const MAX_SQRT_PRICE_X64: u128 = 86367321006760116002434269;

const NUM_64: U128 = U128([64, 0]);
const BIT_PRECISION: u32 = 16;

/// Calculates `1.0001^(tick/2)` as a Q64.64 number: the square root of the
/// ratio of the two assets (`token_1 / token_0`).
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK as u32 {
        return Err(EngineError::TickOutOfRange);
    }

    let mut ratio = if abs_tick & 0x1 != 0 {
        U128([0xfffcb933bd6fb800, 0])
    } else {
        U128([0, 1])
    };
    if abs_tick & 0x2 != 0 {
        ratio = (ratio * U128([0xfff97272373d4000, 0])) >> NUM_64
    };
    if abs_tick & 0x4 != 0 {
        ratio = (ratio * U128([0xfff2e50f5f657000, 0])) >> NUM_64
    };
    if abs_tick & 0x8 != 0 {
        ratio = (ratio * U128([0xffe5caca7e10f000, 0])) >> NUM_64
    };
    if abs_tick & 0x10 != 0 {
        ratio = (ratio * U128([0xffcb9843d60f7000, 0])) >> NUM_64
    };
    if abs_tick & 0x20 != 0 {
        ratio = (ratio * U128([0xff973b41fa98e800, 0])) >> NUM_64
    };
    if abs_tick & 0x40 != 0 {
        ratio = (ratio * U128([0xff2ea16466c9b000, 0])) >> NUM_64
    };
    if abs_tick & 0x80 != 0 {
        ratio = (ratio * U128([0xfe5dee046a9a3800, 0])) >> NUM_64
    };
    if abs_tick & 0x100 != 0 {
        ratio = (ratio * U128([0xfcbe86c7900bb000, 0])) >> NUM_64
    };
    if abs_tick & 0x200 != 0 {
        ratio = (ratio * U128([0xf987a7253ac65800, 0])) >> NUM_64
    };
    if abs_tick & 0x400 != 0 {
        ratio = (ratio * U128([0xf3392b0822bb6000, 0])) >> NUM_64
    };
    if abs_tick & 0x800 != 0 {
        ratio = (ratio * U128([0xe7159475a2caf000, 0])) >> NUM_64
    };
    if abs_tick & 0x1000 != 0 {
        ratio = (ratio * U128([0xd097f3bdfd2f2000, 0])) >> NUM_64
    };
    if abs_tick & 0x2000 != 0 {
        ratio = (ratio * U128([0xa9f746462d9f8000, 0])) >> NUM_64
    };
    if abs_tick & 0x4000 != 0 {
        ratio = (ratio * U128([0x70d869a156f31c00, 0])) >> NUM_64
    };
    if abs_tick & 0x8000 != 0 {
        ratio = (ratio * U128([0x31be135f97ed3200, 0])) >> NUM_64
    };
    if abs_tick & 0x10000 != 0 {
        ratio = (ratio * U128([0x9aa508b5b85a500, 0])) >> NUM_64
    };
    if abs_tick & 0x20000 != 0 {
        ratio = (ratio * U128([0x5d6af8dedc582c, 0])) >> NUM_64
    };
    if abs_tick & 0x40000 != 0 {
        ratio = (ratio * U128([0x2216e584f5fa, 0])) >> NUM_64
    }

    if tick > 0 {
        ratio = U128::MAX / ratio;
    }

    Ok(ratio.as_u128())
}

/// The greatest tick such that `get_sqrt_price_at_tick(tick) <= sqrt_price_x64`.
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32> {
    if sqrt_price_x64 < MIN_SQRT_PRICE_X64 || sqrt_price_x64 >= MAX_SQRT_PRICE_X64 {
        return Err(EngineError::SqrtPriceOutOfRange);
    }

    let msb: u32 = 128 - sqrt_price_x64.leading_zeros() - 1;
    let log2p_integer_x32 = (i128::from(msb) - 64) << 32;

    let mut bit: i128 = 0x8000_0000_0000_0000i128;
    let mut precision = 0;
    let mut log2p_fraction_x64 = 0;

    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = u32::try_from(r >> 127).unwrap();
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * i128::from(is_r_more_than_two);
        bit >>= 1;
        precision += 1;
    }
    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    let log_sqrt_10001_x64 = log2p_x32 * 59543866431248i128;

    let tick_low = i32::try_from((log_sqrt_10001_x64 - 184467440737095516i128) >> 64)
        .map_err(|_| EngineError::TickOutOfRange)?;
    let tick_high = i32::try_from((log_sqrt_10001_x64 + 15793534762490258745i128) >> 64)
        .map_err(|_| EngineError::TickOutOfRange)?;

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_price_at_tick(tick_high)? <= sqrt_price_x64 {
        tick_high
    } else {
        tick_low
    })
}

/// Rounds `tick` to the nearest multiple of `spacing` in the direction of
/// `toward` (the schedule's end tick), never producing a tick that implies a
/// better price for buyers than the schedule promises.
pub fn align_to_spacing(tick: i32, spacing: i32, toward: i32) -> i32 {
    let remainder = tick.rem_euclid(spacing);
    if remainder == 0 {
        return tick;
    }
    let floor = tick - remainder;
    let ceil = floor + spacing;
    if toward >= tick {
        ceil
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::fixed_point::Q64;

    #[test]
    fn min_and_max_tick_round_trip() {
        assert_eq!(get_sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_PRICE_X64);
        assert_eq!(get_sqrt_price_at_tick(MAX_TICK).unwrap(), MAX_SQRT_PRICE_X64);
        let min_price = MIN_SQRT_PRICE_X64 as f64 / Q64 as f64;
        assert!(min_price > 0.0);
    }

    #[test]
    fn tick_zero_is_unit_price() {
        let p = get_sqrt_price_at_tick(0).unwrap();
        assert_eq!(p, Q64);
        assert_eq!(get_tick_at_sqrt_price(p).unwrap(), 0);
    }

    #[test]
    fn rejects_out_of_range_tick() {
        assert!(get_sqrt_price_at_tick(MAX_TICK + 1).is_err());
    }

    #[test]
    fn align_rounds_toward_target() {
        assert_eq!(align_to_spacing(103, 8, -1), 96);
        assert_eq!(align_to_spacing(103, 8, 1_000_000), 104);
        assert_eq!(align_to_spacing(96, 8, 1_000_000), 96);
    }
}
