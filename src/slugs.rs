//! C3 — slug construction: given an epoch's anchor tick and the engine's
//! current inventory, compute the LOWER/UPPER/PD_1..N positions to hold
//! until the next rebalance.

use crate::config::PoolConfig;
use crate::error::{EngineError, Result};
use crate::libraries::{
    amount_for_liquidity_0, amount_for_liquidity_1, get_sqrt_price_at_tick, liquidity_for_amount_0,
    liquidity_for_amount_1, u256_to_u128,
};
use crate::orientation::Orientation;
use crate::schedule;

/// A concentrated-liquidity range the engine holds, in one fixed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub salt: u8,
}

impl Position {
    fn empty(tick: i32, salt: u8) -> Self {
        Position {
            tick_lower: tick,
            tick_upper: tick,
            liquidity: 0,
            salt,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
    }
}

/// Stable per-slot salts, so the host AMM's position accounting reconciles
/// across epochs (see spec.md's "Position identity" design note, kept here
/// as the engine's own invariant rather than re-derived each rebalance).
pub const SALT_LOWER: u8 = 0;
pub const SALT_UPPER: u8 = 1;

pub fn salt_for_pd(index: u8) -> u8 {
    2 + index
}

/// Liquidity that delivers `amount` of the *asset* across `[sqrt_lower,
/// sqrt_upper]`, regardless of which pool token the asset is. Routed through
/// `Orientation::to_0_1`/`from_0_1` rather than branching on `is_token_0`
/// directly, per the engine's one-algebra convention (see orientation.rs).
fn liquidity_for_asset_amount(
    orientation: Orientation,
    sqrt_lower: u128,
    sqrt_upper: u128,
    amount: u128,
) -> Result<u128> {
    let (amount_0, amount_1) = orientation.to_0_1(amount, 0u128);
    let liquidity_0 = liquidity_for_amount_0(sqrt_lower, sqrt_upper, amount_0)?;
    let liquidity_1 = liquidity_for_amount_1(sqrt_lower, sqrt_upper, amount_1)?;
    Ok(orientation.from_0_1(liquidity_0, liquidity_1).0)
}

/// Liquidity that delivers `amount` of the *numeraire* across `[sqrt_lower,
/// sqrt_upper]`.
fn liquidity_for_numeraire_amount(
    orientation: Orientation,
    sqrt_lower: u128,
    sqrt_upper: u128,
    amount: u128,
) -> Result<u128> {
    let (amount_0, amount_1) = orientation.to_0_1(0u128, amount);
    let liquidity_0 = liquidity_for_amount_0(sqrt_lower, sqrt_upper, amount_0)?;
    let liquidity_1 = liquidity_for_amount_1(sqrt_lower, sqrt_upper, amount_1)?;
    Ok(orientation.from_0_1(liquidity_0, liquidity_1).1)
}

fn numeraire_value_of(
    orientation: Orientation,
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
) -> Result<u128> {
    let amount_0 = amount_for_liquidity_0(sqrt_lower, sqrt_upper, liquidity)?;
    let amount_1 = amount_for_liquidity_1(sqrt_lower, sqrt_upper, liquidity)?;
    Ok(orientation.from_0_1(amount_0, amount_1).1)
}

fn ordered(low: i32, high: i32) -> (i32, i32) {
    if low < high {
        (low, high)
    } else {
        (high, low)
    }
}

/// Builds the LOWER slug: a thin band just below the current tick sized to
/// repurchase `total_tokens_sold`, capped by `total_proceeds` on hand.
fn build_lower(
    cfg: &PoolConfig,
    current_tick: i32,
    total_tokens_sold: u128,
    total_proceeds: u128,
) -> Result<Position> {
    if total_tokens_sold == 0 {
        return Ok(Position::empty(current_tick, SALT_LOWER));
    }
    let upper = current_tick - current_tick.rem_euclid(cfg.tick_spacing);
    let lower = upper - cfg.tick_spacing;
    let (lo, hi) = ordered(lower, upper);
    let sqrt_lo = get_sqrt_price_at_tick(lo)?;
    let sqrt_hi = get_sqrt_price_at_tick(hi)?;
    let orientation = cfg.orientation();

    let candidate = liquidity_for_asset_amount(orientation, sqrt_lo, sqrt_hi, total_tokens_sold)?;
    let required_proceeds = numeraire_value_of(orientation, sqrt_lo, sqrt_hi, candidate)?;

    let liquidity = if required_proceeds <= total_proceeds {
        candidate
    } else {
        liquidity_for_numeraire_amount(orientation, sqrt_lo, sqrt_hi, total_proceeds)?
    };

    Ok(Position {
        tick_lower: lo,
        tick_upper: hi,
        liquidity,
        salt: SALT_LOWER,
    })
}

/// Builds the UPPER slug: `[anchor_tick, epoch_upper_tick]`, sized to sell
/// the next epoch's scheduled target.
fn build_upper(
    cfg: &PoolConfig,
    anchor_tick: i32,
    epoch_upper_tick: i32,
    now: crate::config::Time,
    total_tokens_sold: u128,
    remaining_asset: u128,
) -> Result<(Position, u128)> {
    if anchor_tick == epoch_upper_tick {
        return Ok((Position::empty(anchor_tick, SALT_UPPER), 0));
    }
    let target = schedule::expected_sold(now + cfg.epoch_length, cfg);
    let target = u256_to_u128(target).unwrap_or(u128::MAX);
    let supply_in_slug = target.saturating_sub(total_tokens_sold).min(remaining_asset);

    if supply_in_slug == 0 {
        return Ok((Position::empty(anchor_tick, SALT_UPPER), 0));
    }

    let (lo, hi) = ordered(anchor_tick, epoch_upper_tick);
    let sqrt_lo = get_sqrt_price_at_tick(lo)?;
    let sqrt_hi = get_sqrt_price_at_tick(hi)?;
    let liquidity =
        liquidity_for_asset_amount(cfg.orientation(), sqrt_lo, sqrt_hi, supply_in_slug)?;

    Ok((
        Position {
            tick_lower: lo,
            tick_upper: hi,
            liquidity,
            salt: SALT_UPPER,
        },
        supply_in_slug,
    ))
}

/// Builds the PD_1..N slugs tiling `[epoch_upper_tick, end_tick]` with equal
/// shares of whatever asset remains after LOWER and UPPER.
fn build_price_discovery(
    cfg: &PoolConfig,
    epoch_upper_tick: i32,
    remaining_asset: u128,
) -> Result<Vec<Position>> {
    let mut out = Vec::with_capacity(cfg.num_pd_slugs as usize);
    if remaining_asset == 0 || epoch_upper_tick == cfg.end_tick {
        for i in 0..cfg.num_pd_slugs {
            out.push(Position::empty(epoch_upper_tick, salt_for_pd(i)));
        }
        return Ok(out);
    }

    let span = (cfg.end_tick - epoch_upper_tick).unsigned_abs() as i64;
    let max_sub_ranges = (span / cfg.tick_spacing as i64).max(0);
    let effective_n = (cfg.num_pd_slugs as i64).min(max_sub_ranges).max(0) as u8;

    if effective_n == 0 {
        for i in 0..cfg.num_pd_slugs {
            out.push(Position::empty(epoch_upper_tick, salt_for_pd(i)));
        }
        return Ok(out);
    }

    let width = ((span / effective_n as i64) as i32 / cfg.tick_spacing).max(1) * cfg.tick_spacing;
    let dir: i32 = if cfg.end_tick >= epoch_upper_tick { 1 } else { -1 };
    let share = remaining_asset / effective_n as u128;
    let remainder = remaining_asset % effective_n as u128;
    let orientation = cfg.orientation();

    for i in 0..effective_n {
        let start = epoch_upper_tick + dir * width * i as i32;
        let end = if i + 1 == effective_n {
            cfg.end_tick
        } else {
            epoch_upper_tick + dir * width * (i as i32 + 1)
        };
        let (lo, hi) = ordered(start, end);
        if lo == hi {
            out.push(Position::empty(lo, salt_for_pd(i)));
            continue;
        }
        let amount = if i + 1 == effective_n {
            share + remainder
        } else {
            share
        };
        let sqrt_lo = get_sqrt_price_at_tick(lo)?;
        let sqrt_hi = get_sqrt_price_at_tick(hi)?;
        let liquidity = liquidity_for_asset_amount(orientation, sqrt_lo, sqrt_hi, amount)?;
        out.push(Position {
            tick_lower: lo,
            tick_upper: hi,
            liquidity,
            salt: salt_for_pd(i),
        });
    }
    for i in effective_n..cfg.num_pd_slugs {
        out.push(Position::empty(cfg.end_tick, salt_for_pd(i)));
    }
    Ok(out)
}

/// Rebuilds the full `[LOWER, UPPER, PD_1..N]` position set for the epoch
/// anchored at `anchor_tick`.
#[allow(clippy::too_many_arguments)]
pub fn build_slugs(
    cfg: &PoolConfig,
    anchor_tick: i32,
    current_tick: i32,
    now: crate::config::Time,
    total_tokens_sold: crate::libraries::U256,
    total_proceeds: crate::libraries::U256,
) -> Result<Vec<Position>> {
    let sold = u256_to_u128(total_tokens_sold)?;
    let proceeds = u256_to_u128(total_proceeds)?;
    let remaining_u256 = cfg
        .num_tokens_to_sell
        .checked_sub(total_tokens_sold)
        .ok_or(EngineError::MathOverflow)?;
    let remaining_asset = u256_to_u128(remaining_u256)?;

    let lower = build_lower(cfg, current_tick, sold, proceeds)?;

    let max_delta = schedule::max_tick_delta_per_epoch_q18(cfg)?;
    let wad = ethnum::I256::from(crate::libraries::fixed_point::WAD);
    let step_ticks = (max_delta / wad).as_i32();
    let epoch_upper_tick_raw = anchor_tick + step_ticks;
    let epoch_upper_tick =
        crate::libraries::tick_math::align_to_spacing(epoch_upper_tick_raw, cfg.tick_spacing, cfg.end_tick);

    let (upper, upper_supply) =
        build_upper(cfg, anchor_tick, epoch_upper_tick, now, sold, remaining_asset)?;

    let pd_inventory = remaining_asset.saturating_sub(upper_supply);
    let pd = build_price_discovery(cfg, epoch_upper_tick, pd_inventory)?;

    let mut positions = Vec::with_capacity(2 + pd.len());
    positions.push(lower);
    positions.push(upper);
    positions.extend(pd);
    Ok(positions)
}
