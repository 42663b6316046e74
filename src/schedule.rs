//! C2 — the deterministic linear sale schedule and its per-epoch
//! dutch-auction correction.
//!
//! All functions here are pure: they take the immutable `PoolConfig` plus
//! whatever slice of mutable state they need and return a value, the same
//! shape as the teacher's `libraries` functions (no `self`, no side
//! effects).

use crate::config::{PoolConfig, Tick, Time};
use crate::error::{EngineError, Result};
use crate::libraries::tick_math::align_to_spacing;
use crate::libraries::U256;
use ethnum::I256;

fn u256_to_i256(v: U256) -> Result<I256> {
    if v > U256::from(u128::MAX) {
        return Err(EngineError::MathOverflow);
    }
    Ok(I256::from(v.as_u128()))
}

/// `⌊(now - starting_time) / epoch_length⌋ + 1`, 1-based.
pub fn current_epoch(now: Time, cfg: &PoolConfig) -> Result<u64> {
    if now < cfg.starting_time {
        return Err(EngineError::InvalidTime);
    }
    let elapsed = now - cfg.starting_time;
    Ok((elapsed / cfg.epoch_length) as u64 + 1)
}

/// The linear cumulative-sold target at time `t`, clamped to the sale
/// window.
pub fn expected_sold(t: Time, cfg: &PoolConfig) -> U256 {
    let clamped = t.clamp(cfg.starting_time, cfg.ending_time);
    let elapsed = (clamped - cfg.starting_time) as u64;
    let window = (cfg.ending_time - cfg.starting_time) as u64;
    cfg.num_tokens_to_sell * U256::from(elapsed) / U256::from(window)
}

/// `(end_tick - start_tick) * 1e18 / total_epochs`, Q18 fixed point, signed
/// by direction (matches `start_tick`/`end_tick`'s relative order).
pub fn max_tick_delta_per_epoch_q18(cfg: &PoolConfig) -> Result<I256> {
    let delta = I256::from((cfg.end_tick as i64) - (cfg.start_tick as i64));
    let wad = I256::from(crate::libraries::fixed_point::WAD);
    let scaled = delta.checked_mul(wad).ok_or(EngineError::MathOverflow)?;
    scaled
        .checked_div(I256::from(cfg.total_epochs() as i64))
        .ok_or(EngineError::MathOverflow)
}

/// The schedule's target amount sold per epoch (constant, since the
/// schedule is linear in time).
pub fn expected_step(cfg: &PoolConfig) -> U256 {
    cfg.num_tokens_to_sell / U256::from(cfg.total_epochs())
}

/// Recomputes `tick_accumulator` for a rebalance that spans `epochs_passed`
/// epochs (normally 1; more if a pool went untraded for several epochs).
///
/// Sign convention: the raw schedule term `max_tick_delta_per_epoch *
/// epoch` already carries the correct sign to move price from `start_tick`
/// toward `end_tick` in either orientation (`end_tick - start_tick`'s sign
/// flips with `is_token_0`, by construction — see `PoolConfig::new`). The
/// correction below negates that same signed quantity so that "lagging
/// sales" (`dutch_auction_amount > 0`) always pushes the *effective* price
/// away from `end_tick` (cheaper), and "leading sales" pushes it toward
/// `end_tick` (more expensive), independent of orientation: this is the
/// single algebra spec.md's orientation open question asks for, rather than
/// a per-branch special case. See DESIGN.md.
pub fn apply_dutch_auction_correction(
    cfg: &PoolConfig,
    now: Time,
    epochs_passed: u64,
    tick_accumulator: I256,
    total_tokens_sold: U256,
    total_tokens_sold_last_epoch: U256,
) -> Result<I256> {
    let max_delta = max_tick_delta_per_epoch_q18(cfg)?;

    let net_sold_in_epoch = u256_to_i256(total_tokens_sold)?
        .checked_sub(u256_to_i256(total_tokens_sold_last_epoch)?)
        .ok_or(EngineError::MathOverflow)?;

    if net_sold_in_epoch == I256::ZERO {
        let advance = max_delta
            .checked_mul(I256::from(epochs_passed as i64))
            .ok_or(EngineError::MathOverflow)?;
        return tick_accumulator
            .checked_add(advance)
            .ok_or(EngineError::MathOverflow);
    }

    let window_start = now - (epochs_passed as i64) * cfg.epoch_length;
    let dutch_auction_amount = u256_to_i256(expected_sold(now, cfg))?
        .checked_sub(u256_to_i256(expected_sold(window_start, cfg))?)
        .ok_or(EngineError::MathOverflow)?
        .checked_sub(net_sold_in_epoch)
        .ok_or(EngineError::MathOverflow)?;

    let step = u256_to_i256(expected_step(cfg))?;
    if step == I256::ZERO {
        return Ok(tick_accumulator);
    }

    let raw = max_delta
        .checked_mul(dutch_auction_amount)
        .and_then(|v| v.checked_div(step))
        .ok_or(EngineError::MathOverflow)?;

    let bound = max_delta
        .checked_mul(I256::from(epochs_passed as i64))
        .ok_or(EngineError::MathOverflow)?
        .abs();
    let clamped = raw.clamp(-bound, bound);
    let delta = -clamped;

    tick_accumulator
        .checked_add(delta)
        .ok_or(EngineError::MathOverflow)
}

/// The current epoch's anchor tick: the schedule tick plus the accumulator
/// correction, aligned toward `end_tick`.
pub fn anchor_tick(cfg: &PoolConfig, tick_accumulator: I256, current_epoch: u64) -> Result<Tick> {
    let max_delta = max_tick_delta_per_epoch_q18(cfg)?;
    let scheduled = max_delta
        .checked_mul(I256::from(current_epoch as i64))
        .ok_or(EngineError::MathOverflow)?
        .checked_add(tick_accumulator)
        .ok_or(EngineError::MathOverflow)?;
    let wad = I256::from(crate::libraries::fixed_point::WAD);
    let ticks = (scheduled / wad)
        .as_i32();
    let raw = cfg
        .start_tick
        .checked_add(ticks)
        .ok_or(EngineError::MathOverflow)?;
    Ok(align_to_spacing(raw, cfg.tick_spacing, cfg.end_tick))
}
