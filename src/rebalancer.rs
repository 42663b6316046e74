//! C4 — the state machine every swap runs through: remove → rebalance →
//! re-add, enforcing the time-window and range guards from spec.md §4.4.

use crate::accounting::principal_and_fee;
use crate::config::{PoolConfig, Time};
use crate::error::{EngineError, Result};
use crate::hooks::{ActorId, AmmHost, SwapDelta, SwapDirection, SwapParams};
use crate::libraries::U256;
use crate::schedule;
use crate::slugs::{self, Position};
use crate::state::{EngineState, PoolPhase};

fn add_signed(base: U256, delta: i128) -> Result<U256> {
    if delta >= 0 {
        base.checked_add(U256::from(delta as u128))
            .ok_or(EngineError::MathOverflow)
    } else {
        base.checked_sub(U256::from((-delta) as u128))
            .ok_or(EngineError::MathOverflow)
    }
}

/// The price-discovery rebalancer for a single pool. One instance per pool,
/// per spec.md's "engine is a per-pool value" design note — no process-wide
/// registry.
pub struct DopplerEngine {
    pub cfg: PoolConfig,
    pub amm_id: ActorId,
    pub airlock_id: ActorId,
    pub state: EngineState,
}

impl DopplerEngine {
    pub fn new(cfg: PoolConfig, amm_id: ActorId, airlock_id: ActorId) -> Self {
        let state = EngineState::new(&cfg);
        DopplerEngine {
            cfg,
            amm_id,
            airlock_id,
            state,
        }
    }

    fn require_amm(&self, caller: ActorId) -> Result<()> {
        if caller != self.amm_id {
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }

    /// `before_add_liquidity(pool_key, sender)`: only the engine's own
    /// rebalance may add liquidity. `sender_is_engine` is the scoped token
    /// the host threads through its reentrant add-liquidity call (see
    /// spec.md's "reentrancy into add-liquidity" design note); nothing
    /// outside this module ever sets it.
    pub fn before_add_liquidity(&self, sender_is_engine: bool) -> Result<()> {
        if sender_is_engine {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    fn remove_all_positions<H: AmmHost>(&mut self, host: &mut H) -> Result<()> {
        for position in std::mem::take(&mut self.state.positions) {
            if position.is_empty() {
                continue;
            }
            let (_asset, _numeraire, fee_asset, fee_numeraire) = host.remove_liquidity(&position)?;
            self.state.fees_accrued_asset = self
                .state
                .fees_accrued_asset
                .checked_add(U256::from(fee_asset))
                .ok_or(EngineError::MathOverflow)?;
            self.state.fees_accrued_numeraire = self
                .state
                .fees_accrued_numeraire
                .checked_add(U256::from(fee_numeraire))
                .ok_or(EngineError::MathOverflow)?;
        }
        Ok(())
    }

    fn place_positions<H: AmmHost>(&mut self, host: &mut H, positions: Vec<Position>) -> Result<()> {
        for position in &positions {
            if !position.is_empty() {
                host.add_liquidity(position)?;
            }
        }
        self.state.positions = positions;
        Ok(())
    }

    fn rebalance<H: AmmHost>(&mut self, host: &mut H, now: Time) -> Result<()> {
        self.remove_all_positions(host)?;

        let current_epoch = schedule::current_epoch(now, &self.cfg)?;
        if self.state.last_epoch == 0 {
            self.state.last_epoch = current_epoch;
        } else if current_epoch > self.state.last_epoch {
            let epochs_passed = current_epoch - self.state.last_epoch;
            self.state.tick_accumulator = schedule::apply_dutch_auction_correction(
                &self.cfg,
                now,
                epochs_passed,
                self.state.tick_accumulator,
                self.state.total_tokens_sold,
                self.state.total_tokens_sold_last_epoch,
            )?;
            self.state.total_tokens_sold_last_epoch = self.state.total_tokens_sold;
            self.state.last_epoch = current_epoch;
            crate::trace!(
                "advanced to epoch {} (tick_accumulator = {})",
                current_epoch,
                self.state.tick_accumulator
            );
        }

        let anchor = schedule::anchor_tick(&self.cfg, self.state.tick_accumulator, current_epoch)?;
        let (_sqrt_price, current_tick) = host.slot0()?;
        let positions = slugs::build_slugs(
            &self.cfg,
            anchor,
            current_tick,
            now,
            self.state.total_tokens_sold,
            self.state.total_proceeds,
        )?;
        self.place_positions(host, positions)
    }

    /// Implements spec.md §4.4's `before_swap` protocol.
    pub fn before_swap<H: AmmHost>(
        &mut self,
        host: &mut H,
        caller: ActorId,
        now: Time,
        params: SwapParams,
    ) -> Result<()> {
        self.require_amm(caller)?;

        match self.state.phase {
            PoolPhase::EarlyExit => return Err(EngineError::MaximumProceedsReached),
            PoolPhase::MaturedSuccess => {
                return Err(EngineError::InvalidSwapAfterMaturitySufficientProceeds)
            }
            PoolPhase::MaturedFail => {
                return match params.direction {
                    SwapDirection::Buy => {
                        Err(EngineError::InvalidSwapAfterMaturityInsufficientProceeds)
                    }
                    SwapDirection::Sell => Ok(()),
                };
            }
            PoolPhase::Unstarted => {
                if now < self.cfg.starting_time {
                    return Err(EngineError::InvalidTime);
                }
                self.state.phase = PoolPhase::Active;
            }
            PoolPhase::Active => {}
        }

        if now >= self.cfg.ending_time {
            if self.state.total_proceeds >= self.cfg.minimum_proceeds {
                self.state.phase = PoolPhase::MaturedSuccess;
                return Err(EngineError::InvalidSwapAfterMaturitySufficientProceeds);
            } else {
                self.state.phase = PoolPhase::MaturedFail;
                return match params.direction {
                    SwapDirection::Buy => {
                        Err(EngineError::InvalidSwapAfterMaturityInsufficientProceeds)
                    }
                    SwapDirection::Sell => Ok(()),
                };
            }
        }

        if params.direction == SwapDirection::Sell {
            if let Some(lower) = self.state.positions.first() {
                if !lower.is_empty() {
                    let (_, current_tick) = host.slot0()?;
                    if current_tick < lower.tick_lower {
                        return Err(EngineError::SwapBelowRange);
                    }
                }
            }
        }

        self.rebalance(host, now)
    }

    /// Implements spec.md §4.5's accounting update.
    pub fn after_swap(&mut self, caller: ActorId, delta: SwapDelta) -> Result<()> {
        self.require_amm(caller)?;

        let (asset_principal, asset_fee) = if delta.asset_delta > 0 {
            principal_and_fee(delta.asset_delta as u64, delta.swap_fee_ppm)?
        } else {
            ((-delta.asset_delta) as u64, 0)
        };
        let (numeraire_principal, numeraire_fee) = if delta.numeraire_delta > 0 {
            principal_and_fee(delta.numeraire_delta as u64, delta.swap_fee_ppm)?
        } else {
            ((-delta.numeraire_delta) as u64, 0)
        };

        let signed_asset = if delta.asset_delta > 0 {
            asset_principal as i128
        } else {
            -(asset_principal as i128)
        };
        let signed_numeraire = if delta.numeraire_delta > 0 {
            numeraire_principal as i128
        } else {
            -(numeraire_principal as i128)
        };

        // asset leaving the pool (negative signed_asset) is asset sold.
        self.state.total_tokens_sold = add_signed(self.state.total_tokens_sold, -signed_asset)?;
        self.state.total_proceeds = add_signed(self.state.total_proceeds, signed_numeraire)?;

        self.state.fees_accrued_asset = self
            .state
            .fees_accrued_asset
            .checked_add(U256::from(asset_fee))
            .ok_or(EngineError::MathOverflow)?;
        self.state.fees_accrued_numeraire = self
            .state
            .fees_accrued_numeraire
            .checked_add(U256::from(numeraire_fee))
            .ok_or(EngineError::MathOverflow)?;

        if self.state.phase == PoolPhase::Active
            && self.state.total_proceeds >= self.cfg.maximum_proceeds
        {
            self.state.phase = PoolPhase::EarlyExit;
            crate::trace!("maximum_proceeds reached, pool entered EarlyExit");
        }

        Ok(())
    }
}
