//! C6 — what happens once the window closes: a success/early-exit migration
//! handoff to the airlock, or conversion into a sell-only redemption AMM.

use crate::error::{EngineError, Result};
use crate::hooks::{ActorId, AmmHost, ExitReceipt};
use crate::rebalancer::DopplerEngine;
use crate::state::PoolPhase;

impl DopplerEngine {
    /// Callable only by the airlock, only once, only in `EarlyExit` or
    /// `MaturedSuccess`. Removes all positions and reports the residual
    /// balances for the airlock to sweep.
    pub fn exit<H: AmmHost>(&mut self, host: &mut H, caller: ActorId) -> Result<ExitReceipt> {
        if caller != self.airlock_id {
            return Err(EngineError::Unauthorized);
        }
        if !matches!(self.state.phase, PoolPhase::EarlyExit | PoolPhase::MaturedSuccess) {
            return Err(EngineError::CannotMigrate);
        }
        if self.state.exited {
            return Err(EngineError::CannotMigrate);
        }

        let mut asset_amount: u64 = 0;
        let mut numeraire_amount: u64 = 0;
        for position in std::mem::take(&mut self.state.positions) {
            if position.is_empty() {
                continue;
            }
            let (asset, numeraire, fee_asset, fee_numeraire) = host.remove_liquidity(&position)?;
            asset_amount = asset_amount.checked_add(asset).ok_or(EngineError::MathOverflow)?;
            numeraire_amount = numeraire_amount
                .checked_add(numeraire)
                .ok_or(EngineError::MathOverflow)?;
            self.state.fees_accrued_asset = self
                .state
                .fees_accrued_asset
                .checked_add(crate::libraries::U256::from(fee_asset))
                .ok_or(EngineError::MathOverflow)?;
            self.state.fees_accrued_numeraire = self
                .state
                .fees_accrued_numeraire
                .checked_add(crate::libraries::U256::from(fee_numeraire))
                .ok_or(EngineError::MathOverflow)?;
        }

        let (sqrt_price_at_exit, _tick) = host.slot0()?;
        host.transfer_out(caller, asset_amount, numeraire_amount)?;

        let fees_asset = crate::libraries::u256_to_u64(self.state.fees_accrued_asset)?;
        let fees_numeraire = crate::libraries::u256_to_u64(self.state.fees_accrued_numeraire)?;

        self.state.exited = true;

        Ok(ExitReceipt {
            sqrt_price_at_exit,
            asset_amount,
            numeraire_amount,
            fees_asset,
            fees_numeraire,
            is_token_0: self.cfg.is_token_0,
        })
    }

    /// Transfers accrued protocol fees to the airlock and zeroes the
    /// running totals. Survives every error path except a revert of the
    /// swap that produced the fees (per spec.md §7).
    pub fn collect_protocol_fees<H: AmmHost>(
        &mut self,
        host: &mut H,
        caller: ActorId,
    ) -> Result<(u64, u64)> {
        if caller != self.airlock_id {
            return Err(EngineError::Unauthorized);
        }
        let asset = crate::libraries::u256_to_u64(self.state.fees_accrued_asset)?;
        let numeraire = crate::libraries::u256_to_u64(self.state.fees_accrued_numeraire)?;

        host.transfer_out(caller, asset, numeraire)?;

        self.state.fees_accrued_asset = crate::libraries::U256::zero();
        self.state.fees_accrued_numeraire = crate::libraries::U256::zero();
        Ok((asset, numeraire))
    }
}
