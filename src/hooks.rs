//! The small, language-agnostic surface the engine consumes from its host
//! AMM and exposes to the airlock. Kept as traits so `rebalancer`/`maturity`
//! never talk to a concrete chain SDK — the teacher's Anchor `Accounts`
//! structs play the same separating role for on-chain accounts.

use crate::error::Result;
use crate::slugs::Position;

/// An opaque host-assigned identity (a wallet, program, or contract
/// address). The engine never inspects this beyond equality.
pub type ActorId = [u8; 32];

/// The swap direction from the pool's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Numeraire in, asset out.
    Buy,
    /// Asset in, numeraire out.
    Sell,
}

/// Parameters the AMM passes into `before_swap`/`after_swap`.
#[derive(Debug, Clone, Copy)]
pub struct SwapParams {
    pub direction: SwapDirection,
    pub amount_specified: u64,
}

/// A completed swap's token deltas and the fee the AMM charged, reported by
/// `after_swap`. Signs are from the pool's perspective: positive means the
/// pool received that token.
#[derive(Debug, Clone, Copy)]
pub struct SwapDelta {
    pub asset_delta: i64,
    pub numeraire_delta: i64,
    pub swap_fee_ppm: u32,
}

/// Synchronous, failure-returning AMM primitives the engine drives from
/// inside its hooks. One instance per pool.
pub trait AmmHost {
    /// Adds `position`'s liquidity, returning the `(asset, numeraire)`
    /// amounts pulled from the engine's balances.
    fn add_liquidity(&mut self, position: &Position) -> Result<(u64, u64)>;

    /// Removes `position`'s liquidity, returning the `(asset, numeraire)`
    /// amounts returned plus any fees the position had accrued.
    fn remove_liquidity(&mut self, position: &Position) -> Result<(u64, u64, u64, u64)>;

    /// `(sqrt_price, current_tick)` of the pool right now.
    fn slot0(&self) -> Result<(u128, i32)>;

    /// Transfers `(asset_amount, numeraire_amount)` out of the engine's
    /// balances to `to` — used by `exit`.
    fn transfer_out(&mut self, to: ActorId, asset_amount: u64, numeraire_amount: u64) -> Result<()>;
}

/// The tuple `exit` hands back to the airlock.
#[derive(Debug, Clone, Copy)]
pub struct ExitReceipt {
    pub sqrt_price_at_exit: u128,
    pub asset_amount: u64,
    pub numeraire_amount: u64,
    pub fees_asset: u64,
    pub fees_numeraire: u64,
    pub is_token_0: bool,
}
