//! C4 persistent state: everything the engine remembers between swaps.

use crate::config::PoolConfig;
use crate::libraries::U256;
use crate::slugs::Position;
use ethnum::I256;

/// Lifecycle phase, driven only by `before_swap` and the host clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPhase {
    Unstarted,
    Active,
    EarlyExit,
    MaturedSuccess,
    MaturedFail,
}

/// The engine's only persistent record. Created once by the constructor,
/// mutated only from inside `before_swap`/`after_swap`.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub phase: PoolPhase,
    pub last_epoch: u64,
    pub tick_accumulator: I256,
    pub total_tokens_sold: U256,
    pub total_proceeds: U256,
    pub total_tokens_sold_last_epoch: U256,
    pub fees_accrued_numeraire: U256,
    pub fees_accrued_asset: U256,
    pub positions: Vec<Position>,
    /// Set once `exit` has run, so the airlock cannot migrate the same
    /// residual liquidity twice.
    pub exited: bool,
}

impl EngineState {
    pub fn new(cfg: &PoolConfig) -> Self {
        EngineState {
            phase: PoolPhase::Unstarted,
            last_epoch: 0,
            tick_accumulator: I256::ZERO,
            total_tokens_sold: U256::zero(),
            total_proceeds: U256::zero(),
            total_tokens_sold_last_epoch: U256::zero(),
            fees_accrued_numeraire: U256::zero(),
            fees_accrued_asset: U256::zero(),
            positions: Vec::with_capacity(2 + cfg.num_pd_slugs as usize),
            exited: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.phase, PoolPhase::Unstarted | PoolPhase::Active)
    }
}
