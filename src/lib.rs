//! A dynamic bonding-curve price-discovery rebalancer for a single
//! concentrated-liquidity pool.
//!
//! The engine is attached to an AMM pool as a hook. It never executes swap
//! math itself — that stays with the host AMM (`libraries` only provides
//! the tick/price conversions the engine needs to size its own liquidity).
//! On every swap it removes whatever liquidity it is currently holding,
//! advances the sale schedule, rebuilds the LOWER/UPPER/PD_1..N positions
//! for the new epoch, and re-places them before control returns to the AMM.
//!
//! ```text
//! PoolConfig::new(..)        -> validated, immutable sale parameters
//! DopplerEngine::new(cfg, amm, airlock)
//!   .before_swap(host, caller, now, params)   // remove -> rebalance -> re-add
//!   .after_swap(caller, delta)                // fee-excluded accounting
//!   .exit(host, caller)                       // airlock-only, post-maturity
//!   .collect_protocol_fees(host, caller)
//! ```

pub mod accounting;
pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod libraries;
pub mod maturity;
pub mod orientation;
pub mod rebalancer;
pub mod schedule;
pub mod slugs;
pub mod state;

pub use config::PoolConfig;
pub use error::{EngineError, Result};
pub use hooks::{ActorId, AmmHost, ExitReceipt, SwapDelta, SwapDirection, SwapParams};
pub use orientation::Orientation;
pub use rebalancer::DopplerEngine;
pub use slugs::Position;
pub use state::{EngineState, PoolPhase};

/// Emits a trace line when the `logging` feature is enabled; a no-op
/// otherwise, mirroring the teacher's `enable-log`-gated `msg!` calls.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        log::trace!($($arg)*);
    };
}
