//! Tagged errors surfaced by the engine. Every fallible engine operation
//! returns one of these; the host is expected to roll back the enclosing
//! swap/transaction atomically on any of them, the way the teacher's
//! `ErrorCode` aborts the enclosing Anchor instruction.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    // --- Configuration errors (constructor only) ---
    #[error("tick_lower must be below tick_upper, and tick direction must match is_token_0")]
    InvalidTickRange,
    #[error("gamma must be a nonzero multiple of tick spacing whose product with total_epochs exactly spans start_tick..end_tick")]
    InvalidGamma,
    #[error("(ending_time - starting_time) must be a positive multiple of epoch_length")]
    InvalidEpochLength,
    #[error("starting_time must be strictly before ending_time")]
    InvalidTimeRange,
    #[error("tick_spacing must be in 1..=MAX_TICK_SPACING")]
    InvalidTickSpacing,
    #[error("num_pd_slugs must be in 1..=MAX_PRICE_DISCOVERY_SLUGS")]
    InvalidNumPDSlugs,
    #[error("minimum_proceeds must not exceed maximum_proceeds")]
    InvalidProceedLimits,

    // --- Guard errors (per swap) ---
    #[error("swap attempted outside the configured sale window")]
    InvalidTime,
    #[error("swap would cross below the lower slug's lower tick")]
    SwapBelowRange,
    #[error("pool matured with proceeds below minimum_proceeds; only sells are allowed")]
    InvalidSwapAfterMaturityInsufficientProceeds,
    #[error("pool matured with proceeds at or above minimum_proceeds; no further swaps are allowed")]
    InvalidSwapAfterMaturitySufficientProceeds,

    // --- Authorization errors ---
    #[error("caller is not authorized to perform this action")]
    Unauthorized,

    // --- Terminal-state errors ---
    #[error("maximum_proceeds already reached; sale is in early exit")]
    MaximumProceedsReached,
    #[error("exit preconditions are not met (pool is neither EarlyExit nor MaturedSuccess)")]
    CannotMigrate,

    // --- Arithmetic errors ---
    #[error("arithmetic overflow or underflow")]
    MathOverflow,
    #[error("a tick value is outside the representable MIN_TICK..=MAX_TICK range")]
    TickOutOfRange,
    #[error("a sqrt price value is outside the representable range")]
    SqrtPriceOutOfRange,
}

pub type Result<T> = core::result::Result<T, EngineError>;
