//! Immutable sale configuration, validated once at construction — the
//! engine's equivalent of the teacher's `create_amm_config`/`create_pool`
//! argument checks in `instructions/`.

use crate::constants::{MAX_PRICE_DISCOVERY_SLUGS, MAX_TICK_SPACING};
use crate::error::{EngineError, Result};
use crate::libraries::U256;
use crate::orientation::Orientation;

pub type Tick = i32;
pub type Time = i64;
pub type Duration = i64;

/// Configuration the sale is constructed with; immutable for its lifetime.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub is_token_0: bool,
    pub num_tokens_to_sell: U256,
    pub minimum_proceeds: U256,
    pub maximum_proceeds: U256,
    pub starting_time: Time,
    pub ending_time: Time,
    pub epoch_length: Duration,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub gamma: Tick,
    pub num_pd_slugs: u8,
    pub tick_spacing: Tick,
    /// `(ending_time - starting_time) / epoch_length`. Derived, not
    /// independently settable.
    total_epochs: u64,
}

impl PoolConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        is_token_0: bool,
        num_tokens_to_sell: U256,
        minimum_proceeds: U256,
        maximum_proceeds: U256,
        starting_time: Time,
        ending_time: Time,
        epoch_length: Duration,
        start_tick: Tick,
        end_tick: Tick,
        gamma: Tick,
        num_pd_slugs: u8,
        tick_spacing: Tick,
    ) -> Result<Self> {
        if ending_time <= starting_time {
            return Err(EngineError::InvalidTimeRange);
        }
        if minimum_proceeds > maximum_proceeds {
            return Err(EngineError::InvalidProceedLimits);
        }
        if !(1..=MAX_TICK_SPACING).contains(&tick_spacing) {
            return Err(EngineError::InvalidTickSpacing);
        }
        if !(1..=MAX_PRICE_DISCOVERY_SLUGS).contains(&num_pd_slugs) {
            return Err(EngineError::InvalidNumPDSlugs);
        }

        let window = ending_time - starting_time;
        if epoch_length <= 0 || window % epoch_length != 0 {
            return Err(EngineError::InvalidEpochLength);
        }
        let total_epochs = (window / epoch_length) as u64;

        if is_token_0 {
            if start_tick <= end_tick {
                return Err(EngineError::InvalidTickRange);
            }
        } else if start_tick >= end_tick {
            return Err(EngineError::InvalidTickRange);
        }

        if gamma == 0 || gamma % tick_spacing != 0 {
            return Err(EngineError::InvalidGamma);
        }
        // spec.md: "`(gamma × total_epochs)` must exactly cover `|end_tick −
        // start_tick|`" — magnitudes, not signed values: gamma's sign tracks
        // direction independently (see Orientation::direction_sign), so a
        // config with start_tick > end_tick still takes a positive gamma.
        let tick_delta = (end_tick as i64) - (start_tick as i64);
        let gamma_span = (gamma as i64)
            .checked_mul(total_epochs as i64)
            .ok_or(EngineError::MathOverflow)?;
        if gamma_span.abs() != tick_delta.abs() {
            return Err(EngineError::InvalidGamma);
        }

        Ok(Self {
            is_token_0,
            num_tokens_to_sell,
            minimum_proceeds,
            maximum_proceeds,
            starting_time,
            ending_time,
            epoch_length,
            start_tick,
            end_tick,
            gamma,
            num_pd_slugs,
            tick_spacing,
            total_epochs,
        })
    }

    pub fn total_epochs(&self) -> u64 {
        self.total_epochs
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.is_token_0)
    }
}
