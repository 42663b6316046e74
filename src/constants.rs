//! Protocol-wide bounds, mirroring the teacher's practice of collecting
//! magic numbers in one place (see `states::pool::REWARD_NUM`,
//! `tick_array::TICK_ARRAY_SIZE`, etc.) rather than scattering them.

/// Maximum number of price-discovery slugs (PD_1..PD_N) an epoch may hold.
pub const MAX_PRICE_DISCOVERY_SLUGS: u8 = 15;

/// Maximum tick spacing the engine will configure a pool with.
pub const MAX_TICK_SPACING: i32 = 30;

/// Parts-per-million scale fees are expressed in.
pub const MAX_FEE: u32 = 1_000_000;
