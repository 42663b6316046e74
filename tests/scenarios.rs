//! End-to-end scenarios from spec.md §8, driven against an in-memory
//! `AmmHost` double. Swap execution itself (the AMM's own tick math) is out
//! of scope for this crate, so these tests drive `before_swap`/`after_swap`
//! directly with the deltas a real AMM would have reported, the same
//! boundary the unit tests in `rebalancer`/`maturity` use.

use doppler_engine::{
    ActorId, AmmHost, DopplerEngine, EngineError, PoolConfig, PoolPhase, Position, SwapDelta,
    SwapDirection, SwapParams,
};

const AMM: ActorId = [1u8; 32];
const AIRLOCK: ActorId = [2u8; 32];

struct SimHost {
    sqrt_price: u128,
    tick: i32,
}

impl SimHost {
    fn at_tick(tick: i32) -> Self {
        SimHost {
            sqrt_price: doppler_engine::libraries::get_sqrt_price_at_tick(tick).unwrap(),
            tick,
        }
    }
}

impl AmmHost for SimHost {
    fn add_liquidity(&mut self, _position: &Position) -> doppler_engine::Result<(u64, u64)> {
        Ok((0, 0))
    }
    fn remove_liquidity(
        &mut self,
        _position: &Position,
    ) -> doppler_engine::Result<(u64, u64, u64, u64)> {
        Ok((0, 0, 0, 0))
    }
    fn slot0(&self) -> doppler_engine::Result<(u128, i32)> {
        Ok((self.sqrt_price, self.tick))
    }
    fn transfer_out(
        &mut self,
        _to: ActorId,
        _asset_amount: u64,
        _numeraire_amount: u64,
    ) -> doppler_engine::Result<()> {
        Ok(())
    }
}

fn scenario_config(minimum_proceeds: u64, maximum_proceeds: u64) -> PoolConfig {
    PoolConfig::new(
        true,
        doppler_engine::libraries::U256::from(100_000u64) * doppler_engine::libraries::U256::from(10u64).pow(doppler_engine::libraries::U256::from(18u64)),
        doppler_engine::libraries::U256::from(minimum_proceeds),
        doppler_engine::libraries::U256::from(maximum_proceeds),
        86_400,
        172_800,
        400,
        1600,
        -171_200,
        800,
        3,
        8,
    )
    .unwrap()
}

/// Scenario A — no trades, tick advances by schedule alone.
#[test]
fn scenario_a_no_trades_tick_advances_by_schedule() {
    let cfg = scenario_config(0, 1_000_000_000_000_000_000u64);
    let mut engine = DopplerEngine::new(cfg, AMM, AIRLOCK);
    let mut host = SimHost::at_tick(1600);

    let now = engine.cfg.starting_time + 3 * engine.cfg.epoch_length;
    engine
        .before_swap(
            &mut host,
            AMM,
            now,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap();

    assert_eq!(engine.state.phase, PoolPhase::Active);
    assert_eq!(engine.state.last_epoch, 4);
    assert_eq!(engine.state.total_tokens_sold, doppler_engine::libraries::U256::zero());
    // UPPER slug placed, strictly below start_tick (toward end_tick).
    assert!(engine.state.positions[1].tick_upper <= engine.cfg.start_tick);
}

/// Scenario B — a buy followed by a sell of the same asset within one
/// epoch nets back out: tokens sold and proceeds both return to (near) the
/// pre-trade value, with only the fee share left behind in
/// `fees_accrued_*`.
#[test]
fn scenario_b_buy_then_sell_within_epoch_nets_out() {
    let cfg = scenario_config(0, 1_000_000_000_000_000_000u64);
    let mut engine = DopplerEngine::new(cfg, AMM, AIRLOCK);
    let mut host = SimHost::at_tick(1600);

    let now = engine.cfg.starting_time;
    engine
        .before_swap(
            &mut host,
            AMM,
            now,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap();
    engine
        .after_swap(
            AMM,
            SwapDelta {
                asset_delta: -1_000,
                numeraire_delta: 10,
                swap_fee_ppm: 0,
            },
        )
        .unwrap();

    let sold_after_buy = engine.state.total_tokens_sold;
    let proceeds_after_buy = engine.state.total_proceeds;
    assert!(sold_after_buy > doppler_engine::libraries::U256::zero());
    assert!(proceeds_after_buy > doppler_engine::libraries::U256::zero());

    engine
        .before_swap(
            &mut host,
            AMM,
            now + 1,
            SwapParams {
                direction: SwapDirection::Sell,
                amount_specified: 1,
            },
        )
        .unwrap();
    engine
        .after_swap(
            AMM,
            SwapDelta {
                asset_delta: 1_000,
                numeraire_delta: -10,
                swap_fee_ppm: 0,
            },
        )
        .unwrap();

    assert_eq!(engine.state.total_tokens_sold, doppler_engine::libraries::U256::zero());
    assert_eq!(engine.state.total_proceeds, doppler_engine::libraries::U256::zero());
}

/// Scenario C — early exit once proceeds cross `maximum_proceeds`.
#[test]
fn scenario_c_early_exit_blocks_further_swaps_until_migration() {
    let cfg = scenario_config(0, 10);
    let mut engine = DopplerEngine::new(cfg, AMM, AIRLOCK);
    let mut host = SimHost::at_tick(1600);

    let now = engine.cfg.starting_time;
    engine
        .before_swap(
            &mut host,
            AMM,
            now,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap();
    engine
        .after_swap(
            AMM,
            SwapDelta {
                asset_delta: -5_000,
                numeraire_delta: 11,
                swap_fee_ppm: 0,
            },
        )
        .unwrap();

    assert_eq!(engine.state.phase, PoolPhase::EarlyExit);

    let err = engine
        .before_swap(
            &mut host,
            AMM,
            now + 1,
            SwapParams {
                direction: SwapDirection::Sell,
                amount_specified: 1,
            },
        )
        .unwrap_err();
    assert_eq!(err, EngineError::MaximumProceedsReached);

    let receipt = engine.exit(&mut host, AIRLOCK).unwrap();
    assert_eq!(receipt.is_token_0, true);
    assert!(engine.state.exited);
    assert!(engine.exit(&mut host, AIRLOCK).is_err());
}

/// Scenario D — insufficient proceeds at maturity: buys rejected, sells
/// keep working.
#[test]
fn scenario_d_matured_fail_rejects_buys_allows_sells() {
    // No swap ever raises `total_proceeds` above zero, so any positive
    // `minimum_proceeds` leaves the sale short at maturity.
    let cfg = scenario_config(1, 1_000_000u64 * 10u64.pow(9));
    let mut engine = DopplerEngine::new(cfg, AMM, AIRLOCK);
    let mut host = SimHost::at_tick(-171_200);

    let at_maturity = engine.cfg.ending_time;
    let buy_err = engine
        .before_swap(
            &mut host,
            AMM,
            at_maturity,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap_err();
    assert_eq!(buy_err, EngineError::InvalidSwapAfterMaturityInsufficientProceeds);
    assert_eq!(engine.state.phase, PoolPhase::MaturedFail);

    engine
        .before_swap(
            &mut host,
            AMM,
            at_maturity,
            SwapParams {
                direction: SwapDirection::Sell,
                amount_specified: 1,
            },
        )
        .unwrap();
}

/// Scenario E — success path: proceeds land between `minimum_proceeds` and
/// `maximum_proceeds`, buys revert at maturity, and the airlock's `exit`
/// call sweeps the remaining positions.
#[test]
fn scenario_e_matured_success_allows_airlock_exit() {
    let cfg = scenario_config(10, 1_000_000u64 * 10u64.pow(9));
    let mut engine = DopplerEngine::new(cfg, AMM, AIRLOCK);
    let mut host = SimHost::at_tick(1600);

    let now = engine.cfg.starting_time;
    engine
        .before_swap(
            &mut host,
            AMM,
            now,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap();
    engine
        .after_swap(
            AMM,
            SwapDelta {
                asset_delta: -5_000,
                numeraire_delta: 11,
                swap_fee_ppm: 0,
            },
        )
        .unwrap();
    assert!(engine.state.total_proceeds >= engine.cfg.minimum_proceeds);
    assert!(engine.state.total_proceeds < engine.cfg.maximum_proceeds);
    assert_eq!(engine.state.phase, PoolPhase::Active);

    let at_maturity = engine.cfg.ending_time;
    let buy_err = engine
        .before_swap(
            &mut host,
            AMM,
            at_maturity,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap_err();
    assert_eq!(buy_err, EngineError::InvalidSwapAfterMaturitySufficientProceeds);
    assert_eq!(engine.state.phase, PoolPhase::MaturedSuccess);

    let receipt = engine.exit(&mut host, AIRLOCK).unwrap();
    assert_eq!(receipt.is_token_0, true);
    assert!(engine.state.exited);
    assert!(engine.exit(&mut host, AIRLOCK).is_err());
}

/// Scenario F — two swaps in the same epoch leave the schedule state
/// untouched; only the running totals move.
#[test]
fn scenario_f_same_epoch_rebalance_is_a_no_op_on_schedule_state() {
    let cfg = scenario_config(0, 1_000_000u64 * 10u64.pow(9));
    let mut engine = DopplerEngine::new(cfg, AMM, AIRLOCK);
    let mut host = SimHost::at_tick(1600);

    let now = engine.cfg.starting_time;
    engine
        .before_swap(
            &mut host,
            AMM,
            now,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap();
    engine
        .after_swap(
            AMM,
            SwapDelta {
                asset_delta: -1_000,
                numeraire_delta: 10,
                swap_fee_ppm: 0,
            },
        )
        .unwrap();

    let epoch_after_first = engine.state.last_epoch;
    let accumulator_after_first = engine.state.tick_accumulator;

    engine
        .before_swap(
            &mut host,
            AMM,
            now + 1,
            SwapParams {
                direction: SwapDirection::Buy,
                amount_specified: 1,
            },
        )
        .unwrap();

    assert_eq!(engine.state.last_epoch, epoch_after_first);
    assert_eq!(engine.state.tick_accumulator, accumulator_after_first);
}
