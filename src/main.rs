//! Constant-Product AMM Simulation.
//!
//! Walks a single pool through liquidity provision, swaps, fee changes,
//! guard rejections and a long random-ish trading session.

use cpamm_core::*;
use tracing_subscriber::EnvFilter;

const T0: TokenId = TokenId(0);
const T1: TokenId = TokenId(1);
const POOL_ACCOUNT: HolderId = HolderId(0);
const CONTROLLER: HolderId = HolderId(1);
const NO_DEADLINE: Timestamp = Timestamp(i64::MAX);

type SimPool = Pool<InMemoryLedger, ManualClock>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!("Constant-Product AMM Simulation");
    println!("Single Pool, Two Assets, Full Lifecycle\n");

    scenario_1_first_deposit_and_swap();
    scenario_2_imbalanced_deposits();
    scenario_3_guard_rejections();
    scenario_4_protocol_fee();
    scenario_5_pause();
    scenario_6_round_trip();
    scenario_7_stress_test();

    println!("\nAll simulations completed successfully.");
}

/// Pool with every holder in `holders` funded in both tokens and approved.
fn new_pool(config: PoolConfig, holders: &[HolderId], balance: Amount) -> SimPool {
    let mut ledger = InMemoryLedger::new();
    for &holder in holders {
        for token in [T0, T1] {
            ledger.mint(token, holder, balance).unwrap();
            ledger.approve(token, holder, POOL_ACCOUNT, Amount::MAX);
        }
    }
    Pool::new(config, PoolRuntimeConfig::default(), ledger, ManualClock::default()).unwrap()
}

fn standard_config() -> PoolConfig {
    PoolConfig::standard(T0, T1, POOL_ACCOUNT, CONTROLLER)
}

/// First deposit sets the price, then one swap against it.
fn scenario_1_first_deposit_and_swap() {
    println!("Scenario 1: First Deposit and Swap\n");

    let alice = HolderId(10);
    let bob = HolderId(11);
    let mut pool = new_pool(standard_config(), &[alice, bob], 1_000_000);

    let added = pool.add_liquidity(alice, 1_000, 2_000).unwrap();
    println!("  Alice deposits 1,000 / 2,000, minted {} shares", added.shares_minted);
    println!("  Spot price of token0: {}", pool.spot_price(T0).unwrap().unwrap_or_default());

    let quote = pool.quote_swap(T0, 100).unwrap();
    println!(
        "  Quote 100 token0: out {}, execution price {}, impact {}",
        quote.trader_amount_out,
        quote.execution_price.unwrap_or_default(),
        quote.price_impact.unwrap_or_default()
    );

    let result = pool.swap(bob, T0, 100, 0, NO_DEADLINE).unwrap();
    let (r0, r1) = pool.reserves();
    println!("  Bob swaps 100 token0 for {} token1", result.amount_out);
    println!("  Reserves now {} / {}, k = {}\n", r0, r1, pool.constant_product());
}

/// Later deposits under both deposit policies.
fn scenario_2_imbalanced_deposits() {
    println!("Scenario 2: Imbalanced Deposits\n");

    let alice = HolderId(10);
    let carol = HolderId(12);

    for policy in [DepositPolicy::DonateExcess, DepositPolicy::RefundExcess] {
        let mut pool = new_pool(standard_config().with_deposit_policy(policy), &[alice, carol], 1_000_000);
        pool.add_liquidity(alice, 10_000, 10_000).unwrap();

        let added = pool.add_liquidity(carol, 5_000, 1_000).unwrap();
        let (r0, r1) = pool.reserves();
        println!(
            "  {:?}: Carol offers 5,000 / 1,000, pulled {} / {}, minted {} shares, reserves {} / {}",
            policy, added.amount0, added.amount1, added.shares_minted, r0, r1
        );

        let preview = pool.quote_remove_liquidity(alice, pool.shares_of(alice)).unwrap();
        println!("    Alice's shares now redeem for {} / {}", preview.amount0, preview.amount1);
    }
    println!();
}

/// Deadline, slippage and token checks all reject before anything moves.
fn scenario_3_guard_rejections() {
    println!("Scenario 3: Guard Rejections\n");

    let lp = HolderId(10);
    let trader = HolderId(20);
    let mut pool = new_pool(standard_config(), &[lp, trader], 1_000_000);
    pool.add_liquidity(lp, 100_000, 100_000).unwrap();
    pool.clock_mut().set(Timestamp::from_secs(1_000));

    let attempts = [
        ("expired deadline", pool.swap(trader, T0, 1_000, 0, Timestamp::from_secs(999))),
        ("min out too high", pool.swap(trader, T0, 1_000, 1_000, NO_DEADLINE)),
        ("unknown token", pool.swap(trader, TokenId(99), 1_000, 0, NO_DEADLINE)),
        ("zero input", pool.swap(trader, T0, 0, 0, NO_DEADLINE)),
    ];
    for (label, attempt) in attempts {
        match attempt {
            Ok(r) => println!("  {}: unexpectedly filled {}", label, r.amount_out),
            Err(e) => println!("  {}: {} ({})", label, e.code(), e),
        }
    }

    let (r0, r1) = pool.reserves();
    println!("  Reserves untouched: {} / {}\n", r0, r1);
}

/// Protocol fee carved out of swap output and routed to a treasury.
fn scenario_4_protocol_fee() {
    println!("Scenario 4: Protocol Fee\n");

    let lp = HolderId(10);
    let trader = HolderId(20);
    let treasury = HolderId(30);
    let mut pool = new_pool(standard_config(), &[lp, trader], 10_000_000);
    pool.add_liquidity(lp, 1_000_000, 1_000_000).unwrap();

    if let Err(e) = pool.set_protocol_fee(CONTROLLER, 1_001) {
        println!("  1,001 bps rejected: {}", e.code());
    }
    pool.set_protocol_fee(CONTROLLER, 1_000).unwrap();
    pool.set_fee_recipient(CONTROLLER, Some(treasury)).unwrap();
    let fee = pool.protocol_fee_bps();
    println!("  Protocol fee set to {} ({} of output), recipient {}", fee, fee.as_fraction(), treasury);

    for _ in 0..5 {
        let r = pool.swap(trader, T0, 10_000, 0, NO_DEADLINE).unwrap();
        println!("  Swap 10,000 token0: trader {} token1, protocol {}", r.amount_out, r.protocol_fee);
    }

    println!("  Treasury token1 balance: {}", pool.ledger().balance_of(T1, treasury));
    println!("  Pool backed by ledger: {}\n", pool.verify_backing());
}

/// Pause blocks trading and liquidity, admin keeps working.
fn scenario_5_pause() {
    println!("Scenario 5: Pause\n");

    let lp = HolderId(10);
    let mut pool = new_pool(standard_config(), &[lp], 1_000_000);
    pool.add_liquidity(lp, 10_000, 10_000).unwrap();

    pool.pause(CONTROLLER).unwrap();
    let blocked = pool.swap(lp, T0, 100, 0, NO_DEADLINE);
    println!("  Swap while paused: {:?}", blocked.map_err(|e| e.code()));
    let blocked = pool.remove_liquidity(lp, 1);
    println!("  Remove while paused: {:?}", blocked.map_err(|e| e.code()));

    pool.set_protocol_fee(CONTROLLER, 50).unwrap();
    pool.transfer_control(CONTROLLER, HolderId(2)).unwrap();
    pool.unpause(HolderId(2)).unwrap();
    println!("  Controller handed to {}, pool unpaused: {}", pool.controller(), !pool.is_paused());

    let removed = pool.remove_liquidity(lp, pool.shares_of(lp)).unwrap();
    println!("  LP exits with {} / {}, pool empty: {}\n", removed.amount0, removed.amount1, pool.total_shares() == 0);
}

/// Swapping there and back always loses to fees and rounding.
fn scenario_6_round_trip() {
    println!("Scenario 6: Round Trip\n");

    let lp = HolderId(10);
    let trader = HolderId(20);
    let mut pool = new_pool(standard_config(), &[lp, trader], 10_000_000);
    pool.add_liquidity(lp, 1_000_000, 3_000_000).unwrap();

    let there = pool.swap(trader, T0, 50_000, 0, NO_DEADLINE).unwrap();
    let back = pool.swap(trader, T1, there.amount_out, 0, NO_DEADLINE).unwrap();
    println!("  50,000 token0 -> {} token1 -> {} token0", there.amount_out, back.amount_out);
    println!("  Lost {} token0 to fees and rounding\n", 50_000 - back.amount_out);
}

/// Many traders, alternating directions, invariants checked at the end.
fn scenario_7_stress_test() {
    println!("Scenario 7: Stress Test\n");

    let lp = HolderId(10);
    let traders: Vec<HolderId> = (100..120).map(HolderId).collect();
    let mut holders = traders.clone();
    holders.push(lp);

    let config = standard_config().with_protocol_fee(500, HolderId(30));
    let mut pool = new_pool(config, &holders, 1_000_000_000);
    pool.add_liquidity(lp, 50_000_000, 100_000_000).unwrap();
    let k_start = pool.constant_product();

    let mut swaps = 0;
    let mut rejected = 0;
    for round in 0..10u128 {
        for (i, &trader) in traders.iter().enumerate() {
            let token = if (i as u128 + round) % 2 == 0 { T0 } else { T1 };
            let amount = 1_000 + (i as u128 * 7_919 + round * 104_729) % 500_000;
            match pool.swap(trader, token, amount, 0, NO_DEADLINE) {
                Ok(_) => swaps += 1,
                Err(_) => rejected += 1,
            }
        }
    }

    let (r0, r1) = pool.reserves();
    println!("  {} swaps filled, {} rejected", swaps, rejected);
    println!("  Reserves {} / {}", r0, r1);
    println!("  k grew: {}", pool.constant_product() >= k_start);
    println!("  Invariants hold: {}", pool.state().check_invariants().is_ok());
    println!("  Ledger backs reserves: {}", pool.verify_backing());
    println!("  Events generated: {}\n", pool.events().len());
}
