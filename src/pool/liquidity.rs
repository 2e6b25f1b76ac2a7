//! Liquidity provision and redemption.

use super::core::{rejected, Pool};
use super::results::{AddLiquidityResult, PoolError, RemoveLiquidityResult};
use crate::clock::Clock;
use crate::events::{EventPayload, LiquidityAddedEvent, LiquidityRemovedEvent};
use crate::guard::ensure_not_paused;
use crate::ledger::{atomically, TokenLedger};
use crate::liquidity::{plan_deposit, plan_withdrawal};
use crate::types::{Amount, HolderId};
use tracing::debug;

impl<L: TokenLedger, C: Clock> Pool<L, C> {
    /// Deposit both assets and mint shares to `depositor`.
    ///
    /// The first deposit sets the price and mints floor(sqrt(amount0 * amount1)).
    /// Later deposits mint pro rata to the scarcer side; what happens to the
    /// mismatched excess depends on the configured `DepositPolicy`.
    pub fn add_liquidity(
        &mut self,
        depositor: HolderId,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<AddLiquidityResult, PoolError> {
        self.try_add_liquidity(depositor, amount0, amount1)
            .map_err(|e| rejected("add_liquidity", e))
    }

    fn try_add_liquidity(
        &mut self,
        depositor: HolderId,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<AddLiquidityResult, PoolError> {
        ensure_not_paused(&self.state)?;
        let plan = plan_deposit(&self.state, amount0, amount1, self.config.deposit_policy)?;

        let (token0, token1) = (self.pair.token0, self.pair.token1);
        let pool_account = self.config.pool_account;
        let state = &mut self.state;
        atomically(&mut self.ledger, |ledger| -> Result<(), PoolError> {
            ledger.transfer_from(token0, depositor, pool_account, plan.amount0)?;
            ledger.transfer_from(token1, depositor, pool_account, plan.amount1)?;
            state.apply_deposit(depositor, plan.amount0, plan.amount1, plan.shares)?;
            Ok(())
        })?;

        debug!(
            depositor = %depositor,
            amount0 = plan.amount0,
            amount1 = plan.amount1,
            shares = plan.shares,
            total_shares = self.state.total_shares(),
            "liquidity added"
        );
        self.emit_event(EventPayload::LiquidityAdded(LiquidityAddedEvent {
            depositor,
            amount0: plan.amount0,
            amount1: plan.amount1,
            shares_minted: plan.shares,
        }));

        Ok(AddLiquidityResult {
            shares_minted: plan.shares,
            amount0: plan.amount0,
            amount1: plan.amount1,
        })
    }

    /// Burn `shares` owned by `withdrawer` for a pro rata slice of both reserves.
    pub fn remove_liquidity(
        &mut self,
        withdrawer: HolderId,
        shares: Amount,
    ) -> Result<RemoveLiquidityResult, PoolError> {
        self.try_remove_liquidity(withdrawer, shares)
            .map_err(|e| rejected("remove_liquidity", e))
    }

    fn try_remove_liquidity(
        &mut self,
        withdrawer: HolderId,
        shares: Amount,
    ) -> Result<RemoveLiquidityResult, PoolError> {
        ensure_not_paused(&self.state)?;
        let plan = plan_withdrawal(&self.state, withdrawer, shares)?;

        let (token0, token1) = (self.pair.token0, self.pair.token1);
        let pool_account = self.config.pool_account;
        let state = &mut self.state;
        atomically(&mut self.ledger, |ledger| -> Result<(), PoolError> {
            ledger.transfer(token0, pool_account, withdrawer, plan.amount0)?;
            ledger.transfer(token1, pool_account, withdrawer, plan.amount1)?;
            state.apply_withdrawal(withdrawer, plan.amount0, plan.amount1, plan.shares)?;
            Ok(())
        })?;

        debug!(
            withdrawer = %withdrawer,
            amount0 = plan.amount0,
            amount1 = plan.amount1,
            shares = plan.shares,
            total_shares = self.state.total_shares(),
            "liquidity removed"
        );
        self.emit_event(EventPayload::LiquidityRemoved(LiquidityRemovedEvent {
            withdrawer,
            amount0: plan.amount0,
            amount1: plan.amount1,
            shares_burned: plan.shares,
        }));

        Ok(RemoveLiquidityResult {
            shares_burned: plan.shares,
            amount0: plan.amount0,
            amount1: plan.amount1,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::config::{DepositPolicy, PoolConfig};
    use crate::events::EventPayload;
    use crate::ledger::{InMemoryLedger, TokenLedger};
    use crate::pool::{Pool, PoolError, PoolRuntimeConfig};
    use crate::types::{HolderId, TokenId};

    const T0: TokenId = TokenId(0);
    const T1: TokenId = TokenId(1);
    const POOL: HolderId = HolderId(0);
    const ALICE: HolderId = HolderId(10);
    const BOB: HolderId = HolderId(11);

    fn pool_with(policy: DepositPolicy) -> Pool<InMemoryLedger, ManualClock> {
        let mut ledger = InMemoryLedger::new();
        for holder in [ALICE, BOB] {
            for token in [T0, T1] {
                ledger.mint(token, holder, 1_000_000).unwrap();
                ledger.approve(token, holder, POOL, u128::MAX);
            }
        }
        let config = PoolConfig::default().with_deposit_policy(policy);
        Pool::new(config, PoolRuntimeConfig::default(), ledger, ManualClock::default()).unwrap()
    }

    #[test]
    fn add_then_remove_everything() {
        let mut pool = pool_with(DepositPolicy::DonateExcess);
        let added = pool.add_liquidity(ALICE, 1_000, 2_000).unwrap();
        assert_eq!(added.shares_minted, 1_414);
        assert_eq!(pool.ledger().balance_of(T0, POOL), 1_000);

        let removed = pool.remove_liquidity(ALICE, 1_414).unwrap();
        assert_eq!((removed.amount0, removed.amount1), (1_000, 2_000));
        assert!(pool.state().is_empty());
        assert_eq!(pool.state().reserve0(), 0);
        assert_eq!(pool.ledger().balance_of(T1, ALICE), 1_000_000);

        let names: Vec<_> = pool.events().iter().map(|e| e.payload.name()).collect();
        assert_eq!(names, ["LiquidityAdded", "LiquidityRemoved"]);
    }

    #[test]
    fn refund_policy_pulls_only_matched_amounts() {
        let mut pool = pool_with(DepositPolicy::RefundExcess);
        pool.add_liquidity(ALICE, 1_000, 1_000).unwrap();

        let added = pool.add_liquidity(BOB, 500, 100).unwrap();
        assert_eq!((added.amount0, added.amount1, added.shares_minted), (100, 100, 100));
        assert_eq!(pool.ledger().balance_of(T0, BOB), 1_000_000 - 100);
    }

    #[test]
    fn donate_policy_keeps_excess_in_pool() {
        let mut pool = pool_with(DepositPolicy::DonateExcess);
        pool.add_liquidity(ALICE, 1_000, 1_000).unwrap();

        let added = pool.add_liquidity(BOB, 500, 100).unwrap();
        assert_eq!(added.shares_minted, 100);
        assert_eq!(pool.state().reserve0(), 1_500);
        assert_eq!(pool.ledger().balance_of(T0, BOB), 1_000_000 - 500);
    }

    #[test]
    fn missing_allowance_rolls_back_first_pull() {
        let mut pool = pool_with(DepositPolicy::DonateExcess);
        pool.ledger_mut().approve(T1, ALICE, POOL, 10);

        let err = pool.add_liquidity(ALICE, 1_000, 2_000).unwrap_err();
        assert_eq!(err.code(), "TRANSFER_FAILED");
        assert_eq!(pool.ledger().balance_of(T0, ALICE), 1_000_000);
        assert_eq!(pool.ledger().balance_of(T0, POOL), 0);
        assert!(pool.state().is_empty());
        assert!(pool.events().is_empty());
    }

    #[test]
    fn minority_holder_exits_thin_reserve() {
        let mut pool = pool_with(DepositPolicy::DonateExcess);
        pool.add_liquidity(ALICE, 1_000_000, 4).unwrap();
        let added = pool.add_liquidity(BOB, 500, 1).unwrap();
        assert_eq!(added.shares_minted, 1);
        assert_eq!(pool.reserves(), (1_000_500, 5));

        // bob's slice of reserve1 floors to zero but the asset0 side still pays out
        let removed = pool.remove_liquidity(BOB, 1).unwrap();
        assert_eq!((removed.amount0, removed.amount1), (500, 0));
        assert_eq!(pool.shares_of(BOB), 0);
        assert_eq!(pool.reserves(), (1_000_000, 5));
        assert_eq!(pool.ledger().balance_of(T0, BOB), 1_000_000);
        assert_eq!(pool.ledger().balance_of(T1, BOB), 1_000_000 - 1);
        pool.state().check_invariants().unwrap();
        assert!(pool.verify_backing());
    }

    #[test]
    fn cannot_burn_someone_elses_shares() {
        let mut pool = pool_with(DepositPolicy::DonateExcess);
        pool.add_liquidity(ALICE, 1_000, 2_000).unwrap();
        assert_eq!(
            pool.remove_liquidity(BOB, 1),
            Err(PoolError::InsufficientShares {
                requested: 1,
                available: 0
            })
        );
        assert!(matches!(pool.events().last().map(|e| &e.payload), Some(EventPayload::LiquidityAdded(_))));
    }
}
