// 10.0 shared.rs: thread-safe handle over one pool.
// mutations hold the write lock for the whole operation, settlement included,
// so at most one is in flight. reads take the read lock and only see committed state.

use crate::clock::Clock;
use crate::ledger::TokenLedger;
use crate::pool::{AddLiquidityResult, Pool, PoolError, RemoveLiquidityResult, SwapResult};
use crate::state::PoolState;
use crate::swap::SwapQuote;
use crate::types::{Amount, HolderId, Timestamp, TokenId};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct SharedPool<L, C> {
    inner: Arc<RwLock<Pool<L, C>>>,
}

impl<L, C> Clone for SharedPool<L, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: TokenLedger, C: Clock> SharedPool<L, C> {
    pub fn new(pool: Pool<L, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    /// Runs `f` under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&Pool<L, C>) -> T) -> T {
        let pool = self.inner.read();
        f(&pool)
    }

    /// Runs `f` under the write lock. Calls inside `f` run without interleaving
    /// from other handles, but each one commits on its own: an error part way
    /// through leaves the earlier calls applied.
    pub fn write<T>(&self, f: impl FnOnce(&mut Pool<L, C>) -> T) -> T {
        let mut pool = self.inner.write();
        f(&mut pool)
    }

    pub fn add_liquidity(
        &self,
        depositor: HolderId,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<AddLiquidityResult, PoolError> {
        self.inner.write().add_liquidity(depositor, amount0, amount1)
    }

    pub fn remove_liquidity(&self, withdrawer: HolderId, shares: Amount) -> Result<RemoveLiquidityResult, PoolError> {
        self.inner.write().remove_liquidity(withdrawer, shares)
    }

    pub fn swap(
        &self,
        trader: HolderId,
        token_in: TokenId,
        amount_in: Amount,
        min_amount_out: Amount,
        deadline: Timestamp,
    ) -> Result<SwapResult, PoolError> {
        self.inner
            .write()
            .swap(trader, token_in, amount_in, min_amount_out, deadline)
    }

    pub fn set_protocol_fee(&self, caller: HolderId, new_bps: u16) -> Result<(), PoolError> {
        self.inner.write().set_protocol_fee(caller, new_bps)
    }

    pub fn set_fee_recipient(&self, caller: HolderId, new_recipient: Option<HolderId>) -> Result<(), PoolError> {
        self.inner.write().set_fee_recipient(caller, new_recipient)
    }

    pub fn pause(&self, caller: HolderId) -> Result<(), PoolError> {
        self.inner.write().pause(caller)
    }

    pub fn unpause(&self, caller: HolderId) -> Result<(), PoolError> {
        self.inner.write().unpause(caller)
    }

    pub fn transfer_control(&self, caller: HolderId, new_controller: HolderId) -> Result<(), PoolError> {
        self.inner.write().transfer_control(caller, new_controller)
    }

    pub fn reserves(&self) -> (Amount, Amount) {
        self.inner.read().reserves()
    }

    pub fn shares_of(&self, holder: HolderId) -> Amount {
        self.inner.read().shares_of(holder)
    }

    pub fn quote_swap(&self, token_in: TokenId, amount_in: Amount) -> Result<SwapQuote, PoolError> {
        self.inner.read().quote_swap(token_in, amount_in)
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> PoolState {
        self.inner.read().state().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::PoolConfig;
    use crate::ledger::InMemoryLedger;
    use crate::math::full_mul;
    use crate::pool::PoolRuntimeConfig;
    use std::thread;

    const T0: TokenId = TokenId(0);
    const T1: TokenId = TokenId(1);
    const POOL: HolderId = HolderId(0);
    const LP: HolderId = HolderId(10);

    #[test]
    fn concurrent_swaps_serialize() {
        let mut ledger = InMemoryLedger::new();
        let traders: Vec<HolderId> = (100..108).map(HolderId).collect();
        for holder in traders.iter().copied().chain([LP]) {
            for token in [T0, T1] {
                ledger.mint(token, holder, 10_000_000).unwrap();
                ledger.approve(token, holder, POOL, u128::MAX);
            }
        }
        let pool = Pool::new(PoolConfig::default(), PoolRuntimeConfig::default(), ledger, ManualClock::default())
            .unwrap();
        let shared = SharedPool::new(pool);
        shared.add_liquidity(LP, 1_000_000, 1_000_000).unwrap();
        let k0 = shared.snapshot().constant_product();

        let handles: Vec<_> = traders
            .iter()
            .enumerate()
            .map(|(i, &trader)| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let token = if i % 2 == 0 { T0 } else { T1 };
                    for _ in 0..50 {
                        shared.swap(trader, token, 1_000, 0, Timestamp(1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (r0, r1) = shared.reserves();
        assert!(full_mul(r0, r1) >= k0);
        assert_eq!(shared.read(|p| p.events().len()), 1 + 8 * 50);
        assert!(shared.read(|p| p.verify_backing()));
        shared.snapshot().check_invariants().unwrap();
    }

    #[test]
    fn write_groups_operations() {
        let mut ledger = InMemoryLedger::new();
        for token in [T0, T1] {
            ledger.mint(token, LP, 10_000).unwrap();
            ledger.approve(token, LP, POOL, u128::MAX);
        }
        let pool = Pool::new(PoolConfig::default(), PoolRuntimeConfig::default(), ledger, ManualClock::default())
            .unwrap();
        let shared = SharedPool::new(pool);

        let shares = shared
            .write(|p| {
                p.add_liquidity(LP, 1_000, 1_000)?;
                p.add_liquidity(LP, 1_000, 1_000).map(|r| r.shares_minted)
            })
            .unwrap();
        assert_eq!(shares, 1_000);
        assert_eq!(shared.shares_of(LP), 2_000);
    }

    #[test]
    fn failed_call_inside_write_keeps_earlier_commits() {
        let mut ledger = InMemoryLedger::new();
        for token in [T0, T1] {
            ledger.mint(token, LP, 1_500).unwrap();
            ledger.approve(token, LP, POOL, u128::MAX);
        }
        let pool = Pool::new(PoolConfig::default(), PoolRuntimeConfig::default(), ledger, ManualClock::default())
            .unwrap();
        let shared = SharedPool::new(pool);

        let outcome = shared.write(|p| {
            p.add_liquidity(LP, 1_000, 1_000)?;
            // only 500 of each token left
            p.add_liquidity(LP, 1_000, 1_000)
        });
        assert_eq!(outcome.unwrap_err().code(), "TRANSFER_FAILED");
        assert_eq!(shared.shares_of(LP), 1_000);
        assert_eq!(shared.reserves(), (1_000, 1_000));
        assert!(shared.read(|p| p.verify_backing()));
    }
}
