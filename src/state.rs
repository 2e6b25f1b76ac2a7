// 3.0 state.rs: reserves, share supply and per-holder share balances. pure data.
// every mutator computes all new values with checked math first and only then writes,
// so a failed call leaves the state exactly as it was.

use crate::math::{checked_add, checked_sub, full_mul, MathError};
use crate::types::{Amount, Asset, HolderId, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    reserve0: Amount,
    reserve1: Amount,
    total_shares: Amount,
    // zero balances are removed, never stored
    shares: BTreeMap<HolderId, Amount>,
    paused: bool,
}

/// A broken accounting invariant. Never expected outside of corrupted persisted state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("share balances sum to {sum} but total supply is {total}")]
    ShareSupplyMismatch { sum: Amount, total: Amount },

    #[error("pool is half funded: reserves ({reserve0}, {reserve1}) with {total_shares} shares")]
    PartiallyFunded {
        reserve0: Amount,
        reserve1: Amount,
        total_shares: Amount,
    },
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve0(&self) -> Amount {
        self.reserve0
    }

    pub fn reserve1(&self) -> Amount {
        self.reserve1
    }

    pub fn reserve(&self, asset: Asset) -> Amount {
        match asset {
            Asset::Asset0 => self.reserve0,
            Asset::Asset1 => self.reserve1,
        }
    }

    /// (reserve_in, reserve_out) for a trade that sells `input`.
    pub fn reserves_for(&self, input: Asset) -> (Amount, Amount) {
        (self.reserve(input), self.reserve(input.opposite()))
    }

    pub fn total_shares(&self) -> Amount {
        self.total_shares
    }

    pub fn shares_of(&self, holder: HolderId) -> Amount {
        self.shares.get(&holder).copied().unwrap_or(0)
    }

    pub fn holders(&self) -> impl Iterator<Item = (&HolderId, &Amount)> {
        self.shares.iter()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_empty(&self) -> bool {
        self.total_shares == 0
    }

    /// reserve0 * reserve1, exact.
    pub fn constant_product(&self) -> U256 {
        full_mul(self.reserve0, self.reserve1)
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn apply_deposit(
        &mut self,
        depositor: HolderId,
        amount0: Amount,
        amount1: Amount,
        shares: Amount,
    ) -> Result<(), MathError> {
        let reserve0 = checked_add(self.reserve0, amount0)?;
        let reserve1 = checked_add(self.reserve1, amount1)?;
        let total_shares = checked_add(self.total_shares, shares)?;
        let balance = checked_add(self.shares_of(depositor), shares)?;

        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_shares = total_shares;
        if balance > 0 {
            self.shares.insert(depositor, balance);
        }
        Ok(())
    }

    pub(crate) fn apply_withdrawal(
        &mut self,
        withdrawer: HolderId,
        amount0: Amount,
        amount1: Amount,
        shares: Amount,
    ) -> Result<(), MathError> {
        let reserve0 = checked_sub(self.reserve0, amount0)?;
        let reserve1 = checked_sub(self.reserve1, amount1)?;
        let total_shares = checked_sub(self.total_shares, shares)?;
        let balance = checked_sub(self.shares_of(withdrawer), shares)?;

        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_shares = total_shares;
        if balance == 0 {
            self.shares.remove(&withdrawer);
        } else {
            self.shares.insert(withdrawer, balance);
        }
        Ok(())
    }

    /// Input side grows by the full gross input, output side shrinks by the gross output.
    pub(crate) fn apply_swap(
        &mut self,
        input: Asset,
        amount_in: Amount,
        amount_out: Amount,
    ) -> Result<(), MathError> {
        let (reserve_in, reserve_out) = self.reserves_for(input);
        let reserve_in = checked_add(reserve_in, amount_in)?;
        let reserve_out = checked_sub(reserve_out, amount_out)?;

        match input {
            Asset::Asset0 => {
                self.reserve0 = reserve_in;
                self.reserve1 = reserve_out;
            }
            Asset::Asset1 => {
                self.reserve1 = reserve_in;
                self.reserve0 = reserve_out;
            }
        }
        Ok(())
    }

    /// Checks share conservation and the all-or-nothing funding invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let sum = self
            .shares
            .values()
            .try_fold(0u128, |acc, s| acc.checked_add(*s))
            .unwrap_or(u128::MAX);
        if sum != self.total_shares {
            return Err(InvariantViolation::ShareSupplyMismatch {
                sum,
                total: self.total_shares,
            });
        }

        let unfunded = self.reserve0 == 0 || self.reserve1 == 0;
        let drained = self.reserve0 == 0 && self.reserve1 == 0;
        let consistent = if self.total_shares == 0 { drained } else { !unfunded };
        if !consistent {
            return Err(InvariantViolation::PartiallyFunded {
                reserve0: self.reserve0,
                reserve1: self.reserve1,
                total_shares: self.total_shares,
            });
        }
        Ok(())
    }
}
