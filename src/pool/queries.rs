//! Read-only views and quotes. Nothing here mutates or emits.

use super::core::Pool;
use super::results::PoolError;
use crate::clock::Clock;
use crate::guard::resolve_asset;
use crate::ledger::TokenLedger;
use crate::liquidity::{plan_deposit, plan_withdrawal, BurnPlan, MintPlan};
use crate::swap::{self, SwapQuote};
use crate::types::{Amount, Bps, HolderId, TokenId, U256};
use rust_decimal::Decimal;

impl<L: TokenLedger, C: Clock> Pool<L, C> {
    pub fn token0(&self) -> TokenId {
        self.pair.token0
    }

    pub fn token1(&self) -> TokenId {
        self.pair.token1
    }

    pub fn reserves(&self) -> (Amount, Amount) {
        (self.state.reserve0(), self.state.reserve1())
    }

    pub fn total_shares(&self) -> Amount {
        self.state.total_shares()
    }

    pub fn shares_of(&self, holder: HolderId) -> Amount {
        self.state.shares_of(holder)
    }

    pub fn controller(&self) -> HolderId {
        self.access.controller()
    }

    pub fn is_controller(&self, caller: HolderId) -> bool {
        self.access.is_controller(caller)
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn trading_fee_bps(&self) -> Bps {
        self.config.trading_fee()
    }

    pub fn protocol_fee_bps(&self) -> Bps {
        self.fees.protocol_fee_bps()
    }

    pub fn fee_recipient(&self) -> Option<HolderId> {
        self.fees.fee_recipient()
    }

    /// Price of `token` in units of the other asset. None for an empty pool.
    pub fn spot_price(&self, token: TokenId) -> Result<Option<Decimal>, PoolError> {
        let asset = resolve_asset(&self.pair, token)?;
        let (reserve_in, reserve_out) = self.state.reserves_for(asset);
        Ok(swap::spot_price(reserve_in, reserve_out))
    }

    pub fn constant_product(&self) -> U256 {
        self.state.constant_product()
    }

    /// What `swap` would do right now, ignoring pause, deadline and slippage.
    pub fn quote_swap(&self, token_in: TokenId, amount_in: Amount) -> Result<SwapQuote, PoolError> {
        let input = resolve_asset(&self.pair, token_in)?;
        swap::quote(&self.state, input, amount_in, self.config.trading_fee(), &self.fees)
    }

    /// Smallest input of the other asset that makes at least `amount_out` of `token_out` leave reserves.
    pub fn quote_amount_in(&self, token_out: TokenId, amount_out: Amount) -> Result<Amount, PoolError> {
        let output = resolve_asset(&self.pair, token_out)?;
        let (reserve_in, reserve_out) = self.state.reserves_for(output.opposite());
        swap::get_amount_in(reserve_in, reserve_out, amount_out, self.config.trading_fee())
    }

    pub fn quote_add_liquidity(&self, amount0: Amount, amount1: Amount) -> Result<MintPlan, PoolError> {
        plan_deposit(&self.state, amount0, amount1, self.config.deposit_policy)
    }

    pub fn quote_remove_liquidity(&self, holder: HolderId, shares: Amount) -> Result<BurnPlan, PoolError> {
        plan_withdrawal(&self.state, holder, shares)
    }

    /// True when the pool's ledger account holds at least both reserves.
    /// Donations sent straight to the pool account only add slack.
    pub fn verify_backing(&self) -> bool {
        let account = self.config.pool_account;
        self.ledger.balance_of(self.pair.token0, account) >= self.state.reserve0()
            && self.ledger.balance_of(self.pair.token1, account) >= self.state.reserve1()
    }
}
