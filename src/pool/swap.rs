//! Swap execution.

use super::core::{rejected, Pool};
use super::results::{PoolError, SwapResult};
use crate::clock::Clock;
use crate::events::{EventPayload, ProtocolFeeCollectedEvent, SwappedEvent};
use crate::guard::{ensure_deadline, ensure_min_output, ensure_not_paused, resolve_asset};
use crate::ledger::{atomically, TokenLedger};
use crate::swap::quote;
use crate::types::{Amount, HolderId, Timestamp, TokenId};
use tracing::debug;

impl<L: TokenLedger, C: Clock> Pool<L, C> {
    /// Sell exactly `amount_in` of `token_in` for the other asset.
    ///
    /// Fails with `InsufficientOutputAmount` when the trader's payout (after any
    /// protocol fee) is below `min_amount_out`, and with `DeadlineExpired`
    /// when the clock is past `deadline`. A swap whose gross output floors to
    /// zero is rejected with `InsufficientOutputAmount` even when `min_amount_out` is 0.
    pub fn swap(
        &mut self,
        trader: HolderId,
        token_in: TokenId,
        amount_in: Amount,
        min_amount_out: Amount,
        deadline: Timestamp,
    ) -> Result<SwapResult, PoolError> {
        self.try_swap(trader, token_in, amount_in, min_amount_out, deadline)
            .map_err(|e| rejected("swap", e))
    }

    fn try_swap(
        &mut self,
        trader: HolderId,
        token_in: TokenId,
        amount_in: Amount,
        min_amount_out: Amount,
        deadline: Timestamp,
    ) -> Result<SwapResult, PoolError> {
        ensure_not_paused(&self.state)?;
        ensure_deadline(self.clock.now(), deadline)?;
        let input = resolve_asset(&self.pair, token_in)?;

        let quote = quote(&self.state, input, amount_in, self.config.trading_fee(), &self.fees)?;
        if quote.amount_out == 0 {
            return Err(PoolError::InsufficientOutputAmount {
                amount_out: 0,
                min_amount_out,
            });
        }
        ensure_min_output(quote.trader_amount_out, min_amount_out)?;

        let token_out = self.pair.token(quote.output);
        let pool_account = self.config.pool_account;
        let fee_payout = match self.fees.fee_recipient() {
            Some(recipient) if quote.protocol_fee > 0 => Some((recipient, quote.protocol_fee)),
            _ => None,
        };

        let state = &mut self.state;
        atomically(&mut self.ledger, |ledger| -> Result<(), PoolError> {
            ledger.transfer_from(token_in, trader, pool_account, amount_in)?;
            ledger.transfer(token_out, pool_account, trader, quote.trader_amount_out)?;
            if let Some((recipient, fee)) = fee_payout {
                ledger.transfer(token_out, pool_account, recipient, fee)?;
            }
            state.apply_swap(input, amount_in, quote.amount_out)?;
            Ok(())
        })?;

        debug!(
            trader = %trader,
            token_in = %token_in,
            amount_in,
            token_out = %token_out,
            amount_out = quote.trader_amount_out,
            protocol_fee = quote.protocol_fee,
            reserve0 = self.state.reserve0(),
            reserve1 = self.state.reserve1(),
            "swapped"
        );
        self.emit_event(EventPayload::Swapped(SwappedEvent {
            trader,
            token_in,
            amount_in,
            token_out,
            amount_out: quote.trader_amount_out,
        }));
        if let Some((recipient, amount)) = fee_payout {
            self.emit_event(EventPayload::ProtocolFeeCollected(ProtocolFeeCollectedEvent {
                recipient,
                token: token_out,
                amount,
            }));
        }

        Ok(SwapResult {
            input,
            output: quote.output,
            token_out,
            amount_in,
            amount_out: quote.trader_amount_out,
            protocol_fee: quote.protocol_fee,
        })
    }
}
