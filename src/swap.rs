// 5.0 swap.rs: constant product pricing with the trading fee taken off the input.
//   in_after_fee = in * (10_000 - fee_bps) / 10_000
//   out          = reserve_out * in_after_fee / (reserve_in + in_after_fee)
// every division floors toward the pool, so (r_in + in) * (r_out - out) >= r_in * r_out.
// the protocol cut, when active, comes out of `out` and never out of reserves twice.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::fees::FeeController;
use crate::math::{checked_add, checked_sub, mul_div_ceil, mul_div_floor, MathError};
use crate::pool::PoolError;
use crate::state::PoolState;
use crate::types::{Amount, Asset, Bps};

/// Priced swap before anything moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub input: Asset,
    pub output: Asset,
    pub amount_in: Amount,
    pub amount_in_after_fee: Amount,
    /// Leaves reserves.
    pub amount_out: Amount,
    /// Part of `amount_out` routed to the fee recipient.
    pub protocol_fee: Amount,
    /// Part of `amount_out` the trader receives.
    pub trader_amount_out: Amount,
    /// Trader payout per unit of input. None when amounts exceed Decimal range.
    pub execution_price: Option<Decimal>,
    /// Fraction of the spot price lost to fee and curve, 0.01 = 1%.
    pub price_impact: Option<Decimal>,
}

pub fn amount_in_after_fee(amount_in: Amount, trading_fee: Bps) -> Result<Amount, MathError> {
    mul_div_floor(amount_in, trading_fee.complement() as u128, Bps::SCALE as u128)
}

pub fn get_amount_out(
    reserve_in: Amount,
    reserve_out: Amount,
    amount_in: Amount,
    trading_fee: Bps,
) -> Result<Amount, MathError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(MathError::EmptyReserves);
    }
    let net_in = amount_in_after_fee(amount_in, trading_fee)?;
    let denominator = checked_add(reserve_in, net_in)?;
    mul_div_floor(reserve_out, net_in, denominator)
}

/// Smallest gross input whose output is at least `amount_out`.
///
/// Inverts both floors exactly: the net input must reach
/// ceil(out * r_in / (r_out - out)), and the gross input must reach
/// ceil(net * 10_000 / (10_000 - fee)).
pub fn get_amount_in(
    reserve_in: Amount,
    reserve_out: Amount,
    amount_out: Amount,
    trading_fee: Bps,
) -> Result<Amount, PoolError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(MathError::EmptyReserves.into());
    }
    if amount_out == 0 {
        return Err(PoolError::InsufficientOutputAmount {
            amount_out,
            min_amount_out: 1,
        });
    }
    if amount_out >= reserve_out {
        return Err(PoolError::InsufficientLiquidity {
            requested: amount_out,
            available: reserve_out,
        });
    }
    let remaining = checked_sub(reserve_out, amount_out)?;
    let net_in = mul_div_ceil(amount_out, reserve_in, remaining)?;
    let gross_in = mul_div_ceil(net_in, Bps::SCALE as u128, trading_fee.complement() as u128)?;
    Ok(gross_in)
}

/// Prices a swap of `amount_in` of `input` against the current reserves.
pub fn quote(
    state: &PoolState,
    input: Asset,
    amount_in: Amount,
    trading_fee: Bps,
    fees: &FeeController,
) -> Result<SwapQuote, PoolError> {
    if amount_in == 0 {
        return Err(PoolError::InsufficientInputAmount);
    }
    let (reserve_in, reserve_out) = state.reserves_for(input);
    let amount_in_after_fee = amount_in_after_fee(amount_in, trading_fee)?;
    let amount_out = get_amount_out(reserve_in, reserve_out, amount_in, trading_fee)?;
    let protocol_fee = fees.protocol_cut(amount_out)?;
    let trader_amount_out = checked_sub(amount_out, protocol_fee)?;

    Ok(SwapQuote {
        input,
        output: input.opposite(),
        amount_in,
        amount_in_after_fee,
        amount_out,
        protocol_fee,
        trader_amount_out,
        execution_price: ratio(trader_amount_out, amount_in),
        price_impact: price_impact(reserve_in, reserve_out, amount_in, trader_amount_out),
    })
}

/// Price of the input asset in units of the output asset.
pub fn spot_price(reserve_in: Amount, reserve_out: Amount) -> Option<Decimal> {
    ratio(reserve_out, reserve_in)
}

fn ratio(numerator: Amount, denominator: Amount) -> Option<Decimal> {
    if denominator == 0 {
        return None;
    }
    let n = Decimal::from_u128(numerator)?;
    let d = Decimal::from_u128(denominator)?;
    n.checked_div(d)
}

fn price_impact(
    reserve_in: Amount,
    reserve_out: Amount,
    amount_in: Amount,
    amount_out: Amount,
) -> Option<Decimal> {
    let spot = spot_price(reserve_in, reserve_out)?;
    let executed = ratio(amount_out, amount_in)?;
    if spot.is_zero() {
        return None;
    }
    Decimal::ONE.checked_sub(executed.checked_div(spot)?)
}
