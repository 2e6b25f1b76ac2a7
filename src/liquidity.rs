// 4.0 liquidity.rs: share mint and burn math. pure functions over a PoolState snapshot.
// first deposit mints floor(sqrt(a0 * a1)); later deposits mint pro rata to the scarcer side.
// burns pay floor(reserve * shares / total) so dust always stays with remaining holders.

use crate::config::DepositPolicy;
use crate::math::{mul_div_floor, sqrt_product, MathError};
use crate::pool::PoolError;
use crate::state::PoolState;
use crate::types::{Amount, HolderId};

/// What a deposit will pull and mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintPlan {
    pub amount0: Amount,
    pub amount1: Amount,
    pub shares: Amount,
}

/// What a withdrawal will burn and pay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnPlan {
    pub shares: Amount,
    pub amount0: Amount,
    pub amount1: Amount,
}

pub fn initial_shares(amount0: Amount, amount1: Amount) -> Result<Amount, MathError> {
    sqrt_product(amount0, amount1)
}

/// min(a0 * S / r0, a1 * S / r1), floor on both sides.
pub fn proportional_shares(
    amount0: Amount,
    amount1: Amount,
    reserve0: Amount,
    reserve1: Amount,
    total_shares: Amount,
) -> Result<Amount, MathError> {
    if reserve0 == 0 || reserve1 == 0 {
        return Err(MathError::EmptyReserves);
    }
    let by0 = mul_div_floor(amount0, total_shares, reserve0)?;
    let by1 = mul_div_floor(amount1, total_shares, reserve1)?;
    Ok(by0.min(by1))
}

/// Ratio-matched amounts no larger than the request on either side.
fn optimal_amounts(
    amount0: Amount,
    amount1: Amount,
    reserve0: Amount,
    reserve1: Amount,
) -> Result<(Amount, Amount), MathError> {
    let amount1_optimal = mul_div_floor(amount0, reserve1, reserve0)?;
    if amount1_optimal <= amount1 {
        return Ok((amount0, amount1_optimal));
    }
    let amount0_optimal = mul_div_floor(amount1, reserve0, reserve1)?;
    Ok((amount0_optimal.min(amount0), amount1))
}

pub fn plan_deposit(
    state: &PoolState,
    amount0: Amount,
    amount1: Amount,
    policy: DepositPolicy,
) -> Result<MintPlan, PoolError> {
    if amount0 == 0 || amount1 == 0 {
        return Err(PoolError::InsufficientLiquidityMinted);
    }

    let plan = if state.is_empty() {
        MintPlan {
            amount0,
            amount1,
            shares: initial_shares(amount0, amount1)?,
        }
    } else {
        let (reserve0, reserve1) = (state.reserve0(), state.reserve1());
        let (amount0, amount1) = match policy {
            DepositPolicy::DonateExcess => (amount0, amount1),
            DepositPolicy::RefundExcess => optimal_amounts(amount0, amount1, reserve0, reserve1)?,
        };
        let shares = proportional_shares(amount0, amount1, reserve0, reserve1, state.total_shares())?;
        MintPlan {
            amount0,
            amount1,
            shares,
        }
    };

    if plan.shares == 0 || plan.amount0 == 0 || plan.amount1 == 0 {
        return Err(PoolError::InsufficientLiquidityMinted);
    }
    Ok(plan)
}

pub fn plan_withdrawal(
    state: &PoolState,
    withdrawer: HolderId,
    shares: Amount,
) -> Result<BurnPlan, PoolError> {
    if shares == 0 {
        return Err(PoolError::InsufficientLiquidityBurned);
    }
    let available = state.shares_of(withdrawer);
    if shares > available {
        return Err(PoolError::InsufficientShares {
            requested: shares,
            available,
        });
    }

    let total = state.total_shares();
    let amount0 = mul_div_floor(state.reserve0(), shares, total)?;
    let amount1 = mul_div_floor(state.reserve1(), shares, total)?;

    // either side may floor to zero; a partial burn still leaves both reserves positive
    Ok(BurnPlan {
        shares,
        amount0,
        amount1,
    })
}
