// 8.0.2: result types and errors for pool operations.

use crate::ledger::LedgerError;
use crate::math::MathError;
use crate::types::{Amount, Asset, HolderId, TokenId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityResult {
    pub shares_minted: Amount,
    /// Amounts actually pulled from the depositor. Equal to the request under DonateExcess.
    pub amount0: Amount,
    pub amount1: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityResult {
    pub shares_burned: Amount,
    pub amount0: Amount,
    pub amount1: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    pub input: Asset,
    pub output: Asset,
    pub token_out: TokenId,
    pub amount_in: Amount,
    /// What the trader received.
    pub amount_out: Amount,
    /// Cut sent to the fee recipient, zero when no protocol fee is active.
    pub protocol_fee: Amount,
}

/// Every way a pool operation can be rejected. A rejected operation never mutates anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("token {0} is not part of this pool")]
    InvalidToken(TokenId),

    #[error("deadline {deadline} has passed (now {now})")]
    DeadlineExpired { deadline: Timestamp, now: Timestamp },

    #[error("output {amount_out} is below the requested minimum {min_amount_out}")]
    InsufficientOutputAmount {
        amount_out: Amount,
        min_amount_out: Amount,
    },

    #[error("input amount must be positive")]
    InsufficientInputAmount,

    #[error("deposit would mint zero shares")]
    InsufficientLiquidityMinted,

    #[error("withdrawal would burn zero shares or pay out nothing")]
    InsufficientLiquidityBurned,

    #[error("requested {requested} shares but only {available} are owned")]
    InsufficientShares { requested: Amount, available: Amount },

    #[error("requested output {requested} exceeds available reserve {available}")]
    InsufficientLiquidity { requested: Amount, available: Amount },

    #[error("protocol fee {requested} bps exceeds the {max} bps ceiling")]
    FeeTooHigh { requested: u16, max: u16 },

    #[error("{0} is not the pool controller")]
    Unauthorized(HolderId),

    #[error("pool is paused")]
    Paused,

    #[error("arithmetic invalid state: {0}")]
    ArithmeticInvalidState(#[from] MathError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
}

impl PoolError {
    /// Stable machine-readable code, for logs and API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            PoolError::InvalidToken(_) => "INVALID_TOKEN",
            PoolError::DeadlineExpired { .. } => "DEADLINE_EXPIRED",
            PoolError::InsufficientOutputAmount { .. } => "INSUFFICIENT_OUTPUT_AMOUNT",
            PoolError::InsufficientInputAmount => "INSUFFICIENT_INPUT_AMOUNT",
            PoolError::InsufficientLiquidityMinted => "INSUFFICIENT_LIQUIDITY_MINTED",
            PoolError::InsufficientLiquidityBurned => "INSUFFICIENT_LIQUIDITY_BURNED",
            PoolError::InsufficientShares { .. } => "INSUFFICIENT_SHARES",
            PoolError::InsufficientLiquidity { .. } => "INSUFFICIENT_LIQUIDITY",
            PoolError::FeeTooHigh { .. } => "FEE_TOO_HIGH",
            PoolError::Unauthorized(_) => "UNAUTHORIZED",
            PoolError::Paused => "PAUSED",
            PoolError::ArithmeticInvalidState(_) => "ARITHMETIC_INVALID_STATE",
            PoolError::Ledger(_) => "TRANSFER_FAILED",
            PoolError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
