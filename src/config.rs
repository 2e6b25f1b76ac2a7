// 7.5 config.rs: everything fixed at pool creation. token pair, accounts, fee tier, deposit policy.
// presets mirror the usual fee tiers. validate() runs before a pool is built from it.

use serde::{Deserialize, Serialize};

use crate::fees::MAX_PROTOCOL_FEE_BPS;
use crate::pool::PoolError;
use crate::types::{Bps, HolderId, TokenId};

/// Standard trading fee, 0.30%.
pub const DEFAULT_TRADING_FEE_BPS: u16 = 30;

/// What happens to the part of a later deposit that does not match the reserve ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositPolicy {
    /// Pull both amounts in full. The mismatched excess stays in the pool for existing holders.
    #[default]
    DonateExcess,
    /// Pull only the ratio-matched amounts. The excess never leaves the depositor.
    RefundExcess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    // First reserve asset
    pub token0: TokenId,
    // Second reserve asset
    pub token1: TokenId,
    // Ledger account holding the pool's real balances
    pub pool_account: HolderId,
    // Only identity allowed to change fees, pause, or hand over control
    pub controller: HolderId,
    // Trading fee kept by the pool on every swap input, in basis points
    pub trading_fee_bps: u16,
    pub deposit_policy: DepositPolicy,
    // Protocol fee active from creation, in basis points
    pub protocol_fee_bps: u16,
    pub fee_recipient: Option<HolderId>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            token0: TokenId(0),
            token1: TokenId(1),
            pool_account: HolderId(0),
            controller: HolderId(1),
            trading_fee_bps: DEFAULT_TRADING_FEE_BPS,
            deposit_policy: DepositPolicy::DonateExcess,
            protocol_fee_bps: 0,
            fee_recipient: None,
        }
    }
}

impl PoolConfig {
    // 0.30% pool for the given pair
    pub fn standard(token0: TokenId, token1: TokenId, pool_account: HolderId, controller: HolderId) -> Self {
        Self {
            token0,
            token1,
            pool_account,
            controller,
            ..Self::default()
        }
    }

    // 0.05% tier for correlated pairs
    pub fn low_fee(token0: TokenId, token1: TokenId, pool_account: HolderId, controller: HolderId) -> Self {
        Self {
            trading_fee_bps: 5,
            ..Self::standard(token0, token1, pool_account, controller)
        }
    }

    // 1% tier for exotic pairs
    pub fn high_fee(token0: TokenId, token1: TokenId, pool_account: HolderId, controller: HolderId) -> Self {
        Self {
            trading_fee_bps: 100,
            ..Self::standard(token0, token1, pool_account, controller)
        }
    }

    pub fn with_deposit_policy(mut self, policy: DepositPolicy) -> Self {
        self.deposit_policy = policy;
        self
    }

    pub fn with_protocol_fee(mut self, bps: u16, recipient: HolderId) -> Self {
        self.protocol_fee_bps = bps;
        self.fee_recipient = Some(recipient);
        self
    }

    pub fn trading_fee(&self) -> Bps {
        Bps::new(self.trading_fee_bps)
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.token0 == self.token1 {
            return Err(PoolError::InvalidConfig(format!(
                "token0 and token1 are both {}",
                self.token0
            )));
        }
        if self.trading_fee_bps >= Bps::SCALE {
            return Err(PoolError::InvalidConfig(format!(
                "trading fee {} bps leaves nothing to trade",
                self.trading_fee_bps
            )));
        }
        if self.protocol_fee_bps > MAX_PROTOCOL_FEE_BPS {
            return Err(PoolError::FeeTooHigh {
                requested: self.protocol_fee_bps,
                max: MAX_PROTOCOL_FEE_BPS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        let (a, b, pool, ctl) = (TokenId(1), TokenId(2), HolderId(100), HolderId(1));
        for config in [
            PoolConfig::default(),
            PoolConfig::standard(a, b, pool, ctl),
            PoolConfig::low_fee(a, b, pool, ctl),
            PoolConfig::high_fee(a, b, pool, ctl),
        ] {
            config.validate().unwrap();
        }
        assert_eq!(PoolConfig::standard(a, b, pool, ctl).trading_fee(), Bps::new(30));
        assert_eq!(PoolConfig::high_fee(a, b, pool, ctl).trading_fee_bps, 100);
    }

    #[test]
    fn identical_tokens_rejected() {
        let config = PoolConfig::standard(TokenId(1), TokenId(1), HolderId(100), HolderId(1));
        assert!(matches!(config.validate(), Err(PoolError::InvalidConfig(_))));
    }

    #[test]
    fn full_trading_fee_rejected() {
        let config = PoolConfig {
            trading_fee_bps: 10_000,
            ..PoolConfig::default()
        };
        assert!(matches!(config.validate(), Err(PoolError::InvalidConfig(_))));
    }

    #[test]
    fn initial_protocol_fee_capped() {
        let config = PoolConfig::default().with_protocol_fee(1_001, HolderId(9));
        assert!(matches!(config.validate(), Err(PoolError::FeeTooHigh { .. })));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PoolConfig::default()
            .with_deposit_policy(DepositPolicy::RefundExcess)
            .with_protocol_fee(100, HolderId(9));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""deposit_policy":"refund_excess""#));
        let back: PoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
