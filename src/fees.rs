// 6.0 fees.rs: protocol fee rate and recipient. validated on write, read by the swap path.
// the trading fee itself is fixed per pool in PoolConfig and never changes after creation.

use crate::math::{mul_div_floor, MathError};
use crate::pool::PoolError;
use crate::types::{Amount, Bps, HolderId};
use serde::{Deserialize, Serialize};

/// Protocol fee ceiling: 10%.
pub const MAX_PROTOCOL_FEE_BPS: u16 = 1_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeController {
    protocol_fee_bps: Bps,
    fee_recipient: Option<HolderId>,
}

impl FeeController {
    pub fn new(protocol_fee_bps: u16, fee_recipient: Option<HolderId>) -> Result<Self, PoolError> {
        let mut fees = Self::default();
        fees.set_protocol_fee(protocol_fee_bps)?;
        fees.fee_recipient = fee_recipient;
        Ok(fees)
    }

    pub fn protocol_fee_bps(&self) -> Bps {
        self.protocol_fee_bps
    }

    pub fn fee_recipient(&self) -> Option<HolderId> {
        self.fee_recipient
    }

    /// Returns the previous rate.
    pub fn set_protocol_fee(&mut self, new_bps: u16) -> Result<Bps, PoolError> {
        if new_bps > MAX_PROTOCOL_FEE_BPS {
            return Err(PoolError::FeeTooHigh {
                requested: new_bps,
                max: MAX_PROTOCOL_FEE_BPS,
            });
        }
        Ok(std::mem::replace(&mut self.protocol_fee_bps, Bps::new(new_bps)))
    }

    /// Returns the previous recipient.
    pub fn set_fee_recipient(&mut self, recipient: Option<HolderId>) -> Option<HolderId> {
        std::mem::replace(&mut self.fee_recipient, recipient)
    }

    /// Recipient and rate, only when both are set. No recipient means no collection.
    pub fn active(&self) -> Option<(HolderId, Bps)> {
        match self.fee_recipient {
            Some(recipient) if !self.protocol_fee_bps.is_zero() => {
                Some((recipient, self.protocol_fee_bps))
            }
            _ => None,
        }
    }

    /// Protocol cut carved out of a gross swap output (floor).
    pub fn protocol_cut(&self, amount_out: Amount) -> Result<Amount, MathError> {
        match self.active() {
            Some((_, bps)) => mul_div_floor(amount_out, bps.value() as u128, Bps::SCALE as u128),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_ceiling_is_inclusive() {
        let mut fees = FeeController::default();
        assert_eq!(
            fees.set_protocol_fee(1_001),
            Err(PoolError::FeeTooHigh {
                requested: 1_001,
                max: 1_000
            })
        );
        assert_eq!(fees.protocol_fee_bps(), Bps::zero());

        assert_eq!(fees.set_protocol_fee(1_000).unwrap(), Bps::zero());
        assert_eq!(fees.protocol_fee_bps(), Bps::new(1_000));
    }

    #[test]
    fn no_recipient_means_no_cut() {
        let fees = FeeController::new(100, None).unwrap();
        assert!(fees.active().is_none());
        assert_eq!(fees.protocol_cut(1_000_000).unwrap(), 0);
    }

    #[test]
    fn zero_rate_means_no_cut() {
        let fees = FeeController::new(0, Some(HolderId(7))).unwrap();
        assert!(fees.active().is_none());
    }

    #[test]
    fn cut_rounds_down() {
        let fees = FeeController::new(100, Some(HolderId(7))).unwrap();
        assert_eq!(fees.protocol_cut(181).unwrap(), 1);
        assert_eq!(fees.protocol_cut(99).unwrap(), 0);
        assert_eq!(fees.protocol_cut(10_000).unwrap(), 100);
    }

    #[test]
    fn recipient_replacement_returns_old_value() {
        let mut fees = FeeController::default();
        assert_eq!(fees.set_fee_recipient(Some(HolderId(3))), None);
        assert_eq!(fees.set_fee_recipient(None), Some(HolderId(3)));
    }
}
