// 7.0 guard.rs: precondition checks run before any pool arithmetic.
// stateless over the context handed in: clock reading, token pair, pause flag, controller.

use crate::pool::PoolError;
use crate::state::PoolState;
use crate::types::{Amount, Asset, HolderId, Timestamp, TokenId, TokenPair};
use serde::{Deserialize, Serialize};

/// Single designated controller identity for admin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    controller: HolderId,
}

impl AccessControl {
    pub fn new(controller: HolderId) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> HolderId {
        self.controller
    }

    pub fn is_controller(&self, caller: HolderId) -> bool {
        caller == self.controller
    }

    /// Returns the previous controller.
    pub(crate) fn transfer(&mut self, new_controller: HolderId) -> HolderId {
        std::mem::replace(&mut self.controller, new_controller)
    }
}

pub fn ensure_controller(access: &AccessControl, caller: HolderId) -> Result<(), PoolError> {
    if access.is_controller(caller) {
        Ok(())
    } else {
        Err(PoolError::Unauthorized(caller))
    }
}

pub fn ensure_not_paused(state: &PoolState) -> Result<(), PoolError> {
    if state.is_paused() {
        Err(PoolError::Paused)
    } else {
        Ok(())
    }
}

/// The deadline itself is still accepted; only strictly later times are rejected.
pub fn ensure_deadline(now: Timestamp, deadline: Timestamp) -> Result<(), PoolError> {
    if now > deadline {
        Err(PoolError::DeadlineExpired { deadline, now })
    } else {
        Ok(())
    }
}

pub fn resolve_asset(pair: &TokenPair, token: TokenId) -> Result<Asset, PoolError> {
    pair.asset_of(token).ok_or(PoolError::InvalidToken(token))
}

pub fn ensure_min_output(amount_out: Amount, min_amount_out: Amount) -> Result<(), PoolError> {
    if amount_out < min_amount_out {
        Err(PoolError::InsufficientOutputAmount {
            amount_out,
            min_amount_out,
        })
    } else {
        Ok(())
    }
}
