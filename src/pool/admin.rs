//! Controller-only operations. All of these stay available while the pool is paused.

use super::core::{rejected, Pool};
use super::results::PoolError;
use crate::clock::Clock;
use crate::events::{
    ControlTransferredEvent, EventPayload, FeeRecipientChangedEvent, PauseEvent, ProtocolFeeChangedEvent,
};
use crate::guard::ensure_controller;
use crate::ledger::TokenLedger;
use crate::types::HolderId;
use tracing::info;

impl<L: TokenLedger, C: Clock> Pool<L, C> {
    pub fn set_protocol_fee(&mut self, caller: HolderId, new_bps: u16) -> Result<(), PoolError> {
        let result = ensure_controller(&self.access, caller).and_then(|_| self.fees.set_protocol_fee(new_bps));
        let old = result.map_err(|e| rejected("set_protocol_fee", e))?;

        info!(caller = %caller, old_bps = old.value(), new_bps, "protocol fee changed");
        self.emit_event(EventPayload::ProtocolFeeChanged(ProtocolFeeChangedEvent {
            old_bps: old.value(),
            new_bps,
        }));
        Ok(())
    }

    /// `None` turns protocol fee collection off without touching the rate.
    pub fn set_fee_recipient(&mut self, caller: HolderId, new_recipient: Option<HolderId>) -> Result<(), PoolError> {
        ensure_controller(&self.access, caller).map_err(|e| rejected("set_fee_recipient", e))?;
        let old_recipient = self.fees.set_fee_recipient(new_recipient);

        info!(caller = %caller, old = ?old_recipient, new = ?new_recipient, "fee recipient changed");
        self.emit_event(EventPayload::FeeRecipientChanged(FeeRecipientChangedEvent {
            old_recipient,
            new_recipient,
        }));
        Ok(())
    }

    /// Pausing an already paused pool is a no-op and emits nothing.
    pub fn pause(&mut self, caller: HolderId) -> Result<(), PoolError> {
        ensure_controller(&self.access, caller).map_err(|e| rejected("pause", e))?;
        if self.state.is_paused() {
            return Ok(());
        }
        self.state.set_paused(true);

        info!(caller = %caller, "pool paused");
        self.emit_event(EventPayload::Paused(PauseEvent { by: caller }));
        Ok(())
    }

    pub fn unpause(&mut self, caller: HolderId) -> Result<(), PoolError> {
        ensure_controller(&self.access, caller).map_err(|e| rejected("unpause", e))?;
        if !self.state.is_paused() {
            return Ok(());
        }
        self.state.set_paused(false);

        info!(caller = %caller, "pool unpaused");
        self.emit_event(EventPayload::Unpaused(PauseEvent { by: caller }));
        Ok(())
    }

    /// Hands the controller role to `new_controller`. The caller loses it immediately.
    pub fn transfer_control(&mut self, caller: HolderId, new_controller: HolderId) -> Result<(), PoolError> {
        ensure_controller(&self.access, caller).map_err(|e| rejected("transfer_control", e))?;
        let old_controller = self.access.transfer(new_controller);

        info!(old = %old_controller, new = %new_controller, "control transferred");
        self.emit_event(EventPayload::ControlTransferred(ControlTransferredEvent {
            old_controller,
            new_controller,
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::config::PoolConfig;
    use crate::events::EventPayload;
    use crate::ledger::InMemoryLedger;
    use crate::pool::{Pool, PoolError, PoolRuntimeConfig};
    use crate::types::{Bps, HolderId};

    const CONTROLLER: HolderId = HolderId(1);
    const MALLORY: HolderId = HolderId(66);

    fn pool() -> Pool<InMemoryLedger, ManualClock> {
        Pool::new(PoolConfig::default(), PoolRuntimeConfig::default(), InMemoryLedger::new(), ManualClock::default())
            .unwrap()
    }

    #[test]
    fn fee_ceiling_and_event() {
        let mut pool = pool();
        assert_eq!(
            pool.set_protocol_fee(CONTROLLER, 1_001),
            Err(PoolError::FeeTooHigh {
                requested: 1_001,
                max: 1_000
            })
        );
        pool.set_protocol_fee(CONTROLLER, 1_000).unwrap();
        assert_eq!(pool.protocol_fee_bps(), Bps::new(1_000));

        match &pool.events()[0].payload {
            EventPayload::ProtocolFeeChanged(e) => assert_eq!((e.old_bps, e.new_bps), (0, 1_000)),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn non_controller_rejected_everywhere() {
        let mut pool = pool();
        let unauthorized = Err(PoolError::Unauthorized(MALLORY));
        assert_eq!(pool.set_protocol_fee(MALLORY, 10), unauthorized);
        assert_eq!(pool.set_fee_recipient(MALLORY, Some(MALLORY)), unauthorized);
        assert_eq!(pool.pause(MALLORY), unauthorized);
        assert_eq!(pool.unpause(MALLORY), unauthorized);
        assert_eq!(pool.transfer_control(MALLORY, MALLORY), unauthorized);
        assert!(pool.events().is_empty());
    }

    #[test]
    fn admin_works_while_paused() {
        let mut pool = pool();
        pool.pause(CONTROLLER).unwrap();
        pool.pause(CONTROLLER).unwrap();
        assert!(pool.is_paused());

        pool.set_protocol_fee(CONTROLLER, 50).unwrap();
        pool.set_fee_recipient(CONTROLLER, Some(HolderId(9))).unwrap();
        pool.unpause(CONTROLLER).unwrap();
        assert!(!pool.is_paused());

        let names: Vec<_> = pool.events().iter().map(|e| e.payload.name()).collect();
        assert_eq!(names, ["Paused", "ProtocolFeeChanged", "FeeRecipientChanged", "Unpaused"]);
    }

    #[test]
    fn control_transfer_moves_the_role() {
        let mut pool = pool();
        pool.transfer_control(CONTROLLER, HolderId(2)).unwrap();
        assert_eq!(pool.controller(), HolderId(2));
        assert_eq!(pool.pause(CONTROLLER), Err(PoolError::Unauthorized(CONTROLLER)));
        pool.pause(HolderId(2)).unwrap();
    }
}
