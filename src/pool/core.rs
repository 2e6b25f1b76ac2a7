// 8.1 pool/core.rs: the pool value. one token pair, its reserves and shares,
// the fee and access settings, plus the ledger and clock it settles against.

use super::config::PoolRuntimeConfig;
use super::results::PoolError;
use crate::clock::Clock;
use crate::config::PoolConfig;
use crate::events::{Event, EventId, EventPayload, EventSink};
use crate::fees::FeeController;
use crate::guard::AccessControl;
use crate::ledger::TokenLedger;
use crate::state::PoolState;
use crate::types::TokenPair;
use tracing::{info, warn};

/** 8.1: main pool struct. all state lives here */
#[derive(Debug)]
pub struct Pool<L, C> {
    pub(super) config: PoolConfig,
    pub(super) runtime: PoolRuntimeConfig,
    pub(super) pair: TokenPair,
    pub(super) state: PoolState,
    pub(super) fees: FeeController,
    pub(super) access: AccessControl,
    pub(super) ledger: L,
    pub(super) clock: C,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
}

impl<L: TokenLedger, C: Clock> Pool<L, C> {
    pub fn new(
        config: PoolConfig,
        runtime: PoolRuntimeConfig,
        ledger: L,
        clock: C,
    ) -> Result<Self, PoolError> {
        config.validate()?;
        let pair = TokenPair::new(config.token0, config.token1)
            .ok_or_else(|| PoolError::InvalidConfig("token0 and token1 must differ".to_string()))?;
        let fees = FeeController::new(config.protocol_fee_bps, config.fee_recipient)?;
        let access = AccessControl::new(config.controller);

        info!(
            token0 = %pair.token0,
            token1 = %pair.token1,
            pool_account = %config.pool_account,
            controller = %config.controller,
            trading_fee_bps = config.trading_fee_bps,
            "pool created"
        );

        Ok(Self {
            config,
            runtime,
            pair,
            state: PoolState::new(),
            fees,
            access,
            ledger,
            clock,
            events: Vec::new(),
            next_event_id: 1,
        })
    }

    /// Same as `new` but with a restored state, e.g. loaded from storage.
    pub fn with_state(
        config: PoolConfig,
        runtime: PoolRuntimeConfig,
        state: PoolState,
        fees: FeeController,
        ledger: L,
        clock: C,
    ) -> Result<Self, PoolError> {
        state
            .check_invariants()
            .map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        let mut pool = Self::new(config, runtime, ledger, clock)?;
        pool.state = state;
        pool.fees = fees;
        Ok(pool)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access for funding and approvals outside the pool.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    /// Hands every retained event to `sink` and clears the local log.
    pub fn drain_events<S: EventSink>(&mut self, sink: &mut S) {
        for event in self.events.drain(..) {
            sink.emit(event);
        }
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.clock.now(), payload);
        self.next_event_id += 1;

        if self.runtime.verbose {
            info!(id = event.id.0, name = event.payload.name(), payload = ?event.payload, "event");
        }

        self.events.push(event);

        if self.events.len() > self.runtime.max_events {
            let drain_count = self.events.len() - self.runtime.max_events;
            self.events.drain(0..drain_count);
        }
    }
}

/// Logs a rejected operation with its stable code and passes the error through.
pub(super) fn rejected(operation: &'static str, err: PoolError) -> PoolError {
    warn!(operation, code = err.code(), error = %err, "rejected");
    err
}
