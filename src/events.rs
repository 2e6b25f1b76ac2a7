// 11.0: every committed state change produces an event. indexers and UIs read these,
// so field order inside each payload is part of the contract and must not be reshuffled.

use crate::types::{Amount, HolderId, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    // Liquidity events
    LiquidityAdded(LiquidityAddedEvent),
    LiquidityRemoved(LiquidityRemovedEvent),

    // Trade events
    Swapped(SwappedEvent),
    ProtocolFeeCollected(ProtocolFeeCollectedEvent),

    // Admin events
    ProtocolFeeChanged(ProtocolFeeChangedEvent),
    FeeRecipientChanged(FeeRecipientChangedEvent),
    Paused(PauseEvent),
    Unpaused(PauseEvent),
    ControlTransferred(ControlTransferredEvent),
}

impl EventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::LiquidityAdded(_) => "LiquidityAdded",
            EventPayload::LiquidityRemoved(_) => "LiquidityRemoved",
            EventPayload::Swapped(_) => "Swapped",
            EventPayload::ProtocolFeeCollected(_) => "ProtocolFeeCollected",
            EventPayload::ProtocolFeeChanged(_) => "ProtocolFeeChanged",
            EventPayload::FeeRecipientChanged(_) => "FeeRecipientChanged",
            EventPayload::Paused(_) => "Paused",
            EventPayload::Unpaused(_) => "Unpaused",
            EventPayload::ControlTransferred(_) => "ControlTransferred",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAddedEvent {
    pub depositor: HolderId,
    pub amount0: Amount,
    pub amount1: Amount,
    pub shares_minted: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRemovedEvent {
    pub withdrawer: HolderId,
    pub amount0: Amount,
    pub amount1: Amount,
    pub shares_burned: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwappedEvent {
    pub trader: HolderId,
    pub token_in: TokenId,
    pub amount_in: Amount,
    pub token_out: TokenId,
    pub amount_out: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFeeCollectedEvent {
    pub recipient: HolderId,
    pub token: TokenId,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFeeChangedEvent {
    pub old_bps: u16,
    pub new_bps: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecipientChangedEvent {
    pub old_recipient: Option<HolderId>,
    pub new_recipient: Option<HolderId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseEvent {
    pub by: HolderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTransferredEvent {
    pub old_controller: HolderId,
    pub new_controller: HolderId,
}

pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Append-only in-memory sink.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<Event>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventCollector {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_collector() {
        let mut collector = EventCollector::new();

        collector.emit(Event::new(
            EventId(1),
            Timestamp::from_millis(1_000),
            EventPayload::LiquidityAdded(LiquidityAddedEvent {
                depositor: HolderId(1),
                amount0: 1_000,
                amount1: 2_000,
                shares_minted: 1_414,
            }),
        ));
        assert_eq!(collector.events().len(), 1);
        assert_eq!(collector.events()[0].payload.name(), "LiquidityAdded");

        collector.clear();
        assert!(collector.events().is_empty());
    }

    #[test]
    fn swapped_fields_serialize_in_declared_order() {
        let swapped = SwappedEvent {
            trader: HolderId(2),
            token_in: TokenId(10),
            amount_in: 100,
            token_out: TokenId(11),
            amount_out: 181,
        };
        let json = serde_json::to_string(&swapped).unwrap();
        assert_eq!(
            json,
            r#"{"trader":2,"token_in":10,"amount_in":100,"token_out":11,"amount_out":181}"#
        );
    }

    #[test]
    fn fee_changed_round_trips() {
        let payload = EventPayload::ProtocolFeeChanged(ProtocolFeeChangedEvent {
            old_bps: 0,
            new_bps: 50,
        });
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"ProtocolFeeChanged":{"old_bps":0,"new_bps":50}}"#);
        let back: EventPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
