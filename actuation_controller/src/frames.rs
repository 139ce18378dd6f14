//! Outbound frame builders.
//!
//! Builders produce symbolic [`OutboundMessage`]s only; byte packing and
//! checksums belong to the host's signal encoder. Pass-through frames copy
//! the latest stock frame and overlay the signals this layer owns.

pub mod extended;
pub mod legacy;

use actuation_common::consts::MAX_MESSAGES_PER_TICK;
use actuation_common::controller::flags::Capabilities;
use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::message::{
    FrameKind, OutboundMessage, Payload, Signal, SignalSet,
};
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use actuation_common::controller::vehicle::RouteTable;
use heapless::Vec;

/// Per-tick inputs shared by every builder.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub frame: u64,
    pub intent: &'a ActuatorIntent,
    pub snapshot: &'a VehicleStateSnapshot,
    pub routes: &'a RouteTable,
    pub capabilities: Capabilities,
}

impl FrameContext<'_> {
    /// Symbolic frame from this layer's signals only.
    pub fn signals(&self, kind: FrameKind, signals: &[Signal]) -> OutboundMessage {
        self.message(kind, Payload::Signals(SignalSet::from_slice(signals)))
    }

    /// Stock frame copy with `overrides` applied.
    pub fn overlay(&self, kind: FrameKind, stock: &SignalSet, overrides: &[Signal]) -> OutboundMessage {
        self.message(kind, Payload::Signals(SignalSet::overlay(stock, overrides)))
    }

    pub fn message(&self, kind: FrameKind, payload: Payload) -> OutboundMessage {
        let route = self.routes.route(kind);
        OutboundMessage {
            kind,
            address: route.address,
            bus: route.bus,
            payload,
        }
    }
}

#[inline]
pub(crate) fn flag(on: bool) -> f64 {
    if on { 1.0 } else { 0.0 }
}

/// Bounded per-tick message buffer.
///
/// Capacity covers the worst-case tick; a push past it is dropped and
/// remembered so the tick can raise `OUTBOX_OVERFLOW`.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    messages: Vec<OutboundMessage, MAX_MESSAGES_PER_TICK>,
    overflowed: bool,
}

impl Outbox {
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            overflowed: false,
        }
    }

    #[inline]
    pub fn push(&mut self, message: OutboundMessage) {
        if self.messages.push(message).is_err() {
            self.overflowed = true;
        }
    }

    /// Push `copies` identical messages.
    pub fn push_copies(&mut self, message: OutboundMessage, copies: usize) {
        if copies == 0 {
            return;
        }
        for _ in 1..copies {
            self.push(message.clone());
        }
        self.push(message);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub const fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn into_messages(self) -> Vec<OutboundMessage, MAX_MESSAGES_PER_TICK> {
        self.messages
    }
}
