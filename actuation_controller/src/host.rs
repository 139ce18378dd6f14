//! Host-side collaborators and the binding helper.
//!
//! This module defines:
//! - `Transport` trait - Bus publish + latest decoded vehicle state
//! - `SignalEncoder` trait - Symbolic frame → bytes, keyed by the vehicle's
//!   signal dictionary
//! - `verify_encoder` - Init-time check that the dictionary covers every
//!   signal the session can emit
//! - `drive_tick` - One host tick: read state, tick, encode, publish
//! - `LoopbackTransport` / `PlainEncoder` - In-memory implementations used by
//!   the simulator and tests

use std::collections::BTreeSet;

use actuation_common::config::ConfigError;
use actuation_common::consts::MAX_PAYLOAD;
use actuation_common::controller::intent::ActuatorIntent;
use actuation_common::controller::message::{EncodedFrame, FrameKind, OutboundMessage, Payload};
use actuation_common::controller::snapshot::VehicleStateSnapshot;
use heapless::Vec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cycle::TickOutput;
use crate::session::ControllerHandle;

/// Signal encoding failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Frame has no entry in the signal dictionary
    #[error("unknown frame {0}")]
    UnknownFrame(&'static str),

    /// Signal missing from the frame's dictionary entry
    #[error("unknown signal {frame}.{signal}")]
    UnknownSignal { frame: &'static str, signal: String },

    /// Value does not fit the signal's encoding
    #[error("{frame}.{signal} = {value} out of range")]
    ValueOutOfRange {
        frame: &'static str,
        signal: &'static str,
        value: f64,
    },

    /// Encoded payload exceeds the frame capacity
    #[error("{frame} payload of {len} bytes exceeds {MAX_PAYLOAD}")]
    PayloadTooLarge { frame: &'static str, len: usize },
}

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Bus index not attached
    #[error("bus {0} unavailable")]
    BusUnavailable(u8),

    /// Transport shut down
    #[error("transport closed")]
    Closed,
}

/// Errors surfaced by [`drive_tick`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// No vehicle state has been received yet
    #[error("no vehicle state available")]
    NoVehicleState,

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("publish failed: {0}")]
    Transport(#[from] TransportError),
}

/// Bus transport.
///
/// # Timing Contracts
///
/// | Operation | Blocking | Called from |
/// |-----------|----------|-------------|
/// | `publish()` | never | tick thread |
/// | `latest_state()` | never | tick thread |
pub trait Transport {
    /// Queue one frame on `bus`.
    fn publish(&mut self, bus: u8, frame: &EncodedFrame) -> Result<(), TransportError>;

    /// Most recent decoded vehicle state, if any has been received.
    fn latest_state(&mut self) -> Option<VehicleStateSnapshot>;
}

/// Per-vehicle signal encoder (packer).
pub trait SignalEncoder {
    /// Pack one symbolic message. Raw payloads pass through.
    fn encode(&self, message: &OutboundMessage) -> Result<EncodedFrame, EncodeError>;

    /// Whether the dictionary defines `signal` in `kind`.
    fn knows(&self, kind: FrameKind, signal: &str) -> bool;
}

/// Check that `encoder` knows every signal the session can write.
///
/// # Errors
/// `ConfigError::UnknownSignal` for the first missing signal. This is a
/// startup fault; a session must not tick with an incomplete dictionary.
pub fn verify_encoder<E: SignalEncoder + ?Sized>(handle: &ControllerHandle, encoder: &E) -> Result<(), ConfigError> {
    let dialect = handle.scheduler().dialect();
    for kind in dialect.frame_kinds() {
        if let Some(signal) = kind.signals().iter().copied().find(|s| !encoder.knows(kind, s)) {
            warn!(frame = kind.name(), signal, "Signal missing from encoder dictionary");
            return Err(ConfigError::UnknownSignal {
                frame: kind.name(),
                signal,
            });
        }
    }
    debug!(vehicle_id = handle.vehicle_id(), "Encoder dictionary verified");
    Ok(())
}

/// Run one host tick against `transport` and `encoder`.
///
/// The tick is skipped when no vehicle state has arrived yet. Otherwise the
/// session state advances even if encoding or publishing fails afterwards.
pub fn drive_tick<T, E>(
    handle: &mut ControllerHandle,
    transport: &mut T,
    encoder: &E,
    intent: &ActuatorIntent,
) -> Result<TickOutput, HostError>
where
    T: Transport + ?Sized,
    E: SignalEncoder + ?Sized,
{
    let snapshot = transport.latest_state().ok_or(HostError::NoVehicleState)?;
    let output = handle.tick(intent, &snapshot);

    if output.flags.has_fault() {
        warn!(frame = handle.state().frame, flags = ?output.flags, "Tick raised fault flags");
    }

    for message in &output.messages {
        let frame = encoder.encode(message).inspect_err(|e| {
            warn!(frame = message.kind.name(), error = %e, "Encode failed");
        })?;
        transport.publish(message.bus, &frame)?;
    }
    Ok(output)
}

// ─── In-memory implementations ──────────────────────────────────────

/// Transport that records every published frame.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    state: Option<VehicleStateSnapshot>,
    published: std::vec::Vec<(u8, EncodedFrame)>,
    bus_count: u8,
}

impl LoopbackTransport {
    /// Loopback with buses `0..bus_count` attached.
    pub fn new(bus_count: u8) -> Self {
        Self {
            state: None,
            published: std::vec::Vec::new(),
            bus_count,
        }
    }

    pub fn set_state(&mut self, state: VehicleStateSnapshot) {
        self.state = Some(state);
    }

    pub fn published(&self) -> &[(u8, EncodedFrame)] {
        &self.published
    }

    pub fn take_published(&mut self) -> std::vec::Vec<(u8, EncodedFrame)> {
        std::mem::take(&mut self.published)
    }
}

impl Transport for LoopbackTransport {
    fn publish(&mut self, bus: u8, frame: &EncodedFrame) -> Result<(), TransportError> {
        if bus >= self.bus_count {
            return Err(TransportError::BusUnavailable(bus));
        }
        self.published.push((bus, frame.clone()));
        Ok(())
    }

    fn latest_state(&mut self) -> Option<VehicleStateSnapshot> {
        self.state.clone()
    }
}

/// Stand-in encoder for simulation.
///
/// Knows every signal this layer writes plus any registered extras, and
/// packs each value as a rounded big-endian `i16` in message order. It has
/// no relation to any vehicle's real bit layout.
#[derive(Debug, Clone, Default)]
pub struct PlainEncoder {
    extra: BTreeSet<(FrameKind, String)>,
}

impl PlainEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an additional (stock pass-through) signal.
    pub fn with_signal(mut self, kind: FrameKind, signal: &str) -> Self {
        self.extra.insert((kind, signal.to_owned()));
        self
    }
}

impl SignalEncoder for PlainEncoder {
    fn encode(&self, message: &OutboundMessage) -> Result<EncodedFrame, EncodeError> {
        let frame = message.kind.name();
        let data = match &message.payload {
            Payload::Raw(bytes) => bytes.clone(),
            Payload::Signals(set) => {
                let mut data: Vec<u8, MAX_PAYLOAD> = Vec::new();
                for s in set.iter() {
                    if !self.knows(message.kind, s.name) {
                        return Err(EncodeError::UnknownSignal {
                            frame,
                            signal: s.name.to_owned(),
                        });
                    }
                    let rounded = s.value.round();
                    if !(f64::from(i16::MIN)..=f64::from(i16::MAX)).contains(&rounded) {
                        return Err(EncodeError::ValueOutOfRange {
                            frame,
                            signal: s.name,
                            value: s.value,
                        });
                    }
                    data.extend_from_slice(&(rounded as i16).to_be_bytes())
                        .map_err(|_| EncodeError::PayloadTooLarge {
                            frame,
                            len: set.len() * 2,
                        })?;
                }
                data
            }
        };
        Ok(EncodedFrame {
            address: message.address,
            bus: message.bus,
            data,
        })
    }

    fn knows(&self, kind: FrameKind, signal: &str) -> bool {
        kind.signals().contains(&signal) || self.extra.contains(&(kind, signal.to_owned()))
    }
}
