//! Slot tables and period evaluation.

use actuation_common::controller::flags::Capabilities;
use heapless::Vec;
use serde::Serialize;

/// Upper bound on slots in any table.
pub const MAX_SLOTS: usize = 9;

/// Message group with its own duty cycle.
///
/// Declaration order is the assembly order within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Slot {
    Steering,
    CameraBlock,
    HudIcons,
    Buttons,
    AccelCommand,
    DisplayHud,
    AccOptions,
    RadarOptions,
    TesterPresent,
}

/// Enable condition evaluated once at session init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    Requires(Capabilities),
    Lacks(Capabilities),
}

impl Gate {
    #[inline]
    pub fn open(&self, caps: Capabilities) -> bool {
        match *self {
            Self::Always => true,
            Self::Requires(c) => caps.contains(c),
            Self::Lacks(c) => !caps.intersects(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub slot: Slot,
    /// Fires when `frame % period == 0`.
    pub period: u32,
    pub gate: Gate,
}

const fn entry(slot: Slot, period: u32, gate: Gate) -> ScheduleEntry {
    ScheduleEntry { slot, period, gate }
}

const OWN_LONG: Capabilities = Capabilities::OWN_LONGITUDINAL;

/// Classic CAN table, in assembly order.
pub const LEGACY_TABLE: [ScheduleEntry; 7] = [
    entry(Slot::Steering, 1, Gate::Always),
    entry(Slot::Buttons, 1, Gate::Lacks(OWN_LONG)),
    entry(Slot::AccelCommand, 2, Gate::Requires(OWN_LONG)),
    entry(Slot::DisplayHud, 5, Gate::Requires(Capabilities::LFA_DISPLAY)),
    entry(Slot::AccOptions, 20, Gate::Requires(OWN_LONG)),
    entry(Slot::RadarOptions, 50, Gate::Requires(OWN_LONG)),
    // Keeps the radar's own ACC silenced while we send SCC.
    entry(Slot::TesterPresent, 100, Gate::Requires(OWN_LONG)),
];

/// CAN-FD table, in assembly order.
pub const EXTENDED_TABLE: [ScheduleEntry; 4] = [
    entry(Slot::Steering, 1, Gate::Always),
    entry(Slot::CameraBlock, 5, Gate::Requires(Capabilities::HDA2)),
    entry(Slot::HudIcons, 2, Gate::Lacks(Capabilities::HDA2)),
    entry(Slot::Buttons, 1, Gate::Always),
];

/// Session schedule: only the entries whose gate is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTable {
    entries: Vec<ScheduleEntry, MAX_SLOTS>,
}

impl ScheduleTable {
    /// Keep the entries whose gate is open for `caps`.
    ///
    /// Entries are sorted by slot so assembly order never depends on how a
    /// table literal was written. Entries past `MAX_SLOTS` are dropped.
    pub fn resolve(entries: &[ScheduleEntry], caps: Capabilities) -> Self {
        let mut kept: Vec<ScheduleEntry, MAX_SLOTS> = Vec::new();
        for e in entries.iter().filter(|e| e.gate.open(caps) && e.period > 0) {
            if kept.push(*e).is_err() {
                break;
            }
        }
        kept.sort_unstable_by_key(|e| e.slot);
        Self { entries: kept }
    }

    /// Slots due on `frame`, in assembly order.
    #[inline]
    pub fn due(&self, frame: u64) -> impl Iterator<Item = Slot> + '_ {
        self.entries
            .iter()
            .filter(move |e| frame % u64::from(e.period) == 0)
            .map(|e| e.slot)
    }

    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        self.entries.iter().any(|e| e.slot == slot)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
