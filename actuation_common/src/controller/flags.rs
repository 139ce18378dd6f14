//! Bitflag types for capabilities and per-tick input diagnostics.

use bitflags::bitflags;

bitflags! {
    /// Static vehicle capabilities, resolved once per session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// This stack owns longitudinal control (stock ACC disabled).
        const OWN_LONGITUDINAL = 0x0001;
        /// Extended dialect, second-generation highway driving assist.
        const HDA2             = 0x0002;
        /// Extended dialect cancels through the cruise-info frame.
        const ALT_BUTTONS      = 0x0004;
        /// Legacy cluster shows the 20 Hz LFA display message.
        const LFA_DISPLAY      = 0x0008;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Inputs sanitised during one tick.
    ///
    /// The core clamps silently; the caller decides whether to log.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputFlags: u8 {
        /// Steer fraction outside [-1, 1] (or above the vehicle cap).
        const STEER_CLAMPED    = 0x01;
        /// Acceleration outside [accel_min, accel_max].
        const ACCEL_CLAMPED    = 0x02;
        /// NaN or infinite value replaced by zero.
        const NON_FINITE_INPUT = 0x04;
        /// Stored previous steer was not a valid predecessor.
        const STALE_FEEDBACK   = 0x08;
        /// Outbound buffer full; trailing frames dropped.
        const OUTBOX_OVERFLOW  = 0x10;
    }
}

impl Default for InputFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl InputFlags {
    /// Flags that indicate a fault rather than routine clamping.
    pub const FAULT_MASK: Self =
        Self::from_bits_truncate(Self::STALE_FEEDBACK.bits() | Self::OUTBOX_OVERFLOW.bits());

    #[inline]
    pub const fn has_fault(&self) -> bool {
        self.intersects(Self::FAULT_MASK)
    }
}
