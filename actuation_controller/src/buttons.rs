//! Cruise button sequencing.
//!
//! Presses are paced by a frame gate and repeated in bursts because a
//! single spoofed press is not reliably accepted. The legacy dialect sends
//! cancel every tick it is requested and gates only resume; the extended
//! dialect gates every press.

use actuation_common::consts::DT_CTRL;
use actuation_common::controller::intent::ButtonIntent;
use actuation_common::controller::limits::ButtonTuning;
use tracing::debug;

/// Cruise button codes as seen by the cruise ECU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CruiseButton {
    ResAccel = 1,
    Cancel = 4,
}

impl CruiseButton {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Resolved button policy for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonPolicy {
    Legacy {
        resume_gate: f64,
        resume_burst: usize,
    },
    Extended {
        gate: f64,
        cancel_burst: usize,
        /// Cancel through a cruise-info copy instead of button presses.
        alt_buttons: bool,
    },
}

impl ButtonPolicy {
    pub const fn legacy(tuning: &ButtonTuning) -> Self {
        Self::Legacy {
            resume_gate: tuning.legacy_resume_gate,
            resume_burst: tuning.legacy_resume_burst,
        }
    }

    pub const fn extended(tuning: &ButtonTuning, alt_buttons: bool) -> Self {
        Self::Extended {
            gate: tuning.extended_gate,
            cancel_burst: tuning.extended_cancel_burst,
            alt_buttons,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    None,
    /// `copies` identical presses of `button`.
    Press { button: CruiseButton, copies: usize },
    /// One copy of the stock cruise-info frame with the cancel fields set.
    CruiseInfoCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStep {
    pub action: ButtonAction,
    /// Rolling counter every press carries.
    pub counter: u8,
    pub last_button_frame: Option<u64>,
}

/// True once more than `gate` seconds have passed since the last press.
#[inline]
fn gate_open(frame: u64, last_button_frame: Option<u64>, gate: f64) -> bool {
    match last_button_frame {
        None => true,
        Some(last) => frame.saturating_sub(last) as f64 * DT_CTRL > gate,
    }
}

/// Decide this tick's button frames.
pub fn next(
    button: ButtonIntent,
    button_counter: u8,
    last_button_frame: Option<u64>,
    frame: u64,
    policy: &ButtonPolicy,
) -> ButtonStep {
    let counter = button_counter.wrapping_add(1);
    let idle = ButtonStep {
        action: ButtonAction::None,
        counter,
        last_button_frame,
    };
    let pressed = |action| ButtonStep {
        action,
        counter,
        last_button_frame: Some(frame),
    };

    match (*policy, button) {
        (_, ButtonIntent::None) => idle,

        (ButtonPolicy::Legacy { .. }, ButtonIntent::Cancel) => ButtonStep {
            action: ButtonAction::Press {
                button: CruiseButton::Cancel,
                copies: 1,
            },
            ..idle
        },
        (ButtonPolicy::Legacy { resume_gate, resume_burst }, ButtonIntent::Resume) => {
            if !gate_open(frame, last_button_frame, resume_gate) {
                return idle;
            }
            debug!(frame, copies = resume_burst, "Resume burst");
            pressed(ButtonAction::Press {
                button: CruiseButton::ResAccel,
                copies: resume_burst,
            })
        }

        (ButtonPolicy::Extended { gate, .. }, _) if !gate_open(frame, last_button_frame, gate) => idle,
        (ButtonPolicy::Extended { alt_buttons: true, .. }, ButtonIntent::Cancel) => {
            debug!(frame, "Cruise-info cancel");
            pressed(ButtonAction::CruiseInfoCancel)
        }
        (ButtonPolicy::Extended { cancel_burst, .. }, ButtonIntent::Cancel) => {
            debug!(frame, copies = cancel_burst, "Cancel burst");
            pressed(ButtonAction::Press {
                button: CruiseButton::Cancel,
                copies: cancel_burst,
            })
        }
        // Alternate-button vehicles have no resume path.
        (ButtonPolicy::Extended { alt_buttons: true, .. }, ButtonIntent::Resume) => idle,
        (ButtonPolicy::Extended { .. }, ButtonIntent::Resume) => pressed(ButtonAction::Press {
            button: CruiseButton::ResAccel,
            copies: 1,
        }),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
