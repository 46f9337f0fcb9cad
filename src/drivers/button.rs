//! Front-panel button discipline.
//!
//! ## Hardware
//!
//! Three active-low momentary switches with pull-ups, falling-edge
//! triggered.  Whatever delivers edges (a GPIO interrupt on the target, a
//! stdin line on the host) runs them through two filters before a command
//! reaches the controller:
//!
//! | Filter        | Rule                                                   |
//! |---------------|--------------------------------------------------------|
//! | [`PressFilter`] | presses closer than the button's bounce window are dropped |
//! | [`InputGate`]   | presses arriving while a command is running are dropped    |
//!
//! Nothing is queued.  A press during a pour is lost, the same way it is
//! when edge detection is switched off for the duration.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::commands::AppCommand;
use crate::config::BartenderConfig;
use crate::pins;

/// The three physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Advance,
    Select,
    Shutdown,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Advance, Button::Select, Button::Shutdown];

    pub fn command(self) -> AppCommand {
        match self {
            Button::Advance => AppCommand::Advance,
            Button::Select => AppCommand::Select,
            Button::Shutdown => AppCommand::Shutdown,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

// ───────────────────────────────────────────────────────────────
// Bounce window
// ───────────────────────────────────────────────────────────────

/// Per-button minimum spacing between accepted presses.
#[derive(Debug, Clone)]
pub struct PressFilter {
    spacing_ms: [u64; 3],
    last_ms: [Option<u64>; 3],
}

impl PressFilter {
    pub fn new(advance_ms: u32, select_ms: u32, shutdown_ms: u32) -> Self {
        Self {
            spacing_ms: [advance_ms.into(), select_ms.into(), shutdown_ms.into()],
            last_ms: [None; 3],
        }
    }

    pub fn from_config(config: &BartenderConfig) -> Self {
        Self::new(
            config.advance_bounce_ms,
            config.select_bounce_ms,
            config.shutdown_bounce_ms,
        )
    }

    /// Record an edge at `now_ms`.  Returns `true` if it counts as a press.
    ///
    /// Rejected edges do not restart the window.
    pub fn accept(&mut self, button: Button, now_ms: u64) -> bool {
        let slot = button.slot();
        if let Some(last) = self.last_ms[slot] {
            if now_ms.saturating_sub(last) < self.spacing_ms[slot] {
                return false;
            }
        }
        self.last_ms[slot] = Some(now_ms);
        true
    }
}

impl Default for PressFilter {
    fn default() -> Self {
        Self::new(
            pins::ADVANCE_BOUNCE_MS,
            pins::SELECT_BOUNCE_MS,
            pins::SHUTDOWN_BOUNCE_MS,
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Input gate
// ───────────────────────────────────────────────────────────────

/// Lock-free open/closed flag shared between the input side and the
/// controller.  Safe to touch from interrupt context.
#[derive(Debug)]
pub struct InputGate {
    open: AtomicBool,
}

impl InputGate {
    pub const fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Claim the gate for one command.  `false` means a command is
    /// already running and this press must be dropped.
    pub fn try_close(&self) -> bool {
        self.open
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn reopen(&self) {
        self.open.store(true, Ordering::Release);
    }

    /// Reopen the gate when the returned guard goes out of scope.
    pub fn reopen_on_drop(&self) -> Reopen<'_> {
        Reopen { gate: self }
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}

#[must_use = "the gate reopens as soon as the guard is dropped"]
pub struct Reopen<'a> {
    gate: &'a InputGate,
}

impl Drop for Reopen<'_> {
    fn drop(&mut self) {
        self.gate.reopen();
    }
}
