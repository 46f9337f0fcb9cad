//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BartenderService (domain)
//! ```
//!
//! Driven adapters (pins, display, clock, storage, power, event sinks)
//! implement these traits.  The [`BartenderService`](super::service::BartenderService)
//! consumes them via generics injected at call sites, so the domain core
//! never touches hardware or globals directly.
//!
//! ## Pump pin polarity
//!
//! Pump outputs are **active-low**: [`Level::Low`] runs a pump,
//! [`Level::High`] stops it.  Every pump pin is set up HIGH so a fresh
//! process never starts with a valve open.

use core::time::Duration;

use crate::registry::PumpRegistry;

// ───────────────────────────────────────────────────────────────
// Pin driver port (domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Logical output level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Pump stopped / valve closed.
    High,
    /// Pump running.
    Low,
}

/// Pin direction passed to [`PinDriver::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Push-pull output driving a pump relay.
    Output,
}

/// Write-side port: the domain calls this to switch pump outputs.
pub trait PinDriver {
    /// Configure a pin's direction and its level right after setup.
    fn setup(&mut self, pin: u8, mode: PinMode, initial: Level);

    /// Drive a single pin.
    fn set(&mut self, pin: u8, level: Level);

    /// Drive several pins to the same level as one operation.
    fn set_many(&mut self, pins: &[u8], level: Level) {
        for &pin in pins {
            self.set(pin, level);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → 128x64 monochrome panel)
// ───────────────────────────────────────────────────────────────

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: u32 = 128;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Frame-buffer style display.  Drawing calls compose a frame;
/// [`flush`](Display::flush) commits it to the hardware.
pub trait Display {
    /// Blank the frame buffer.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw a single line of text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError>;

    /// Draw a rectangle.  `outline` strokes the border, `filled` fills it.
    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        outline: bool,
        filled: bool,
    ) -> Result<(), DisplayError>;

    /// Push the frame buffer to the panel.
    fn flush(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (domain → monotonic time + blocking wait)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source used to time pours.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Configuration store port (domain ↔ persisted pump assignment)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the pump → ingredient assignment.
///
/// Implementations MUST validate on load: a registry with duplicate pins
/// is rejected with [`ConfigError::ValidationFailed`] rather than handed
/// to the scheduler.
pub trait ConfigStore {
    /// Load the registry.  A missing or corrupt store is an error; there
    /// is no default registry to fall back on.
    fn load(&self) -> Result<PumpRegistry, ConfigError>;

    /// Persist the registry atomically.
    fn save(&self, registry: &PumpRegistry) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Power port (domain → host OS)
// ───────────────────────────────────────────────────────────────

/// Powers the appliance down.
pub trait PowerPort {
    fn shutdown(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigStore`] operations and config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No stored configuration exists.
    NotFound,
    /// Stored data failed to deserialize.
    Corrupted,
    /// A field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`Display`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// The bus to the panel (I²C / SPI) failed.
    Bus,
    /// A primitive could not be drawn into the frame buffer.
    Draw,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "display bus error"),
            Self::Draw => write!(f, "draw failed"),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for DisplayError {}
