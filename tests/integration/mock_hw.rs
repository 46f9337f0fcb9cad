//! Mock hardware adapter for integration tests.
//!
//! Records every pin and screen call against a simulated clock so tests
//! can assert on exact actuation times without sleeping or touching GPIO.

use bartender::app::events::AppEvent;
use bartender::app::ports::{
    Clock, ConfigError, ConfigStore, Display, DisplayError, EventSink, Level, PinDriver, PinMode,
    PowerPort,
};
use bartender::registry::PumpRegistry;
use std::cell::{Cell, RefCell};
use std::time::Duration;

// ── Pin call record ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PinCall {
    Setup { pin: u8, mode: PinMode, initial: Level },
    Set { pin: u8, level: Level, at: Duration },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub pins: Vec<PinCall>,
    /// Text lines of every committed frame, in order.
    pub frames: Vec<Vec<String>>,
    pub rects: usize,
    pub now: Duration,
    pub slept: Vec<Duration>,
    pub fail_display: bool,
    pub shutdowns: u32,
    pending: Vec<String>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            pins: Vec::new(),
            frames: Vec::new(),
            rects: 0,
            now: Duration::ZERO,
            slept: Vec::new(),
            fail_display: false,
            shutdowns: 0,
            pending: Vec::new(),
        }
    }

    /// Times at which `pin` was driven to `level`.
    pub fn edges(&self, pin: u8, level: Level) -> Vec<Duration> {
        self.pins
            .iter()
            .filter_map(|c| match c {
                PinCall::Set { pin: p, level: l, at } if *p == pin && *l == level => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Last level written to `pin`, counting setup.
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.pins.iter().rev().find_map(|c| match c {
            PinCall::Setup { pin: p, initial, .. } if *p == pin => Some(*initial),
            PinCall::Set { pin: p, level, .. } if *p == pin => Some(*level),
            _ => None,
        })
    }

    /// Text of the most recent committed frame.
    pub fn screen(&self) -> Vec<String> {
        self.frames.last().cloned().unwrap_or_default()
    }

    /// First line of the most recent committed frame.
    pub fn headline(&self) -> Option<String> {
        self.frames.last().and_then(|f| f.first().cloned())
    }

    pub fn set_calls(&self) -> usize {
        self.pins
            .iter()
            .filter(|c| matches!(c, PinCall::Set { .. }))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl PinDriver for MockHardware {
    fn setup(&mut self, pin: u8, mode: PinMode, initial: Level) {
        self.pins.push(PinCall::Setup { pin, mode, initial });
    }

    fn set(&mut self, pin: u8, level: Level) {
        self.pins.push(PinCall::Set {
            pin,
            level,
            at: self.now,
        });
    }
}

impl Display for MockHardware {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.fail_display {
            return Err(DisplayError::Bus);
        }
        self.pending.clear();
        Ok(())
    }

    fn draw_text(&mut self, _x: i32, _y: i32, text: &str) -> Result<(), DisplayError> {
        if self.fail_display {
            return Err(DisplayError::Bus);
        }
        self.pending.push(text.to_string());
        Ok(())
    }

    fn draw_rect(
        &mut self,
        _x: i32,
        _y: i32,
        _width: u32,
        _height: u32,
        _outline: bool,
        _filled: bool,
    ) -> Result<(), DisplayError> {
        if self.fail_display {
            return Err(DisplayError::Bus);
        }
        self.rects += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.fail_display {
            return Err(DisplayError::Bus);
        }
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

impl Clock for MockHardware {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept.push(duration);
        self.now += duration;
    }
}

impl PowerPort for MockHardware {
    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// In-memory [`ConfigStore`] with switchable save failures.
pub struct MockStore {
    pub saved: RefCell<Option<PumpRegistry>>,
    pub saves: Cell<u32>,
    pub fail_save: Cell<bool>,
    initial: Option<PumpRegistry>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn with(registry: PumpRegistry) -> Self {
        Self {
            saved: RefCell::new(None),
            saves: Cell::new(0),
            fail_save: Cell::new(false),
            initial: Some(registry),
        }
    }

    pub fn empty() -> Self {
        Self {
            saved: RefCell::new(None),
            saves: Cell::new(0),
            fail_save: Cell::new(false),
            initial: None,
        }
    }
}

impl ConfigStore for MockStore {
    fn load(&self) -> Result<PumpRegistry, ConfigError> {
        if let Some(saved) = self.saved.borrow().as_ref() {
            return Ok(saved.clone());
        }
        self.initial.clone().ok_or(ConfigError::NotFound)
    }

    fn save(&self, registry: &PumpRegistry) -> Result<(), ConfigError> {
        if self.fail_save.get() {
            return Err(ConfigError::IoError);
        }
        self.saves.set(self.saves.get() + 1);
        *self.saved.borrow_mut() = Some(registry.clone());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ItemShown(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
