//! Pump relay bank over `embedded-hal` output pins.
//!
//! Each pump sits behind a relay channel wired active-low: driving the
//! line LOW energises the relay and the pump runs.  The bank only maps
//! GPIO numbers to pin handles; timing lives in the scheduler.
//!
//! ## Safety contract
//!
//! Pins are driven HIGH (pump off) when they are added to the bank.  A
//! pin write that fails is logged and otherwise ignored: a stuck relay
//! cannot be recovered from here and aborting mid-pour would leave the
//! other pumps running.

use embedded_hal::digital::OutputPin;
use log::{error, warn};

use crate::app::ports::{Level, PinDriver, PinMode};

pub struct PumpBank<P> {
    pins: Vec<(u8, P)>,
    states: Vec<Level>,
}

impl<P: OutputPin> PumpBank<P> {
    pub fn new() -> Self {
        Self {
            pins: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Register the handle for GPIO `gpio` and switch it off.
    pub fn add(&mut self, gpio: u8, pin: P) {
        if self.slot(gpio).is_some() {
            warn!("GPIO {} added to the pump bank twice, ignoring", gpio);
            return;
        }
        self.pins.push((gpio, pin));
        self.states.push(Level::High);
        let slot = self.pins.len() - 1;
        self.write(slot, Level::High);
    }

    /// Last level written to `gpio`.
    pub fn level(&self, gpio: u8) -> Option<Level> {
        self.slot(gpio).map(|slot| self.states[slot])
    }

    /// Whether any pump is currently running.
    pub fn any_running(&self) -> bool {
        self.states.iter().any(|&level| level == Level::Low)
    }

    fn slot(&self, gpio: u8) -> Option<usize> {
        self.pins.iter().position(|(g, _)| *g == gpio)
    }

    fn write(&mut self, slot: usize, level: Level) {
        let (gpio, pin) = &mut self.pins[slot];
        let result = match level {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        };
        match result {
            Ok(()) => self.states[slot] = level,
            Err(e) => error!("GPIO {} write {:?} failed: {:?}", gpio, level, e),
        }
    }
}

impl<P: OutputPin> Default for PumpBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> PinDriver for PumpBank<P> {
    fn setup(&mut self, pin: u8, _mode: PinMode, initial: Level) {
        self.set(pin, initial);
    }

    fn set(&mut self, pin: u8, level: Level) {
        match self.slot(pin) {
            Some(slot) => self.write(slot, level),
            None => warn!("no pump wired to GPIO {}", pin),
        }
    }
}
