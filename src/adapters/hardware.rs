//! Hardware adapter: bridges the host to the domain port traits.
//!
//! [`HostHardware`] bundles the pump relays, the screen, the clock and the
//! power switch behind one value so the service can take a single
//! `hw: &mut (impl PinDriver + Display + Clock + PowerPort)`.
//!
//! On a development machine the relays are [`LogPin`]s that only report
//! their level, and the screen is a [`ConsoleScreen`].

use core::convert::Infallible;
use core::time::Duration;

use log::debug;

use crate::adapters::console::ConsoleScreen;
use crate::adapters::time::SystemClock;
use crate::app::ports::{Clock, Display, DisplayError, Level, PinDriver, PinMode, PowerPort};
use crate::drivers::pump::PumpBank;

// ── Relay stand-in ────────────────────────────────────────────

/// Output pin that logs its level instead of driving a relay.
pub struct LogPin {
    gpio: u8,
}

impl LogPin {
    pub fn new(gpio: u8) -> Self {
        Self { gpio }
    }
}

impl embedded_hal::digital::ErrorType for LogPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        debug!("PIN | GPIO {} LOW (pump on)", self.gpio);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        debug!("PIN | GPIO {} HIGH (pump off)", self.gpio);
        Ok(())
    }
}

// ── Bundle ────────────────────────────────────────────────────

/// Concrete adapter that combines all peripherals behind the port traits.
pub struct HostHardware<D, P> {
    pumps: PumpBank<LogPin>,
    screen: D,
    clock: SystemClock,
    power: P,
}

impl<P: PowerPort> HostHardware<ConsoleScreen, P> {
    /// Console screen and logging relays for `pins`.
    pub fn simulated(pins: &[u8], power: P) -> Self {
        Self::new(pins, ConsoleScreen::new(), power)
    }
}

impl<D: Display, P: PowerPort> HostHardware<D, P> {
    pub fn new(pins: &[u8], screen: D, power: P) -> Self {
        let mut pumps = PumpBank::new();
        for &gpio in pins {
            pumps.add(gpio, LogPin::new(gpio));
        }
        Self {
            pumps,
            screen,
            clock: SystemClock::new(),
            power,
        }
    }

    pub fn pumps(&self) -> &PumpBank<LogPin> {
        &self.pumps
    }

    pub fn screen(&self) -> &D {
        &self.screen
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    pub fn clock(&self) -> &SystemClock {
        &self.clock
    }
}

// ── PinDriver implementation ──────────────────────────────────

impl<D, P> PinDriver for HostHardware<D, P> {
    fn setup(&mut self, pin: u8, mode: PinMode, initial: Level) {
        self.pumps.setup(pin, mode, initial);
    }

    fn set(&mut self, pin: u8, level: Level) {
        self.pumps.set(pin, level);
    }
}

// ── Display implementation ────────────────────────────────────

impl<D: Display, P> Display for HostHardware<D, P> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.screen.clear()
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        self.screen.draw_text(x, y, text)
    }

    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        outline: bool,
        filled: bool,
    ) -> Result<(), DisplayError> {
        self.screen.draw_rect(x, y, width, height, outline, filled)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.screen.flush()
    }
}

// ── Clock implementation ──────────────────────────────────────

impl<D, P> Clock for HostHardware<D, P> {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn sleep(&mut self, duration: Duration) {
        self.clock.sleep(duration);
    }
}

// ── PowerPort implementation ──────────────────────────────────

impl<D, P: PowerPort> PowerPort for HostHardware<D, P> {
    fn shutdown(&mut self) {
        self.power.shutdown();
    }
}
