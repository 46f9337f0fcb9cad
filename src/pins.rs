//! Front-panel constants: button timing and the OLED bus address.
//!
//! Pump pins are not listed here: they come from the pump configuration
//! file so an operator can rewire without rebuilding.

// ---------------------------------------------------------------------------
// Debounce windows (minimum spacing between accepted presses)
// ---------------------------------------------------------------------------

pub const ADVANCE_BOUNCE_MS: u32 = 200;
pub const SELECT_BOUNCE_MS: u32 = 800;
pub const SHUTDOWN_BOUNCE_MS: u32 = 400;

// ---------------------------------------------------------------------------
// I²C OLED (SSD1306 128x64)
// ---------------------------------------------------------------------------

pub const OLED_I2C_ADDRESS: u8 = 0x3C;
