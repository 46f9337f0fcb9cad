//! Peripheral drivers: front-panel buttons, pump relays, OLED panel.

pub mod button;
pub mod oled;
pub mod pump;
