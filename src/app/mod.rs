//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the bartender: menu
//! construction and filtering, click handling and the controller that
//! ties them to the pour scheduler.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod hooks;
pub mod ports;
pub mod service;
