//! Bartender controller library.
//!
//! Exposes the pure-logic modules (pour scheduling, menu navigation, pump
//! registry) for integration testing, together with the drivers and host
//! adapters the binary wires up.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod catalog;
pub mod config;
pub mod drivers;
pub mod error;
pub mod menu;
pub mod pins;
pub mod registry;
pub mod scheduler;

pub use error::{Error, Result};
