//! Unified error types for the bartender controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! controller's error handling uniform.  Port-level errors
//! ([`ConfigError`], [`DisplayError`]) live beside their traits in
//! [`crate::app::ports`] and are wrapped here.

use core::fmt;

use crate::app::ports::{ConfigError, DisplayError};
use crate::menu::MenuError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The persisted pump registry is missing or corrupt.  Fatal at startup.
    ConfigLoad(ConfigError),
    /// A recipe ingredient has no pump assigned to it.
    UnresolvableIngredient { recipe: String, ingredient: String },
    /// Drawing or flushing a frame failed.
    DisplayWrite(DisplayError),
    /// Persisting a pump assignment failed; memory now leads storage.
    ConfigWrite(ConfigError),
    /// The menu tree violates a structural limit.
    Menu(MenuError),
    /// Recipe or option data is invalid.
    Catalog(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigLoad(e) => write!(f, "config load: {e}"),
            Self::UnresolvableIngredient { recipe, ingredient } => {
                write!(f, "no pump assigned to '{ingredient}' (recipe '{recipe}')")
            }
            Self::DisplayWrite(e) => write!(f, "display write: {e}"),
            Self::ConfigWrite(e) => write!(f, "config write: {e}"),
            Self::Menu(e) => write!(f, "menu: {e}"),
            Self::Catalog(msg) => write!(f, "catalog: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::DisplayWrite(e)
    }
}

impl From<MenuError> for Error {
    fn from(e: MenuError) -> Self {
        Self::Menu(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
