//! Inbound commands to the application service.
//!
//! These represent the operator's button presses after debouncing.  The
//! [`BartenderService`](super::service::BartenderService) interprets and
//! acts upon them.

/// Commands that input adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Left button: move to the next visible menu item.
    Advance,

    /// Right button: activate the item on screen.
    Select,

    /// Dedicated shutdown button: stop every pump and power down.
    Shutdown,
}
