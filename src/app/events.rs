//! Outbound application events.
//!
//! The [`BartenderService`](super::service::BartenderService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use core::time::Duration;

use crate::scheduler::PourReport;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller is up and showing its first menu item.
    Started { pumps: usize, drinks: usize },

    /// A menu item was drawn on screen.
    ItemShown(String),

    /// Pumps are about to open for a drink.
    PourStarted { drink: String, total: Duration },

    /// Every pump of the drink has stopped.
    PourFinished { drink: String, report: PourReport },

    /// A drink was selected that the pumps cannot make.  Nothing was actuated.
    PourRejected { drink: String, ingredient: String },

    /// All pumps are being flushed.
    CleanStarted { pumps: usize, duration: Duration },

    /// The cleaning cycle ended.
    CleanFinished(PourReport),

    /// An operator loaded a new ingredient onto a pump and it was saved.
    AssignmentChanged { pump: String, ingredient: String },

    /// An assignment changed in memory but could not be persisted.
    ConfigSaveFailed { pump: String, reason: String },

    /// Pumps forced off and the host asked to power down.
    ShutdownRequested,
}
