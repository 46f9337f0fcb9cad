//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade as one tagged line each (`POUR | ...`, `MENU | ...`).  The
//! binary routes those records to stderr; a telemetry adapter would
//! implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Started { pumps, drinks } => {
                info!("START | pumps={} drinks={}", pumps, drinks);
            }
            AppEvent::ItemShown(name) => {
                debug!("MENU | showing '{}'", name);
            }
            AppEvent::PourStarted { drink, total } => {
                info!("POUR | '{}' started, {:.1}s", drink, total.as_secs_f32());
            }
            AppEvent::PourFinished { drink, report } => {
                info!(
                    "POUR | '{}' done in {:.1}s | frames={} display_failures={}",
                    drink,
                    report.elapsed.as_secs_f32(),
                    report.frames,
                    report.display_failures,
                );
            }
            AppEvent::PourRejected { drink, ingredient } => {
                warn!("POUR | '{}' rejected, no pump has '{}'", drink, ingredient);
            }
            AppEvent::CleanStarted { pumps, duration } => {
                info!("CLEAN | {} pumps for {}s", pumps, duration.as_secs());
            }
            AppEvent::CleanFinished(report) => {
                info!(
                    "CLEAN | done in {:.1}s | display_failures={}",
                    report.elapsed.as_secs_f32(),
                    report.display_failures,
                );
            }
            AppEvent::AssignmentChanged { pump, ingredient } => {
                info!("CONFIG | {} -> '{}'", pump, ingredient);
            }
            AppEvent::ConfigSaveFailed { pump, reason } => {
                warn!("CONFIG | {} change not saved: {}", pump, reason);
            }
            AppEvent::ShutdownRequested => {
                info!("POWER | shutdown requested");
            }
        }
    }
}
