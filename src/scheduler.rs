//! Pump-timing scheduler.
//!
//! Turns a recipe into an actuation plan and drives the pins through it.
//!
//! ```text
//!  t=0          27s              54s
//!   │ all LOW    │ pin 5 HIGH      │ pin 6 HIGH
//!   ├────────────┼─────────────────┤
//!   │◀─ delta0 ─▶│◀──── delta1 ───▶│
//! ```
//!
//! Every pump in a plan starts at offset zero and stops at its own
//! offset.  The runner switches all pumps on together, then walks the
//! stop sequence in ascending stop order, redrawing a progress bar while
//! it waits.  Two pumps that stop at the same instant produce a zero
//! delta and are switched off back to back without a wait.
//!
//! A pour blocks the caller until the last pump is off.  There is no
//! abort path once the pins are driven LOW.

use core::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::{Clock, Display, DisplayError, Level, PinDriver, SCREEN_WIDTH};
use crate::catalog::Recipe;
use crate::error::{Error, Result};
use crate::registry::PumpRegistry;

// ═══════════════════════════════════════════════════════════════
//  Plan types
// ═══════════════════════════════════════════════════════════════

/// When one pump runs, relative to pour start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationStep {
    pub pin: u8,
    pub start_offset: Duration,
    pub stop_offset: Duration,
}

/// One entry of the stop sequence: wait `delta`, then stop `pin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopStep {
    pub pin: u8,
    pub delta: Duration,
}

/// Actuation steps sorted by ascending stop offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PourPlan {
    steps: Vec<ActuationStep>,
}

impl PourPlan {
    pub fn steps(&self) -> &[ActuationStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pins switched on at pour start.
    pub fn pins(&self) -> Vec<u8> {
        self.steps.iter().map(|s| s.pin).collect()
    }

    /// Duration of the whole pour (the latest stop offset).
    pub fn total(&self) -> Duration {
        self.steps.last().map_or(Duration::ZERO, |s| s.stop_offset)
    }

    /// Stop offsets rewritten as successive deltas.
    pub fn stop_sequence(&self) -> Vec<StopStep> {
        let mut prev = Duration::ZERO;
        self.steps
            .iter()
            .map(|s| {
                let delta = s.stop_offset.saturating_sub(prev);
                prev = s.stop_offset;
                StopStep { pin: s.pin, delta }
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Planning
// ═══════════════════════════════════════════════════════════════

/// Time a pump must stay open to deliver `volume_ml`.
///
/// Rounded to whole milliseconds and never shorter than one.
pub fn pour_duration(volume_ml: f64, secs_per_ml: f64) -> Duration {
    let ms = (volume_ml * secs_per_ml * 1000.0).round();
    Duration::from_millis((ms as u64).max(1))
}

/// Build the actuation plan for `recipe`.
///
/// Every pump loaded with an ingredient runs for that ingredient's full
/// duration.  Steps are ordered by stop offset; ties keep recipe order.
///
/// Fails with [`Error::UnresolvableIngredient`] before anything is
/// actuated if any ingredient has no pump.
pub fn plan(recipe: &Recipe, registry: &PumpRegistry, secs_per_ml: f64) -> Result<PourPlan> {
    let mut steps = Vec::with_capacity(recipe.ingredient_count());

    for (ingredient, volume_ml) in recipe.ingredients() {
        let stop_offset = pour_duration(volume_ml, secs_per_ml);
        let before = steps.len();
        steps.extend(registry.pumps_for(ingredient).map(|pump| ActuationStep {
            pin: pump.pin,
            start_offset: Duration::ZERO,
            stop_offset,
        }));
        if steps.len() == before {
            return Err(Error::UnresolvableIngredient {
                recipe: recipe.name.clone(),
                ingredient: ingredient.to_string(),
            });
        }
    }

    // Stable: equal stop offsets stay in recipe order.
    steps.sort_by_key(|s| s.stop_offset);
    Ok(PourPlan { steps })
}

/// Every registered pump, all stopping together after `duration`.
pub fn clean_plan(registry: &PumpRegistry, duration: Duration) -> PourPlan {
    PourPlan {
        steps: registry
            .pins()
            .into_iter()
            .map(|pin| ActuationStep {
                pin,
                start_offset: Duration::ZERO,
                stop_offset: duration,
            })
            .collect(),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Execution
// ═══════════════════════════════════════════════════════════════

const BANNER_X: i32 = 22;
const BANNER_Y: i32 = 15;
const BAR_X: i32 = 20;
const BAR_Y: i32 = 37;
const BAR_HEIGHT: u32 = 10;
const BAR_WIDTH: u32 = SCREEN_WIDTH - 2 * BAR_X as u32;

/// What happened during a pour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PourReport {
    /// Clock time from pins LOW to the last pin HIGH.
    pub elapsed: Duration,
    /// Progress frames attempted.
    pub frames: u32,
    /// Frames lost to display errors.
    pub display_failures: u32,
}

/// Drives pins and the progress bar through a [`PourPlan`].
pub struct PourRunner {
    progress_interval: Duration,
}

impl PourRunner {
    pub fn new(progress_interval: Duration) -> Self {
        Self {
            progress_interval: progress_interval.max(Duration::from_millis(1)),
        }
    }

    /// Execute `plan`, blocking until every pump is stopped.
    ///
    /// Display failures are logged and counted, never returned: a broken
    /// screen must not leave a pump running.
    pub fn run(&self, plan: &PourPlan, hw: &mut (impl PinDriver + Display + Clock)) -> PourReport {
        let mut report = PourReport::default();
        if plan.is_empty() {
            return report;
        }

        if let Err(e) = draw_banner(&mut *hw) {
            report.display_failures += 1;
            warn!("Failed to talk to screen: {}", e);
        }

        let total = plan.total();
        let start = hw.now();
        hw.set_many(&plan.pins(), Level::Low);
        info!("POUR | {} pump(s) running, {} ms", plan.steps().len(), total.as_millis());

        let mut deadline = Duration::ZERO;
        for stop in plan.stop_sequence() {
            deadline += stop.delta;
            self.wait_until(&mut *hw, start, deadline, total, &mut report);
            hw.set(stop.pin, Level::High);
            debug!("POUR | pin {} stopped at {} ms", stop.pin, deadline.as_millis());
        }

        report.elapsed = hw.now().saturating_sub(start);
        report
    }

    /// Sleep in progress-interval slices until `deadline` after `start`.
    fn wait_until(
        &self,
        hw: &mut (impl Display + Clock),
        start: Duration,
        deadline: Duration,
        total: Duration,
        report: &mut PourReport,
    ) {
        loop {
            let elapsed = hw.now().saturating_sub(start);
            if elapsed >= deadline {
                return;
            }

            report.frames += 1;
            if let Err(e) = draw_progress(&mut *hw, elapsed, total) {
                report.display_failures += 1;
                warn!("Failed to talk to screen: {}", e);
            }

            hw.sleep((deadline - elapsed).min(self.progress_interval));
        }
    }
}

fn draw_banner(display: &mut impl Display) -> core::result::Result<(), DisplayError> {
    display.clear()?;
    display.draw_text(BANNER_X, BANNER_Y, "Dispensing...")?;
    display.flush()
}

/// Filled width of the progress bar for `elapsed` out of `total`.
pub fn progress_width(elapsed: Duration, total: Duration) -> u32 {
    if total.is_zero() {
        return BAR_WIDTH;
    }
    let fraction = (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
    (fraction * f64::from(BAR_WIDTH)) as u32
}

fn draw_progress(
    display: &mut impl Display,
    elapsed: Duration,
    total: Duration,
) -> core::result::Result<(), DisplayError> {
    display.draw_rect(BAR_X, BAR_Y, BAR_WIDTH, BAR_HEIGHT, true, false)?;
    // Fill stays inside the outline.
    let filled = progress_width(elapsed, total).min(BAR_WIDTH - 2);
    if filled > 0 {
        display.draw_rect(BAR_X + 1, BAR_Y + 1, filled, BAR_HEIGHT - 2, true, true)?;
    }
    display.flush()
}
