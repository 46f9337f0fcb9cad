//! Bartender menu: construction, filtering and click handling.
//!
//! The tree built here is the operator's whole view of the machine:
//!
//! ```text
//! Main Menu
//! ├── <one item per drink the pumps can make>
//! └── Configure
//!     ├── Clean
//!     ├── Shutdown
//!     ├── <pump name>            one submenu per pump, in pump id order
//!     │   ├── <ingredient> [*]   star on the loaded ingredient
//!     │   └── Back
//!     └── Back
//! ```
//!
//! [`BarHooks`] is the [`MenuDelegate`] that keeps the tree in step with
//! the pump registry and turns selections into pours, assignments and
//! cleaning cycles.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{Clock, ConfigStore, Display, EventSink, Level, PinDriver, PowerPort};
use crate::catalog::{Catalog, Recipe};
use crate::config::BartenderConfig;
use crate::error::Error;
use crate::menu::navigation::MenuDelegate;
use crate::menu::{Menu, MenuItem};
use crate::registry::PumpRegistry;
use crate::scheduler::{self, PourRunner};

/// Payload of every leaf in the bartender menu.
#[derive(Debug, Clone, PartialEq)]
pub enum BarAction {
    /// Pour this recipe.
    Drink(Recipe),
    /// Load `value` onto pump `pump_id`.  `name` is the unmarked label.
    PumpSelection {
        pump_id: String,
        value: String,
        name: String,
    },
    /// Run every pump to flush the lines.
    Clean,
    /// Stop everything and power down.
    Shutdown,
}

// ───────────────────────────────────────────────────────────────
// Construction
// ───────────────────────────────────────────────────────────────

/// Build the full menu from the catalog and the current pumps.
pub fn build_menu(catalog: &Catalog, registry: &PumpRegistry) -> Menu<BarAction> {
    let mut main = Menu::new("Main Menu");
    for drink in &catalog.drinks {
        main.add_action(drink.name.clone(), BarAction::Drink(drink.clone()));
    }

    let mut configure = Menu::new("Configure");
    configure
        .add_action("Clean", BarAction::Clean)
        .add_action("Shutdown", BarAction::Shutdown);

    for (pump_id, pump) in registry.iter() {
        let mut pump_menu = Menu::new(pump.name.clone());
        for opt in &catalog.options {
            pump_menu.add_action(
                opt.name.clone(),
                BarAction::PumpSelection {
                    pump_id: pump_id.to_string(),
                    value: opt.value.clone(),
                    name: opt.name.clone(),
                },
            );
        }
        pump_menu.add_back("Back");
        configure.add_submenu(pump_menu);
    }
    configure.add_back("Back");

    main.add_submenu(configure);
    main
}

// ───────────────────────────────────────────────────────────────
// Filtering
// ───────────────────────────────────────────────────────────────

/// Bring visibility and stars in line with `registry`.
///
/// Drinks are shown only when every ingredient has a pump.  A pump option
/// is named `"<name> <marker>"` exactly when it is the loaded ingredient,
/// otherwise plain `"<name>"`.  Running this twice changes nothing.
pub fn refresh_menu(menu: &mut Menu<BarAction>, registry: &PumpRegistry, marker: &str) {
    menu.walk_mut(&mut |item: &mut MenuItem<BarAction>| {
        let update = match item.payload() {
            Some(BarAction::Drink(recipe)) => Refresh::Visible(registry.covers(recipe)),
            Some(BarAction::PumpSelection { pump_id, value, name }) => {
                let selected = registry
                    .get(pump_id)
                    .is_some_and(|pump| pump.dispenses(value));
                Refresh::Name(if selected {
                    format!("{} {}", name, marker)
                } else {
                    name.clone()
                })
            }
            _ => Refresh::Keep,
        };
        match update {
            Refresh::Visible(visible) => item.set_visible(visible),
            Refresh::Name(label) => {
                if item.name() != label {
                    item.set_name(label);
                }
            }
            Refresh::Keep => {}
        }
    });
}

enum Refresh {
    Visible(bool),
    Name(String),
    Keep,
}

// ───────────────────────────────────────────────────────────────
// Screen helpers
// ───────────────────────────────────────────────────────────────

const LINE_X: i32 = 10;
const LINE_Y: i32 = 20;

/// Replace the screen with one line of text.  Failures are logged only.
pub fn show_line(display: &mut impl Display, text: &str) {
    let frame = display
        .clear()
        .and_then(|()| display.draw_text(LINE_X, LINE_Y, text))
        .and_then(|()| display.flush());
    if let Err(e) = frame {
        warn!("Failed to talk to screen: {}", Error::DisplayWrite(e));
    }
}

// ───────────────────────────────────────────────────────────────
// Delegate
// ───────────────────────────────────────────────────────────────

/// Short-lived delegate borrowing everything a menu action may touch.
pub struct BarHooks<'a, H, S, E> {
    pub registry: &'a mut PumpRegistry,
    pub config: &'a BartenderConfig,
    pub hw: &'a mut H,
    pub store: &'a S,
    pub sink: &'a mut E,
}

impl<H, S, E> BarHooks<'_, H, S, E>
where
    H: PinDriver + Display + Clock + PowerPort,
    S: ConfigStore,
    E: EventSink,
{
    fn make_drink(&mut self, recipe: &Recipe) {
        let plan = match scheduler::plan(recipe, self.registry, self.config.flow_rate_secs_per_ml) {
            Ok(plan) => plan,
            Err(e) => {
                // The menu hides such drinks, so getting here is a bug.
                error!("pour aborted: {}", e);
                let ingredient = self
                    .registry
                    .missing_ingredient(recipe)
                    .unwrap_or_default()
                    .to_string();
                self.sink.emit(&AppEvent::PourRejected {
                    drink: recipe.name.clone(),
                    ingredient,
                });
                self.notice("Cannot pour");
                return;
            }
        };

        info!("Pouring '{}'", recipe.name);
        self.sink.emit(&AppEvent::PourStarted {
            drink: recipe.name.clone(),
            total: plan.total(),
        });
        let report = PourRunner::new(self.config.progress_interval()).run(&plan, &mut *self.hw);
        self.sink.emit(&AppEvent::PourFinished {
            drink: recipe.name.clone(),
            report,
        });
    }

    fn clean(&mut self) {
        let plan = scheduler::clean_plan(self.registry, self.config.clean_duration());
        self.sink.emit(&AppEvent::CleanStarted {
            pumps: plan.steps().len(),
            duration: plan.total(),
        });
        let report = PourRunner::new(self.config.progress_interval()).run(&plan, &mut *self.hw);
        self.sink.emit(&AppEvent::CleanFinished(report));
    }

    fn select_ingredient(&mut self, pump_id: &str, value: &str) {
        if !self.registry.assign(pump_id, value) {
            warn!("menu refers to unknown pump '{}'", pump_id);
            return;
        }

        match self.store.save(self.registry) {
            Ok(()) => {
                info!("Pump '{}' now dispenses '{}'", pump_id, value);
                self.sink.emit(&AppEvent::AssignmentChanged {
                    pump: pump_id.to_string(),
                    ingredient: value.to_string(),
                });
            }
            Err(e) => {
                // Memory keeps the new value; storage catches up on the next save.
                let err = Error::ConfigWrite(e);
                error!("pump '{}': {}", pump_id, err);
                self.sink.emit(&AppEvent::ConfigSaveFailed {
                    pump: pump_id.to_string(),
                    reason: err.to_string(),
                });
                self.notice("Save failed");
            }
        }
    }

    /// Close every pump, say goodbye and hand over to the host.
    pub fn power_down(&mut self) {
        self.hw.set_many(&self.registry.pins(), Level::High);
        show_line(&mut *self.hw, "Shutting down");
        self.sink.emit(&AppEvent::ShutdownRequested);
        self.hw.shutdown();
    }

    /// Hold a message on screen long enough to be read.
    fn notice(&mut self, text: &str) {
        show_line(&mut *self.hw, text);
        self.hw.sleep(self.config.notice_duration());
    }
}

impl<H, S, E> MenuDelegate<BarAction> for BarHooks<'_, H, S, E>
where
    H: PinDriver + Display + Clock + PowerPort,
    S: ConfigStore,
    E: EventSink,
{
    fn prepare_for_render(&mut self, menu: &mut Menu<BarAction>) -> bool {
        refresh_menu(menu, self.registry, &self.config.selection_marker);
        true
    }

    fn on_item_activated(&mut self, item: &MenuItem<BarAction>) -> bool {
        let Some(action) = item.payload() else {
            return false;
        };
        match action {
            BarAction::Drink(recipe) => self.make_drink(recipe),
            BarAction::PumpSelection { pump_id, value, .. } => self.select_ingredient(pump_id, value),
            BarAction::Clean => self.clean(),
            BarAction::Shutdown => {
                // Leave the goodbye on screen.
                self.power_down();
                return false;
            }
        }
        true
    }
}
