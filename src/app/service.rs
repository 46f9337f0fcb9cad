//! Application service: the hexagonal core.
//!
//! [`BartenderService`] owns the pump registry, the tunables and the menu
//! context.  It turns operator commands into menu gestures and draws
//! whatever the menu says should be on screen.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  AppCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │   BartenderService     │
//!  PinDriver  ◀── │  Menu · Registry · Pour│ ──▶ ConfigStore
//!  Display    ◀── └────────────────────────┘
//! ```

use log::info;

use crate::catalog::Catalog;
use crate::config::BartenderConfig;
use crate::error::{Error, Result};
use crate::menu::navigation::MenuContext;
use crate::registry::PumpRegistry;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::hooks::{BarAction, BarHooks, build_menu, show_line};
use super::ports::{Clock, ConfigStore, Display, EventSink, Level, PinDriver, PinMode, PowerPort};

// ───────────────────────────────────────────────────────────────
// BartenderService
// ───────────────────────────────────────────────────────────────

/// The bartender controller.
pub struct BartenderService {
    config: BartenderConfig,
    registry: PumpRegistry,
    menu: MenuContext<BarAction>,
    drinks: usize,
}

impl BartenderService {
    /// Build the menu for `catalog` over an already loaded registry.
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: BartenderConfig, catalog: &Catalog, registry: PumpRegistry) -> Result<Self> {
        let menu = MenuContext::new(build_menu(catalog, &registry))?;
        Ok(Self {
            config,
            registry,
            menu,
            drinks: catalog.drinks.len(),
        })
    }

    /// Load the registry from `store` and build the service on top of it.
    pub fn load(config: BartenderConfig, catalog: &Catalog, store: &impl ConfigStore) -> Result<Self> {
        let registry = store.load().map_err(Error::ConfigLoad)?;
        info!("Loaded {} pumps", registry.len());
        Self::new(config, catalog, registry)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every pump pin into a safe (closed) state and show the first item.
    pub fn start<H, S, E>(&mut self, hw: &mut H, store: &S, sink: &mut E)
    where
        H: PinDriver + Display + Clock + PowerPort,
        S: ConfigStore,
        E: EventSink,
    {
        for pin in self.registry.pins() {
            hw.setup(pin, PinMode::Output, Level::High);
        }

        let shown = {
            let mut hooks = BarHooks {
                registry: &mut self.registry,
                config: &self.config,
                hw: &mut *hw,
                store,
                sink: &mut *sink,
            };
            self.menu.render(&mut hooks).map(|item| item.name().to_string())
        };

        sink.emit(&AppEvent::Started {
            pumps: self.registry.len(),
            drinks: self.drinks,
        });
        info!("BartenderService started with {} pumps", self.registry.len());
        self.show(shown, hw, sink);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one operator command to completion.
    ///
    /// Pours and cleaning cycles run inside this call; the caller keeps
    /// input closed until it returns.
    pub fn handle_command<H, S, E>(&mut self, cmd: AppCommand, hw: &mut H, store: &S, sink: &mut E)
    where
        H: PinDriver + Display + Clock + PowerPort,
        S: ConfigStore,
        E: EventSink,
    {
        let shown = {
            let mut hooks = BarHooks {
                registry: &mut self.registry,
                config: &self.config,
                hw: &mut *hw,
                store,
                sink: &mut *sink,
            };
            match cmd {
                AppCommand::Advance => self.menu.advance(&mut hooks).map(|item| item.name().to_string()),
                AppCommand::Select => self.menu.select(&mut hooks).map(|item| item.name().to_string()),
                AppCommand::Shutdown => {
                    hooks.power_down();
                    None
                }
            }
        };
        self.show(shown, hw, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registry(&self) -> &PumpRegistry {
        &self.registry
    }

    pub fn menu(&self) -> &MenuContext<BarAction> {
        &self.menu
    }

    pub fn config(&self) -> &BartenderConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn show(&self, shown: Option<String>, hw: &mut impl Display, sink: &mut impl EventSink) {
        if let Some(name) = shown {
            show_line(hw, &name);
            sink.emit(&AppEvent::ItemShown(name));
        }
    }
}
