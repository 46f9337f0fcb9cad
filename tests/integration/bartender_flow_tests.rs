//! End-to-end operator flows through [`BartenderService`] on mock hardware.

use std::time::Duration;

use bartender::app::commands::AppCommand;
use bartender::app::events::AppEvent;
use bartender::app::ports::{ConfigError, Level, PinMode};
use bartender::app::service::BartenderService;
use bartender::catalog::{Catalog, IngredientOption, Recipe};
use bartender::config::BartenderConfig;
use bartender::error::Error;
use bartender::registry::{Pump, PumpRegistry};

use super::mock_hw::{MockHardware, MockStore, PinCall, RecordingSink};

fn catalog() -> Catalog {
    Catalog {
        drinks: vec![
            Recipe::new("Screwdriver", [("vodka", 45.0), ("soda", 90.0)]),
            Recipe::new("Gin Fizz", [("gin", 50.0), ("soda", 100.0)]),
        ],
        options: vec![
            IngredientOption::new("Vodka", "vodka"),
            IngredientOption::new("Gin", "gin"),
            IngredientOption::new("Soda", "soda"),
        ],
    }
}

fn registry() -> PumpRegistry {
    PumpRegistry::new()
        .with_pump("pump1", Pump::new("Pump 1", Some("vodka"), 5))
        .with_pump("pump2", Pump::new("Pump 2", Some("soda"), 6))
}

struct Rig {
    svc: BartenderService,
    hw: MockHardware,
    store: MockStore,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let store = MockStore::with(registry());
        let svc = BartenderService::load(BartenderConfig::default(), &catalog(), &store).unwrap();
        let mut rig = Self {
            svc,
            hw: MockHardware::new(),
            store,
            sink: RecordingSink::new(),
        };
        rig.svc.start(&mut rig.hw, &rig.store, &mut rig.sink);
        rig
    }

    fn press(&mut self, cmd: AppCommand) {
        self.svc.handle_command(cmd, &mut self.hw, &self.store, &mut self.sink);
    }

    /// Advance until `name` is on screen.  Panics after a full lap.
    fn advance_to(&mut self, name: &str) {
        for _ in 0..32 {
            if self.hw.headline().as_deref() == Some(name) {
                return;
            }
            self.press(AppCommand::Advance);
        }
        panic!("'{}' never shown, screen is {:?}", name, self.hw.screen());
    }

    fn visible_names(&self) -> Vec<String> {
        let menu = self.svc.menu().current_menu();
        menu.visible_indices()
            .into_iter()
            .map(|i| menu.items()[i].name().to_string())
            .collect()
    }
}

#[test]
fn start_closes_every_pump_and_shows_first_drink() {
    let rig = Rig::new();
    assert!(rig.hw.pins.contains(&PinCall::Setup {
        pin: 5,
        mode: PinMode::Output,
        initial: Level::High
    }));
    assert!(rig.hw.pins.contains(&PinCall::Setup {
        pin: 6,
        mode: PinMode::Output,
        initial: Level::High
    }));
    assert_eq!(rig.hw.headline().as_deref(), Some("Screwdriver"));
    assert_eq!(
        rig.sink.events.first(),
        Some(&AppEvent::Started { pumps: 2, drinks: 2 })
    );
}

#[test]
fn screwdriver_pour_timing() {
    let mut rig = Rig::new();
    rig.press(AppCommand::Select);

    assert_eq!(rig.hw.edges(5, Level::Low), [Duration::ZERO]);
    assert_eq!(rig.hw.edges(6, Level::Low), [Duration::ZERO]);
    assert_eq!(rig.hw.edges(5, Level::High), [Duration::from_secs(27)]);
    assert_eq!(rig.hw.edges(6, Level::High), [Duration::from_secs(54)]);
    assert_eq!(rig.hw.now, Duration::from_secs(54));

    let finished = rig.sink.events.iter().find_map(|e| match e {
        AppEvent::PourFinished { drink, report } => Some((drink.clone(), report.clone())),
        _ => None,
    });
    let (drink, report) = finished.unwrap();
    assert_eq!(drink, "Screwdriver");
    assert_eq!(report.elapsed, Duration::from_secs(54));
    assert_eq!(report.frames, 270);
    assert_eq!(report.display_failures, 0);

    // Back on the drink after the pour.
    assert_eq!(rig.hw.headline().as_deref(), Some("Screwdriver"));
}

#[test]
fn pour_shows_banner_then_progress() {
    let mut rig = Rig::new();
    let before = rig.hw.frames.len();
    rig.press(AppCommand::Select);
    assert_eq!(rig.hw.frames[before], ["Dispensing..."]);
    assert!(rig.hw.rects >= 270);
}

#[test]
fn uncovered_drink_never_visible() {
    let mut rig = Rig::new();
    assert_eq!(rig.visible_names(), ["Screwdriver", "Configure"]);
    for _ in 0..5 {
        rig.press(AppCommand::Advance);
    }
    assert!(!rig.sink.shown().contains(&"Gin Fizz"));
}

#[test]
fn advance_wraps_on_main_menu() {
    let mut rig = Rig::new();
    rig.press(AppCommand::Advance);
    rig.press(AppCommand::Advance);
    assert_eq!(rig.sink.shown(), ["Screwdriver", "Configure", "Screwdriver"]);
}

#[test]
fn selecting_soda_stars_it_and_persists() {
    let mut rig = Rig::new();
    rig.advance_to("Configure");
    rig.press(AppCommand::Select);
    assert_eq!(rig.visible_names(), ["Clean", "Shutdown", "Pump 1", "Pump 2", "Back"]);

    rig.advance_to("Pump 1");
    rig.press(AppCommand::Select);
    assert_eq!(rig.visible_names(), ["Vodka *", "Gin", "Soda", "Back"]);

    rig.advance_to("Soda");
    rig.press(AppCommand::Select);

    assert_eq!(rig.svc.registry().get("pump1").unwrap().value.as_deref(), Some("soda"));
    let saved = rig.store.saved.borrow().clone().unwrap();
    assert_eq!(saved.get("pump1").unwrap().value.as_deref(), Some("soda"));
    assert_eq!(rig.visible_names(), ["Vodka", "Gin", "Soda *", "Back"]);
    assert_eq!(rig.hw.headline().as_deref(), Some("Soda *"));
    assert!(rig.sink.events.contains(&AppEvent::AssignmentChanged {
        pump: "pump1".into(),
        ingredient: "soda".into(),
    }));
}

#[test]
fn reassignment_changes_what_can_be_poured() {
    let mut rig = Rig::new();
    rig.advance_to("Configure");
    rig.press(AppCommand::Select);
    rig.advance_to("Pump 1");
    rig.press(AppCommand::Select);
    rig.advance_to("Gin");
    rig.press(AppCommand::Select);

    // Pump 1 -> Back -> Configure level -> Back -> main menu.
    rig.advance_to("Back");
    rig.press(AppCommand::Select);
    assert_eq!(rig.hw.headline().as_deref(), Some("Pump 1"));
    rig.advance_to("Back");
    rig.press(AppCommand::Select);
    assert_eq!(rig.hw.headline().as_deref(), Some("Configure"));
    assert_eq!(rig.visible_names(), ["Gin Fizz", "Configure"]);
}

#[test]
fn failed_save_keeps_assignment_and_shows_notice() {
    let mut rig = Rig::new();
    rig.store.fail_save.set(true);
    rig.advance_to("Configure");
    rig.press(AppCommand::Select);
    rig.advance_to("Pump 2");
    rig.press(AppCommand::Select);
    rig.advance_to("Gin");

    let frames_before = rig.hw.frames.len();
    let t0 = rig.hw.now;
    rig.press(AppCommand::Select);

    assert_eq!(rig.svc.registry().get("pump2").unwrap().value.as_deref(), Some("gin"));
    assert!(rig.store.saved.borrow().is_none());
    assert_eq!(rig.hw.frames[frames_before], ["Save failed"]);
    assert_eq!(rig.hw.now - t0, Duration::from_millis(2000));
    assert_eq!(rig.hw.headline().as_deref(), Some("Gin *"));
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::ConfigSaveFailed { pump, .. } if pump == "pump2"
    )));
}

#[test]
fn clean_runs_every_pump_for_clean_duration() {
    let mut rig = Rig::new();
    rig.advance_to("Configure");
    rig.press(AppCommand::Select);
    rig.advance_to("Clean");
    rig.press(AppCommand::Select);

    for pin in [5, 6] {
        assert_eq!(rig.hw.edges(pin, Level::Low), [Duration::ZERO]);
        assert_eq!(rig.hw.edges(pin, Level::High), [Duration::from_secs(10)]);
    }
    assert!(rig.sink.events.contains(&AppEvent::CleanStarted {
        pumps: 2,
        duration: Duration::from_secs(10),
    }));
}

#[test]
fn shutdown_button_closes_pumps_and_powers_off() {
    let mut rig = Rig::new();
    rig.press(AppCommand::Shutdown);
    assert_eq!(rig.hw.shutdowns, 1);
    assert_eq!(rig.hw.level(5), Some(Level::High));
    assert_eq!(rig.hw.level(6), Some(Level::High));
    assert_eq!(rig.hw.headline().as_deref(), Some("Shutting down"));
    assert!(rig.sink.events.contains(&AppEvent::ShutdownRequested));
}

#[test]
fn shutdown_menu_item_leaves_goodbye_on_screen() {
    let mut rig = Rig::new();
    rig.advance_to("Configure");
    rig.press(AppCommand::Select);
    rig.advance_to("Shutdown");
    rig.press(AppCommand::Select);
    assert_eq!(rig.hw.shutdowns, 1);
    assert_eq!(rig.hw.headline().as_deref(), Some("Shutting down"));
}

#[test]
fn broken_screen_does_not_stop_pour() {
    let mut rig = Rig::new();
    rig.hw.fail_display = true;
    rig.press(AppCommand::Select);
    assert_eq!(rig.hw.edges(6, Level::High), [Duration::from_secs(54)]);
    let report = rig.sink.events.iter().find_map(|e| match e {
        AppEvent::PourFinished { report, .. } => Some(report.clone()),
        _ => None,
    });
    assert!(report.unwrap().display_failures > 0);
}

#[test]
fn missing_registry_is_fatal() {
    let err = BartenderService::load(BartenderConfig::default(), &catalog(), &MockStore::empty())
        .err()
        .unwrap();
    assert_eq!(err, Error::ConfigLoad(ConfigError::NotFound));
}
