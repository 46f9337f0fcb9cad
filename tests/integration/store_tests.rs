//! Pump configuration on disk, driven through the service.

use std::fs;

use bartender::adapters::store::JsonFileStore;
use bartender::app::commands::AppCommand;
use bartender::app::ports::{ConfigError, ConfigStore};
use bartender::app::service::BartenderService;
use bartender::catalog::Catalog;
use bartender::config::BartenderConfig;

use super::mock_hw::{MockHardware, RecordingSink};

const PUMPS: &str = r#"{
  "pump_1": { "name": "Pump 1", "pin": 17, "value": "vodka" },
  "pump_2": { "name": "Pump 2", "pin": 27, "value": "" },
  "pump_3": { "name": "Pump 3", "pin": 22, "value": "oj", "tubing": "silicone" }
}"#;

#[test]
fn assignment_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pump_config.json");
    fs::write(&path, PUMPS).unwrap();
    let store = JsonFileStore::new(&path);

    let mut svc = BartenderService::load(BartenderConfig::default(), &Catalog::default(), &store).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw, &store, &mut sink);

    // Stock menu: Screwdriver is the only drink; Configure follows it.
    assert_eq!(hw.headline().as_deref(), Some("Screwdriver"));
    svc.handle_command(AppCommand::Advance, &mut hw, &store, &mut sink);
    svc.handle_command(AppCommand::Select, &mut hw, &store, &mut sink);
    // Clean, Shutdown, Pump 1, Pump 2
    for _ in 0..3 {
        svc.handle_command(AppCommand::Advance, &mut hw, &store, &mut sink);
    }
    assert_eq!(hw.headline().as_deref(), Some("Pump 2"));
    svc.handle_command(AppCommand::Select, &mut hw, &store, &mut sink);
    // Options: Gin, Rum, ...
    svc.handle_command(AppCommand::Advance, &mut hw, &store, &mut sink);
    assert_eq!(hw.headline().as_deref(), Some("Rum"));
    svc.handle_command(AppCommand::Select, &mut hw, &store, &mut sink);

    let reloaded = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(reloaded.get("pump_2").unwrap().value.as_deref(), Some("rum"));
    assert_eq!(reloaded.get("pump_1").unwrap().value.as_deref(), Some("vodka"));

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["pump_3"]["tubing"], "silicone");
}

#[test]
fn duplicate_pins_refused_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pump_config.json");
    fs::write(
        &path,
        r#"{ "a": { "name": "A", "pin": 5, "value": "" }, "b": { "name": "B", "pin": 5, "value": "" } }"#,
    )
    .unwrap();
    assert!(matches!(
        JsonFileStore::new(&path).load(),
        Err(ConfigError::ValidationFailed(_))
    ));
}
