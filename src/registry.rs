//! Pump registry.
//!
//! Maps a pump id to its display name, the ingredient currently loaded on
//! it and the GPIO pin that switches it.  The registry is loaded once at
//! startup and persisted after every assignment change.
//!
//! ## Persisted format
//!
//! ```json
//! {
//!   "pump_1": { "name": "Pump 1", "value": "vodka", "pin": 17 },
//!   "pump_2": { "name": "Pump 2", "value": "",      "pin": 27 }
//! }
//! ```
//!
//! An empty `value` means no ingredient is assigned.  Fields this crate
//! does not know about are carried through a load → save cycle untouched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::catalog::Recipe;

/// One physical pump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    /// Name shown in the configuration menu.
    pub name: String,
    /// Ingredient key currently loaded, `None` when the pump is empty.
    #[serde(default, with = "empty_as_none")]
    pub value: Option<String>,
    /// BCM pin number of the pump relay (active-low).
    pub pin: u8,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Pump {
    pub fn new(name: impl Into<String>, value: Option<&str>, pin: u8) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
            pin,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether this pump currently dispenses `ingredient`.
    pub fn dispenses(&self, ingredient: &str) -> bool {
        self.value.as_deref() == Some(ingredient)
    }
}

/// All pumps, keyed and iterated by pump id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PumpRegistry {
    pumps: BTreeMap<String, Pump>,
}

impl PumpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and the simulator.
    #[must_use]
    pub fn with_pump(mut self, id: impl Into<String>, pump: Pump) -> Self {
        self.pumps.insert(id.into(), pump);
        self
    }

    /// Parse and validate the persisted JSON form.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let registry: Self = serde_json::from_str(raw).map_err(|e| {
            log::warn!("pump registry: {}", e);
            ConfigError::Corrupted
        })?;
        registry.validate()?;
        Ok(registry)
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|_| ConfigError::Corrupted)
    }

    /// No two pumps may share a physical output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for (id, pump) in &self.pumps {
            if !seen.insert(pump.pin) {
                log::warn!("pump '{}' reuses pin {}", id, pump.pin);
                return Err(ConfigError::ValidationFailed("two pumps share a pin"));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Pump> {
        self.pumps.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pump)> {
        self.pumps.iter().map(|(id, pump)| (id.as_str(), pump))
    }

    pub fn len(&self) -> usize {
        self.pumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pumps.is_empty()
    }

    /// Load `ingredient` onto `pump_id`.  Returns `false` for an unknown pump.
    pub fn assign(&mut self, pump_id: &str, ingredient: &str) -> bool {
        match self.pumps.get_mut(pump_id) {
            Some(pump) => {
                pump.value = Some(ingredient.to_string());
                true
            }
            None => false,
        }
    }

    /// Every registered pin, in pump id order.
    pub fn pins(&self) -> Vec<u8> {
        self.pumps.values().map(|p| p.pin).collect()
    }

    /// Pumps currently loaded with `ingredient`, in pump id order.
    pub fn pumps_for<'a>(&'a self, ingredient: &'a str) -> impl Iterator<Item = &'a Pump> + 'a {
        self.pumps.values().filter(move |p| p.dispenses(ingredient))
    }

    pub fn is_available(&self, ingredient: &str) -> bool {
        self.pumps_for(ingredient).next().is_some()
    }

    /// First recipe ingredient no pump dispenses.
    pub fn missing_ingredient<'r>(&self, recipe: &'r Recipe) -> Option<&'r str> {
        recipe
            .ingredients()
            .map(|(ingredient, _)| ingredient)
            .find(|ingredient| !self.is_available(ingredient))
    }

    /// Whether every ingredient of `recipe` can be poured.
    pub fn covers(&self, recipe: &Recipe) -> bool {
        self.missing_ingredient(recipe).is_none()
    }
}

/// `""` on disk ⇄ `None` in memory.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|v| !v.is_empty()))
    }
}
