//! Drink recipes and the ingredient options a pump can be loaded with.
//!
//! The catalog is static for the life of the process.  A stock set ships
//! with the crate; an operator can replace it with a JSON file of the form
//!
//! ```json
//! {
//!   "drinks":  [ { "name": "Rum & Coke", "ingredients": { "rum": 50, "coke": 150 } } ],
//!   "options": [ { "name": "Rum", "value": "rum" } ]
//! }
//! ```
//!
//! Ingredient order inside a recipe is the order written in the file; the
//! scheduler uses it to break ties between pumps that stop together.

use core::fmt;
use std::collections::BTreeSet;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// A named drink and the volume (mL) of each ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    ingredients: Ingredients,
}

impl Recipe {
    pub fn new<'a>(name: impl Into<String>, ingredients: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            name: name.into(),
            ingredients: Ingredients(
                ingredients
                    .into_iter()
                    .map(|(key, ml)| (key.to_string(), ml))
                    .collect(),
            ),
        }
    }

    /// Ingredients with their volumes, in recipe order.
    pub fn ingredients(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ingredients.0.iter().map(|(key, ml)| (key.as_str(), *ml))
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.0.len()
    }
}

/// Ordered `ingredient → volume` pairs, stored on disk as a JSON object.
#[derive(Debug, Clone, PartialEq)]
struct Ingredients(Vec<(String, f64)>);

impl Serialize for Ingredients {
    fn serialize<S: Serializer>(&self, s: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.0.len()))?;
        for (key, ml) in &self.0 {
            map.serialize_entry(key, ml)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Ingredients {
    fn deserialize<D: Deserializer<'de>>(d: D) -> core::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Ingredients;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of ingredient to volume")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> core::result::Result<Ingredients, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, ml)) = access.next_entry::<String, f64>()? {
                    pairs.push((key, ml));
                }
                Ok(Ingredients(pairs))
            }
        }

        d.deserialize_map(OrderedVisitor)
    }
}

// ---------------------------------------------------------------------------
// Ingredient option
// ---------------------------------------------------------------------------

/// Something an operator can load onto a pump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientOption {
    /// Label shown in the pump menu.
    pub name: String,
    /// Ingredient key matched against recipes.
    pub value: String,
}

impl IngredientOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub drinks: Vec<Recipe>,
    pub options: Vec<IngredientOption>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            drinks: vec![
                Recipe::new("Rum & Coke", [("rum", 50.0), ("coke", 150.0)]),
                Recipe::new("Gin & Tonic", [("gin", 50.0), ("tonic", 150.0)]),
                Recipe::new(
                    "Long Island",
                    [
                        ("gin", 15.0),
                        ("rum", 15.0),
                        ("vodka", 15.0),
                        ("tequila", 15.0),
                        ("coke", 100.0),
                        ("oj", 30.0),
                    ],
                ),
                Recipe::new("Screwdriver", [("vodka", 50.0), ("oj", 150.0)]),
                Recipe::new("Margarita", [("tequila", 50.0), ("mmix", 150.0)]),
                Recipe::new("Gin & Juice", [("gin", 50.0), ("oj", 150.0)]),
                Recipe::new("Tequila Sunrise", [("tequila", 50.0), ("oj", 150.0)]),
            ],
            options: vec![
                IngredientOption::new("Gin", "gin"),
                IngredientOption::new("Rum", "rum"),
                IngredientOption::new("Vodka", "vodka"),
                IngredientOption::new("Tequila", "tequila"),
                IngredientOption::new("Tonic Water", "tonic"),
                IngredientOption::new("Coke", "coke"),
                IngredientOption::new("Orange Juice", "oj"),
                IngredientOption::new("Margarita Mix", "mmix"),
            ],
        }
    }
}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(raw).map_err(|e| {
            log::warn!("catalog: {}", e);
            Error::Catalog("malformed catalog file")
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        for drink in &self.drinks {
            if drink.name.trim().is_empty() {
                return Err(Error::Catalog("drink without a name"));
            }
            if drink.ingredient_count() == 0 {
                return Err(Error::Catalog("drink without ingredients"));
            }
            let mut keys = BTreeSet::new();
            for (key, ml) in drink.ingredients() {
                if !keys.insert(key) {
                    return Err(Error::Catalog("ingredient listed twice"));
                }
                if key.is_empty() {
                    return Err(Error::Catalog("empty ingredient key"));
                }
                if !(ml.is_finite() && ml > 0.0) {
                    return Err(Error::Catalog("ingredient volume must be positive"));
                }
            }
        }

        let mut values = BTreeSet::new();
        for opt in &self.options {
            if opt.value.is_empty() {
                return Err(Error::Catalog("option without a value"));
            }
            if !values.insert(opt.value.as_str()) {
                return Err(Error::Catalog("duplicate option value"));
            }
        }
        Ok(())
    }
}
