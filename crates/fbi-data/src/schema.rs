//! Serde data file structs for game content definitions.
//!
//! These structs define the on-disk format for machines, recipes, modules,
//! beacons, and entity classes. They are deserialized from RON, JSON, or
//! TOML data files and then converted into catalog definitions by the
//! loader.

use fbi_core::catalog::{EffectKind, ModuleEffects};
use serde::Deserialize;

/// Data entries keyed by a unique name.
pub trait NamedData {
    fn name(&self) -> &str;
}

macro_rules! impl_named_data {
    ($($ty:ty),*) => {
        $(impl NamedData for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named_data!(MachineData, RecipeData, ModuleData, BeaconData);

// ===========================================================================
// Machines
// ===========================================================================

/// A production machine definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineData {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub crafting_speed: f64,
    #[serde(default)]
    pub module_slots: u32,
    pub categories: Vec<String>,
    /// Effects the machine accepts. Omitted means all of them.
    #[serde(default = "all_effects")]
    pub allowed_effects: Vec<EffectKind>,
    #[serde(default)]
    pub base_productivity: f64,
    #[serde(default = "default_footprint")]
    pub footprint: FootprintData,
}

fn all_effects() -> Vec<EffectKind> {
    vec![
        EffectKind::Speed,
        EffectKind::Productivity,
        EffectKind::Consumption,
        EffectKind::Pollution,
        EffectKind::Quality,
    ]
}

/// The footprint (size) of an entity on the grid.
#[derive(Debug, Clone, Deserialize)]
pub struct FootprintData {
    pub width: u32,
    pub height: u32,
}

fn default_footprint() -> FootprintData {
    FootprintData {
        width: 3,
        height: 3,
    }
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A recipe ingredient, in short tuple form or full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientData {
    /// Short form: `("iron-plate", 2.0)`.
    Short(String, f64),
    /// Full form with an explicit fluid flag.
    Full {
        name: String,
        amount: f64,
        #[serde(default)]
        fluid: bool,
    },
}

impl IngredientData {
    pub fn name(&self) -> &str {
        match self {
            IngredientData::Short(name, _) | IngredientData::Full { name, .. } => name,
        }
    }
}

/// A recipe product, in short tuple form or full form with an optional
/// probability.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductData {
    Short(String, f64),
    Full {
        name: String,
        amount: f64,
        #[serde(default)]
        fluid: bool,
        #[serde(default)]
        probability: Option<f64>,
    },
}

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Seconds per craft at crafting speed 1.
    pub crafting_time: f64,
    pub ingredients: Vec<IngredientData>,
    pub products: Vec<ProductData>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_true")]
    pub allow_productivity: bool,
}

fn default_category() -> String {
    "crafting".to_string()
}

fn default_true() -> bool {
    true
}

// ===========================================================================
// Modules and beacons
// ===========================================================================

/// A module definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleData {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_tier")]
    pub tier: u8,
    #[serde(default)]
    pub effects: ModuleEffects,
}

fn default_tier() -> u8 {
    1
}

/// A beacon definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct BeaconData {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub module_slots: u32,
    pub transmission_efficiency: f64,
    pub range: f64,
    #[serde(default = "default_footprint")]
    pub footprint: FootprintData,
}

// ===========================================================================
// Entity classes
// ===========================================================================

/// Name lists the classifier uses for non-production entities, plus the
/// goods that move through pipes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntitiesData {
    pub inserters: Vec<String>,
    pub storage: Vec<String>,
    pub pipes: Vec<String>,
    pub underground_pipes: Vec<String>,
    pub rails: Vec<String>,
    /// Goods that are always fluids, even where a recipe lists them in
    /// short form.
    pub fluids: Vec<String>,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_defaults() {
        let m: MachineData = ron::from_str(
            r#"(name: "assembling-machine-2", crafting_speed: 0.75, categories: ["crafting"])"#,
        )
        .unwrap();
        assert_eq!(m.module_slots, 0);
        assert_eq!(m.allowed_effects.len(), 5);
        assert_eq!(m.base_productivity, 0.0);
        assert_eq!((m.footprint.width, m.footprint.height), (3, 3));
        assert!(m.display_name.is_none());
    }

    #[test]
    fn ingredient_short_and_full_forms() {
        let list: Vec<IngredientData> =
            ron::from_str(r#"[("iron-plate", 2.0), (name: "water", amount: 100.0, fluid: true)]"#)
                .unwrap();
        assert!(matches!(&list[0], IngredientData::Short(n, a) if n == "iron-plate" && *a == 2.0));
        assert!(matches!(&list[1], IngredientData::Full { fluid: true, .. }));
        assert_eq!(list[1].name(), "water");
    }

    #[test]
    fn product_with_probability_from_json() {
        let p: ProductData = serde_json::from_str(
            r#"{"name": "uranium-235", "amount": 1.0, "probability": 0.007}"#,
        )
        .unwrap();
        match p {
            ProductData::Full {
                probability, fluid, ..
            } => {
                assert_eq!(probability, Some(0.007));
                assert!(!fluid);
            }
            ProductData::Short(..) => panic!("expected full form"),
        }
    }

    #[test]
    fn recipe_defaults() {
        let r: RecipeData = serde_json::from_str(
            r#"{"name": "pipe", "crafting_time": 0.5,
                "ingredients": [["iron-plate", 1.0]], "products": [["pipe", 1.0]]}"#,
        )
        .unwrap();
        assert_eq!(r.category, "crafting");
        assert!(r.allow_productivity);
    }

    #[test]
    fn module_effects_from_toml() {
        let m: ModuleData = toml::from_str(
            r#"
            name = "speed-module-2"
            tier = 2
            [effects]
            speed = 0.3
            consumption = 0.6
            "#,
        )
        .unwrap();
        assert_eq!(m.tier, 2);
        assert_eq!(m.effects.speed, Some(0.3));
        assert_eq!(m.effects.productivity, None);
    }

    #[test]
    fn entities_fields_default_to_empty() {
        let e: EntitiesData = ron::from_str(r#"(inserters: ["inserter"])"#).unwrap();
        assert_eq!(e.inserters, vec!["inserter"]);
        assert!(e.rails.is_empty());
        assert!(e.fluids.is_empty());
    }
}
