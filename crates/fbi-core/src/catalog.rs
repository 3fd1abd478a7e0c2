//! Static game data: machines, recipes, modules, beacons, and the entity
//! classes the analyzer needs to tell inserters, storage, pipes, and rails
//! apart.
//!
//! A [`Catalog`] is built once through [`CatalogBuilder`] and is immutable
//! afterwards. Every lookup returns `Option`; callers decide how to degrade.

use crate::geometry::Footprint;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Whether a good is carried by hand/belt or through pipes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Item,
    Fluid,
}

/// A kind of module effect a machine may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Speed,
    Productivity,
    Consumption,
    Pollution,
    Quality,
}

/// A production machine prototype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineDef {
    /// Internal prototype name.
    pub name: String,
    pub display_name: String,
    pub crafting_speed: f64,
    pub module_slots: u32,
    pub categories: BTreeSet<String>,
    pub allowed_effects: BTreeSet<EffectKind>,
    /// Built-in productivity bonus (0.5 for the foundry).
    pub base_productivity: f64,
    pub footprint: Footprint,
}

impl MachineDef {
    pub fn allows(&self, effect: EffectKind) -> bool {
        self.allowed_effects.contains(&effect)
    }
}

/// Per-effect deltas of a module. Absent effects are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pollution: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl ModuleEffects {
    pub fn speed(&self) -> f64 {
        self.speed.unwrap_or(0.0)
    }

    pub fn productivity(&self) -> f64 {
        self.productivity.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDef {
    pub name: String,
    pub display_name: String,
    pub effects: ModuleEffects,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeaconDef {
    pub name: String,
    pub display_name: String,
    pub module_slots: u32,
    pub transmission_efficiency: f64,
    /// Supply-area distance in tiles beyond the beacon's own footprint.
    pub range: f64,
    pub footprint: Footprint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub name: String,
    pub amount: f64,
    pub kind: ItemKind,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDef {
    pub name: String,
    pub display_name: String,
    /// Seconds per craft at crafting speed 1.
    pub crafting_time: f64,
    pub ingredients: Vec<Ingredient>,
    pub products: Vec<Product>,
    pub category: String,
    pub allow_productivity: bool,
}

impl RecipeDef {
    pub fn consumes(&self, item: &str) -> bool {
        self.ingredients.iter().any(|i| i.name == item)
    }
}

/// Name sets used by the entity classifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityClasses {
    pub inserters: BTreeSet<String>,
    pub storage: BTreeSet<String>,
    /// Every pipe segment, underground endpoints included.
    pub pipes: BTreeSet<String>,
    pub underground_pipes: BTreeSet<String>,
    pub rails: BTreeSet<String>,
}

/// Kind of catalog entry, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Machine,
    Recipe,
    Module,
    Beacon,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntryKind::Machine => "machine",
            EntryKind::Recipe => "recipe",
            EntryKind::Module => "module",
            EntryKind::Beacon => "beacon",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: EntryKind, name: String },
    #[error("invalid recipe '{name}': {detail}")]
    InvalidRecipe { name: String, detail: String },
    #[error("machine '{name}' has no recipe categories")]
    NoCategories { name: String },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    machines: Vec<MachineDef>,
    recipes: Vec<RecipeDef>,
    modules: Vec<ModuleDef>,
    beacons: Vec<BeaconDef>,
    classes: EntityClasses,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_machine(&mut self, def: MachineDef) -> Result<&mut Self, CatalogError> {
        if self.machines.iter().any(|m| m.name == def.name) {
            return Err(duplicate(EntryKind::Machine, &def.name));
        }
        if def.categories.is_empty() {
            return Err(CatalogError::NoCategories { name: def.name });
        }
        self.machines.push(def);
        Ok(self)
    }

    pub fn register_recipe(&mut self, def: RecipeDef) -> Result<&mut Self, CatalogError> {
        if self.recipes.iter().any(|r| r.name == def.name) {
            return Err(duplicate(EntryKind::Recipe, &def.name));
        }
        validate_recipe(&def)?;
        self.recipes.push(def);
        Ok(self)
    }

    pub fn register_module(&mut self, def: ModuleDef) -> Result<&mut Self, CatalogError> {
        if self.modules.iter().any(|m| m.name == def.name) {
            return Err(duplicate(EntryKind::Module, &def.name));
        }
        self.modules.push(def);
        Ok(self)
    }

    pub fn register_beacon(&mut self, def: BeaconDef) -> Result<&mut Self, CatalogError> {
        if self.beacons.iter().any(|b| b.name == def.name) {
            return Err(duplicate(EntryKind::Beacon, &def.name));
        }
        self.beacons.push(def);
        Ok(self)
    }

    pub fn entity_classes(&mut self, classes: EntityClasses) -> &mut Self {
        self.classes = classes;
        self
    }

    /// Finalize and build the immutable catalog.
    pub fn build(self) -> Catalog {
        let index = |names: Vec<&String>| -> HashMap<String, usize> {
            names
                .into_iter()
                .enumerate()
                .map(|(i, n)| (n.clone(), i))
                .collect()
        };

        let fluids = self
            .recipes
            .iter()
            .flat_map(|r| {
                let ins = r
                    .ingredients
                    .iter()
                    .filter(|i| i.kind == ItemKind::Fluid)
                    .map(|i| i.name.clone());
                let outs = r
                    .products
                    .iter()
                    .filter(|p| p.kind == ItemKind::Fluid)
                    .map(|p| p.name.clone());
                ins.chain(outs).collect::<Vec<_>>()
            })
            .collect();

        Catalog {
            machine_index: index(self.machines.iter().map(|m| &m.name).collect()),
            recipe_index: index(self.recipes.iter().map(|r| &r.name).collect()),
            module_index: index(self.modules.iter().map(|m| &m.name).collect()),
            beacon_index: index(self.beacons.iter().map(|b| &b.name).collect()),
            machines: self.machines,
            recipes: self.recipes,
            modules: self.modules,
            beacons: self.beacons,
            classes: self.classes,
            fluids,
        }
    }
}

fn duplicate(kind: EntryKind, name: &str) -> CatalogError {
    CatalogError::Duplicate {
        kind,
        name: name.to_string(),
    }
}

fn validate_recipe(def: &RecipeDef) -> Result<(), CatalogError> {
    let invalid = |detail: String| CatalogError::InvalidRecipe {
        name: def.name.clone(),
        detail,
    };
    if !(def.crafting_time > 0.0) {
        return Err(invalid(format!(
            "crafting time must be positive, got {}",
            def.crafting_time
        )));
    }
    if let Some(i) = def.ingredients.iter().find(|i| !(i.amount >= 0.0)) {
        return Err(invalid(format!("ingredient '{}' has a negative amount", i.name)));
    }
    for p in &def.products {
        if !(p.amount >= 0.0) {
            return Err(invalid(format!("product '{}' has a negative amount", p.name)));
        }
        if let Some(prob) = p.probability {
            if !(0.0..=1.0).contains(&prob) {
                return Err(invalid(format!(
                    "product '{}' has probability {prob} outside [0, 1]",
                    p.name
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable game-data catalog. Frozen after [`CatalogBuilder::build`].
#[derive(Debug)]
pub struct Catalog {
    machines: Vec<MachineDef>,
    machine_index: HashMap<String, usize>,
    recipes: Vec<RecipeDef>,
    recipe_index: HashMap<String, usize>,
    modules: Vec<ModuleDef>,
    module_index: HashMap<String, usize>,
    beacons: Vec<BeaconDef>,
    beacon_index: HashMap<String, usize>,
    classes: EntityClasses,
    fluids: BTreeSet<String>,
}

impl Catalog {
    pub fn machine(&self, name: &str) -> Option<&MachineDef> {
        self.machine_index.get(name).map(|&i| &self.machines[i])
    }

    pub fn recipe(&self, name: &str) -> Option<&RecipeDef> {
        self.recipe_index.get(name).map(|&i| &self.recipes[i])
    }

    pub fn module(&self, name: &str) -> Option<&ModuleDef> {
        self.module_index.get(name).map(|&i| &self.modules[i])
    }

    pub fn beacon(&self, name: &str) -> Option<&BeaconDef> {
        self.beacon_index.get(name).map(|&i| &self.beacons[i])
    }

    /// All recipes in registration order.
    pub fn recipes(&self) -> &[RecipeDef] {
        &self.recipes
    }

    /// First recipe (in registration order) in one of `categories` that
    /// takes `item` as an ingredient.
    pub fn recipe_by_ingredient(
        &self,
        item: &str,
        categories: &BTreeSet<String>,
    ) -> Option<&RecipeDef> {
        self.recipes
            .iter()
            .find(|r| categories.contains(&r.category) && r.consumes(item))
    }

    pub fn is_production_machine(&self, name: &str) -> bool {
        self.machine_index.contains_key(name)
    }

    pub fn is_beacon(&self, name: &str) -> bool {
        self.beacon_index.contains_key(name)
    }

    pub fn is_storage(&self, name: &str) -> bool {
        self.classes.storage.contains(name)
    }

    pub fn is_rail(&self, name: &str) -> bool {
        self.classes.rails.contains(name)
    }

    pub fn is_inserter(&self, name: &str) -> bool {
        self.classes.inserters.contains(name)
    }

    pub fn is_pipe(&self, name: &str) -> bool {
        self.classes.pipes.contains(name)
    }

    pub fn is_underground_pipe(&self, name: &str) -> bool {
        self.classes.underground_pipes.contains(name)
    }

    /// Fluid if any recipe moves `name` as a fluid, item otherwise.
    pub fn item_kind(&self, name: &str) -> ItemKind {
        if self.fluids.contains(name) {
            ItemKind::Fluid
        } else {
            ItemKind::Item
        }
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }
}

/// Title-case a hyphenated internal name: `iron-gear-wheel` → `Iron Gear Wheel`.
pub fn display_name(internal: &str) -> String {
    internal
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Catalog entries referenced by name in serialized output.
pub trait Named {
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(MachineDef, RecipeDef, ModuleDef, BeaconDef);

/// `serialize_with` helpers that write catalog references as their names.
pub(crate) mod by_name {
    use super::Named;
    use serde::Serializer;

    pub fn opt<T: Named, S: Serializer>(def: &Option<&T>, s: S) -> Result<S::Ok, S::Error> {
        match def {
            Some(d) => s.serialize_some(d.name()),
            None => s.serialize_none(),
        }
    }

    pub fn many<T: Named, S: Serializer>(defs: &[&T], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(defs.iter().map(|d| d.name()))
    }
}
