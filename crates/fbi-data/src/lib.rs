//! Game data for the analyzer: the built-in Space Age catalog and loaders
//! for user-supplied data directories and analysis config files.

pub mod loader;
pub mod schema;

pub use loader::{CatalogData, DataLoadError, build_catalog, load_catalog_dir, load_config};

use fbi_core::catalog::Catalog;
use loader::{Format, check_unique, parse_str};
use schema::NamedData;
use serde::de::DeserializeOwned;
use std::path::Path;

const MACHINES: &str = include_str!("../data/machines.ron");
const RECIPES: &str = include_str!("../data/recipes.ron");
const MODULES: &str = include_str!("../data/modules.ron");
const BEACONS: &str = include_str!("../data/beacons.ron");
const ENTITIES: &str = include_str!("../data/entities.ron");

/// The embedded Space Age catalog.
pub fn builtin() -> Result<Catalog, DataLoadError> {
    let data = CatalogData {
        machines: embedded_list("machines.ron", MACHINES)?,
        recipes: embedded_list("recipes.ron", RECIPES)?,
        modules: embedded_list("modules.ron", MODULES)?,
        beacons: embedded_list("beacons.ron", BEACONS)?,
        entities: parse_str(ENTITIES, Format::Ron, Path::new("entities.ron"))?,
    };
    build_catalog(data, Path::new("recipes.ron"))
}

fn embedded_list<T: DeserializeOwned + NamedData>(
    file: &str,
    content: &str,
) -> Result<Vec<T>, DataLoadError> {
    let file = Path::new(file);
    let items: Vec<T> = parse_str(content, Format::Ron, file)?;
    check_unique(&items, file)?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbi_core::catalog::{EffectKind, ItemKind};
    use fbi_core::geometry::Footprint;
    use std::collections::BTreeSet;

    #[test]
    fn builtin_loads() {
        let catalog = builtin().unwrap();
        assert_eq!(catalog.machine_count(), 14);
        assert_eq!(catalog.module_count(), 12);
        assert_eq!(catalog.beacon_count(), 1);
        assert!(catalog.recipe_count() >= 30);
    }

    #[test]
    fn builtin_machine_stats() {
        let catalog = builtin().unwrap();

        let am1 = catalog.machine("assembling-machine-1").unwrap();
        assert_eq!(am1.crafting_speed, 0.5);
        assert_eq!(am1.module_slots, 0);
        assert!(am1.allowed_effects.is_empty());

        let am2 = catalog.machine("assembling-machine-2").unwrap();
        assert_eq!(am2.crafting_speed, 0.75);
        assert!(am2.allows(EffectKind::Productivity));

        let foundry = catalog.machine("foundry").unwrap();
        assert_eq!(foundry.crafting_speed, 4.0);
        assert_eq!(foundry.base_productivity, 0.5);
        assert_eq!(foundry.footprint, Footprint::square(4));
        assert!(foundry.categories.contains("metallurgy"));

        let refinery = catalog.machine("oil-refinery").unwrap();
        assert_eq!(refinery.footprint, Footprint::square(5));
        assert_eq!(refinery.display_name, "Oil Refinery");
    }

    #[test]
    fn builtin_modules_and_beacon() {
        let catalog = builtin().unwrap();

        let speed3 = catalog.module("speed-module-3").unwrap();
        assert_eq!(speed3.tier, 3);
        assert_eq!(speed3.effects.speed(), 0.5);

        let prod1 = catalog.module("productivity-module").unwrap();
        assert_eq!(prod1.effects.productivity(), 0.04);
        assert_eq!(prod1.effects.speed(), -0.05);

        let beacon = catalog.beacon("beacon").unwrap();
        assert_eq!(beacon.module_slots, 2);
        assert_eq!(beacon.transmission_efficiency, 1.5);
        assert_eq!(beacon.range, 3.0);
    }

    #[test]
    fn builtin_recipes() {
        let catalog = builtin().unwrap();

        let gear = catalog.recipe("iron-gear-wheel").unwrap();
        assert_eq!(gear.crafting_time, 0.5);
        assert_eq!(gear.ingredients[0].name, "iron-plate");
        assert_eq!(gear.ingredients[0].amount, 2.0);
        assert!(gear.allow_productivity);

        let casting = catalog.recipe("casting-iron").unwrap();
        assert_eq!(casting.ingredients[0].kind, ItemKind::Fluid);
        assert_eq!(casting.category, "metallurgy");

        assert_eq!(catalog.item_kind("molten-iron"), ItemKind::Fluid);
        assert_eq!(catalog.item_kind("petroleum-gas"), ItemKind::Fluid);
        assert_eq!(catalog.item_kind("iron-plate"), ItemKind::Item);

        let uranium = catalog.recipe("uranium-processing").unwrap();
        assert_eq!(uranium.products[0].probability, Some(0.007));
        assert_eq!(uranium.products[1].probability, Some(0.993));
    }

    #[test]
    fn builtin_first_consumer_of_iron_plate_is_gear() {
        let catalog = builtin().unwrap();
        let crafting: BTreeSet<String> = ["crafting".to_string()].into();
        let recipe = catalog.recipe_by_ingredient("iron-plate", &crafting).unwrap();
        assert_eq!(recipe.name, "iron-gear-wheel");
    }

    #[test]
    fn builtin_entity_classes() {
        let catalog = builtin().unwrap();
        assert!(catalog.is_inserter("bulk-inserter"));
        assert!(catalog.is_storage("steel-chest"));
        assert!(catalog.is_storage("passive-provider-chest"));
        assert!(catalog.is_rail("straight-rail"));
        assert!(catalog.is_rail("train-stop"));
        assert!(catalog.is_pipe("pipe"));
        assert!(catalog.is_pipe("pipe-to-ground"));
        assert!(catalog.is_underground_pipe("pipe-to-ground"));
        assert!(!catalog.is_inserter("transport-belt"));
    }
}
