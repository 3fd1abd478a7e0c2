//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available to other crates' tests through the `test-utils` feature.

use crate::analyzer::AnalyzedMachine;
use crate::blueprint::{Entity, ItemFilter};
use crate::catalog::*;
use crate::effects::EffectiveStats;
use crate::geometry::{Direction, Footprint, Position};
use crate::id::EntityId;
use crate::rates::MaxRates;
use std::collections::{BTreeMap, BTreeSet};

// ===========================================================================
// Entity builders
// ===========================================================================

pub fn entity(id: u32, name: &str, x: f64, y: f64) -> Entity {
    Entity::new(EntityId(id), name, Position::new(x, y))
}

pub fn machine(id: u32, name: &str, x: f64, y: f64, recipe: Option<&str>) -> Entity {
    let mut e = entity(id, name, x, y);
    e.recipe = recipe.map(str::to_string);
    e
}

pub fn inserter(id: u32, x: f64, y: f64, direction: Option<Direction>) -> Entity {
    let mut e = entity(id, "inserter", x, y);
    e.direction = direction;
    e
}

pub fn filtered_inserter(id: u32, x: f64, y: f64, direction: Direction, items: &[&str]) -> Entity {
    let mut e = entity(id, "fast-inserter", x, y);
    e.direction = Some(direction);
    e.filter = Some(ItemFilter {
        items: items.iter().map(|s| s.to_string()).collect(),
        enabled: true,
    });
    e
}

pub fn chest(id: u32, x: f64, y: f64) -> Entity {
    entity(id, "iron-chest", x, y)
}

pub fn pipe(id: u32, x: f64, y: f64) -> Entity {
    entity(id, "pipe", x, y)
}

pub fn underground_pipe(id: u32, x: f64, y: f64) -> Entity {
    entity(id, "pipe-to-ground", x, y)
}

pub fn beacon(id: u32, x: f64, y: f64, modules: &[&str]) -> Entity {
    let mut e = entity(id, "beacon", x, y);
    e.modules = Some(modules.iter().map(|s| s.to_string()).collect());
    e
}

// ===========================================================================
// Catalog
// ===========================================================================

pub fn categories(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn effects(kinds: &[EffectKind]) -> BTreeSet<EffectKind> {
    kinds.iter().copied().collect()
}

const ALL_EFFECTS: [EffectKind; 5] = [
    EffectKind::Speed,
    EffectKind::Productivity,
    EffectKind::Consumption,
    EffectKind::Pollution,
    EffectKind::Quality,
];

pub fn make_machine(
    name: &str,
    speed: f64,
    slots: u32,
    cats: &[&str],
    base_productivity: f64,
    side: u32,
) -> MachineDef {
    MachineDef {
        name: name.to_string(),
        display_name: display_name(name),
        crafting_speed: speed,
        module_slots: slots,
        categories: categories(cats),
        allowed_effects: effects(&ALL_EFFECTS),
        base_productivity,
        footprint: Footprint::square(side),
    }
}

/// Assembling machine 1: speed 0.5, no module slots, no allowed effects.
pub fn assembler_1() -> MachineDef {
    let mut m = make_machine(
        "assembling-machine-1",
        0.5,
        0,
        &["crafting", "advanced-crafting", "crafting-with-fluid"],
        0.0,
        3,
    );
    m.allowed_effects.clear();
    m
}

fn kind_of(name: &str) -> ItemKind {
    if name.starts_with("molten-") || matches!(name, "water" | "lubricant" | "sulfuric-acid") {
        ItemKind::Fluid
    } else {
        ItemKind::Item
    }
}

pub fn make_recipe(
    name: &str,
    time: f64,
    ingredients: &[(&str, f64)],
    products: &[(&str, f64)],
    category: &str,
    allow_productivity: bool,
) -> RecipeDef {
    RecipeDef {
        name: name.to_string(),
        display_name: display_name(name),
        crafting_time: time,
        ingredients: ingredients
            .iter()
            .map(|&(n, amount)| Ingredient {
                name: n.to_string(),
                amount,
                kind: kind_of(n),
            })
            .collect(),
        products: products
            .iter()
            .map(|&(n, amount)| Product {
                name: n.to_string(),
                amount,
                kind: kind_of(n),
                probability: None,
            })
            .collect(),
        category: category.to_string(),
        allow_productivity,
    }
}

/// Iron gear wheel: 0.5 s, 2 iron plate → 1 gear, no productivity.
pub fn gear_recipe() -> RecipeDef {
    make_recipe(
        "iron-gear-wheel",
        0.5,
        &[("iron-plate", 2.0)],
        &[("iron-gear-wheel", 1.0)],
        "crafting",
        false,
    )
}

pub fn make_module(name: &str, tier: u8, effects: ModuleEffects) -> ModuleDef {
    ModuleDef {
        name: name.to_string(),
        display_name: display_name(name),
        effects,
        tier,
    }
}

/// A small catalog covering the machines, recipes, and entity classes the
/// tests use. Recipe registration order matters for inference.
pub fn test_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();

    let machines = [
        assembler_1(),
        make_machine(
            "assembling-machine-2",
            0.75,
            2,
            &["crafting", "advanced-crafting", "crafting-with-fluid"],
            0.0,
            3,
        ),
        make_machine("electric-furnace", 2.0, 2, &["smelting"], 0.0, 3),
        make_machine(
            "foundry",
            4.0,
            4,
            &["metallurgy", "pressing", "crafting-with-fluid"],
            0.5,
            4,
        ),
        make_machine("chemical-plant", 1.0, 3, &["chemistry"], 0.0, 3),
    ];
    for m in machines {
        b.register_machine(m).unwrap();
    }

    let recipes = [
        make_recipe(
            "iron-plate",
            3.2,
            &[("iron-ore", 1.0)],
            &[("iron-plate", 1.0)],
            "smelting",
            true,
        ),
        make_recipe(
            "copper-plate",
            3.2,
            &[("copper-ore", 1.0)],
            &[("copper-plate", 1.0)],
            "smelting",
            true,
        ),
        gear_recipe(),
        make_recipe(
            "automation-science-pack",
            5.0,
            &[("copper-plate", 1.0), ("iron-gear-wheel", 1.0)],
            &[("automation-science-pack", 1.0)],
            "crafting",
            true,
        ),
        make_recipe(
            "copper-cable",
            0.5,
            &[("copper-plate", 1.0)],
            &[("copper-cable", 2.0)],
            "crafting",
            true,
        ),
        make_recipe(
            "steel-plate",
            16.0,
            &[("iron-plate", 5.0)],
            &[("steel-plate", 1.0)],
            "smelting",
            true,
        ),
        make_recipe(
            "molten-iron",
            32.0,
            &[("iron-ore", 50.0), ("calcite", 1.0)],
            &[("molten-iron", 500.0)],
            "metallurgy",
            true,
        ),
        make_recipe(
            "casting-iron",
            3.2,
            &[("molten-iron", 20.0)],
            &[("iron-plate", 2.0)],
            "metallurgy",
            true,
        ),
    ];
    for r in recipes {
        b.register_recipe(r).unwrap();
    }

    b.register_module(make_module(
        "speed-module",
        1,
        ModuleEffects {
            speed: Some(0.2),
            consumption: Some(0.5),
            ..ModuleEffects::default()
        },
    ))
    .unwrap();
    b.register_module(make_module(
        "productivity-module",
        1,
        ModuleEffects {
            productivity: Some(0.04),
            speed: Some(-0.05),
            consumption: Some(0.4),
            pollution: Some(0.05),
            ..ModuleEffects::default()
        },
    ))
    .unwrap();

    b.register_beacon(BeaconDef {
        name: "beacon".to_string(),
        display_name: "Beacon".to_string(),
        module_slots: 2,
        transmission_efficiency: 1.5,
        range: 3.0,
        footprint: Footprint::square(3),
    })
    .unwrap();

    b.entity_classes(EntityClasses {
        inserters: categories(&["inserter", "fast-inserter", "long-handed-inserter", "bulk-inserter"]),
        storage: categories(&["wooden-chest", "iron-chest", "steel-chest"]),
        pipes: categories(&["pipe", "pipe-to-ground"]),
        underground_pipes: categories(&["pipe-to-ground"]),
        rails: categories(&["straight-rail", "train-stop"]),
    });

    b.build()
}

// ===========================================================================
// Analysis helpers
// ===========================================================================

/// An assembling-machine-1 with hand-picked max rates and no recipe, for
/// exercising the solver and report in isolation.
pub fn rated<'c>(
    catalog: &'c Catalog,
    id: u32,
    inputs: &[(&str, f64)],
    outputs: &[(&str, f64)],
) -> AnalyzedMachine<'c> {
    fn to_map(rates: &[(&str, f64)]) -> BTreeMap<String, f64> {
        rates
            .iter()
            .map(|&(item, rate)| (item.to_string(), rate))
            .collect()
    }

    AnalyzedMachine {
        id: EntityId(id),
        name: "assembling-machine-1".to_string(),
        position: Position::new(f64::from(id) * 10.0 + 1.5, 1.5),
        machine: catalog
            .machine("assembling-machine-1")
            .expect("test catalog has assembling-machine-1"),
        recipe: None,
        recipe_source: None,
        modules: Vec::new(),
        beacons: Vec::new(),
        stats: EffectiveStats::NEUTRAL,
        rates: MaxRates {
            inputs: to_map(inputs),
            outputs: to_map(outputs),
        },
        utilization: 1.0,
        bottleneck: None,
    }
}
