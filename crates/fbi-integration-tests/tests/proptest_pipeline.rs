//! Property tests over the full pipeline with the built-in catalog.

use fbi_codec::schema::BlueprintData;
use fbi_codec::{BlueprintString, decode, encode, flatten};
use fbi_core::Analyzer;
use fbi_core::catalog::Catalog;
use proptest::prelude::*;
use serde_json::{Value, json};

// ===========================================================================
// Generators
// ===========================================================================

const MACHINES: [(&str, &str); 8] = [
    ("assembling-machine-1", "iron-gear-wheel"),
    ("assembling-machine-2", "transport-belt"),
    ("assembling-machine-3", "electronic-circuit"),
    ("assembling-machine-2", "copper-cable"),
    ("electric-furnace", "iron-plate"),
    ("steel-furnace", "steel-plate"),
    ("foundry", "casting-iron"),
    ("chemical-plant", "plastic-bar"),
];

const DIRECTIONS: [u8; 4] = [0, 4, 8, 12];

/// Machines on a grid, each optionally with an inserter on its east edge.
fn arb_blueprint(max: usize) -> impl Strategy<Value = BlueprintData> {
    proptest::collection::vec(
        (0..MACHINES.len(), proptest::option::of(0..DIRECTIONS.len())),
        1..=max,
    )
    .prop_map(|picks| {
        let mut entities: Vec<Value> = Vec::new();
        let mut next = 1u32;
        for (i, (pick, inserter)) in picks.into_iter().enumerate() {
            let (name, recipe) = MACHINES[pick];
            let x = (i % 6) as f64 * 7.0 + 2.5;
            let y = (i / 6) as f64 * 7.0 + 2.5;
            entities.push(json!({
                "entity_number": next, "name": name,
                "position": {"x": x, "y": y}, "recipe": recipe,
            }));
            next += 1;
            if let Some(d) = inserter {
                entities.push(json!({
                    "entity_number": next, "name": "inserter",
                    "position": {"x": x + 3.0, "y": y}, "direction": DIRECTIONS[d],
                }));
                next += 1;
            }
        }
        serde_json::from_value(json!({"version": 562_949_954_076_673u64, "entities": entities}))
            .expect("generated blueprint is valid")
    })
}

fn catalog() -> Catalog {
    fbi_data::builtin().expect("built-in data loads")
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn string_round_trip_preserves_analysis(data in arb_blueprint(12)) {
        let catalog = catalog();
        let analyzer = Analyzer::new(&catalog);

        let direct = analyzer.analyze(&data.to_blueprint(None), "bp");
        let encoded = encode(&BlueprintString::Blueprint(data)).unwrap();
        let list = flatten(&decode(&encoded).unwrap());
        prop_assert_eq!(list.len(), 1);
        let decoded = analyzer.analyze(&list[0].blueprint, "bp");

        prop_assert_eq!(
            serde_json::to_value(&direct).unwrap(),
            serde_json::to_value(&decoded).unwrap()
        );
    }

    #[test]
    fn utilizations_and_flows_are_well_formed(data in arb_blueprint(18)) {
        let catalog = catalog();
        let analyzer = Analyzer::new(&catalog);
        let eps = analyzer.config().utilization_epsilon;
        let result = analyzer.analyze(&data.to_blueprint(None), "bp");

        for m in &result.machines {
            prop_assert!((0.0..=1.0).contains(&m.utilization));
            if m.bottleneck.is_some() {
                prop_assert!(m.utilization < 1.0 - eps);
            }
        }
        for rate in result.external_inputs.values().chain(result.external_outputs.values()) {
            prop_assert!(*rate > 0.0);
        }
        for item in result.external_outputs.keys() {
            prop_assert!(!result.external_inputs.contains_key(item));
        }
        let grouped: usize = result.utilization.iter().map(|g| g.count).sum();
        prop_assert_eq!(grouped, result.machines.iter().filter(|m| m.recipe.is_some()).count());
    }
}
