//! Resolution pipeline: reads data files, checks cross-references, builds the
//! catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_catalog_dir`] and [`load_config`]
//! built on top of them.

use crate::schema::*;
use fbi_core::catalog::{
    display_name, BeaconDef, Catalog, CatalogBuilder, CatalogError, EntityClasses, Ingredient,
    ItemKind, MachineDef, ModuleDef, Product, RecipeDef,
};
use fbi_core::config::AnalysisConfig;
use fbi_core::geometry::Footprint;
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The definitions parsed but the catalog rejected them.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` only labels errors.
pub fn parse_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Like [`parse_str`] for a list. TOML has no top-level arrays, so the list
/// is read from the array at `toml_key` instead.
pub fn parse_list_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if format != Format::Toml {
        return parse_str(content, format, file);
    }
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    let table: toml::Value = toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
    let array = table
        .get(toml_key)
        .ok_or_else(|| parse_err(format!("missing key '{toml_key}' in TOML file")))?
        .clone();
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_err(e.to_string()))
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format, path)
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list_str(&content, format, path, toml_key)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Reject lists that define the same name twice.
pub fn check_unique<T: NamedData>(items: &[T], file: &Path) -> Result<(), DataLoadError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        check_duplicate(&seen, item.name(), file)?;
        seen.insert(item.name().to_string(), i);
    }
    Ok(())
}

// ===========================================================================
// Catalog assembly
// ===========================================================================

/// Parsed, not yet validated contents of a data directory.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub machines: Vec<MachineData>,
    pub recipes: Vec<RecipeData>,
    pub modules: Vec<ModuleData>,
    pub beacons: Vec<BeaconData>,
    pub entities: EntitiesData,
}

/// Load a complete catalog from a data directory.
///
/// `machines` and `recipes` are required; `modules`, `beacons`, and
/// `entities` may be omitted. Each file may be RON, TOML, or JSON.
pub fn load_catalog_dir(dir: &Path) -> Result<Catalog, DataLoadError> {
    let machines_path = require_data_file(dir, "machines")?;
    let recipes_path = require_data_file(dir, "recipes")?;
    let data = CatalogData {
        machines: load_list(&machines_path, "machines")?,
        recipes: load_list(&recipes_path, "recipes")?,
        modules: load_optional_list(dir, "modules")?,
        beacons: load_optional_list(dir, "beacons")?,
        entities: match find_data_file(dir, "entities")? {
            Some(path) => deserialize_file(&path)?,
            None => EntitiesData::default(),
        },
    };
    debug!(dir = %dir.display(), "loaded catalog data files");
    build_catalog(data, &recipes_path)
}

fn load_list<T: DeserializeOwned + NamedData>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let items: Vec<T> = deserialize_list(path, toml_key)?;
    check_unique(&items, path)?;
    Ok(items)
}

fn load_optional_list<T: DeserializeOwned + NamedData>(
    dir: &Path,
    base_name: &str,
) -> Result<Vec<T>, DataLoadError> {
    match find_data_file(dir, base_name)? {
        Some(path) => load_list(&path, base_name),
        None => Ok(Vec::new()),
    }
}

/// Validate cross-references and register everything with a
/// [`CatalogBuilder`]. `recipes_file` labels category errors.
pub fn build_catalog(data: CatalogData, recipes_file: &Path) -> Result<Catalog, DataLoadError> {
    let crafted_by: HashMap<String, &str> = data
        .machines
        .iter()
        .flat_map(|m| m.categories.iter().map(|c| (c.clone(), m.name.as_str())))
        .collect();
    for recipe in &data.recipes {
        resolve_name(&crafted_by, &recipe.category, recipes_file, "recipe category")?;
    }

    let fluids = fluid_names(&data);
    let mut builder = CatalogBuilder::new();
    for m in data.machines {
        builder.register_machine(machine_def(m))?;
    }
    for r in data.recipes {
        builder.register_recipe(recipe_def(r, &fluids))?;
    }
    for m in data.modules {
        builder.register_module(module_def(m))?;
    }
    for b in data.beacons {
        builder.register_beacon(beacon_def(b))?;
    }
    builder.entity_classes(entity_classes(data.entities));

    let catalog = builder.build();
    debug!(
        machines = catalog.machine_count(),
        recipes = catalog.recipe_count(),
        modules = catalog.module_count(),
        beacons = catalog.beacon_count(),
        "catalog built"
    );
    Ok(catalog)
}

/// Names declared fluid in the entities file or flagged fluid anywhere in
/// a recipe.
fn fluid_names(data: &CatalogData) -> BTreeSet<String> {
    let mut fluids: BTreeSet<String> = data.entities.fluids.iter().cloned().collect();
    for recipe in &data.recipes {
        for i in &recipe.ingredients {
            if let IngredientData::Full {
                name, fluid: true, ..
            } = i
            {
                fluids.insert(name.clone());
            }
        }
        for p in &recipe.products {
            if let ProductData::Full {
                name, fluid: true, ..
            } = p
            {
                fluids.insert(name.clone());
            }
        }
    }
    fluids
}

fn kind(name: &str, fluids: &BTreeSet<String>) -> ItemKind {
    if fluids.contains(name) {
        ItemKind::Fluid
    } else {
        ItemKind::Item
    }
}

fn footprint(data: FootprintData) -> Footprint {
    Footprint {
        width: data.width,
        height: data.height,
    }
}

fn machine_def(m: MachineData) -> MachineDef {
    MachineDef {
        display_name: m.display_name.unwrap_or_else(|| display_name(&m.name)),
        name: m.name,
        crafting_speed: m.crafting_speed,
        module_slots: m.module_slots,
        categories: m.categories.into_iter().collect(),
        allowed_effects: m.allowed_effects.into_iter().collect(),
        base_productivity: m.base_productivity,
        footprint: footprint(m.footprint),
    }
}

fn recipe_def(r: RecipeData, fluids: &BTreeSet<String>) -> RecipeDef {
    let ingredients = r
        .ingredients
        .into_iter()
        .map(|i| match i {
            IngredientData::Short(name, amount) | IngredientData::Full { name, amount, .. } => {
                Ingredient {
                    kind: kind(&name, fluids),
                    name,
                    amount,
                }
            }
        })
        .collect();
    let products = r
        .products
        .into_iter()
        .map(|p| match p {
            ProductData::Short(name, amount) => Product {
                kind: kind(&name, fluids),
                name,
                amount,
                probability: None,
            },
            ProductData::Full {
                name,
                amount,
                probability,
                ..
            } => Product {
                kind: kind(&name, fluids),
                name,
                amount,
                probability,
            },
        })
        .collect();
    RecipeDef {
        display_name: r.display_name.unwrap_or_else(|| display_name(&r.name)),
        name: r.name,
        crafting_time: r.crafting_time,
        ingredients,
        products,
        category: r.category,
        allow_productivity: r.allow_productivity,
    }
}

fn module_def(m: ModuleData) -> ModuleDef {
    ModuleDef {
        display_name: m.display_name.unwrap_or_else(|| display_name(&m.name)),
        name: m.name,
        effects: m.effects,
        tier: m.tier,
    }
}

fn beacon_def(b: BeaconData) -> BeaconDef {
    BeaconDef {
        display_name: b.display_name.unwrap_or_else(|| display_name(&b.name)),
        name: b.name,
        module_slots: b.module_slots,
        transmission_efficiency: b.transmission_efficiency,
        range: b.range,
        footprint: footprint(b.footprint),
    }
}

fn entity_classes(e: EntitiesData) -> EntityClasses {
    let mut pipes: BTreeSet<String> = e.pipes.into_iter().collect();
    let underground_pipes: BTreeSet<String> = e.underground_pipes.into_iter().collect();
    // Underground endpoints are pipe segments too.
    pipes.extend(underground_pipes.iter().cloned());
    EntityClasses {
        inserters: e.inserters.into_iter().collect(),
        storage: e.storage.into_iter().collect(),
        pipes,
        underground_pipes,
        rails: e.rails.into_iter().collect(),
    }
}

// ===========================================================================
// Analysis config
// ===========================================================================

/// Read an [`AnalysisConfig`] from a RON, TOML, or JSON file. Fields the
/// file leaves out keep their defaults.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, DataLoadError> {
    let config: AnalysisConfig = deserialize_file(path)?;
    debug!(path = %path.display(), ?config, "loaded analysis config");
    Ok(config)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fbi_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const MACHINES_RON: &str = r#"[
        (name: "assembling-machine-2", crafting_speed: 0.75, module_slots: 2,
         categories: ["crafting", "crafting-with-fluid"]),
        (name: "electric-furnace", crafting_speed: 2.0, module_slots: 2,
         categories: ["smelting"]),
    ]"#;

    const RECIPES_RON: &str = r#"[
        (name: "iron-gear-wheel", crafting_time: 0.5,
         ingredients: [("iron-plate", 2.0)], products: [("iron-gear-wheel", 1.0)]),
        (name: "iron-plate", crafting_time: 3.2, category: "smelting",
         ingredients: [("iron-ore", 1.0)], products: [("iron-plate", 1.0)]),
        (name: "electric-engine-unit", crafting_time: 10.0, category: "crafting-with-fluid",
         ingredients: [("engine-unit", 1.0), (name: "lubricant", amount: 15.0, fluid: true)],
         products: [("electric-engine-unit", 1.0)]),
    ]"#;

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("machines.ron")).unwrap(), Format::Ron);
        assert_eq!(
            detect_format(Path::new("machines.toml")).unwrap(),
            Format::Toml
        );
        assert_eq!(
            detect_format(Path::new("machines.json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn detect_format_unsupported() {
        let result = detect_format(Path::new("machines.yaml"));
        assert!(matches!(
            result,
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn detect_format_no_extension() {
        let result = detect_format(Path::new("machines"));
        assert!(matches!(
            result,
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_json() {
        let dir = make_test_dir("find_json");
        fs::write(dir.join("recipes.json"), "[]").unwrap();

        let result = find_data_file(&dir, "recipes").unwrap();
        assert_eq!(result, Some(dir.join("recipes.json")));

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_missing() {
        let dir = make_test_dir("find_missing");

        let result = find_data_file(&dir, "recipes").unwrap();
        assert_eq!(result, None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("recipes.ron"), "[]").unwrap();
        fs::write(dir.join("recipes.json"), "[]").unwrap();

        let result = find_data_file(&dir, "recipes");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "machines");
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "machines"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_file / deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_ron() {
        let dir = make_test_dir("list_ron");
        let path = dir.join("machines.ron");
        fs::write(&path, MACHINES_RON).unwrap();

        let machines: Vec<MachineData> = deserialize_list(&path, "machines").unwrap();
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[1].name, "electric-furnace");

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_json() {
        let dir = make_test_dir("list_json");
        let path = dir.join("beacons.json");
        fs::write(
            &path,
            r#"[{"name": "beacon", "module_slots": 2, "transmission_efficiency": 1.5, "range": 3.0}]"#,
        )
        .unwrap();

        let beacons: Vec<BeaconData> = deserialize_list(&path, "beacons").unwrap();
        assert_eq!(beacons.len(), 1);
        assert_eq!(beacons[0].transmission_efficiency, 1.5);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml() {
        let dir = make_test_dir("list_toml");
        let path = dir.join("machines.toml");
        fs::write(
            &path,
            r#"
[[machines]]
name = "foundry"
crafting_speed = 4.0
module_slots = 4
categories = ["metallurgy"]
base_productivity = 0.5

[machines.footprint]
width = 4
height = 4

[[machines]]
name = "chemical-plant"
crafting_speed = 1.0
categories = ["chemistry"]
"#,
        )
        .unwrap();

        let machines: Vec<MachineData> = deserialize_list(&path, "machines").unwrap();
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[0].footprint.width, 4);
        assert_eq!(machines[1].footprint.width, 3);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("machines.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<MachineData>, _> = deserialize_list(&path, "machines");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("entities.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<EntitiesData, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Name checks
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_name_missing() {
        let map: HashMap<String, u32> = HashMap::new();

        let result = resolve_name(&map, "smelting", Path::new("recipes.ron"), "recipe category");
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "recipe category", .. })
                if name == "smelting"
        ));
    }

    #[test]
    fn check_unique_reports_first_repeat() {
        let machines: Vec<MachineData> = ron::from_str(
            r#"[
                (name: "foundry", crafting_speed: 4.0, categories: ["metallurgy"]),
                (name: "foundry", crafting_speed: 2.0, categories: ["metallurgy"]),
            ]"#,
        )
        .unwrap();
        let result = check_unique(&machines, Path::new("machines.ron"));
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "foundry"
        ));
    }

    // -----------------------------------------------------------------------
    // load_catalog_dir
    // -----------------------------------------------------------------------

    #[test]
    fn load_catalog_dir_ron() {
        let dir = make_test_dir("catalog_ron");
        fs::write(dir.join("machines.ron"), MACHINES_RON).unwrap();
        fs::write(dir.join("recipes.ron"), RECIPES_RON).unwrap();
        fs::write(
            dir.join("entities.ron"),
            r#"(inserters: ["inserter"], pipes: ["pipe"], underground_pipes: ["pipe-to-ground"])"#,
        )
        .unwrap();

        let catalog = load_catalog_dir(&dir).unwrap();
        assert_eq!(catalog.machine_count(), 2);
        assert_eq!(catalog.recipe_count(), 3);
        assert_eq!(catalog.module_count(), 0);
        assert_eq!(catalog.beacon_count(), 0);

        let gear = catalog.recipe("iron-gear-wheel").unwrap();
        assert_eq!(gear.display_name, "Iron Gear Wheel");
        assert_eq!(gear.category, "crafting");
        assert!(gear.allow_productivity);

        assert_eq!(catalog.item_kind("lubricant"), ItemKind::Fluid);
        assert_eq!(catalog.item_kind("engine-unit"), ItemKind::Item);
        assert!(catalog.is_inserter("inserter"));
        assert!(catalog.is_pipe("pipe-to-ground"));
        assert!(catalog.is_underground_pipe("pipe-to-ground"));
        assert!(!catalog.is_underground_pipe("pipe"));

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_dir_mixed_formats() {
        let dir = make_test_dir("catalog_mixed");
        fs::write(
            dir.join("machines.json"),
            r#"[{"name": "chemical-plant", "crafting_speed": 1.0, "module_slots": 3,
                 "categories": ["chemistry"]}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("recipes.toml"),
            r#"
[[recipes]]
name = "battery"
crafting_time = 4.0
category = "chemistry"
ingredients = [
    { name = "sulfuric-acid", amount = 20.0, fluid = true },
    ["iron-plate", 1.0],
]
products = [["battery", 1.0]]
"#,
        )
        .unwrap();
        fs::write(
            dir.join("modules.toml"),
            r#"
[[modules]]
name = "speed-module"
[modules.effects]
speed = 0.2
consumption = 0.5
"#,
        )
        .unwrap();

        let catalog = load_catalog_dir(&dir).unwrap();
        let battery = catalog.recipe("battery").unwrap();
        assert_eq!(battery.ingredients[0].kind, ItemKind::Fluid);
        assert_eq!(battery.ingredients[1].kind, ItemKind::Item);
        assert_eq!(catalog.module("speed-module").unwrap().effects.speed(), 0.2);

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_dir_requires_recipes() {
        let dir = make_test_dir("catalog_no_recipes");
        fs::write(dir.join("machines.ron"), MACHINES_RON).unwrap();

        let result = load_catalog_dir(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "recipes"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_dir_unknown_category() {
        let dir = make_test_dir("catalog_unknown_category");
        fs::write(dir.join("machines.ron"), MACHINES_RON).unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[(name: "battery", crafting_time: 4.0, category: "chemistry",
                 ingredients: [("iron-plate", 1.0)], products: [("battery", 1.0)])]"#,
        )
        .unwrap();

        let result = load_catalog_dir(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { ref name, .. }) if name == "chemistry"
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_dir_rejects_invalid_recipe() {
        let dir = make_test_dir("catalog_invalid_recipe");
        fs::write(dir.join("machines.ron"), MACHINES_RON).unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[(name: "pipe", crafting_time: 0.0,
                 ingredients: [("iron-plate", 1.0)], products: [("pipe", 1.0)])]"#,
        )
        .unwrap();

        let result = load_catalog_dir(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::Catalog(CatalogError::InvalidRecipe { .. }))
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_dir_duplicate_recipe() {
        let dir = make_test_dir("catalog_duplicate");
        fs::write(dir.join("machines.ron"), MACHINES_RON).unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[
                (name: "pipe", crafting_time: 0.5, ingredients: [("iron-plate", 1.0)], products: [("pipe", 1.0)]),
                (name: "pipe", crafting_time: 1.0, ingredients: [("iron-plate", 1.0)], products: [("pipe", 1.0)]),
            ]"#,
        )
        .unwrap();

        let result = load_catalog_dir(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "pipe"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_config
    // -----------------------------------------------------------------------

    #[test]
    fn load_config_partial_toml() {
        let dir = make_test_dir("config_toml");
        let path = dir.join("fbi.toml");
        fs::write(&path, "max_iterations = 50\ninference_radius = 6.0\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.inference_radius, 6.0);
        assert_eq!(
            config.dead_end_threshold,
            AnalysisConfig::default().dead_end_threshold
        );

        cleanup(&dir);
    }

    #[test]
    fn load_config_json() {
        let dir = make_test_dir("config_json");
        let path = dir.join("fbi.json");
        fs::write(&path, r#"{"full_utilization": 0.95}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.full_utilization, 0.95);
        assert_eq!(config.max_iterations, 30);

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "machines".to_string(),
            dir: PathBuf::from("/data"),
        };
        assert!(format!("{e}").contains("machines"));
        assert!(format!("{e}").contains("/data"));

        let e = DataLoadError::ConflictingFormats {
            a: PathBuf::from("recipes.ron"),
            b: PathBuf::from("recipes.json"),
        };
        let msg = format!("{e}");
        assert!(msg.contains("recipes.ron"));
        assert!(msg.contains("recipes.json"));

        let e = DataLoadError::Parse {
            file: PathBuf::from("bad.ron"),
            detail: "syntax error".to_string(),
        };
        assert!(format!("{e}").contains("bad.ron"));
        assert!(format!("{e}").contains("syntax error"));

        let e = DataLoadError::from(CatalogError::NoCategories {
            name: "crusher".to_string(),
        });
        assert!(format!("{e}").contains("crusher"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}
