//! Recipe resolution: the declared recipe when it exists, otherwise a
//! best-effort guess from the filters of inserters feeding the machine.

use crate::blueprint::Entity;
use crate::catalog::{Catalog, MachineDef, RecipeDef};
use crate::classify::{Inserter, Layout};
use crate::config::AnalysisConfig;
use serde::Serialize;
use tracing::debug;

/// Where a machine's recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeSource {
    /// Set on the entity in the blueprint.
    Declared,
    /// Inferred from filtered inserters dropping into the machine.
    Inserter,
    /// Inferred one hop back, through a chest feeding those inserters.
    Storage,
    /// Inferred from any filtered inserter near the machine.
    Nearby,
}

/// Outcome of resolving one machine's recipe.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'c> {
    pub recipe: Option<(&'c RecipeDef, RecipeSource)>,
    /// The entity declared a recipe the catalog does not know.
    pub unresolved: bool,
}

/// Resolve the recipe a machine runs.
pub fn resolve_recipe<'c>(
    catalog: &'c Catalog,
    layout: &Layout<'_>,
    entity: &Entity,
    machine: &MachineDef,
    config: &AnalysisConfig,
) -> Resolution<'c> {
    let mut unresolved = false;
    if let Some(name) = &entity.recipe {
        match catalog.recipe(name) {
            Some(recipe) => {
                return Resolution {
                    recipe: Some((recipe, RecipeSource::Declared)),
                    unresolved: false,
                };
            }
            None => {
                debug!(entity = %entity.id, recipe = %name, "declared recipe not in catalog");
                unresolved = true;
            }
        }
    }

    let recipe = infer_recipe(catalog, layout, entity, machine, config);
    if let Some((recipe, source)) = recipe {
        debug!(entity = %entity.id, recipe = %recipe.name, ?source, "inferred recipe");
    }
    Resolution { recipe, unresolved }
}

fn infer_recipe<'c>(
    catalog: &'c Catalog,
    layout: &Layout<'_>,
    entity: &Entity,
    machine: &MachineDef,
    config: &AnalysisConfig,
) -> Option<(&'c RecipeDef, RecipeSource)> {
    let area = machine.footprint.rect_at(entity.position);
    let feeding: Vec<&Inserter<'_>> = layout
        .inserters
        .iter()
        .filter(|ins| area.contains(ins.drop))
        .collect();

    let direct = collect_filters(feeding.iter().copied());
    let (candidates, source) = if !direct.is_empty() {
        (direct, RecipeSource::Inserter)
    } else {
        let upstream = collect_filters(feeding.iter().flat_map(move |ins| {
            layout.storage_at(ins.pickup).into_iter().flat_map(move |chest| {
                layout
                    .inserters
                    .iter()
                    .filter(move |other| other.drop.same_tile(&chest.position))
            })
        }));
        if !upstream.is_empty() {
            (upstream, RecipeSource::Storage)
        } else {
            (nearby_filters(layout, entity, config), RecipeSource::Nearby)
        }
    };

    candidates
        .iter()
        .find_map(|item| catalog.recipe_by_ingredient(item, &machine.categories))
        .map(|recipe| (recipe, source))
}

/// Filters of every filtering inserter within the search radius, closest
/// inserter first.
fn nearby_filters<'e>(
    layout: &Layout<'e>,
    entity: &Entity,
    config: &AnalysisConfig,
) -> Vec<&'e str> {
    let mut nearby: Vec<(f64, &Inserter<'e>)> = layout
        .inserters
        .iter()
        .filter(|ins| !ins.filters().is_empty())
        .map(|ins| (ins.entity.position.distance(&entity.position), ins))
        .filter(|(d, _)| *d <= config.inference_radius)
        .collect();
    nearby.sort_by(|(da, a), (db, b)| da.total_cmp(db).then(a.entity.id.cmp(&b.entity.id)));
    collect_filters(nearby.into_iter().map(|(_, ins)| ins))
}

/// Active filter items of `inserters`, deduplicated in first-seen order.
fn collect_filters<'a, 'e: 'a>(inserters: impl Iterator<Item = &'a Inserter<'e>>) -> Vec<&'e str> {
    let mut items: Vec<&'e str> = Vec::new();
    for ins in inserters {
        for item in ins.filters() {
            if !items.contains(&item.as_str()) {
                items.push(item.as_str());
            }
        }
    }
    items
}
