//! The analysis pipeline: classify, resolve, rate, solve, classify flows,
//! and summarize.

use crate::blueprint::{Blueprint, Entity};
use crate::catalog::{by_name, Catalog, MachineDef, ModuleDef, RecipeDef};
use crate::classify::{Census, Layout};
use crate::config::AnalysisConfig;
use crate::effects::{effective_stats, AnalyzedBeacon, EffectiveStats};
use crate::flows::{classify_external, item_flows, FlowContext, ItemFlowTotal};
use crate::geometry::Position;
use crate::id::EntityId;
use crate::pipes::PipeTopology;
use crate::rates::MaxRates;
use crate::report::{missing_inputs, utilization_groups, Problem, UtilizationGroup};
use crate::resolve::{resolve_recipe, RecipeSource};
use crate::solver::{solve, Bottleneck, SolveOutcome};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A production machine with everything derived about it.
///
/// Only `utilization` and `bottleneck` change after construction, and only
/// inside [`solve`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedMachine<'c> {
    pub id: EntityId,
    /// Entity prototype name.
    pub name: String,
    pub position: Position,
    #[serde(skip)]
    pub machine: &'c MachineDef,
    #[serde(serialize_with = "by_name::opt")]
    pub recipe: Option<&'c RecipeDef>,
    pub recipe_source: Option<RecipeSource>,
    #[serde(serialize_with = "by_name::many")]
    pub modules: Vec<&'c ModuleDef>,
    /// Beacons whose supply area reaches this machine.
    pub beacons: Vec<EntityId>,
    #[serde(flatten)]
    pub stats: EffectiveStats,
    #[serde(flatten)]
    pub rates: MaxRates,
    pub utilization: f64,
    pub bottleneck: Option<Bottleneck>,
}

/// Frozen output of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult<'c> {
    pub label: String,
    pub external_inputs: BTreeMap<String, f64>,
    pub external_outputs: BTreeMap<String, f64>,
    pub machines: Vec<AnalyzedMachine<'c>>,
    pub beacons: Vec<AnalyzedBeacon<'c>>,
    pub utilization: Vec<UtilizationGroup>,
    pub problems: Vec<Problem>,
    pub item_flows: BTreeMap<String, ItemFlowTotal>,
    pub census: Census,
    /// Present when some fluid surplus needed the pipe network checked.
    pub pipes: Option<PipeTopology>,
    pub solver: SolveOutcome,
}

impl AnalysisResult<'_> {
    pub fn machine(&self, id: EntityId) -> Option<&AnalyzedMachine<'_>> {
        self.machines.iter().find(|m| m.id == id)
    }
}

/// Runs the analysis pipeline against a catalog.
#[derive(Debug, Clone)]
pub struct Analyzer<'c> {
    catalog: &'c Catalog,
    config: AnalysisConfig,
}

impl<'c> Analyzer<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_config(catalog, AnalysisConfig::default())
    }

    pub fn with_config(catalog: &'c Catalog, config: AnalysisConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one blueprint. Never fails; anything the catalog cannot
    /// account for is skipped or reported as a [`Problem`].
    pub fn analyze(&self, blueprint: &Blueprint, label: impl Into<String>) -> AnalysisResult<'c> {
        let label = label.into();
        let layout = Layout::new(self.catalog, blueprint);
        let census = layout.census();
        debug!(%label, ?census, "classified entities");

        let beacons = self.analyze_beacons(&layout);
        let mut problems = Vec::new();
        let mut machines = self.analyze_machines(&layout, &beacons, &mut problems);

        let solver = solve(&mut machines, &self.config);
        let flows = item_flows(&machines);

        let mut pipes = None;
        let external = classify_external(
            &FlowContext {
                catalog: self.catalog,
                layout: &layout,
                machines: &machines,
                config: &self.config,
            },
            &flows,
            &mut pipes,
        );

        problems.extend(missing_inputs(&machines, &flows, &self.config));
        let utilization = utilization_groups(&machines);

        info!(
            %label,
            machines = machines.len(),
            inputs = external.inputs.len(),
            outputs = external.outputs.len(),
            problems = problems.len(),
            iterations = solver.iterations,
            "analysis complete"
        );

        AnalysisResult {
            label,
            external_inputs: external.inputs,
            external_outputs: external.outputs,
            machines,
            beacons,
            utilization,
            problems,
            item_flows: flows,
            census,
            pipes,
            solver,
        }
    }

    fn analyze_beacons(&self, layout: &Layout<'_>) -> Vec<AnalyzedBeacon<'c>> {
        layout
            .beacons
            .iter()
            .filter_map(|entity| {
                let def = self.catalog.beacon(&entity.name)?;
                Some(AnalyzedBeacon::new(
                    entity.id,
                    entity.position,
                    def,
                    self.modules(entity),
                ))
            })
            .collect()
    }

    fn analyze_machines(
        &self,
        layout: &Layout<'_>,
        beacons: &[AnalyzedBeacon<'c>],
        problems: &mut Vec<Problem>,
    ) -> Vec<AnalyzedMachine<'c>> {
        let mut machines = Vec::with_capacity(layout.machines.len());
        for entity in &layout.machines {
            let Some(def) = self.catalog.machine(&entity.name) else {
                continue;
            };

            let resolution = resolve_recipe(self.catalog, layout, entity, def, &self.config);
            if resolution.unresolved {
                let declared = entity.recipe.as_deref().unwrap_or_default();
                problems.push(Problem::unresolved_recipe(entity.id, &entity.name, declared));
            }
            if resolution.recipe.is_none() {
                problems.push(Problem::no_recipe(entity.id, &entity.name));
            }
            let (recipe, recipe_source) = match resolution.recipe {
                Some((recipe, source)) => (Some(recipe), Some(source)),
                None => (None, None),
            };

            let modules = self.modules(entity);
            let affecting: Vec<&AnalyzedBeacon<'c>> = beacons
                .iter()
                .filter(|b| b.affects(entity.position, def))
                .collect();
            let stats = effective_stats(Some(def), &modules, &affecting, recipe, &self.config);
            let rates = recipe
                .map(|r| MaxRates::compute(r, stats))
                .unwrap_or_default();

            machines.push(AnalyzedMachine {
                id: entity.id,
                name: entity.name.clone(),
                position: entity.position,
                machine: def,
                recipe,
                recipe_source,
                modules,
                beacons: affecting.iter().map(|b| b.id).collect(),
                stats,
                rates,
                utilization: 1.0,
                bottleneck: None,
            });
        }
        debug!(count = machines.len(), "analyzed machines");
        machines
    }

    /// Resolve installed module names; unknown names are skipped.
    fn modules(&self, entity: &Entity) -> Vec<&'c ModuleDef> {
        let Some(names) = &entity.modules else {
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|name| {
                let module = self.catalog.module(name);
                if module.is_none() {
                    debug!(entity = %entity.id, module = %name, "unknown module");
                }
                module
            })
            .collect()
    }
}
