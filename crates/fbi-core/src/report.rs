//! Utilization summary and soft diagnostics.

use crate::analyzer::AnalyzedMachine;
use crate::catalog::display_name;
use crate::config::AnalysisConfig;
use crate::flows::ItemFlowTotal;
use crate::id::EntityId;
use crate::solver::Bottleneck;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Problems
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemKind {
    /// The entity names a recipe the catalog does not know.
    UnresolvedRecipe,
    /// No recipe was declared or could be inferred.
    NoRecipe,
    /// A shortage input that nothing in the layout produces.
    MissingInput,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProblemKind::UnresolvedRecipe => "unresolved-recipe",
            ProblemKind::NoRecipe => "no-recipe",
            ProblemKind::MissingInput => "missing-input",
        })
    }
}

/// A non-fatal finding attached to an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: String,
    pub entity: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

impl Problem {
    pub fn unresolved_recipe(entity: EntityId, machine: &str, recipe: &str) -> Self {
        Self {
            kind: ProblemKind::UnresolvedRecipe,
            message: format!(
                "{} {entity} uses unknown recipe '{recipe}'",
                display_name(machine)
            ),
            entity,
            item: None,
        }
    }

    pub fn no_recipe(entity: EntityId, machine: &str) -> Self {
        Self {
            kind: ProblemKind::NoRecipe,
            message: format!(
                "{} {entity} has no recipe and none could be inferred",
                display_name(machine)
            ),
            entity,
            item: None,
        }
    }

    pub fn missing_input(entity: EntityId, machine: &str, item: &str) -> Self {
        Self {
            kind: ProblemKind::MissingInput,
            message: format!(
                "{} {entity} is short of {}, which nothing in the layout produces",
                display_name(machine),
                display_name(item)
            ),
            entity,
            item: Some(item.to_string()),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// One `missing-input` problem per (machine, item) where the machine is
/// short of an item with no utilization-scaled production anywhere.
///
/// The solver only reports a shortage for items with nonzero capacity, so
/// this fires only once every producer of the item has dropped to zero
/// utilization.
pub fn missing_inputs(
    machines: &[AnalyzedMachine<'_>],
    flows: &BTreeMap<String, ItemFlowTotal>,
    config: &AnalysisConfig,
) -> Vec<Problem> {
    let mut seen = BTreeSet::new();
    let mut problems = Vec::new();
    for m in machines {
        let Some(Bottleneck::Shortage(item)) = &m.bottleneck else {
            continue;
        };
        let produced = flows.get(item).map_or(0.0, |f| f.produced);
        if produced <= config.net_flow_threshold && seen.insert((m.id, item.as_str())) {
            problems.push(Problem::missing_input(m.id, &m.name, item));
        }
    }
    problems
}

// ---------------------------------------------------------------------------
// Utilization
// ---------------------------------------------------------------------------

/// Machines sharing a machine type and recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationGroup {
    pub machine: String,
    pub recipe: String,
    pub count: usize,
    pub mean_utilization: f64,
}

impl UtilizationGroup {
    /// `Machine (Recipe)`, as shown in reports.
    pub fn key(&self) -> String {
        format!("{} ({})", self.machine, self.recipe)
    }
}

/// Group machines that have a recipe by (machine, recipe) display name,
/// sorted by mean utilization descending and then by key.
pub fn utilization_groups(machines: &[AnalyzedMachine<'_>]) -> Vec<UtilizationGroup> {
    let mut sums: BTreeMap<(&str, &str), (usize, f64)> = BTreeMap::new();
    for m in machines {
        let Some(recipe) = m.recipe else { continue };
        let entry = sums
            .entry((m.machine.display_name.as_str(), recipe.display_name.as_str()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += m.utilization;
    }

    let mut groups: Vec<UtilizationGroup> = sums
        .into_iter()
        .map(|((machine, recipe), (count, total))| UtilizationGroup {
            machine: machine.to_string(),
            recipe: recipe.to_string(),
            count,
            mean_utilization: total / count as f64,
        })
        .collect();
    groups.sort_by(|a, b| {
        b.mean_utilization
            .total_cmp(&a.mean_utilization)
            .then_with(|| a.key().cmp(&b.key()))
    });
    groups
}
