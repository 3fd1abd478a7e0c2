//! Aggregate item flows and system-boundary classification.

use crate::analyzer::AnalyzedMachine;
use crate::catalog::{Catalog, ItemKind};
use crate::classify::{Inserter, Layout};
use crate::config::AnalysisConfig;
use crate::pipes::PipeTopology;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Utilization-scaled totals for one item or fluid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ItemFlowTotal {
    pub produced: f64,
    pub consumed: f64,
}

impl ItemFlowTotal {
    pub fn net(&self) -> f64 {
        self.produced - self.consumed
    }
}

/// Sum every machine's rates, scaled by its utilization.
pub fn item_flows(machines: &[AnalyzedMachine<'_>]) -> BTreeMap<String, ItemFlowTotal> {
    let mut flows: BTreeMap<String, ItemFlowTotal> = BTreeMap::new();
    for m in machines {
        for (item, rate) in &m.rates.inputs {
            flows.entry(item.clone()).or_default().consumed += rate * m.utilization;
        }
        for (item, rate) in &m.rates.outputs {
            flows.entry(item.clone()).or_default().produced += rate * m.utilization;
        }
    }
    flows
}

/// Net rates crossing the layout boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExternalFlows {
    pub inputs: BTreeMap<String, f64>,
    pub outputs: BTreeMap<String, f64>,
}

/// Everything the boundary classifier looks at.
pub struct FlowContext<'a, 'c> {
    pub catalog: &'c Catalog,
    pub layout: &'a Layout<'a>,
    pub machines: &'a [AnalyzedMachine<'c>],
    pub config: &'a AnalysisConfig,
}

/// Decide which net flows cross the layout boundary.
///
/// Net consumption is always an external input. Net production is an
/// external output only when no machine consumes the item and, for fluids,
/// the pipe network has an opening or, for solids, some output inserter
/// drops somewhere other than a machine. `topology` is computed on first
/// use and reused by later calls.
pub fn classify_external(
    ctx: &FlowContext<'_, '_>,
    flows: &BTreeMap<String, ItemFlowTotal>,
    topology: &mut Option<PipeTopology>,
) -> ExternalFlows {
    let mut external = ExternalFlows::default();
    for (item, flow) in flows {
        let net = flow.net();
        if net.abs() <= ctx.config.net_flow_threshold {
            continue;
        }
        if net < 0.0 {
            external.inputs.insert(item.clone(), -net);
            continue;
        }
        if is_consumed(ctx.machines, item) {
            trace!(%item, "surplus of an intermediate");
            continue;
        }
        let leaves = match ctx.catalog.item_kind(item) {
            ItemKind::Fluid => topology
                .get_or_insert_with(|| pipe_topology(ctx))
                .has_external_connections(ctx.config),
            ItemKind::Item => solid_leaves_layout(ctx, item),
        };
        if leaves {
            external.outputs.insert(item.clone(), net);
        } else {
            trace!(%item, "surplus stays inside the layout");
        }
    }
    external
}

fn is_consumed(machines: &[AnalyzedMachine<'_>], item: &str) -> bool {
    machines.iter().any(|m| m.rates.inputs.contains_key(item))
}

fn pipe_topology(ctx: &FlowContext<'_, '_>) -> PipeTopology {
    let placed: Vec<_> = ctx
        .machines
        .iter()
        .map(|m| (m.position, m.machine.footprint))
        .collect();
    PipeTopology::build(ctx.catalog, &ctx.layout.pipes, &placed, ctx.config)
}

/// Whether some output inserter of some producer of `item` drops it
/// anywhere but into another machine. A producer with no output inserter
/// at all counts as leaving the layout.
fn solid_leaves_layout(ctx: &FlowContext<'_, '_>, item: &str) -> bool {
    let producers = ctx
        .machines
        .iter()
        .filter(|m| m.rates.outputs.contains_key(item));

    let mut traced = 0usize;
    for producer in producers {
        let area = producer.machine.footprint.rect_at(producer.position);
        let outputs = ctx
            .layout
            .inserters
            .iter()
            .filter(|ins| area.contains(ins.pickup) && carries(ins, item));
        for ins in outputs {
            traced += 1;
            let into_machine = ctx.machines.iter().any(|other| {
                other.id != producer.id
                    && other.machine.footprint.rect_at(other.position).contains(ins.drop)
            });
            if !into_machine {
                return true;
            }
        }
    }
    traced == 0
}

fn carries(ins: &Inserter<'_>, item: &str) -> bool {
    let filters = ins.filters();
    filters.is_empty() || filters.iter().any(|f| f == item)
}
