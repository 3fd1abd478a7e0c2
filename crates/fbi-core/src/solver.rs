//! Iterative supply/demand bottleneck solver.
//!
//! Each iteration runs two passes over per-item totals:
//!
//! 1. **Supply**: when machines want more of an item than its producers can
//!    make, every consumer of that item is scaled down by
//!    `capacity / required`.
//! 2. **Demand**: when producers can make more than their (adjusted)
//!    consumers take, every producer is lowered to `required / capacity`.
//!
//! Capacity is always the unscaled sum of producer maxima. Items without
//! any producer are external inputs and never cause a shortage; items
//! without any consumer are final outputs and never limit their producers.
//!
//! The loop stops once no utilization moves by more than the configured
//! epsilon, or at the iteration cap. Hitting the cap is not an error; the
//! last state reached is kept.

use crate::analyzer::AnalyzedMachine;
use crate::catalog::display_name;
use crate::config::AnalysisConfig;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{trace, warn};

/// What is holding a machine below full utilization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bottleneck {
    /// Not enough of this input item is produced.
    Shortage(String),
    /// Consumers do not take all of this output item.
    DemandLimited(String),
}

impl Bottleneck {
    pub fn item(&self) -> &str {
        match self {
            Bottleneck::Shortage(item) | Bottleneck::DemandLimited(item) => item,
        }
    }
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bottleneck::Shortage(item) => write!(f, "{} shortage", display_name(item)),
            Bottleneck::DemandLimited(item) => write!(f, "Demand limited ({})", display_name(item)),
        }
    }
}

impl Serialize for Bottleneck {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// How the solver finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolveOutcome {
    /// Iterations run, including the final one that changed nothing.
    pub iterations: u32,
    pub converged: bool,
}

/// Adjust machine utilizations until supply and demand agree.
///
/// Starts from the machines' current utilizations, so running it again on
/// its own output changes nothing.
pub fn solve(machines: &mut [AnalyzedMachine<'_>], config: &AnalysisConfig) -> SolveOutcome {
    let capacity = capacity(machines);
    let slack = 1.0 + config.flow_tolerance;
    let eps = config.utilization_epsilon;

    let mut outcome = SolveOutcome {
        iterations: 0,
        converged: false,
    };

    while outcome.iterations < config.max_iterations {
        outcome.iterations += 1;
        let mut changed = 0usize;

        let required = required_input(machines);
        for (item, &req) in &required {
            let cap = capacity.get(item).copied().unwrap_or(0.0);
            if cap > 0.0 && req > cap * slack {
                let ratio = cap / req;
                for m in machines.iter_mut().filter(|m| m.rates.inputs.contains_key(item)) {
                    let next = m.utilization * ratio;
                    if next < m.utilization - eps {
                        m.utilization = next;
                        m.bottleneck = Some(Bottleneck::Shortage(item.clone()));
                        changed += 1;
                    }
                }
            }
        }

        let adjusted = required_input(machines);
        for (item, &needed) in &adjusted {
            let cap = capacity.get(item).copied().unwrap_or(0.0);
            if cap > needed * slack {
                let target = needed / cap;
                for m in machines.iter_mut().filter(|m| m.rates.outputs.contains_key(item)) {
                    if m.utilization > target + eps {
                        m.utilization = target;
                        m.bottleneck = Some(Bottleneck::DemandLimited(item.clone()));
                        changed += 1;
                    }
                }
            }
        }

        trace!(iteration = outcome.iterations, changed, "solver pass");
        if changed == 0 {
            outcome.converged = true;
            break;
        }
    }

    if !outcome.converged {
        warn!(
            iterations = outcome.iterations,
            "bottleneck solver hit its iteration cap; keeping last state"
        );
    }

    for m in machines.iter_mut() {
        if m.utilization > config.full_utilization {
            m.bottleneck = None;
        }
    }

    outcome
}

/// Unscaled production capacity per item.
fn capacity(machines: &[AnalyzedMachine<'_>]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for m in machines {
        for (item, rate) in &m.rates.outputs {
            *totals.entry(item.clone()).or_insert(0.0) += rate;
        }
    }
    totals
}

/// Utilization-scaled consumption per item.
fn required_input(machines: &[AnalyzedMachine<'_>]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for m in machines {
        for (item, rate) in &m.rates.inputs {
            *totals.entry(item.clone()).or_insert(0.0) += rate * m.utilization;
        }
    }
    totals
}
