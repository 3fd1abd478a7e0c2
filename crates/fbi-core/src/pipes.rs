//! Pipe-network topology, used to decide whether surplus fluid leaves the
//! layout.
//!
//! The graph is approximate: two pipe segments connect when their centers
//! are within [`AnalysisConfig::pipe_adjacency`] tiles, and a segment
//! connects to a machine when it lies within the machine's half diagonal
//! plus [`AnalysisConfig::pipe_machine_margin`]. Pipe direction and
//! fluidbox positions are not modeled.

use crate::blueprint::Entity;
use crate::catalog::Catalog;
use crate::config::AnalysisConfig;
use crate::geometry::{Footprint, Position};
use serde::Serialize;
use tracing::debug;

/// Summary of the layout's pipe network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipeTopology {
    pub segments: usize,
    /// Segments with at most one pipe neighbour and no machine attached.
    pub dead_ends: usize,
    /// Underground pipe endpoints in the layout.
    pub underground_endpoints: usize,
}

impl PipeTopology {
    /// Build the topology from the layout's pipes and placed machines.
    pub fn build(
        catalog: &Catalog,
        pipes: &[&Entity],
        machines: &[(Position, Footprint)],
        config: &AnalysisConfig,
    ) -> Self {
        let mut degree = vec![0usize; pipes.len()];
        for i in 0..pipes.len() {
            for j in (i + 1)..pipes.len() {
                if pipes[i].position.distance(&pipes[j].position) <= config.pipe_adjacency {
                    degree[i] += 1;
                    degree[j] += 1;
                }
            }
        }

        let mut dead_ends = 0;
        let mut underground_endpoints = 0;
        for (pipe, &deg) in pipes.iter().zip(&degree) {
            if catalog.is_underground_pipe(&pipe.name) {
                // Linked to its partner underground; never a dead end.
                underground_endpoints += 1;
                continue;
            }
            let touches_machine = machines.iter().any(|(pos, fp)| {
                pipe.position.distance(pos) <= fp.half_diagonal() + config.pipe_machine_margin
            });
            if deg <= 1 && !touches_machine {
                dead_ends += 1;
            }
        }

        let topology = PipeTopology {
            segments: pipes.len(),
            dead_ends,
            underground_endpoints,
        };
        debug!(?topology, "pipe topology");
        topology
    }

    /// Whether the network looks open to the outside: enough loose ends, or
    /// an underground pipe without a partner.
    pub fn has_external_connections(&self, config: &AnalysisConfig) -> bool {
        self.dead_ends >= config.dead_end_threshold || self.underground_endpoints % 2 == 1
    }
}
