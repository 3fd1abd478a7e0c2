use serde::{Deserialize, Serialize};

/// Tuning constants for a single analysis run.
///
/// Every field defaults individually, so a config file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Hard cap on bottleneck solver iterations.
    pub max_iterations: u32,
    /// Utilization changes at or below this are not counted as progress.
    pub utilization_epsilon: f64,
    /// Relative tolerance when comparing supply against demand (0.01 %).
    pub flow_tolerance: f64,
    /// Machines above this utilization carry no bottleneck cause.
    pub full_utilization: f64,
    /// Net flows with a magnitude at or below this are noise.
    pub net_flow_threshold: f64,
    /// Radius in tiles of the fallback filtered-inserter search.
    pub inference_radius: f64,
    /// Maximum center distance for two pipe segments to connect.
    pub pipe_adjacency: f64,
    /// Slack added to a machine's half diagonal when connecting pipes.
    pub pipe_machine_margin: f64,
    /// Dead-end pipe count at which a network counts as externally fed.
    pub dead_end_threshold: usize,
    /// Lower bound on the speed multiplier after module penalties.
    pub min_speed_multiplier: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            utilization_epsilon: 1e-4,
            flow_tolerance: 1e-4,
            full_utilization: 0.999,
            net_flow_threshold: 1e-4,
            inference_radius: 10.0,
            pipe_adjacency: 1.5,
            pipe_machine_margin: 1.5,
            dead_end_threshold: 3,
            min_speed_multiplier: 0.2,
        }
    }
}
