//! Module and beacon effects on a machine's crafting speed and productivity.

use crate::catalog::{by_name, BeaconDef, EffectKind, MachineDef, ModuleDef, RecipeDef};
use crate::config::AnalysisConfig;
use crate::geometry::{Footprint, Position};
use crate::id::EntityId;
use serde::Serialize;

/// A beacon resolved against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedBeacon<'c> {
    pub id: EntityId,
    pub position: Position,
    #[serde(serialize_with = "by_name::many")]
    pub modules: Vec<&'c ModuleDef>,
    pub transmission: f64,
    #[serde(skip)]
    pub range: f64,
    #[serde(skip)]
    pub footprint: Footprint,
}

impl<'c> AnalyzedBeacon<'c> {
    pub fn new(id: EntityId, position: Position, def: &BeaconDef, modules: Vec<&'c ModuleDef>) -> Self {
        Self {
            id,
            position,
            modules,
            transmission: def.transmission_efficiency,
            range: def.range,
            footprint: def.footprint,
        }
    }

    /// Whether this beacon's supply area reaches a machine placed at
    /// `machine_pos`.
    pub fn affects(&self, machine_pos: Position, machine: &MachineDef) -> bool {
        let area = self.footprint.rect_at(self.position).expand(self.range);
        area.overlaps(&machine.footprint.rect_at(machine_pos))
    }
}

/// Effective crafting speed and productivity multiplier of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveStats {
    pub speed: f64,
    pub productivity: f64,
}

impl EffectiveStats {
    /// Used when the machine has no catalog entry.
    pub const NEUTRAL: EffectiveStats = EffectiveStats {
        speed: 1.0,
        productivity: 1.0,
    };
}

/// Combined (speed, productivity) bonus projected by a set of beacons.
///
/// Every module in every beacon contributes its deltas scaled by that
/// beacon's transmission efficiency; the total is divided by the square
/// root of the beacon count.
pub fn beacon_bonus(beacons: &[&AnalyzedBeacon<'_>]) -> (f64, f64) {
    if beacons.is_empty() {
        return (0.0, 0.0);
    }
    let (speed, productivity) = beacons.iter().fold((0.0, 0.0), |(s, p), beacon| {
        let (bs, bp) = beacon.modules.iter().fold((0.0, 0.0), |(s, p), m| {
            (s + m.effects.speed(), p + m.effects.productivity())
        });
        (s + bs * beacon.transmission, p + bp * beacon.transmission)
    });
    let falloff = 1.0 / (beacons.len() as f64).sqrt();
    (speed * falloff, productivity * falloff)
}

/// Compute a machine's effective speed and productivity.
///
/// Installed modules only contribute effects the machine accepts, and
/// productivity additionally requires a recipe that allows it. Beacon
/// contributions are added as-is.
pub fn effective_stats(
    machine: Option<&MachineDef>,
    modules: &[&ModuleDef],
    beacons: &[&AnalyzedBeacon<'_>],
    recipe: Option<&RecipeDef>,
    config: &AnalysisConfig,
) -> EffectiveStats {
    let Some(machine) = machine else {
        return EffectiveStats::NEUTRAL;
    };

    let allow_speed = machine.allows(EffectKind::Speed);
    let allow_productivity = machine.allows(EffectKind::Productivity)
        && recipe.is_some_and(|r| r.allow_productivity);

    let mut speed_bonus = 0.0;
    let mut productivity_bonus = machine.base_productivity;

    for module in modules {
        if allow_speed {
            speed_bonus += module.effects.speed();
        }
        if allow_productivity {
            productivity_bonus += module.effects.productivity();
        }
    }

    let (beacon_speed, beacon_productivity) = beacon_bonus(beacons);
    speed_bonus += beacon_speed;
    productivity_bonus += beacon_productivity;

    EffectiveStats {
        speed: machine.crafting_speed * (1.0 + speed_bonus).max(config.min_speed_multiplier),
        productivity: 1.0 + productivity_bonus,
    }
}
