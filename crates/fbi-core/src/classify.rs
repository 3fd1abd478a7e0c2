//! Entity classification and inserter geometry.
//!
//! Classification is a pure name lookup against the catalog. An entity that
//! matches no class is counted as [`EntityClass::Other`] and otherwise
//! ignored by the analysis.

use crate::blueprint::{Blueprint, Entity};
use crate::catalog::Catalog;
use crate::geometry::{Direction, Position};
use serde::Serialize;

/// Role an entity plays in the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Machine,
    Beacon,
    Inserter,
    Storage,
    Pipe,
    Rail,
    Other,
}

/// Classify an entity by its prototype name.
pub fn classify(catalog: &Catalog, name: &str) -> EntityClass {
    if catalog.is_production_machine(name) {
        EntityClass::Machine
    } else if catalog.is_beacon(name) {
        EntityClass::Beacon
    } else if catalog.is_inserter(name) {
        EntityClass::Inserter
    } else if catalog.is_storage(name) {
        EntityClass::Storage
    } else if catalog.is_pipe(name) {
        EntityClass::Pipe
    } else if catalog.is_rail(name) {
        EntityClass::Rail
    } else {
        EntityClass::Other
    }
}

// ---------------------------------------------------------------------------
// Inserters
// ---------------------------------------------------------------------------

/// An inserter with its pickup and drop tiles resolved.
///
/// A blueprint inserter's direction points at the side it picks up from:
/// a north-facing inserter takes from the tile above it and drops onto the
/// tile below. Reach is fixed at one tile; long-handed variants are not
/// modeled.
#[derive(Debug, Clone, Copy)]
pub struct Inserter<'a> {
    pub entity: &'a Entity,
    pub pickup: Position,
    pub drop: Position,
}

impl<'a> Inserter<'a> {
    pub fn new(entity: &'a Entity) -> Self {
        let facing = entity.direction.unwrap_or(Direction::North);
        let (px, py) = facing.offset();
        let (dx, dy) = facing.opposite().offset();
        Self {
            entity,
            pickup: entity.position.offset(px, py),
            drop: entity.position.offset(dx, dy),
        }
    }

    pub fn filters(&self) -> &'a [String] {
        self.entity.active_filters()
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Entity counts per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Census {
    pub machines: usize,
    pub beacons: usize,
    pub inserters: usize,
    pub storage: usize,
    pub pipes: usize,
    pub rails: usize,
    pub other: usize,
}

/// A blueprint's entities partitioned by class, in blueprint order.
#[derive(Debug)]
pub struct Layout<'a> {
    pub machines: Vec<&'a Entity>,
    pub beacons: Vec<&'a Entity>,
    pub inserters: Vec<Inserter<'a>>,
    pub storage: Vec<&'a Entity>,
    pub pipes: Vec<&'a Entity>,
    pub rails: Vec<&'a Entity>,
    pub other: usize,
}

impl<'a> Layout<'a> {
    pub fn new(catalog: &Catalog, blueprint: &'a Blueprint) -> Self {
        let mut layout = Layout {
            machines: Vec::new(),
            beacons: Vec::new(),
            inserters: Vec::new(),
            storage: Vec::new(),
            pipes: Vec::new(),
            rails: Vec::new(),
            other: 0,
        };
        for entity in &blueprint.entities {
            match classify(catalog, &entity.name) {
                EntityClass::Machine => layout.machines.push(entity),
                EntityClass::Beacon => layout.beacons.push(entity),
                EntityClass::Inserter => layout.inserters.push(Inserter::new(entity)),
                EntityClass::Storage => layout.storage.push(entity),
                EntityClass::Pipe => layout.pipes.push(entity),
                EntityClass::Rail => layout.rails.push(entity),
                EntityClass::Other => layout.other += 1,
            }
        }
        layout
    }

    pub fn census(&self) -> Census {
        Census {
            machines: self.machines.len(),
            beacons: self.beacons.len(),
            inserters: self.inserters.len(),
            storage: self.storage.len(),
            pipes: self.pipes.len(),
            rails: self.rails.len(),
            other: self.other,
        }
    }

    /// Storage entity occupying the tile at `pos`, if any.
    pub fn storage_at(&self, pos: Position) -> Option<&'a Entity> {
        self.storage.iter().copied().find(|s| s.position.same_tile(&pos))
    }
}
