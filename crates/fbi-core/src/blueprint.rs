//! The immutable layout snapshot handed to the analyzer.
//!
//! These are decoded, schema-independent types. Parsing the blueprint
//! string and its JSON shape lives in the codec crate.

use crate::geometry::{Direction, Position};
use crate::id::EntityId;

/// An inserter's item filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemFilter {
    /// Filtered item names, in slot order.
    pub items: Vec<String>,
    /// Whether filtering is switched on. A disabled filter lets everything
    /// through and says nothing about what the inserter carries.
    pub enabled: bool,
}

impl ItemFilter {
    /// Items this filter actively restricts to, or an empty slice.
    pub fn active_items(&self) -> &[String] {
        if self.enabled { &self.items } else { &[] }
    }
}

/// A single placed entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Internal prototype name, e.g. `assembling-machine-2`.
    pub name: String,
    pub position: Position,
    /// Facing direction. Blueprints omit it for the default (north).
    pub direction: Option<Direction>,
    /// Recipe set on the machine, if any.
    pub recipe: Option<String>,
    /// Installed modules, one name per occupied slot.
    pub modules: Option<Vec<String>>,
    /// Inserter filter configuration.
    pub filter: Option<ItemFilter>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            direction: None,
            recipe: None,
            modules: None,
            filter: None,
        }
    }

    /// Filter items this entity actively restricts to.
    pub fn active_filters(&self) -> &[String] {
        self.filter.as_ref().map(ItemFilter::active_items).unwrap_or(&[])
    }
}

/// A parsed blueprint: entities plus metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blueprint {
    pub label: Option<String>,
    /// Encoded game version the blueprint was exported from.
    pub version: Option<u64>,
    pub entities: Vec<Entity>,
}

impl Blueprint {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            label: None,
            version: None,
            entities,
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
