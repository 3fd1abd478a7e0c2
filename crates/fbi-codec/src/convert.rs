//! Conversion from the wire schema into the analyzer's layout snapshot.

use crate::schema::{BlueprintData, EntityData, FilterData};
use fbi_core::blueprint::{Blueprint, Entity, ItemFilter};
use fbi_core::geometry::{Direction, DirectionScheme};
use fbi_core::id::EntityId;
use tracing::debug;

/// Major component of a packed game version.
pub fn version_major(version: u64) -> u16 {
    (version >> 48) as u16
}

/// 1.x blueprints use 8-way direction codes; 2.0 and unversioned ones use
/// 16-way codes.
pub fn direction_scheme(version: Option<u64>) -> DirectionScheme {
    match version {
        Some(v) if version_major(v) < 2 => DirectionScheme::Eight,
        _ => DirectionScheme::Sixteen,
    }
}

impl BlueprintData {
    /// Convert into a [`Blueprint`]. `inherited_version` is the enclosing
    /// book's version, used when the blueprint carries none of its own.
    pub fn to_blueprint(&self, inherited_version: Option<u64>) -> Blueprint {
        let version = self.version.or(inherited_version);
        let scheme = direction_scheme(version);
        Blueprint {
            label: self.label.clone(),
            version,
            entities: self
                .entities
                .iter()
                .map(|e| convert_entity(e, scheme))
                .collect(),
        }
    }
}

fn convert_entity(e: &EntityData, scheme: DirectionScheme) -> Entity {
    let mut entity = Entity::new(EntityId(e.entity_number), e.name.clone(), e.position);
    entity.direction = e.direction.and_then(|code| {
        let dir = Direction::from_code(code, scheme);
        if dir.is_none() {
            debug!(entity = e.entity_number, code, "non-cardinal direction ignored");
        }
        dir
    });
    entity.recipe = e.recipe.clone();
    entity.modules = e.items.as_ref().map(|items| items.expand());
    entity.filter = e.filters.as_deref().map(|filters| ItemFilter {
        items: filter_names(filters),
        // 1.x filter inserters have no toggle; their filters always apply.
        enabled: e.use_filters.unwrap_or(scheme == DirectionScheme::Eight),
    });
    entity
}

/// Named filter slots in slot order.
fn filter_names(filters: &[FilterData]) -> Vec<String> {
    let mut slots: Vec<&FilterData> = filters.iter().filter(|f| f.name.is_some()).collect();
    slots.sort_by_key(|f| f.index);
    slots.into_iter().filter_map(|f| f.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const V2: u64 = 562_949_954_076_673; // 2.0.10
    const V1: u64 = 281_479_275_675_648; // 1.1.x

    fn parse(json: &str) -> BlueprintData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn version_major_unpacks() {
        assert_eq!(version_major(V2), 2);
        assert_eq!(version_major(V1), 1);
    }

    #[test]
    fn scheme_follows_version() {
        assert_eq!(direction_scheme(Some(V1)), DirectionScheme::Eight);
        assert_eq!(direction_scheme(Some(V2)), DirectionScheme::Sixteen);
        assert_eq!(direction_scheme(None), DirectionScheme::Sixteen);
    }

    #[test]
    fn directions_decode_per_scheme() {
        let json = |version: u64| {
            format!(
                r#"{{"version": {version}, "entities": [
                    {{"entity_number": 1, "name": "inserter", "position": {{"x": 0.5, "y": 0.5}}, "direction": 4}},
                    {{"entity_number": 2, "name": "inserter", "position": {{"x": 1.5, "y": 0.5}}, "direction": 2}},
                    {{"entity_number": 3, "name": "inserter", "position": {{"x": 2.5, "y": 0.5}}}}
                ]}}"#
            )
        };

        let bp = parse(&json(V2)).to_blueprint(None);
        assert_eq!(bp.entities[0].direction, Some(Direction::East));
        // Code 2 is not cardinal in 16-way space.
        assert_eq!(bp.entities[1].direction, None);
        assert_eq!(bp.entities[2].direction, None);

        let bp = parse(&json(V1)).to_blueprint(None);
        assert_eq!(bp.entities[0].direction, Some(Direction::South));
        assert_eq!(bp.entities[1].direction, Some(Direction::East));
    }

    #[test]
    fn book_version_is_inherited() {
        let bp = parse(
            r#"{"entities": [{"entity_number": 1, "name": "inserter",
                "position": {"x": 0.5, "y": 0.5}, "direction": 4}]}"#,
        );
        assert_eq!(bp.to_blueprint(Some(V1)).entities[0].direction, Some(Direction::South));
        assert_eq!(bp.to_blueprint(Some(V1)).version, Some(V1));
    }

    #[test]
    fn filters_sorted_and_enabled() {
        let bp = parse(&format!(
            r#"{{"version": {V2}, "entities": [
                {{"entity_number": 1, "name": "fast-inserter", "position": {{"x": 0.5, "y": 0.5}},
                  "use_filters": true,
                  "filters": [{{"index": 2, "name": "copper-plate"}},
                              {{"index": 1, "name": "iron-plate"}},
                              {{"index": 3, "quality": "rare"}}]}},
                {{"entity_number": 2, "name": "fast-inserter", "position": {{"x": 1.5, "y": 0.5}},
                  "filters": [{{"index": 1, "name": "iron-plate"}}]}}
            ]}}"#
        ))
        .to_blueprint(None);

        let first = bp.entities[0].filter.as_ref().unwrap();
        assert_eq!(first.items, vec!["iron-plate", "copper-plate"]);
        assert!(first.enabled);
        // 2.0 filters without use_filters are switched off.
        assert!(bp.entities[1].active_filters().is_empty());
    }

    #[test]
    fn legacy_filters_always_apply() {
        let bp = parse(&format!(
            r#"{{"version": {V1}, "entities": [
                {{"entity_number": 1, "name": "filter-inserter", "position": {{"x": 0.5, "y": 0.5}},
                  "filters": [{{"index": 1, "name": "iron-plate"}}]}}
            ]}}"#
        ))
        .to_blueprint(None);
        assert_eq!(bp.entities[0].active_filters(), ["iron-plate"]);
    }

    #[test]
    fn modules_and_recipe_carry_over() {
        let bp = parse(
            r#"{"label": "Gears", "entities": [
                {"entity_number": 7, "name": "assembling-machine-2", "position": {"x": 1.5, "y": 1.5},
                 "recipe": "iron-gear-wheel", "items": {"speed-module": 2}}
            ]}"#,
        )
        .to_blueprint(None);
        assert_eq!(bp.label.as_deref(), Some("Gears"));
        let e = &bp.entities[0];
        assert_eq!(e.id, EntityId(7));
        assert_eq!(e.recipe.as_deref(), Some("iron-gear-wheel"));
        assert_eq!(
            e.modules.as_deref(),
            Some(&["speed-module".to_string(), "speed-module".to_string()][..])
        );
    }
}
