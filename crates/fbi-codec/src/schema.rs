//! Serde structs for the blueprint JSON payload.
//!
//! Covers the fields the analyzer reads plus enough metadata to re-encode a
//! blueprint. Everything else in the payload (icons, tiles, wires, ...) is
//! ignored on decode.

use fbi_core::geometry::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ===========================================================================
// Root
// ===========================================================================

/// A decoded blueprint string: a single blueprint or a book.
///
/// Serializes externally tagged, which is exactly the game's root shape:
/// `{"blueprint": {...}}` or `{"blueprint_book": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BlueprintString {
    #[serde(rename = "blueprint")]
    Blueprint(BlueprintData),
    #[serde(rename = "blueprint_book")]
    Book(BookData),
}

/// The root object as it appears on the wire, before checking which key
/// is present.
#[derive(Debug, Deserialize)]
pub(crate) struct RootData {
    #[serde(default)]
    pub blueprint: Option<BlueprintData>,
    #[serde(default)]
    pub blueprint_book: Option<BookData>,
}

// ===========================================================================
// Blueprints and books
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintData {
    #[serde(default = "blueprint_item")]
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Packed game version: four 16-bit fields, major first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default)]
    pub entities: Vec<EntityData>,
}

fn blueprint_item() -> String {
    "blueprint".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookData {
    #[serde(default = "book_item")]
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_index: Option<u32>,
    #[serde(default)]
    pub blueprints: Vec<BookEntry>,
}

fn book_item() -> String {
    "blueprint-book".to_string()
}

/// One slot of a book. Slots holding planners carry neither a blueprint
/// nor a nested book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    #[serde(default)]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<BlueprintData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_book: Option<BookData>,
}

// ===========================================================================
// Entities
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub entity_number: u32,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_filters: Option<bool>,
    /// `input` / `output` on underground belts and pipes.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub io_type: Option<String>,
}

/// Item requests attached to an entity (modules, for our purposes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsData {
    /// 2.0 form: one request per item, each listing the slots it fills.
    Requests(Vec<ItemRequest>),
    /// 1.x form: item name to count.
    Counts(BTreeMap<String, u32>),
}

impl ItemsData {
    /// Item names expanded to one entry per occupied slot.
    pub fn expand(&self) -> Vec<String> {
        match self {
            ItemsData::Requests(requests) => requests
                .iter()
                .flat_map(|r| {
                    std::iter::repeat_n(r.id.name.clone(), r.items.in_inventory.len())
                })
                .collect(),
            ItemsData::Counts(counts) => counts
                .iter()
                .flat_map(|(name, &count)| std::iter::repeat_n(name.clone(), count as usize))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub id: ItemId,
    #[serde(default)]
    pub items: ItemPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemId {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemPlacement {
    #[serde(default)]
    pub in_inventory: Vec<InventorySlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub inventory: u32,
    pub stack: u32,
}

/// One inserter filter slot. 2.0 slots may hold only a quality condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterData {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
}

// ===========================================================================
// Tests
// ===========================================================================
