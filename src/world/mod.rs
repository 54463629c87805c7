//! # World Loader
//!
//! Takes the decoded tables of a Manual world — items, categories,
//! locations, regions — and builds the canonical fast lookups plus one
//! simplified logic DAG per location. Region connectivity is compiled down
//! into the same logic language and conjoined with each located location's
//! own requirements, so the evaluator never sees the region graph.
//!
//! The loader borrows from the [`WorldData`]: every table key and every
//! DAG operand is a slice into its strings, so the data must outlive
//! the [`World`] built from it.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::logic::{simplify, Logic};
use crate::parser::parse_requires;
use crate::yaml::Yaml;

mod regions;

use regions::RegionCompiler;

/// Category assigned to the filler item when it declares none.
const NO_CATEGORY: &str = "(No Category)";

/// Errors from the decode conveniences. Parse failures inside `requires`
/// strings are not errors; they go through [`Diagnostics`].
#[derive(Error, Debug)]
pub enum WorldError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The decoded world tables, straight out of the data files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub game: GameTable,

    #[serde(default)]
    pub categories: BTreeMap<String, CategoryDef>,

    #[serde(default)]
    pub items: Vec<ItemDef>,

    #[serde(default)]
    pub locations: Vec<LocationDef>,

    /// Passthrough used by the YAML layer to seed option defaults.
    #[serde(default)]
    pub options: serde_json::Value,

    #[serde(default)]
    pub regions: BTreeMap<String, RegionDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameTable {
    #[serde(default)]
    pub filler_item_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDef {
    #[serde(default)]
    pub hidden: bool,

    /// YAML option names gating this category.
    #[serde(default)]
    pub yaml_option: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,

    /// Pool supply; accepts an integer or a numeric string.
    #[serde(default = "default_count", deserialize_with = "de_count")]
    pub count: u64,

    /// Accepts a list or a single string.
    #[serde(default, deserialize_with = "de_string_list")]
    pub category: Vec<String>,

    /// Phantom items credited per held copy.
    #[serde(default)]
    pub value: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationDef {
    pub name: String,

    #[serde(default)]
    pub requires: String,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub category: Vec<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub victory: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionDef {
    #[serde(default)]
    pub starting: bool,

    #[serde(default)]
    pub requires: String,

    #[serde(default)]
    pub connects_to: Vec<String>,

    /// Requirements for leaving through a given connection.
    #[serde(default)]
    pub exit_requires: BTreeMap<String, String>,

    /// Requirements for entering, keyed by connection name.
    #[serde(default)]
    pub entrance_requires: BTreeMap<String, String>,
}

fn default_count() -> u64 {
    1
}

fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Int(count) => Ok(count),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::One(single) => vec![single],
        Raw::Many(list) => list,
    })
}

impl WorldData {
    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Canonical lookup tables plus per-location logic, built once per world.
/// Read-only after construction; share freely across query threads.
#[derive(Debug, Default)]
pub struct World<'a> {
    /// Pool supply per item.
    pub item_count: HashMap<&'a str, u64>,
    pub item_to_categories: HashMap<&'a str, BTreeSet<&'a str>>,
    pub category_to_items: HashMap<&'a str, BTreeSet<&'a str>>,
    /// YAML option names gating each category.
    pub category_to_yaml_options: HashMap<&'a str, BTreeSet<&'a str>>,
    pub hidden_categories: HashSet<&'a str>,
    /// Ordered phantom credits per item.
    pub item_to_phantoms: HashMap<&'a str, Vec<(&'a str, u64)>>,
    /// Simplified logic per location, region reachability already conjoined.
    pub locations_to_logic: HashMap<&'a str, Arc<Logic<'a>>>,
    pub category_to_locations: HashMap<&'a str, BTreeSet<&'a str>>,
    /// Locations flagged `victory`, in declaration order.
    pub victory_locations: Vec<&'a str>,
}

impl<'a> World<'a> {
    /// Build every lookup table and compile every location's logic.
    ///
    /// Missing tables degrade gracefully: a world with no items simply
    /// yields empty lookups, and locations with no requirements carry no
    /// logic at all (they are always reachable).
    pub fn build(data: &'a WorldData, diagnostics: &Diagnostics) -> World<'a> {
        let mut world = World::default();

        for item in &data.items {
            let name = item.name.as_str();
            let count = world.item_count.entry(name).or_insert(0);
            *count = count.saturating_add(item.count);
            for category in &item.category {
                world
                    .item_to_categories
                    .entry(name)
                    .or_default()
                    .insert(category.as_str());
                world
                    .category_to_items
                    .entry(category.as_str())
                    .or_default()
                    .insert(name);
            }
            if !item.value.is_empty() {
                world.item_to_phantoms.insert(
                    name,
                    item.value
                        .iter()
                        .map(|(phantom, per_copy)| (phantom.as_str(), *per_copy))
                        .collect(),
                );
            }
        }

        if let Some(filler) = &data.game.filler_item_name {
            let name = filler.as_str();
            world.item_count.entry(name).or_insert(1);
            world
                .item_to_categories
                .entry(name)
                .or_default()
                .insert(NO_CATEGORY);
            world
                .category_to_items
                .entry(NO_CATEGORY)
                .or_default()
                .insert(name);
        }

        for (name, category) in &data.categories {
            if category.hidden {
                world.hidden_categories.insert(name.as_str());
            }
            if !category.yaml_option.is_empty() {
                world
                    .category_to_yaml_options
                    .entry(name.as_str())
                    .or_default()
                    .extend(category.yaml_option.iter().map(String::as_str));
            }
        }

        let mut compiler = RegionCompiler::new(data, diagnostics);
        for location in &data.locations {
            let name = location.name.as_str();
            for category in &location.category {
                world
                    .category_to_locations
                    .entry(category.as_str())
                    .or_default()
                    .insert(name);
            }
            if location.victory {
                world.victory_locations.push(name);
            }

            let mut logic = if location.requires.trim().is_empty() {
                None
            } else {
                parse_requires(&location.requires, diagnostics)
            };
            if let Some(region) = &location.region {
                if !data.regions.is_empty() {
                    logic = simplify::and(logic, compiler.reach(region.as_str()));
                }
            }
            if let Some(node) = logic {
                debug!(location = name, logic = %node, "compiled location logic");
                world.locations_to_logic.insert(name, node);
            }
        }

        world
    }

    /// Write the goal-indexed victory location's name into `yaml.goal`.
    /// Does nothing when no `goal` option is set or the index is out of
    /// range.
    pub fn resolve_goal(&self, yaml: &mut Yaml) {
        let Some(&index) = yaml.options.get("goal") else {
            return;
        };
        let Ok(index) = usize::try_from(index) else {
            return;
        };
        if let Some(name) = self.victory_locations.get(index) {
            yaml.goal = (*name).to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_accepts_int_or_numeric_string() {
        let data = WorldData::from_json(
            r#"{"items": [
                {"name": "a", "count": 3},
                {"name": "b", "count": "4"},
                {"name": "c"}
            ]}"#,
        )
        .expect("decode");
        assert_eq!(data.items[0].count, 3);
        assert_eq!(data.items[1].count, 4);
        assert_eq!(data.items[2].count, 1);
    }

    #[test]
    fn test_category_accepts_single_string() {
        let data = WorldData::from_json(
            r#"{"items": [{"name": "a", "category": "tools"}]}"#,
        )
        .expect("decode");
        assert_eq!(data.items[0].category, vec!["tools".to_string()]);
    }

    #[test]
    fn test_empty_world_builds_empty_lookups() {
        let data = WorldData::default();
        let world = World::build(&data, &Diagnostics::disabled());
        assert!(world.item_count.is_empty());
        assert!(world.locations_to_logic.is_empty());
    }
}
