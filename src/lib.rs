//! # Remote Logic Engine
//!
//! Reachability logic for Manual Archipelago worlds: given a world's data
//! tables, the items a player currently holds, and the player's YAML
//! settings, is a given location reachable — and if not, which
//! requirements are still missing?
//!
//! ## Pipeline Architecture
//!
//! ```text
//! requires string
//!     ↓
//! [Tokenizer]            → flat token stream (zero-copy)
//!     ↓
//! [Parser]               → logic DAG (Grouping/And/Or/leaves/functions)
//!     ↓
//! [Simplifier]           → algebraic normal form (identity, idempotent,
//!     ↓                     commutative, absorption laws)
//! [World Loader]         → per-location logic, region graph compiled in
//!     ↓
//! [Evaluator]            → satisfied, or a why-not residual
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use remote_logic::{Diagnostics, Evaluator, World, WorldData, Yaml};
//!
//! let data = WorldData::from_file("world.json")?;
//! let world = World::build(&data, &Diagnostics::disabled());
//!
//! let mut yaml = Yaml::new();
//! yaml.set_bool("hard_mode", true);
//!
//! let mut evaluator = Evaluator::new(&world, &yaml, ["Sword", "Boss Key"]);
//! match evaluator.inspect_location("Throne Room") {
//!     None => println!("reachable"),
//!     Some(missing) => println!("blocked on {missing}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `token` | requires string → token stream |
//! | `logic` | expression DAG, structural equality, printers |
//! | `logic::simplify` | smart AND/OR constructors (the rewrite system) |
//! | `parser` | token stream → DAG |
//! | `diagnostics` | parse-error sink with dedup and mute |
//! | `world` | decoded tables → canonical lookups + per-location logic |
//! | `eval` | DAG × game state → satisfied / residual |
//! | `yaml` | player settings value type |
//! | `config` | history path configuration |
//!
//! The loader and evaluator are pure and synchronous: build a [`World`]
//! once (on any thread), share it read-only, and create a fresh
//! [`Evaluator`] per query.

pub mod config;
pub mod diagnostics;
pub mod eval;
pub mod logic;
pub mod parser;
pub mod token;
pub mod world;
pub mod yaml;

// Re-export the public surface at the crate root.
pub use config::Config;
pub use diagnostics::{Diagnostics, ErrorSink, ParseDiagnostic};
pub use eval::{CategoryGate, Evaluator};
pub use logic::{simplify, Logic, LogicKind};
pub use parser::{parse, parse_requires};
pub use token::{detokenize, tokenize, Token};
pub use world::{
    CategoryDef, GameTable, ItemDef, LocationDef, RegionDef, World, WorldError, WorldData,
};
pub use yaml::Yaml;
