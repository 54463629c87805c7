//! # Logic Evaluator
//!
//! Reduces a logic DAG against live game state: the items currently held
//! and the player's YAML options. The result of [`Evaluator::inspect`] is
//! either satisfied (`None`) or a residual node describing exactly which
//! requirements still block the location — the residual is what the UI
//! shows on hover.
//!
//! Two evaluation-time rules do not exist in the algebra:
//!
//! - A branch whose residual is a YAML-gating function call annuls an AND
//!   and disappears from an OR: settings cannot change mid-session, so
//!   such a branch is "not applicable" rather than "missing".
//! - Inside `OptAll` / `OptOne` the `is_opt` flag treats items and
//!   categories disabled by YAML as already satisfied.
//!
//! Evaluation is pure and synchronous. State is per query; clone the
//! held-item list per thread if queries must run concurrently.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use crate::diagnostics::Diagnostics;
use crate::logic::{number, simplify, Logic, LogicKind};
use crate::parser;
use crate::token::tokenize;
use crate::world::World;
use crate::yaml::Yaml;

/// Comparison operators accepted by `YamlCompare`, tried in this order.
const COMPARE_OPERATORS: [&str; 7] = ["==", "!=", ">=", "<=", "=", "<", ">"];

/// Whether a category is allowed by the player's YAML options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGate {
    /// At least one gating option is set and truthy.
    Enabled,
    /// The category declares no gating options at all.
    ImplicitlyEnabled,
    /// Gating options exist and every one of them is falsy.
    Disabled,
}

/// Per-query evaluation state over a read-only [`World`].
pub struct Evaluator<'a> {
    world: &'a World<'a>,
    yaml: &'a Yaml,
    /// Multiset of held item names.
    held: HashMap<&'a str, u64>,
    /// Opt semantics are scoped to `OptAll` / `OptOne` subtrees.
    is_opt: bool,
    /// Locations currently being expanded through `canReachLocation`.
    no_expand: HashSet<&'a str>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        world: &'a World<'a>,
        yaml: &'a Yaml,
        held_items: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut held: HashMap<&'a str, u64> = HashMap::new();
        for item in held_items {
            *held.entry(item).or_insert(0) += 1;
        }
        Evaluator {
            world,
            yaml,
            held,
            is_opt: false,
            no_expand: HashSet::new(),
        }
    }

    /// Is the named location reachable right now? Locations with no
    /// compiled logic are always reachable.
    pub fn inspect_location(&mut self, location: &str) -> Option<Arc<Logic<'a>>> {
        let world = self.world;
        match world.locations_to_logic.get(location) {
            Some(logic) => {
                let logic = logic.clone();
                self.inspect(&logic)
            }
            None => None,
        }
    }

    /// Reduce a node to satisfied (`None`) or a why-not residual.
    pub fn inspect(&mut self, logic: &Arc<Logic<'a>>) -> Option<Arc<Logic<'a>>> {
        match logic.kind() {
            LogicKind::Grouping(inner) => self.inspect(inner),
            LogicKind::And(left, right) => {
                let left = self.inspect(left);
                let right = self.inspect(right);
                // A YAML-disabled branch annuls the whole conjunction.
                if left.as_deref().is_some_and(Logic::is_yaml_function)
                    || right.as_deref().is_some_and(Logic::is_yaml_function)
                {
                    return None;
                }
                simplify::and(left, right)
            }
            LogicKind::Or(left, right) => {
                let Some(left) = self.inspect(left) else {
                    return None;
                };
                let Some(right) = self.inspect(right) else {
                    return None;
                };
                // A YAML-disabled alternative simply disappears.
                match (left.is_yaml_function(), right.is_yaml_function()) {
                    (true, true) => None,
                    (true, false) => Some(right),
                    (false, true) => Some(left),
                    (false, false) => simplify::or(Some(left), Some(right)),
                }
            }
            LogicKind::Item(name) => {
                let satisfied =
                    (self.is_opt && self.item_disabled(name)) || self.held_count(name) > 0;
                residual(logic, satisfied)
            }
            LogicKind::Category(category) => {
                let satisfied = (self.is_opt
                    && self.category_gate(category) == CategoryGate::Disabled)
                    || self.held_in_category(category) > 0;
                residual(logic, satisfied)
            }
            LogicKind::ItemCount(name, count) => {
                let needed = number(count);
                let satisfied = needed == 0
                    || (self.is_opt && self.item_disabled(name))
                    || self.held_count(name) >= needed;
                residual(logic, satisfied)
            }
            LogicKind::CategoryCount(category, count) => {
                let needed = number(count).min(self.opt_cap(category));
                residual(logic, self.held_in_category(category) >= needed)
            }
            LogicKind::ItemPercent(name, percent) => {
                let supply = self.world.item_count.get(name).copied().unwrap_or(0);
                let satisfied = (self.is_opt && self.item_disabled(name))
                    || percent_reached(number(percent), supply, self.held_count(name));
                residual(logic, satisfied)
            }
            LogicKind::CategoryPercent(category, percent) => {
                let supply = self.category_supply(category).min(self.opt_cap(category));
                let satisfied =
                    percent_reached(number(percent), supply, self.held_in_category(category));
                residual(logic, satisfied)
            }
            LogicKind::Function(name, args) => self.call(logic, name.trim(), *args),
        }
    }

    /// Dispatch a built-in call. Unknown names evaluate to satisfied for
    /// forward compatibility with newer worlds.
    fn call(
        &mut self,
        node: &Arc<Logic<'a>>,
        name: &str,
        args: &'a str,
    ) -> Option<Arc<Logic<'a>>> {
        match name {
            "canReachLocation" => self.can_reach_location(args.trim()),
            "ItemValue" => self.item_value(node, args),
            "OptAll" | "OptOne" => self.opt(args),
            "YamlEnabled" => residual(node, self.yaml.option(args.trim()) != 0),
            "YamlDisabled" => residual(node, self.yaml.option(args.trim()) == 0),
            "YamlCompare" => self.yaml_compare(node, args),
            _ => {
                trace!(function = name, "unknown function treated as satisfied");
                None
            }
        }
    }

    /// Expand another location's logic under the current state. A
    /// location already being expanded is satisfied, which breaks
    /// `canReachLocation` cycles.
    fn can_reach_location(&mut self, location: &str) -> Option<Arc<Logic<'a>>> {
        let world = self.world;
        let Some((&name, logic)) = world.locations_to_logic.get_key_value(location) else {
            return None;
        };
        if self.no_expand.contains(name) {
            return None;
        }
        self.no_expand.insert(name);
        let logic = logic.clone();
        let result = self.inspect(&logic);
        self.no_expand.remove(name);
        result
    }

    /// `ItemValue(phantom:count)`: phantom credits summed over every held
    /// copy of every item reach the requested count.
    fn item_value(&self, node: &Arc<Logic<'a>>, args: &str) -> Option<Arc<Logic<'a>>> {
        let Some((phantom, count)) = args.split_once(':') else {
            // Malformed argument; treated like an unknown function.
            return None;
        };
        let phantom = phantom.trim();
        let needed = number(count.trim());

        let mut total: u64 = 0;
        for (item, held) in &self.held {
            if let Some(phantoms) = self.world.item_to_phantoms.get(item) {
                for (candidate, per_copy) in phantoms {
                    if *candidate == phantom {
                        total = total.saturating_add(per_copy.saturating_mul(*held));
                    }
                }
            }
        }
        residual(node, total >= needed)
    }

    /// `OptAll` / `OptOne`: re-parse the argument slice and evaluate it
    /// with opt semantics on. A single surrounding grouping is unwrapped.
    fn opt(&mut self, args: &'a str) -> Option<Arc<Logic<'a>>> {
        let diagnostics = Diagnostics::disabled();
        let Some(inner) = parser::parse(&tokenize(args), &diagnostics) else {
            return None;
        };
        let inner = match inner.kind() {
            LogicKind::Grouping(child) => child.clone(),
            _ => inner,
        };

        let saved = self.is_opt;
        self.is_opt = true;
        let result = self.inspect(&inner);
        self.is_opt = saved;
        result
    }

    /// `YamlCompare(option <op> value)`, with an optional `!` prefix on
    /// the option name inverting the outcome.
    fn yaml_compare(&self, node: &Arc<Logic<'a>>, expression: &str) -> Option<Arc<Logic<'a>>> {
        for op in COMPARE_OPERATORS {
            let Some((lhs, rhs)) = expression.split_once(op) else {
                continue;
            };
            let mut lhs = lhs.trim();
            let inverted = lhs.starts_with('!');
            if inverted {
                lhs = lhs[1..].trim_start();
            }
            let value = self.yaml.option(lhs);
            let rhs: i64 = rhs.trim().parse().unwrap_or(0);
            let outcome = match op {
                "==" | "=" => value == rhs,
                "!=" => value != rhs,
                ">=" => value >= rhs,
                "<=" => value <= rhs,
                "<" => value < rhs,
                ">" => value > rhs,
                _ => false,
            };
            return residual(node, outcome != inverted);
        }
        // No operator found; treated like an unknown function.
        None
    }

    fn held_count(&self, name: &str) -> u64 {
        self.held.get(name).copied().unwrap_or(0)
    }

    fn held_in_category(&self, category: &str) -> u64 {
        let Some(items) = self.world.category_to_items.get(category) else {
            return 0;
        };
        items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(self.held_count(item)))
    }

    /// Total pool supply across a category.
    fn category_supply(&self, category: &str) -> u64 {
        let Some(items) = self.world.category_to_items.get(category) else {
            return 0;
        };
        items.iter().fold(0u64, |acc, item| {
            acc.saturating_add(self.world.item_count.get(item).copied().unwrap_or(0))
        })
    }

    /// Under opt semantics, category requirements are capped at the supply
    /// that is still obtainable once disabled items are excluded.
    fn opt_cap(&self, category: &str) -> u64 {
        if !self.is_opt {
            return u64::MAX;
        }
        let Some(items) = self.world.category_to_items.get(category) else {
            return 0;
        };
        items
            .iter()
            .filter(|item| !self.item_disabled(item))
            .fold(0u64, |acc, item| {
                acc.saturating_add(self.world.item_count.get(item).copied().unwrap_or(0))
            })
    }

    /// An item is disabled only when it has categories and every one of
    /// them is gated off.
    pub fn item_disabled(&self, name: &str) -> bool {
        let Some(categories) = self.world.item_to_categories.get(name) else {
            return false;
        };
        !categories.is_empty()
            && categories
                .iter()
                .all(|category| self.category_gate(category) == CategoryGate::Disabled)
    }

    /// Three-valued gate: explicitly enabled by a truthy option,
    /// implicitly enabled by declaring no options, or disabled.
    pub fn category_gate(&self, category: &str) -> CategoryGate {
        let Some(options) = self.world.category_to_yaml_options.get(category) else {
            return CategoryGate::ImplicitlyEnabled;
        };
        if options.is_empty() {
            CategoryGate::ImplicitlyEnabled
        } else if options.iter().any(|option| self.yaml.option(option) != 0) {
            CategoryGate::Enabled
        } else {
            CategoryGate::Disabled
        }
    }
}

fn residual<'a>(node: &Arc<Logic<'a>>, satisfied: bool) -> Option<Arc<Logic<'a>>> {
    if satisfied {
        None
    } else {
        Some(node.clone())
    }
}

/// `percent/100 ≤ held/supply`, ordered as `percent * supply ≤ 100 * held`
/// so values near 0 and 100 do not pick up rounding surprises.
fn percent_reached(percent: u64, supply: u64, held: u64) -> bool {
    (percent as f64) * (supply as f64) <= 100.0 * (held as f64)
}
