//! Region-graph lowering.
//!
//! Regions form a directed graph; "can the player reach region T" is
//! compiled into plain logic so the evaluator never walks the graph. For
//! every starting region the walk collects, per edge, the conjunction of
//! the source region's own requirements, the exit requirements for the
//! connection, and the target's entrance requirements for the connection;
//! alternative paths and alternative starting regions OR together. Cycles
//! are broken with a visited set cloned per branch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::logic::{simplify, Logic};
use crate::parser::parse_requires;

use super::WorldData;

pub(crate) struct RegionCompiler<'d, 'a> {
    data: &'a WorldData,
    diagnostics: &'d Diagnostics,
    /// requires-string → parsed logic, keyed by the slice itself so every
    /// distinct string is parsed at most once.
    parsed: HashMap<&'a str, Option<Arc<Logic<'a>>>>,
    /// target region → compiled reach logic.
    reach_cache: HashMap<&'a str, Option<Arc<Logic<'a>>>>,
}

impl<'d, 'a> RegionCompiler<'d, 'a> {
    pub(crate) fn new(data: &'a WorldData, diagnostics: &'d Diagnostics) -> Self {
        RegionCompiler {
            data,
            diagnostics,
            parsed: HashMap::new(),
            reach_cache: HashMap::new(),
        }
    }

    /// Reach logic for `target`; absent means unconstrained.
    pub(crate) fn reach(&mut self, target: &'a str) -> Option<Arc<Logic<'a>>> {
        if let Some(cached) = self.reach_cache.get(target) {
            return cached.clone();
        }
        let compiled = self.compile(target);
        match &compiled {
            Some(node) => debug!(region = target, logic = %node, "compiled region reach"),
            None => debug!(region = target, "region reach unconstrained"),
        }
        self.reach_cache.insert(target, compiled.clone());
        compiled
    }

    fn compile(&mut self, target: &'a str) -> Option<Arc<Logic<'a>>> {
        let data = self.data;
        if !data.regions.contains_key(target) {
            return None;
        }
        let starting: Vec<&'a str> = data
            .regions
            .iter()
            .filter(|(_, region)| region.starting)
            .map(|(name, _)| name.as_str())
            .collect();

        let mut result = None;
        for &start in &starting {
            if start == target {
                continue;
            }
            // Starting regions other than this walk's own are other
            // players' spawn points and may not be passed through. The
            // target itself is never pre-visited.
            let visited: HashSet<&'a str> = starting
                .iter()
                .copied()
                .filter(|&name| name != target)
                .collect();
            result = simplify::or(result, self.descend(start, target, &visited));
        }
        result
    }

    /// DFS from `current` toward `target`, OR-folding one conjunction per
    /// successful path. Absent means no path with requirements was found.
    fn descend(
        &mut self,
        current: &'a str,
        target: &'a str,
        visited: &HashSet<&'a str>,
    ) -> Option<Arc<Logic<'a>>> {
        let data = self.data;
        let Some(region) = data.regions.get(current) else {
            return None;
        };
        let Some(target_region) = data.regions.get(target) else {
            return None;
        };

        let mut any = None;
        for connection in &region.connects_to {
            let connection = connection.as_str();
            if visited.contains(connection) {
                continue;
            }

            let mut step = self.parse_cached(&region.requires);
            if let Some(exit) = region.exit_requires.get(connection) {
                step = simplify::and(step, self.parse_cached(exit));
            }
            // The target's entrance requirements are looked up by the
            // connection name. For typical worlds that key is the
            // neighbour region's name rather than the target's own;
            // preserved as-is for compatibility with existing worlds.
            if let Some(entrance) = target_region.entrance_requires.get(connection) {
                step = simplify::and(step, self.parse_cached(entrance));
            }

            if connection == target {
                let arrival = simplify::and(step, self.parse_cached(&target_region.requires));
                any = simplify::or(any, arrival);
            } else {
                let mut branch = visited.clone();
                branch.insert(connection);
                if let Some(rest) = self.descend(connection, target, &branch) {
                    any = simplify::or(any, simplify::and(step, Some(rest)));
                }
            }
        }
        any
    }

    fn parse_cached(&mut self, source: &'a str) -> Option<Arc<Logic<'a>>> {
        if source.trim().is_empty() {
            return None;
        }
        if let Some(cached) = self.parsed.get(source) {
            return cached.clone();
        }
        let parsed = parse_requires(source, self.diagnostics);
        self.parsed.insert(source, parsed.clone());
        parsed
    }
}
