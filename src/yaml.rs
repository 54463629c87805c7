//! # Player Settings
//!
//! The host's view of one player's YAML: option values, location
//! priorities, and the goal. The logic engine only reads `options`; the
//! world loader may write `goal` once it identifies the victory location
//! selected by the goal index.

use std::collections::{HashMap, HashSet};

/// One player's settings, as already ingested by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Yaml {
    /// Option values; booleans are coerced to 0/1.
    pub options: HashMap<String, i64>,
    /// Locations the player wants filled early.
    pub prioritized: HashSet<String>,
    /// Locations the player wants kept unimportant.
    pub deprioritized: HashSet<String>,
    /// Name of the victory location, once resolved.
    pub goal: String,
}

impl Yaml {
    pub fn new() -> Self {
        Yaml::default()
    }

    /// Value of an option; unset options read as 0.
    pub fn option(&self, name: &str) -> i64 {
        self.options.get(name).copied().unwrap_or(0)
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: i64) {
        self.options.insert(name.into(), value);
    }

    /// Booleans are stored as 0/1.
    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.options.insert(name.into(), i64::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_options_read_as_zero() {
        let yaml = Yaml::new();
        assert_eq!(yaml.option("hard_mode"), 0);
    }

    #[test]
    fn test_bool_coercion() {
        let mut yaml = Yaml::new();
        yaml.set_bool("hard_mode", true);
        assert_eq!(yaml.option("hard_mode"), 1);
        yaml.set_bool("hard_mode", false);
        assert_eq!(yaml.option("hard_mode"), 0);
    }
}
