//! Configuration to acknowledge integrator preferences as well as set defaults.
//!
//! Specifically, we try to find a specnav.toml, and if present we load settings
//! from there. This provides the group activation depth and which responses
//! start expanded.

use facet::Facet;
use std::fs;

#[derive(Facet, Clone)]
/// Integrator preferences loaded from specnav.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 0)]
    /// Menu depth at or below which items are structural containers and
    /// refuse activation.
    pub group_depth: usize,
    #[facet(default = Vec::new())]
    /// Status codes whose responses start expanded; the single entry "all"
    /// expands every response.
    pub expand_responses: Vec<String>,
}

impl Config {
    #[must_use]
    /// Load configuration from specnav.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string("specnav.toml") {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
        }
        facet_toml::from_str::<Self>("").unwrap()
    }

    #[must_use]
    /// Whether a response with this status code starts expanded.
    pub fn response_expanded(&self, code: &str) -> bool {
        self.expand_responses
            .iter()
            .any(|c| c == "all" || c.eq_ignore_ascii_case(code))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
