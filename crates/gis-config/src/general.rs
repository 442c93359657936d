//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Actor recorded in audit rows when a command does not name one.
    #[serde(default)]
    pub default_actor: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            default_actor: String::new(),
        }
    }
}

impl GeneralConfig {
    /// The configured actor, or `cli` when unset.
    #[must_use]
    pub fn actor(&self) -> &str {
        if self.default_actor.trim().is_empty() {
            "cli"
        } else {
            self.default_actor.trim()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.actor(), "cli");
    }
}
