//! Planner configuration

use crate::error::ConfigError;
use rap_model::MemberRole;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Planner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Quiet period before a text cell commits, in milliseconds
    pub debounce_ms: u64,
    /// Minimum typed characters before the typeahead queries
    pub typeahead_min_chars: usize,
    /// Maximum typeahead suggestions shown
    pub typeahead_limit: usize,
    /// Role recorded when membership is created from the grid
    pub default_role: MemberRole,
    /// Department preselected when no explicit filter is set
    pub home_department: Option<String>,
    /// Maximum queued notices before the oldest is dropped
    pub max_notices: usize,
    /// Change feed buffer size per subscriber
    pub feed_capacity: usize,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With debounce delay in milliseconds
    #[inline]
    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// With home department
    #[inline]
    #[must_use]
    pub fn with_home_department(mut self, department: impl Into<String>) -> Self {
        self.home_department = Some(department.into());
        self
    }

    /// With typeahead suggestion cap
    #[inline]
    #[must_use]
    pub fn with_typeahead_limit(mut self, limit: usize) -> Self {
        self.typeahead_limit = limit;
        self
    }

    /// Debounce delay as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse from a TOML string
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the TOML is malformed or a field holds
    /// an unusable value
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file is unreadable or its contents
    /// fail to parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.typeahead_limit == 0 {
            return Err(ConfigError::invalid(
                "typeahead_limit",
                "must be at least 1",
            ));
        }
        if self.max_notices == 0 {
            return Err(ConfigError::invalid("max_notices", "must be at least 1"));
        }
        if self.feed_capacity == 0 {
            return Err(ConfigError::invalid("feed_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 5000,
            typeahead_min_chars: 2,
            typeahead_limit: 5,
            default_role: MemberRole::Member,
            home_department: None,
            max_notices: 32,
            feed_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PlannerConfig::new();
        assert_eq!(config.debounce_ms, 5000);
        assert_eq!(config.typeahead_min_chars, 2);
        assert_eq!(config.typeahead_limit, 5);
        assert_eq!(config.default_role, MemberRole::Member);
        assert!(config.home_department.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
            debounce_ms = 250
            home_department = "Design"
            "#,
        )
        .unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.home_department.as_deref(), Some("Design"));
        assert_eq!(config.typeahead_limit, 5);
    }

    #[test]
    fn zero_typeahead_limit_rejected() {
        let result = PlannerConfig::from_toml_str("typeahead_limit = 0");
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "typeahead_limit"));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(
            PlannerConfig::from_toml_str("debounce_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
