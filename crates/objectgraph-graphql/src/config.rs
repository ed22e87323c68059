//! GraphQL configuration.
//!
//! Configuration is typically embedded in the host application's TOML
//! config under a `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! enabled = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

use crate::schema::SchemaBuilderConfig;

/// GraphQL API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Enable the GraphQL surface.
    /// Default: false (opt-in feature)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum query depth allowed.
    /// Deeply nested relationship queries beyond this are rejected.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Should be disabled in production.
    /// Default: true (development-friendly)
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_enabled() -> bool {
    false
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        Ok(())
    }

    /// Converts this config to a [`SchemaBuilderConfig`].
    #[must_use]
    pub fn to_schema_builder_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig {
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphQLConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection);
    }

    #[test]
    fn test_valid_config() {
        let config = GraphQLConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_max_depth() {
        let config = GraphQLConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            enabled = true
            max_depth = 20
            max_complexity = 1000
            introspection = false
        "#;

        let config: GraphQLConfig = toml::from_str(toml).unwrap();
        assert!(config.enabled);
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.max_complexity, 1000);
        assert!(!config.introspection);

        let builder_config = config.to_schema_builder_config();
        assert_eq!(builder_config.max_depth, 20);
        assert!(!builder_config.introspection_enabled);
    }
}
