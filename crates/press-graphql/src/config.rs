//! GraphQL configuration.
//!
//! Configuration can be specified in `press.toml` under the `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! default_post_type = "post"
//! commerce_plugin = "woocommerce/woocommerce.php"
//! ```

use serde::{Deserialize, Serialize};

/// GraphQL schema configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// Post type used by `wp_post(slug: ...)` when no `post_type` is given.
    /// Default: "post"
    #[serde(default = "default_post_type")]
    pub default_post_type: String,

    /// Active-extension identifier that switches on the `Order` and
    /// `Product` types.
    /// Default: "woocommerce/woocommerce.php"
    #[serde(default = "default_commerce_plugin")]
    pub commerce_plugin: String,
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

fn default_post_type() -> String {
    press_store::DEFAULT_POST_TYPE.to_string()
}

fn default_commerce_plugin() -> String {
    "woocommerce/woocommerce.php".to_string()
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
            default_post_type: default_post_type(),
            commerce_plugin: default_commerce_plugin(),
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
        if self.default_post_type.trim().is_empty() {
            return Err("graphql.default_post_type must not be empty".into());
        }
        Ok(())
    }
}
