//! # press-graphql
//!
//! GraphQL schema for a content-management system.
//!
//! The schema exposes content entries (posts, pages, attachments), taxonomy
//! terms (categories, tags, post formats) and, when the commerce plugin is
//! active, products and orders. Root fields:
//!
//! - `wp_query` - the main query state
//! - `wp_post(ID, slug, post_type)` - a single entry
//! - `term(id)` - a single term
//! - `node(id)` - any object by global ID
//! - `insert_post(postdata)` - creates an entry
//!
//! ## Extending the schema
//!
//! External code registers transforms on the [`ExtensionRegistry`] before
//! handing it to the [`SchemaAssembler`]. A contributed type that carries a
//! classifier becomes resolvable through `node` and interface fields without
//! further wiring.
//!
//! ## Configuration
//!
//! ```toml
//! [graphql]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! default_post_type = "post"
//! commerce_plugin = "woocommerce/woocommerce.php"
//! ```
//!
//! ## Modules
//!
//! - [`global_id`] - Global ID codec
//! - [`entity`] - Entity fetching and type classification
//! - [`hooks`] - Extension points
//! - [`types`] - Type descriptors, built-in types and the type cache
//! - [`schema`] - Schema assembly and lazy loading
//! - [`handler`] - Axum HTTP handlers

pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod global_id;
pub mod handler;
pub mod hooks;
pub mod resolvers;
pub mod schema;
pub mod types;

pub use config::GraphQLConfig;
pub use context::{ContextBuilderError, PressContext, PressContextBuilder};
pub use entity::{EntityResolver, TypeClassifier};
pub use error::GraphQLError;
pub use global_id::{DecodedId, GlobalId};
pub use handler::{GraphQLState, graphql_handler, graphql_handler_get};
pub use hooks::{DEFAULT_PRIORITY, ExtensionRegistry, HookPoint, RootHook, TypeSet, TypesHook};
pub use schema::{AssembledSchema, LazySchema, SchemaAssembler, SchemaState};
pub use types::{CoreType, FieldDefinition, TypeDescriptor, TypeRegistry};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
