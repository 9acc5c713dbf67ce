//! Schema assembly and lazy loading.
//!
//! ## Components
//!
//! - [`SchemaAssembler`] - Composes the schema from built-in types and
//!   extension hooks
//! - [`LazySchema`] - Thread-safe holder that builds the schema on first use
//!
//! ## Lifecycle
//!
//! 1. Server starts immediately without waiting for schema
//! 2. First GraphQL request triggers the build
//! 3. Concurrent requests either wait or receive 503
//! 4. The built schema is shared read-only from then on

mod builder;
mod lazy;

pub use builder::{AssembledSchema, SchemaAssembler};
pub use lazy::{LazySchema, SchemaState};
