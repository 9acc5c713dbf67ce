//! # press-store
//!
//! Content store abstraction for the press GraphQL schema.
//!
//! This crate defines the entity model and the [`ContentStore`] trait that the
//! GraphQL layer reads from and writes to. It does not contain any
//! implementation; backends live in separate crates (see `press-db-memory`).
//!
//! ## Overview
//!
//! The store exposes single-entity lookups, the CMS main-query state, entry
//! creation, and the list of active extensions:
//!
//! ```ignore
//! use press_store::{ContentStore, StoreError};
//!
//! async fn title_of(store: &dyn ContentStore, id: u64) -> Result<Option<String>, StoreError> {
//!     Ok(store.fetch_entry(id).await?.map(|entry| entry.title))
//! }
//! ```
//!
//! Lookups that find nothing return `Ok(None)`; errors are reserved for
//! infrastructure failures and rejected writes.

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StoreError};
pub use traits::ContentStore;
pub use types::{
    ContentEntry, DEFAULT_POST_STATUS, DEFAULT_POST_TYPE, Entity, EntityKind, EntryInput,
    QueryState, Term,
};

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for a shared store trait object.
pub type DynContentStore = std::sync::Arc<dyn ContentStore>;
