//! The content store trait.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::StoreResult;
use crate::types::{ContentEntry, EntryInput, QueryState, Term};

/// The contract every content backend implements.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// infrastructure failures and for writes the store refuses.
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use press_store::{ContentEntry, ContentStore, StoreResult};
///
/// async fn front_page(store: &dyn ContentStore) -> StoreResult<Option<ContentEntry>> {
///     store.fetch_entry_by_slug("home", "page").await
/// }
/// ```
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Reads a single entry by its local ID, whatever its post type.
    async fn fetch_entry(&self, id: u64) -> StoreResult<Option<ContentEntry>>;

    /// Reads a single entry by slug within one post type.
    async fn fetch_entry_by_slug(
        &self,
        slug: &str,
        post_type: &str,
    ) -> StoreResult<Option<ContentEntry>>;

    /// Reads a single term by its local ID, whatever its taxonomy.
    async fn fetch_term(&self, id: u64) -> StoreResult<Option<Term>>;

    /// Lists the terms assigned to an entry, optionally limited to one taxonomy.
    async fn fetch_entry_terms(
        &self,
        entry_id: u64,
        taxonomy: Option<&str>,
    ) -> StoreResult<Vec<Term>>;

    /// Returns the state of the main query for the current request.
    async fn query_state(&self) -> StoreResult<QueryState>;

    /// Creates an entry and returns its new local ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Rejected` when the input fails the store's own
    /// validation; the message is meant for end users.
    async fn create_entry(&self, input: &EntryInput) -> StoreResult<u64>;

    /// Lists the identifiers of the extensions (plugins) currently active.
    async fn list_active_extensions(&self) -> StoreResult<BTreeSet<String>>;
}
