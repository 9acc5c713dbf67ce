//! Lazy schema loading.
//!
//! `LazySchema` defers the schema build until first access so the server can
//! start without waiting for it. Once built, the schema never changes.

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::SchemaAssembler;
use crate::error::GraphQLError;

/// State of the lazy schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Schema has not been built yet.
    Uninitialized,
    /// Schema is currently being built.
    Building,
    /// Schema is ready for use.
    Ready,
    /// Schema build failed.
    Failed,
}

/// Thread-safe lazy schema holder.
///
/// A failed build is remembered: later calls report the same failure
/// instead of building again.
///
/// # Example
///
/// ```ignore
/// let lazy_schema = LazySchema::new(assembler);
///
/// // First access triggers build
/// let schema = lazy_schema.get_or_build().await?;
///
/// // Subsequent accesses use cached schema
/// let schema = lazy_schema.get_or_build().await?;
/// ```
pub struct LazySchema {
    schema: RwLock<Option<Arc<Schema>>>,

    /// Held for the duration of a build.
    build_lock: Mutex<()>,

    state: RwLock<SchemaState>,

    assembler: Arc<SchemaAssembler>,

    last_error: RwLock<Option<String>>,
}

impl LazySchema {
    #[must_use]
    pub fn new(assembler: SchemaAssembler) -> Self {
        Self {
            schema: RwLock::new(None),
            build_lock: Mutex::new(()),
            state: RwLock::new(SchemaState::Uninitialized),
            assembler: Arc::new(assembler),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the current state of the schema.
    ///
    /// A build whose caller was cancelled leaves `Building` behind with the
    /// build lock released; that reads as `Uninitialized`.
    pub async fn state(&self) -> SchemaState {
        let state = *self.state.read().await;
        if state == SchemaState::Building && self.build_lock.try_lock().is_ok() {
            return SchemaState::Uninitialized;
        }
        state
    }

    /// Gets the schema, building it if necessary.
    ///
    /// Callers arriving while another build is in progress get an error
    /// rather than blocking; use [`get_or_build_wait`](Self::get_or_build_wait)
    /// where waiting is acceptable.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaInitializing` if another caller holds the build lock.
    /// Returns `GraphQLError::SchemaBuildFailed` if the build fails or failed before.
    pub async fn get_or_build(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        // The lock, not `state`, decides whether a build is running: a
        // cancelled build drops its guard but cannot reset `state`.
        let Ok(_guard) = self.build_lock.try_lock() else {
            return Err(GraphQLError::SchemaInitializing);
        };

        self.build_locked().await
    }

    /// Gets the schema, waiting for an in-progress build instead of failing.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaBuildFailed` if the build fails or failed before.
    pub async fn get_or_build_wait(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        let _guard = self.build_lock.lock().await;
        self.build_locked().await
    }

    /// Builds under `build_lock`, unless another caller already finished.
    async fn build_locked(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        let state = *self.state.read().await;
        if state == SchemaState::Building {
            debug!("Restarting a schema build abandoned by a cancelled caller");
        }
        if state == SchemaState::Failed {
            if let Some(err) = self.last_error.read().await.as_ref() {
                return Err(GraphQLError::SchemaBuildFailed(err.clone()));
            }
        }

        *self.state.write().await = SchemaState::Building;
        info!("Building GraphQL schema...");

        match self.assembler.build().await {
            Ok(schema) => {
                let schema = Arc::new(schema);
                *self.schema.write().await = Some(Arc::clone(&schema));
                *self.state.write().await = SchemaState::Ready;
                info!("GraphQL schema built successfully");
                Ok(schema)
            }
            Err(e) => {
                let error_msg = e.to_string();
                warn!(error = %error_msg, "Failed to build GraphQL schema");
                *self.state.write().await = SchemaState::Failed;
                *self.last_error.write().await = Some(error_msg.clone());
                Err(GraphQLError::SchemaBuildFailed(error_msg))
            }
        }
    }

    /// Gets the schema if it's already built, without triggering a build.
    pub async fn get(&self) -> Option<Arc<Schema>> {
        self.schema.read().await.clone()
    }

    /// Returns the last build error, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == SchemaState::Ready
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use async_trait::async_trait;
    use press_db_memory::InMemoryStore;
    use press_store::{ContentEntry, ContentStore, EntryInput, QueryState, StoreResult, Term};

    use super::*;
    use crate::config::GraphQLConfig;
    use crate::hooks::{ExtensionRegistry, RootHook};
    use crate::types::FieldDefinition;
    use async_graphql::dynamic::TypeRef;

    /// Delegates to an in-memory store but takes a while to list extensions.
    struct SlowExtensionsStore(InMemoryStore);

    #[async_trait]
    impl ContentStore for SlowExtensionsStore {
        async fn fetch_entry(&self, id: u64) -> StoreResult<Option<ContentEntry>> {
            self.0.fetch_entry(id).await
        }

        async fn fetch_entry_by_slug(
            &self,
            slug: &str,
            post_type: &str,
        ) -> StoreResult<Option<ContentEntry>> {
            self.0.fetch_entry_by_slug(slug, post_type).await
        }

        async fn fetch_term(&self, id: u64) -> StoreResult<Option<Term>> {
            self.0.fetch_term(id).await
        }

        async fn fetch_entry_terms(
            &self,
            entry_id: u64,
            taxonomy: Option<&str>,
        ) -> StoreResult<Vec<Term>> {
            self.0.fetch_entry_terms(entry_id, taxonomy).await
        }

        async fn query_state(&self) -> StoreResult<QueryState> {
            self.0.query_state().await
        }

        async fn create_entry(&self, input: &EntryInput) -> StoreResult<u64> {
            self.0.create_entry(input).await
        }

        async fn list_active_extensions(&self) -> StoreResult<BTreeSet<String>> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.0.list_active_extensions().await
        }
    }

    fn lazy(extensions: ExtensionRegistry) -> LazySchema {
        LazySchema::new(SchemaAssembler::new(
            Arc::new(InMemoryStore::new()),
            extensions,
            GraphQLConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_builds_once_and_caches() {
        let lazy = lazy(ExtensionRegistry::new());
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);
        assert!(lazy.get().await.is_none());

        let first = lazy.get_or_build().await.unwrap();
        let second = lazy.get_or_build_wait().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(lazy.is_ready().await);
    }

    #[tokio::test]
    async fn test_cancelled_build_is_restarted_by_next_caller() {
        let lazy = LazySchema::new(SchemaAssembler::new(
            Arc::new(SlowExtensionsStore(InMemoryStore::new())),
            ExtensionRegistry::new(),
            GraphQLConfig::default(),
        ));

        // the caller goes away mid-build, as a disconnected client would
        let abandoned = tokio::time::timeout(Duration::from_millis(20), lazy.get_or_build()).await;
        assert!(abandoned.is_err());
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);

        let schema = lazy.get_or_build().await;
        assert!(schema.is_ok());
        assert!(lazy.is_ready().await);
    }

    #[tokio::test]
    async fn test_concurrent_caller_sees_initializing() {
        let lazy = Arc::new(LazySchema::new(SchemaAssembler::new(
            Arc::new(SlowExtensionsStore(InMemoryStore::new())),
            ExtensionRegistry::new(),
            GraphQLConfig::default(),
        )));

        let builder = {
            let lazy = Arc::clone(&lazy);
            tokio::spawn(async move { lazy.get_or_build().await.is_ok() })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(lazy.state().await, SchemaState::Building);
        assert!(matches!(
            lazy.get_or_build().await,
            Err(GraphQLError::SchemaInitializing)
        ));

        assert!(builder.await.unwrap());
        assert!(lazy.get_or_build().await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_build_is_remembered() {
        let mut extensions = ExtensionRegistry::new();
        // refers to a type nobody registers
        extensions.register_root(RootHook::QuerySchema, |query| {
            query.field(FieldDefinition::new("ghost", TypeRef::named("Ghost")))
        });
        let lazy = lazy(extensions);

        let err = lazy.get_or_build().await.unwrap_err();
        assert!(matches!(err, GraphQLError::SchemaBuildFailed(_)));
        assert_eq!(lazy.state().await, SchemaState::Failed);
        assert!(lazy.last_error().await.is_some());

        let again = lazy.get_or_build_wait().await.unwrap_err();
        assert_eq!(again.to_string(), err.to_string());
    }
}
