//! Entity resolution for the `Node` interface.
//!
//! Fetching goes from a decoded global ID to a store entity; classification
//! goes from a store entity to the GraphQL object type that represents it.
//! Classification is a table lookup on `(EntityKind, tag)`; the table is built
//! from the classifiers carried by the final type list, so an extension that
//! contributes a type also contributes its classification.

use std::collections::HashMap;
use std::sync::Arc;

use press_store::{DynContentStore, Entity, EntityKind};
use tracing::debug;

use crate::error::GraphQLError;
use crate::global_id::GlobalId;
use crate::types::{TypeDescriptor, WP_POST, WP_TERM};

/// Global-ID type name for post-like entries.
pub const ENTRY_NODE_TYPE: &str = WP_POST;

/// Global-ID type name for taxonomy terms.
pub const TERM_NODE_TYPE: &str = WP_TERM;

/// The global-ID type name used for entities of a kind.
#[must_use]
pub fn node_type_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Entry => ENTRY_NODE_TYPE,
        EntityKind::Term => TERM_NODE_TYPE,
    }
}

/// The global ID of an entity.
///
/// # Errors
///
/// Only fails if the node type names above were made invalid.
pub fn global_id_of(entity: &Entity) -> Result<GlobalId, GraphQLError> {
    GlobalId::encode(
        node_type_name(entity.kind()),
        &entity.local_id().to_string(),
    )
}

fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Entry => "entry",
        EntityKind::Term => "term",
    }
}

/// `(kind, tag) -> GraphQL type name` table.
#[derive(Debug, Clone, Default)]
pub struct TypeClassifier {
    table: HashMap<(EntityKind, String), String>,
}

impl TypeClassifier {
    /// Builds the table from every classifier in `types`. When two types
    /// claim the same `(kind, tag)`, the later one wins.
    #[must_use]
    pub fn from_types<'a>(types: impl IntoIterator<Item = &'a Arc<TypeDescriptor>>) -> Self {
        let mut classifier = Self::default();
        for ty in types {
            if let Some(c) = ty.classifier() {
                classifier.register(c.kind, c.tag.clone(), ty.name());
            }
        }
        classifier
    }

    /// Maps `(kind, tag)` to a type name.
    pub fn register(&mut self, kind: EntityKind, tag: impl Into<String>, type_name: impl Into<String>) {
        self.table.insert((kind, tag.into()), type_name.into());
    }

    /// Looks up the type for `(kind, tag)`.
    #[must_use]
    pub fn lookup(&self, kind: EntityKind, tag: &str) -> Option<&str> {
        self.table
            .get(&(kind, tag.to_string()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Fetches entities by global ID and names their GraphQL types.
#[derive(Clone)]
pub struct EntityResolver {
    store: DynContentStore,
    classifier: Arc<TypeClassifier>,
}

impl EntityResolver {
    #[must_use]
    pub fn new(store: DynContentStore, classifier: TypeClassifier) -> Self {
        Self {
            store,
            classifier: Arc::new(classifier),
        }
    }

    /// Fetches the entity a decoded global ID points at.
    ///
    /// Unknown type names and non-numeric local IDs resolve to `None`, as
    /// does anything the store cannot find.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::Storage` for store infrastructure failures.
    pub async fn fetch_by_global_id(
        &self,
        type_name: &str,
        local_id: &str,
    ) -> Result<Option<Entity>, GraphQLError> {
        let Ok(id) = local_id.parse::<u64>() else {
            debug!(type_name, local_id, "Non-numeric local ID, resolving to null");
            return Ok(None);
        };

        let entity = match type_name {
            ENTRY_NODE_TYPE => self.store.fetch_entry(id).await?.map(Entity::Entry),
            TERM_NODE_TYPE => self.store.fetch_term(id).await?.map(Entity::Term),
            _ => {
                debug!(type_name, "Unknown node type, resolving to null");
                None
            }
        };
        Ok(entity)
    }

    /// Names the GraphQL object type that represents `entity`.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::UnresolvableType` if no type classifies the
    /// entity's kind and tag.
    pub fn resolve_type_name(&self, entity: &Entity) -> Result<&str, GraphQLError> {
        self.classifier
            .lookup(entity.kind(), entity.tag())
            .ok_or_else(|| GraphQLError::UnresolvableType {
                kind: kind_label(entity.kind()).to_string(),
                tag: entity.tag().to_string(),
            })
    }

    #[must_use]
    pub fn classifier(&self) -> &TypeClassifier {
        &self.classifier
    }
}
