//! Schema assembly.
//!
//! [`SchemaAssembler`] composes the executable schema from the built-in
//! types and whatever the extension hooks contribute:
//!
//! 1. Start from the base types (`WPPost`, `WPTerm`, `Post`, `Page`,
//!    `Attachment`, `Category`, `Tag`, `PostFormat`).
//! 2. Apply `schema-types`, then `get_post_types`. The commerce types are
//!    added by a `schema-types` transform when the commerce plugin is active.
//! 3. Deduplicate by name. A later descriptor replaces an earlier one of the
//!    same name but keeps its position.
//! 4. Apply `get_query_schema` and `get_mutation_schema` to the root types.
//! 5. Build the classifier table from the final types and finish the
//!    `async_graphql` schema.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use async_graphql::dynamic::Schema;
use indexmap::IndexMap;
use press_store::DynContentStore;
use tracing::{debug, info};

use crate::config::GraphQLConfig;
use crate::context::PressContext;
use crate::entity::TypeClassifier;
use crate::error::GraphQLError;
use crate::hooks::{ExtensionRegistry, RootHook, TypeSet, TypesHook};
use crate::types::{CoreType, TypeDescriptor, TypeRegistry};

/// Built-in types every schema starts from, in declaration order.
const BASE_TYPES: [CoreType; 8] = [
    CoreType::WPPost,
    CoreType::WPTerm,
    CoreType::Post,
    CoreType::Page,
    CoreType::Attachment,
    CoreType::Category,
    CoreType::Tag,
    CoreType::PostFormat,
];

/// Types the root fields refer to. Registered unless a hook already
/// supplied a type of the same name.
const SUPPORT_TYPES: [CoreType; 4] = [
    CoreType::Node,
    CoreType::WPQuery,
    CoreType::PostInput,
    CoreType::InsertPostOutput,
];

/// The schema as descriptors, after every hook has run.
#[derive(Debug, Clone)]
pub struct AssembledSchema {
    pub query: Arc<TypeDescriptor>,
    pub mutation: Arc<TypeDescriptor>,
    /// Base and contributed types, deduplicated by name.
    pub types: Vec<Arc<TypeDescriptor>>,
    /// Support types not already present in `types`.
    pub support: Vec<Arc<TypeDescriptor>>,
}

impl AssembledSchema {
    /// Names of `types`, in order.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|ty| ty.name()).collect()
    }

    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.types.iter().any(|ty| ty.name() == name)
    }

    /// Turns the descriptors into an executable schema.
    ///
    /// A mutation type without fields is left out of the schema.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaBuildFailed` if `async_graphql` rejects
    /// the schema, e.g. when a field refers to a type that was removed.
    pub fn finish(&self, store: DynContentStore, config: &GraphQLConfig) -> Result<Schema, GraphQLError> {
        let classifier = TypeClassifier::from_types(&self.types);
        debug!(classified = classifier.len(), "Built type classifier");

        let context = PressContext::builder()
            .with_store(store)
            .with_classifier(classifier)
            .with_default_post_type(config.default_post_type.clone())
            .build()
            .map_err(|e| GraphQLError::Internal(e.to_string()))?;

        let has_mutation = !self.mutation.field_names().is_empty();
        let mut schema_builder = Schema::build(
            self.query.name(),
            has_mutation.then(|| self.mutation.name()),
            None,
        );

        schema_builder = schema_builder.register(self.query.to_dynamic());
        if has_mutation {
            schema_builder = schema_builder.register(self.mutation.to_dynamic());
        }
        for ty in self.types.iter().chain(&self.support) {
            schema_builder = schema_builder.register(ty.to_dynamic());
        }

        // Configure limits
        let mut schema_builder = schema_builder
            .data(context)
            .limit_depth(config.max_depth)
            .limit_complexity(config.max_complexity);

        if !config.introspection {
            schema_builder = schema_builder.disable_introspection();
        }

        schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))
    }
}

/// Composes the schema from built-in types and extension hooks.
///
/// The assembler owns the [`ExtensionRegistry`], so no registration can be
/// added once it exists.
///
/// # Example
///
/// ```ignore
/// let mut extensions = ExtensionRegistry::new();
/// extensions.register_root(RootHook::QuerySchema, |query| query.without_field("term"));
///
/// let assembler = SchemaAssembler::new(store, extensions, GraphQLConfig::default());
/// let schema = assembler.build().await?;
/// ```
pub struct SchemaAssembler {
    store: DynContentStore,
    extensions: ExtensionRegistry,
    registry: Arc<TypeRegistry>,
    config: GraphQLConfig,
    /// Root types after `get_query_schema` / `get_mutation_schema`.
    query: OnceLock<Arc<TypeDescriptor>>,
    mutation: OnceLock<Arc<TypeDescriptor>>,
}

impl SchemaAssembler {
    /// Creates an assembler and registers the commerce `schema-types`
    /// transform at the default priority.
    #[must_use]
    pub fn new(store: DynContentStore, mut extensions: ExtensionRegistry, config: GraphQLConfig) -> Self {
        let registry = Arc::new(TypeRegistry::new());
        extensions.register_types(
            TypesHook::SchemaTypes,
            commerce_types(Arc::clone(&registry), config.commerce_plugin.clone()),
        );

        Self {
            store,
            extensions,
            registry,
            config,
            query: OnceLock::new(),
            mutation: OnceLock::new(),
        }
    }

    /// The type cache shared by every assembly.
    #[must_use]
    pub fn type_registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &GraphQLConfig {
        &self.config
    }

    /// The base type list, before any hook runs.
    #[must_use]
    pub fn base_types(&self) -> Vec<Arc<TypeDescriptor>> {
        BASE_TYPES.iter().map(|&ty| self.registry.core(ty)).collect()
    }

    /// Runs every hook and returns the resulting descriptors.
    #[must_use]
    pub fn assemble(&self, active_extensions: BTreeSet<String>) -> AssembledSchema {
        let set = TypeSet::new(self.base_types(), active_extensions);
        let set = self.extensions.apply_types(TypesHook::SchemaTypes, set);
        let set = self.extensions.apply_types(TypesHook::PostTypes, set);

        let mut by_name: IndexMap<String, Arc<TypeDescriptor>> = IndexMap::new();
        for ty in set.types {
            if let Some(previous) = by_name.insert(ty.name().to_string(), ty) {
                debug!(type_name = previous.name(), "Type replaced by a later definition");
            }
        }
        let types: Vec<_> = by_name.into_values().collect();

        let support = SUPPORT_TYPES
            .iter()
            .filter(|ty| !types.iter().any(|t| t.name() == ty.name()))
            .map(|&ty| self.registry.core(ty))
            .collect();

        AssembledSchema {
            query: self.query_type(),
            mutation: self.mutation_type(),
            types,
            support,
        }
    }

    /// The root query type, passed through `get_query_schema` once.
    #[must_use]
    pub fn query_type(&self) -> Arc<TypeDescriptor> {
        Arc::clone(
            self.query
                .get_or_init(|| self.root_type(RootHook::QuerySchema, CoreType::Query)),
        )
    }

    /// The root mutation type, passed through `get_mutation_schema` once.
    #[must_use]
    pub fn mutation_type(&self) -> Arc<TypeDescriptor> {
        Arc::clone(
            self.mutation
                .get_or_init(|| self.root_type(RootHook::MutationSchema, CoreType::Mutation)),
        )
    }

    fn root_type(&self, hook: RootHook, core: CoreType) -> Arc<TypeDescriptor> {
        let base = self.registry.core(core).as_ref().clone();
        Arc::new(self.extensions.apply_root(hook, base))
    }

    /// Builds the executable schema.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::Storage` if the active extensions cannot be
    /// listed and `GraphQLError::SchemaBuildFailed` if the assembled schema
    /// is invalid.
    pub async fn build(&self) -> Result<Schema, GraphQLError> {
        debug!("Starting GraphQL schema build");

        let active = self.store.list_active_extensions().await?;
        debug!(active = ?active, "Active extensions");

        let assembled = self.assemble(active);
        let schema = assembled.finish(self.store.clone(), &self.config)?;

        info!(
            types = assembled.types.len(),
            query_fields = assembled.query.field_names().len(),
            mutation_fields = assembled.mutation.field_names().len(),
            "GraphQL schema build complete"
        );
        Ok(schema)
    }
}

/// `schema-types` transform adding `Product` and `Order` when `plugin` is an
/// active extension.
fn commerce_types(
    registry: Arc<TypeRegistry>,
    plugin: String,
) -> impl Fn(TypeSet) -> TypeSet + Send + Sync + 'static {
    move |mut set| {
        if set.is_active(&plugin) {
            debug!(plugin = %plugin, "Commerce plugin active, adding commerce types");
            set.push(registry.core(CoreType::Product));
            set.push(registry.core(CoreType::Order));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use press_db_memory::InMemoryStore;

    use super::*;
    use crate::types::{FieldDefinition, TypeKind};
    use async_graphql::dynamic::TypeRef;

    fn assembler(extensions: ExtensionRegistry) -> SchemaAssembler {
        SchemaAssembler::new(
            Arc::new(InMemoryStore::new()),
            extensions,
            GraphQLConfig::default(),
        )
    }

    fn active(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_types_in_order() {
        let assembled = assembler(ExtensionRegistry::new()).assemble(BTreeSet::new());
        assert_eq!(
            assembled.type_names(),
            vec!["WPPost", "WPTerm", "Post", "Page", "Attachment", "Category", "Tag", "PostFormat"]
        );
    }

    #[test]
    fn test_commerce_types_follow_active_plugin() {
        let assembler = assembler(ExtensionRegistry::new());

        let inactive = assembler.assemble(BTreeSet::new());
        assert!(!inactive.has_type("Order"));
        assert!(!inactive.has_type("Product"));

        let on = assembler.assemble(active(&["woocommerce/woocommerce.php"]));
        assert!(on.has_type("Order"));
        assert!(on.has_type("Product"));
    }

    #[test]
    fn test_base_types_are_singletons() {
        let assembler = assembler(ExtensionRegistry::new());
        let a = assembler.assemble(BTreeSet::new());
        let b = assembler.assemble(BTreeSet::new());
        for (x, y) in a.types.iter().zip(&b.types) {
            assert!(Arc::ptr_eq(x, y));
        }
    }

    #[test]
    fn test_post_types_sees_schema_types_result() {
        let mut extensions = ExtensionRegistry::new();
        extensions
            .register_types(TypesHook::PostTypes, |mut set| {
                // drop whatever schema-types added last
                set.types.pop();
                set
            })
            .register_types(TypesHook::SchemaTypes, |mut set| {
                set.push(Arc::new(TypeDescriptor::object("Event").field(
                    FieldDefinition::new("title", TypeRef::named(TypeRef::STRING)),
                )));
                set
            });

        let assembled = assembler(extensions).assemble(BTreeSet::new());
        assert!(!assembled.has_type("Event"));
        assert_eq!(assembled.types.len(), 8);
    }

    #[test]
    fn test_duplicate_names_last_wins_first_position() {
        let mut extensions = ExtensionRegistry::new();
        extensions.register_types(TypesHook::SchemaTypes, |mut set| {
            set.push(Arc::new(
                TypeDescriptor::object("Page").description("replacement"),
            ));
            set
        });

        let assembled = assembler(extensions).assemble(BTreeSet::new());
        assert_eq!(assembled.types.len(), 8);
        assert_eq!(assembled.type_names()[3], "Page");
        assert!(assembled.types[3].get_field("post_title").is_none());
    }

    #[test]
    fn test_support_types_not_duplicated() {
        let mut extensions = ExtensionRegistry::new();
        extensions.register_types(TypesHook::SchemaTypes, |mut set| {
            set.push(Arc::new(TypeDescriptor::interface("Node")));
            set
        });

        let assembled = assembler(extensions).assemble(BTreeSet::new());
        assert!(assembled.has_type("Node"));
        assert!(assembled.support.iter().all(|ty| ty.name() != "Node"));
        assert_eq!(assembled.support.len(), 3);
    }

    #[test]
    fn test_root_hooks_applied() {
        let mut extensions = ExtensionRegistry::new();
        extensions
            .register_root(RootHook::QuerySchema, |query| query.without_field("term"))
            .register_root(RootHook::MutationSchema, |mutation| {
                mutation.without_field("insert_post")
            });

        let assembled = assembler(extensions).assemble(BTreeSet::new());
        assert_eq!(assembled.query.field_names(), vec!["wp_query", "wp_post", "node"]);
        assert!(assembled.mutation.field_names().is_empty());
        assert_eq!(assembled.query.kind(), TypeKind::Object);
    }

    #[test]
    fn test_root_types_are_singletons() {
        let mut extensions = ExtensionRegistry::new();
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        extensions.register_root(RootHook::QuerySchema, move |query| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            query
        });
        let assembler = assembler(extensions);

        let a = assembler.assemble(BTreeSet::new());
        let b = assembler.assemble(active(&["woocommerce/woocommerce.php"]));
        assert!(Arc::ptr_eq(&a.query, &b.query));
        assert!(Arc::ptr_eq(&a.mutation, &b.mutation));
        assert!(Arc::ptr_eq(&a.query, &assembler.query_type()));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_finish_without_mutation_fields() {
        let mut extensions = ExtensionRegistry::new();
        extensions.register_root(RootHook::MutationSchema, |m| m.without_field("insert_post"));

        let assembled = assembler(extensions).assemble(BTreeSet::new());
        let schema = assembled
            .finish(Arc::new(InMemoryStore::new()), &GraphQLConfig::default())
            .unwrap();
        assert!(!schema.sdl().contains("type Mutation"));
    }

    #[tokio::test]
    async fn test_build_reads_active_extensions() {
        let store = InMemoryStore::new().with_active_extension("woocommerce/woocommerce.php");
        let assembler = SchemaAssembler::new(
            Arc::new(store),
            ExtensionRegistry::new(),
            GraphQLConfig::default(),
        );

        let schema = assembler.build().await.unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("type Order implements"));
        assert!(sdl.contains("type Product implements"));
    }
}
