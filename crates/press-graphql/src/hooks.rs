//! Extension points for schema composition.
//!
//! External code contributes to the schema by registering transforms on a
//! fixed set of hooks before the schema is assembled. Each hook carries one
//! value shape:
//!
//! | hook | value |
//! |------|-------|
//! | `schema-types` | [`TypeSet`] |
//! | `get_post_types` | [`TypeSet`] |
//! | `get_query_schema` | Query [`TypeDescriptor`] |
//! | `get_mutation_schema` | Mutation [`TypeDescriptor`] |
//!
//! Transforms run in ascending priority, then in registration order.
//! The [`SchemaAssembler`](crate::schema::SchemaAssembler) takes the registry
//! by value, so registrations are frozen once assembly starts.
//!
//! # Example
//!
//! ```ignore
//! let mut extensions = ExtensionRegistry::new();
//! extensions.register_types(TypesHook::SchemaTypes, |mut set| {
//!     set.push(my_type.clone());
//!     set
//! });
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::types::TypeDescriptor;

/// Priority given to registrations that do not ask for one.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Every hook the schema exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    SchemaTypes,
    PostTypes,
    QuerySchema,
    MutationSchema,
}

impl HookPoint {
    /// The hook's public name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SchemaTypes => "schema-types",
            Self::PostTypes => "get_post_types",
            Self::QuerySchema => "get_query_schema",
            Self::MutationSchema => "get_mutation_schema",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hooks that transform the schema's type list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypesHook {
    SchemaTypes,
    PostTypes,
}

impl From<TypesHook> for HookPoint {
    fn from(hook: TypesHook) -> Self {
        match hook {
            TypesHook::SchemaTypes => Self::SchemaTypes,
            TypesHook::PostTypes => Self::PostTypes,
        }
    }
}

/// Hooks that transform a root operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootHook {
    QuerySchema,
    MutationSchema,
}

impl From<RootHook> for HookPoint {
    fn from(hook: RootHook) -> Self {
        match hook {
            RootHook::QuerySchema => Self::QuerySchema,
            RootHook::MutationSchema => Self::MutationSchema,
        }
    }
}

/// The value threaded through the type-list hooks.
///
/// Besides the types themselves it carries the store's active-extension list,
/// so a transform can decide what to contribute from it.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    pub types: Vec<Arc<TypeDescriptor>>,
    pub active_extensions: BTreeSet<String>,
}

impl TypeSet {
    #[must_use]
    pub fn new(types: Vec<Arc<TypeDescriptor>>, active_extensions: BTreeSet<String>) -> Self {
        Self {
            types,
            active_extensions,
        }
    }

    /// Appends a type.
    pub fn push(&mut self, ty: Arc<TypeDescriptor>) {
        self.types.push(ty);
    }

    /// Returns `true` if the named extension is active.
    #[must_use]
    pub fn is_active(&self, extension: &str) -> bool {
        self.active_extensions.contains(extension)
    }

    /// Returns `true` if a type with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|ty| ty.name() == name)
    }

    /// Type names in list order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.types.iter().map(|ty| ty.name()).collect()
    }
}

type Transform<T> = Box<dyn Fn(T) -> T + Send + Sync>;

struct Registration<T> {
    priority: i32,
    transform: Transform<T>,
}

/// An ordered list of transforms over one value shape.
pub struct Hooks<T> {
    registrations: Vec<Registration<T>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

impl<T> Hooks<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transform. Registrations with equal priority keep their
    /// registration order.
    pub fn register<F>(&mut self, priority: i32, transform: F)
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        // Insert after every registration with priority <= ours.
        let index = self
            .registrations
            .partition_point(|r| r.priority <= priority);
        self.registrations.insert(
            index,
            Registration {
                priority,
                transform: Box::new(transform),
            },
        );
    }

    /// Folds every transform over `value`, each exactly once.
    pub fn apply(&self, value: T) -> T {
        self.registrations
            .iter()
            .fold(value, |acc, r| (r.transform)(acc))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// The registry of every extension point the schema exposes.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    schema_types: Hooks<TypeSet>,
    post_types: Hooks<TypeSet>,
    query_schema: Hooks<TypeDescriptor>,
    mutation_schema: Hooks<TypeDescriptor>,
}

impl ExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn types_hooks(&self, hook: TypesHook) -> &Hooks<TypeSet> {
        match hook {
            TypesHook::SchemaTypes => &self.schema_types,
            TypesHook::PostTypes => &self.post_types,
        }
    }

    fn types_hooks_mut(&mut self, hook: TypesHook) -> &mut Hooks<TypeSet> {
        match hook {
            TypesHook::SchemaTypes => &mut self.schema_types,
            TypesHook::PostTypes => &mut self.post_types,
        }
    }

    fn root_hooks(&self, hook: RootHook) -> &Hooks<TypeDescriptor> {
        match hook {
            RootHook::QuerySchema => &self.query_schema,
            RootHook::MutationSchema => &self.mutation_schema,
        }
    }

    fn root_hooks_mut(&mut self, hook: RootHook) -> &mut Hooks<TypeDescriptor> {
        match hook {
            RootHook::QuerySchema => &mut self.query_schema,
            RootHook::MutationSchema => &mut self.mutation_schema,
        }
    }

    /// Registers a type-list transform at [`DEFAULT_PRIORITY`].
    pub fn register_types<F>(&mut self, hook: TypesHook, transform: F) -> &mut Self
    where
        F: Fn(TypeSet) -> TypeSet + Send + Sync + 'static,
    {
        self.register_types_with_priority(hook, DEFAULT_PRIORITY, transform)
    }

    /// Registers a type-list transform at an explicit priority.
    pub fn register_types_with_priority<F>(
        &mut self,
        hook: TypesHook,
        priority: i32,
        transform: F,
    ) -> &mut Self
    where
        F: Fn(TypeSet) -> TypeSet + Send + Sync + 'static,
    {
        trace!(hook = %HookPoint::from(hook), priority, "Registered type-list transform");
        self.types_hooks_mut(hook).register(priority, transform);
        self
    }

    /// Registers a root-type transform at [`DEFAULT_PRIORITY`].
    pub fn register_root<F>(&mut self, hook: RootHook, transform: F) -> &mut Self
    where
        F: Fn(TypeDescriptor) -> TypeDescriptor + Send + Sync + 'static,
    {
        self.register_root_with_priority(hook, DEFAULT_PRIORITY, transform)
    }

    /// Registers a root-type transform at an explicit priority.
    pub fn register_root_with_priority<F>(
        &mut self,
        hook: RootHook,
        priority: i32,
        transform: F,
    ) -> &mut Self
    where
        F: Fn(TypeDescriptor) -> TypeDescriptor + Send + Sync + 'static,
    {
        trace!(hook = %HookPoint::from(hook), priority, "Registered root-type transform");
        self.root_hooks_mut(hook).register(priority, transform);
        self
    }

    /// Applies every transform registered on a type-list hook.
    #[must_use]
    pub fn apply_types(&self, hook: TypesHook, value: TypeSet) -> TypeSet {
        self.types_hooks(hook).apply(value)
    }

    /// Applies every transform registered on a root-type hook.
    #[must_use]
    pub fn apply_root(&self, hook: RootHook, value: TypeDescriptor) -> TypeDescriptor {
        self.root_hooks(hook).apply(value)
    }

    /// Number of transforms registered on a hook.
    #[must_use]
    pub fn registered(&self, hook: HookPoint) -> usize {
        match hook {
            HookPoint::SchemaTypes => self.schema_types.len(),
            HookPoint::PostTypes => self.post_types.len(),
            HookPoint::QuerySchema => self.query_schema.len(),
            HookPoint::MutationSchema => self.mutation_schema.len(),
        }
    }
}
