//! Named type cache.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use super::{CoreType, TypeDescriptor};

/// Builds each named type at most once.
///
/// Repeated lookups of the same name return the same `Arc`, so identity
/// comparisons with [`Arc::ptr_eq`] hold across the process.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    cache: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached type named `name`, building it with `build` if this
    /// is the first lookup.
    pub fn get_or_build<F>(&self, name: &str, build: F) -> Arc<TypeDescriptor>
    where
        F: FnOnce() -> TypeDescriptor,
    {
        if let Some(ty) = self.cache.get(name) {
            return Arc::clone(ty.value());
        }

        let ty = self.cache.entry(name.to_string()).or_insert_with(|| {
            trace!(type_name = name, "Building type");
            Arc::new(build())
        });
        Arc::clone(ty.value())
    }

    /// Returns a built-in type.
    pub fn core(&self, ty: CoreType) -> Arc<TypeDescriptor> {
        self.get_or_build(ty.name(), || ty.build())
    }

    /// Returns a type only if it has already been built.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.cache.get(name).map(|ty| Arc::clone(ty.value()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
