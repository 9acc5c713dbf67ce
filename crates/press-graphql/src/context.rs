//! Schema execution context.
//!
//! [`PressContext`] holds everything resolvers need: the content store, the
//! entity resolver, and the lookup defaults. It is built once when the
//! schema is finished and registered as schema data, so every request shares
//! the same read-only instance.
//!
//! # Example
//!
//! ```ignore
//! use press_graphql::PressContextBuilder;
//!
//! let context = PressContextBuilder::new()
//!     .with_store(store.clone())
//!     .with_classifier(classifier)
//!     .with_default_post_type("post")
//!     .build()?;
//! ```

use press_store::{DEFAULT_POST_TYPE, DynContentStore};

use crate::entity::{EntityResolver, TypeClassifier};

/// Shared context for every resolver.
#[derive(Clone)]
pub struct PressContext {
    /// Content store.
    pub store: DynContentStore,

    /// Global-ID fetcher and type classifier.
    pub entities: EntityResolver,

    /// Post type used by slug lookups that do not name one.
    pub default_post_type: String,
}

impl PressContext {
    /// Creates a new builder for PressContext.
    #[must_use]
    pub fn builder() -> PressContextBuilder {
        PressContextBuilder::default()
    }
}

/// Builder for constructing PressContext.
#[derive(Default)]
pub struct PressContextBuilder {
    store: Option<DynContentStore>,
    classifier: Option<TypeClassifier>,
    default_post_type: Option<String>,
}

impl PressContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content store.
    #[must_use]
    pub fn with_store(mut self, store: DynContentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the classifier table built from the final type list.
    #[must_use]
    pub fn with_classifier(mut self, classifier: TypeClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Sets the default post type for slug lookups.
    #[must_use]
    pub fn with_default_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.default_post_type = Some(post_type.into());
        self
    }

    /// Builds the PressContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<PressContext, ContextBuilderError> {
        let store = self
            .store
            .ok_or(ContextBuilderError::MissingField("store"))?;

        let classifier = self
            .classifier
            .ok_or(ContextBuilderError::MissingField("classifier"))?;

        Ok(PressContext {
            entities: EntityResolver::new(store.clone(), classifier),
            store,
            default_post_type: self
                .default_post_type
                .unwrap_or_else(|| DEFAULT_POST_TYPE.to_string()),
        })
    }
}

/// Errors that can occur when building a PressContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
