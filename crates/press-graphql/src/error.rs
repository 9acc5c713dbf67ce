//! Error types for GraphQL operations.
//!
//! Resolvers raise these errors at the field boundary; the execution engine
//! reports them per field so sibling fields still resolve. A lookup that finds
//! nothing is never an error, it resolves to `null`.

use async_graphql::ErrorExtensions;
use press_store::StoreError;

/// Errors that can occur while building or executing the schema.
#[derive(Debug, thiserror::Error)]
pub enum GraphQLError {
    /// Schema is still being built; the client should retry.
    #[error("GraphQL schema is initializing, please retry")]
    SchemaInitializing,

    /// Schema build failed.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),

    /// Malformed input to the global ID codec.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A client-supplied ID that this schema never produced.
    #[error("Malformed global ID: {0}")]
    MalformedId(String),

    /// A fetched entity whose kind and tag have no registered GraphQL type.
    #[error("Cannot resolve GraphQL type for {kind} tagged '{tag}'")]
    UnresolvableType {
        /// Top-level entity kind (`entry` or `term`).
        kind: String,
        /// The `post_type` or `taxonomy` tag.
        tag: String,
    },

    /// The store rejected a write. The message is the store's, verbatim.
    #[error("{message}")]
    EntityPersistence {
        /// The store's machine-readable reason.
        code: String,
        /// The store's message.
        message: String,
    },

    /// The store failed for an infrastructure reason.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GraphQLError {
    /// Returns the HTTP status code for this error when it aborts a whole
    /// request rather than a single field.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaInitializing => 503,
            Self::InvalidArgument(_) | Self::MalformedId(_) => 400,
            Self::EntityPersistence { .. } => 422,
            Self::SchemaBuildFailed(_)
            | Self::UnresolvableType { .. }
            | Self::Storage(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code placed in GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaInitializing => "SCHEMA_INITIALIZING",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::MalformedId(_) => "MALFORMED_ID",
            Self::UnresolvableType { .. } => "UNRESOLVABLE_TYPE",
            Self::EntityPersistence { .. } => "ENTITY_PERSISTENCE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the Retry-After header value in seconds, if applicable.
    #[must_use]
    pub fn retry_after(&self) -> Option<u32> {
        match self {
            Self::SchemaInitializing => Some(5),
            _ => None,
        }
    }
}

impl ErrorExtensions for GraphQLError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.error_code());
            if let Self::EntityPersistence { code, .. } = self {
                e.set("reason", code.as_str());
            }
        })
    }
}

impl From<StoreError> for GraphQLError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected { code, message } => Self::EntityPersistence { code, message },
            other => Self::Storage(other.to_string()),
        }
    }
}
