//! Opaque global IDs for the `Node` interface.
//!
//! A global ID is the standard base64 encoding of `"{type_name}:{local_id}"`.
//! The type name may not contain `:`, so the first colon always separates the
//! two components and local IDs may contain colons of their own.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::GraphQLError;

const SEPARATOR: char = ':';

/// A client-facing opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId(String);

/// The two components recovered from a [`GlobalId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedId {
    pub type_name: String,
    pub local_id: String,
}

impl GlobalId {
    /// Encodes a type name and local ID.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::InvalidArgument` if `type_name` is empty or
    /// contains `:`.
    pub fn encode(type_name: &str, local_id: &str) -> Result<Self, GraphQLError> {
        if type_name.is_empty() {
            return Err(GraphQLError::InvalidArgument(
                "global ID type name must not be empty".into(),
            ));
        }
        if type_name.contains(SEPARATOR) {
            return Err(GraphQLError::InvalidArgument(format!(
                "global ID type name '{type_name}' must not contain '{SEPARATOR}'"
            )));
        }
        Ok(Self(STANDARD.encode(format!("{type_name}{SEPARATOR}{local_id}"))))
    }

    /// Decodes an ID previously produced by [`GlobalId::encode`].
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::MalformedId` for anything `encode` could not
    /// have produced.
    pub fn decode(id: &str) -> Result<DecodedId, GraphQLError> {
        let bytes = STANDARD
            .decode(id)
            .map_err(|_| GraphQLError::MalformedId(id.to_string()))?;
        let raw = String::from_utf8(bytes).map_err(|_| GraphQLError::MalformedId(id.to_string()))?;

        match raw.split_once(SEPARATOR) {
            Some((type_name, local_id)) if !type_name.is_empty() => Ok(DecodedId {
                type_name: type_name.to_string(),
                local_id: local_id.to_string(),
            }),
            _ => Err(GraphQLError::MalformedId(id.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
