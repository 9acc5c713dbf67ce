//! Schema types.
//!
//! - [`TypeDescriptor`] and friends describe types as data that extension
//!   hooks can inspect and transform
//! - [`CoreType`] enumerates the built-in types
//! - [`TypeRegistry`] builds each named type at most once and hands out the
//!   cached instance afterwards

mod builtin;
mod descriptor;
mod registry;

pub use builtin::{
    ATTACHMENT, CATEGORY, CoreType, INSERT_POST_OUTPUT, MUTATION, NODE, ORDER, PAGE, POST,
    POST_FORMAT, POST_INPUT, PRODUCT, QUERY, TAG, WP_POST, WP_QUERY, WP_TERM,
};
pub use descriptor::{
    ArgumentDefinition, Classifier, FieldDefinition, Resolver, TypeDescriptor, TypeKind,
};
pub use registry::TypeRegistry;
