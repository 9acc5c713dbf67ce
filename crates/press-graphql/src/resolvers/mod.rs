//! GraphQL resolvers.
//!
//! - `post`: `wp_post(ID, slug, post_type)` single entry lookup
//! - `term`: `term(id)` single term lookup
//! - `query_state`: `wp_query` main-query state
//! - `node`: `node(id)` global object lookup
//! - `insert`: `insert_post(postdata)` mutation
//! - `fields`: field resolvers of the entity types

pub mod fields;
mod insert;
mod node;
mod post;
mod query_state;
mod term;

pub use insert::{InsertPostResolver, InsertedPost};
pub use node::{NodeResolver, node_field};
pub use post::PostResolver;
pub use query_state::QueryStateResolver;
pub use term::TermResolver;

use async_graphql::dynamic::{FieldValue, ResolverContext};
use async_graphql::{Error as GraphQLError, ErrorExtensions};
use press_store::{ContentEntry, Entity, Term};

use crate::context::PressContext;

/// Helper to extract the press context from resolver context.
pub(crate) fn get_press_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a PressContext, GraphQLError> {
    ctx.data::<PressContext>()
        .map_err(|_| GraphQLError::new("Press context not available"))
}

/// The parent value as an entity.
pub(crate) fn parent_entity<'a>(ctx: &ResolverContext<'a>) -> Result<&'a Entity, GraphQLError> {
    ctx.parent_value
        .try_downcast_ref::<Entity>()
        .map_err(|_| GraphQLError::new("Parent value is not an entity"))
}

pub(crate) fn parent_entry<'a>(
    ctx: &ResolverContext<'a>,
) -> Result<&'a ContentEntry, GraphQLError> {
    parent_entity(ctx)?
        .as_entry()
        .ok_or_else(|| GraphQLError::new("Parent value is not a content entry"))
}

pub(crate) fn parent_term<'a>(ctx: &ResolverContext<'a>) -> Result<&'a Term, GraphQLError> {
    parent_entity(ctx)?
        .as_term()
        .ok_or_else(|| GraphQLError::new("Parent value is not a term"))
}

/// Wraps an entity for an interface-typed field, tagging it with its
/// concrete GraphQL type.
pub(crate) fn entity_value<'a>(
    press: &PressContext,
    entity: Entity,
) -> Result<FieldValue<'a>, GraphQLError> {
    let type_name = press
        .entities
        .resolve_type_name(&entity)
        .map_err(|e| e.extend())?
        .to_string();
    Ok(FieldValue::owned_any(entity).with_type(type_name))
}

/// Like [`entity_value`], for optional entities.
pub(crate) fn optional_entity_value<'a>(
    press: &PressContext,
    entity: Option<Entity>,
) -> Result<Option<FieldValue<'a>>, GraphQLError> {
    entity.map(|e| entity_value(press, e)).transpose()
}
