//! Field resolvers for entry, term and query-state types.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::{ErrorExtensions, Value};
use press_store::{ContentEntry, Entity, QueryState, Term};
use tracing::warn;

use super::{
    entity_value, get_press_context, optional_entity_value, parent_entity, parent_entry,
    parent_term,
};
use crate::entity::global_id_of;
use crate::error::GraphQLError;

fn resolver<F>(f: F) -> F
where
    F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
{
    f
}

/// Resolves the global `id` of the parent entity.
pub fn global_id(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move {
        let entity = parent_entity(&ctx)?;
        let id = global_id_of(entity).map_err(|e| e.extend())?;
        Ok(Some(Value::String(id.into_string())))
    })
}

/// Resolves a scalar read off the parent entry.
pub fn entry_scalar<F>(
    read: F,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static
where
    F: Fn(&ContentEntry) -> Value + Send + Sync + Clone + 'static,
{
    resolver(move |ctx| {
        let read = read.clone();
        FieldFuture::new(async move {
            let entry = parent_entry(&ctx)?;
            Ok(Some(read(entry)))
        })
    })
}

/// Resolves a scalar read off the parent term.
pub fn term_scalar<F>(
    read: F,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static
where
    F: Fn(&Term) -> Value + Send + Sync + Clone + 'static,
{
    resolver(move |ctx| {
        let read = read.clone();
        FieldFuture::new(async move {
            let term = parent_term(&ctx)?;
            Ok(Some(read(term)))
        })
    })
}

/// Resolves a scalar read off a `WPQuery` parent.
pub fn query_state_scalar<F>(
    read: F,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static
where
    F: Fn(&QueryState) -> Value + Send + Sync + Clone + 'static,
{
    resolver(move |ctx| {
        let read = read.clone();
        FieldFuture::new(async move {
            let state = ctx.parent_value.try_downcast_ref::<QueryState>()?;
            Ok(Some(read(state)))
        })
    })
}

pub fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn number(n: u64) -> Value {
    Value::Number(n.into())
}

pub fn optional_number(n: Option<u64>) -> Value {
    n.map_or(Value::Null, number)
}

/// Resolves `post_parent` to the parent entry, or `null`.
pub fn entry_parent(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move {
        let entry = parent_entry(&ctx)?;
        let Some(parent_id) = entry.parent else {
            return Ok(None);
        };
        let press = get_press_context(&ctx)?;
        let parent = press
            .store
            .fetch_entry(parent_id)
            .await
            .map_err(|e| GraphQLError::from(e).extend())?;
        optional_entity_value(press, parent.map(Entity::Entry))
    })
}

/// Resolves `terms(taxonomy)` on an entry.
pub fn entry_terms(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move {
        let entry = parent_entry(&ctx)?;
        let taxonomy = ctx
            .args
            .get("taxonomy")
            .and_then(|v| v.string().ok().map(str::to_string));
        let press = get_press_context(&ctx)?;

        let terms = press
            .store
            .fetch_entry_terms(entry.id, taxonomy.as_deref())
            .await
            .map_err(|e| {
                warn!(error = %e, entry_id = entry.id, "Store error listing entry terms");
                GraphQLError::from(e).extend()
            })?;

        let values = terms
            .into_iter()
            .map(|t| entity_value(press, Entity::Term(t)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(FieldValue::list(values)))
    })
}

/// Resolves `parent` on a term to the parent term, or `null`.
pub fn term_parent(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move {
        let term = parent_term(&ctx)?;
        let Some(parent_id) = term.parent else {
            return Ok(None);
        };
        let press = get_press_context(&ctx)?;
        let parent = press
            .store
            .fetch_term(parent_id)
            .await
            .map_err(|e| GraphQLError::from(e).extend())?;
        optional_entity_value(press, parent.map(Entity::Term))
    })
}

/// Resolves `posts` on a `WPQuery` parent.
pub fn query_state_posts(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move {
        let state = ctx.parent_value.try_downcast_ref::<QueryState>()?;
        let press = get_press_context(&ctx)?;
        let values = state
            .posts
            .iter()
            .cloned()
            .map(|entry| entity_value(press, Entity::Entry(entry)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(FieldValue::list(values)))
    })
}
