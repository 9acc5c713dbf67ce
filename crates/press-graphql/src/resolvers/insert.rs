//! Insert mutation resolver.
//!
//! Handles `insert_post(postdata: PostInput!)`:
//! ```graphql
//! mutation {
//!   insert_post(postdata: {post_title: "Hello"}) {
//!     post { id post_title }
//!   }
//! }
//! ```

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext, ValueAccessor};
use press_store::{Entity, EntryInput};
use tracing::{debug, trace, warn};

use super::{get_press_context, optional_entity_value};
use crate::error::GraphQLError;

/// The value behind an `InsertPostOutput`.
#[derive(Debug, Clone)]
pub struct InsertedPost {
    pub post: Option<Entity>,
}

/// Resolver for the `insert_post` mutation.
pub struct InsertPostResolver;

impl InsertPostResolver {
    /// Creates the mutation resolver.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                debug!("Processing insert_post mutation");

                let press = get_press_context(&ctx)?;
                let postdata = ctx.args.get("postdata").ok_or_else(|| {
                    async_graphql::Error::new("Missing required argument 'postdata'")
                })?;
                let input = postdata_to_input(&postdata)?;

                trace!(post_type = ?input.post_type, "Creating entry via store");
                let id = press.store.create_entry(&input).await.map_err(|e| {
                    warn!(error = %e, category = %e.category(), "insert_post failed");
                    GraphQLError::from(e).extend()
                })?;

                let post = press
                    .store
                    .fetch_entry(id)
                    .await
                    .map_err(|e| GraphQLError::from(e).extend())?
                    .map(Entity::Entry);

                debug!(id, "Entry created");
                Ok(Some(FieldValue::owned_any(InsertedPost { post })))
            })
        }
    }

    /// Resolves `InsertPostOutput.post`.
    pub fn resolve_post(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let inserted = ctx.parent_value.try_downcast_ref::<InsertedPost>()?;
            let press = get_press_context(&ctx)?;
            optional_entity_value(press, inserted.post.clone())
        })
    }
}

fn postdata_to_input(value: &ValueAccessor<'_>) -> Result<EntryInput, async_graphql::Error> {
    let json = value_accessor_to_json(value)?;
    serde_json::from_value(json).map_err(|e| {
        GraphQLError::InvalidArgument(format!("Invalid postdata: {e}")).extend()
    })
}

/// Converts an input argument into JSON.
pub(crate) fn value_accessor_to_json(
    value: &ValueAccessor<'_>,
) -> Result<serde_json::Value, async_graphql::Error> {
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }

    if let Ok(b) = value.boolean() {
        return Ok(serde_json::Value::Bool(b));
    }

    if let Ok(u) = value.u64() {
        return Ok(serde_json::Value::Number(u.into()));
    }

    if let Ok(i) = value.i64() {
        return Ok(serde_json::Value::Number(i.into()));
    }

    if let Ok(f) = value.f64() {
        return Ok(serde_json::json!(f));
    }

    if let Ok(s) = value.string() {
        return Ok(serde_json::Value::String(s.to_string()));
    }

    if let Ok(list) = value.list() {
        let items: Result<Vec<serde_json::Value>, async_graphql::Error> =
            list.iter().map(|v| value_accessor_to_json(&v)).collect();
        return Ok(serde_json::Value::Array(items?));
    }

    if let Ok(obj) = value.object() {
        let mut map = serde_json::Map::new();
        for (k, v) in obj.iter() {
            map.insert(k.to_string(), value_accessor_to_json(&v)?);
        }
        return Ok(serde_json::Value::Object(map));
    }

    Ok(serde_json::Value::Null)
}
