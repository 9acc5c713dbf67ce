//! Single entry lookup resolver.
//!
//! Implements `wp_post(ID: Int, slug: String, post_type: String)`. A numeric
//! `ID` wins; otherwise the entry is looked up by slug within `post_type`,
//! which falls back to the configured default post type.

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use press_store::Entity;
use tracing::{debug, warn};

use super::{get_press_context, optional_entity_value};
use crate::error::GraphQLError;

/// Resolver for the `wp_post` query field.
pub struct PostResolver;

impl PostResolver {
    /// Creates the resolver function.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let press = get_press_context(&ctx)?;

                let id = match ctx.args.get("ID") {
                    Some(v) if !v.is_null() => Some(v.i64()?),
                    _ => None,
                };
                let slug = ctx
                    .args
                    .get("slug")
                    .and_then(|v| v.string().ok().map(str::to_string));
                let post_type = ctx
                    .args
                    .get("post_type")
                    .and_then(|v| v.string().ok().map(str::to_string))
                    .unwrap_or_else(|| press.default_post_type.clone());

                let result = match (id, slug) {
                    (Some(id), _) => {
                        debug!(id, "Resolving wp_post by ID");
                        // negative IDs never match an entry
                        match u64::try_from(id) {
                            Ok(id) => press.store.fetch_entry(id).await,
                            Err(_) => Ok(None),
                        }
                    }
                    (None, Some(slug)) => {
                        debug!(slug = %slug, post_type = %post_type, "Resolving wp_post by slug");
                        press.store.fetch_entry_by_slug(&slug, &post_type).await
                    }
                    (None, None) => {
                        debug!("wp_post called without ID or slug");
                        Ok(None)
                    }
                };

                let entry = result.map_err(|e| {
                    warn!(error = %e, "Store error reading entry");
                    GraphQLError::from(e).extend()
                })?;

                if entry.is_none() {
                    debug!("Entry not found");
                }
                optional_entity_value(press, entry.map(Entity::Entry))
            })
        }
    }
}
