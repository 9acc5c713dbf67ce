//! `wp_query`: the store's main-query state.

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::{debug, warn};

use super::get_press_context;
use crate::error::GraphQLError;

/// Resolver for the `wp_query` query field.
pub struct QueryStateResolver;

impl QueryStateResolver {
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let press = get_press_context(&ctx)?;
                let state = press.store.query_state().await.map_err(|e| {
                    warn!(error = %e, "Store error reading query state");
                    GraphQLError::from(e).extend()
                })?;

                debug!(
                    found_posts = state.found_posts,
                    post_count = state.post_count(),
                    "Resolved query state"
                );
                Ok(Some(FieldValue::owned_any(state)))
            })
        }
    }
}
