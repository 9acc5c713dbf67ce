//! Single term lookup resolver: `term(id: String)`.

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use press_store::Entity;
use tracing::{debug, warn};

use super::{get_press_context, optional_entity_value};
use crate::error::GraphQLError;

/// Resolver for the `term` query field.
pub struct TermResolver;

impl TermResolver {
    /// Creates the resolver function. An `id` that is not a term ID
    /// resolves to `null`.
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let Some(raw) = ctx
                    .args
                    .get("id")
                    .and_then(|v| v.string().ok().map(str::to_string))
                else {
                    return Ok(None);
                };

                let Ok(id) = raw.trim().parse::<u64>() else {
                    debug!(id = %raw, "Term id is not numeric");
                    return Ok(None);
                };

                debug!(id, "Resolving term");
                let press = get_press_context(&ctx)?;
                let term = press.store.fetch_term(id).await.map_err(|e| {
                    warn!(error = %e, id, "Store error reading term");
                    GraphQLError::from(e).extend()
                })?;

                optional_entity_value(press, term.map(Entity::Term))
            })
        }
    }
}
