//! Global object lookup: `node(id: ID!)`.
//!
//! The ID is decoded into `(type name, local id)`, the entity is fetched by
//! the entity resolver and tagged with the concrete object type its
//! classifier names. A malformed ID is a field error; an ID that decodes
//! but points at nothing is `null`.

use async_graphql::ErrorExtensions;
use async_graphql::dynamic::{FieldFuture, ResolverContext, TypeRef};
use tracing::{debug, warn};

use super::{entity_value, get_press_context};
use crate::global_id::GlobalId;
use crate::types::{ArgumentDefinition, FieldDefinition, NODE};

/// Resolver for the `node` query field.
pub struct NodeResolver;

impl NodeResolver {
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |ctx| {
            FieldFuture::new(async move {
                let raw = ctx
                    .args
                    .get("id")
                    .and_then(|v| v.string().ok().map(str::to_string))
                    .ok_or_else(|| async_graphql::Error::new("Missing required argument 'id'"))?;

                let decoded = GlobalId::decode(&raw).map_err(|e| {
                    debug!(id = %raw, "Rejecting malformed global ID");
                    e.extend()
                })?;

                let press = get_press_context(&ctx)?;
                let entity = press
                    .entities
                    .fetch_by_global_id(&decoded.type_name, &decoded.local_id)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Store error resolving node");
                        e.extend()
                    })?;

                match entity {
                    Some(entity) => Ok(Some(entity_value(press, entity)?)),
                    None => {
                        debug!(
                            type_name = %decoded.type_name,
                            local_id = %decoded.local_id,
                            "Node not found"
                        );
                        Ok(None)
                    }
                }
            })
        }
    }
}

/// The `node(id: ID!): Node` field.
#[must_use]
pub fn node_field() -> FieldDefinition {
    FieldDefinition::new("node", TypeRef::named(NODE))
        .description("Fetches an object given its global ID")
        .argument(
            ArgumentDefinition::new("id", TypeRef::named_nn(TypeRef::ID))
                .description("The global ID of the object"),
        )
        .resolve(NodeResolver::resolve())
}
