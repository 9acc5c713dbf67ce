//! Built-in schema types.
//!
//! Post-like objects implement `WPPost` and `Node`; term objects implement
//! `WPTerm` and `Node`. Each concrete object carries the classifier that
//! maps store entities onto it.

use async_graphql::Value;
use async_graphql::dynamic::TypeRef;
use press_store::{ContentEntry, EntityKind};
use time::format_description::well_known::Rfc3339;

use super::{ArgumentDefinition, FieldDefinition, TypeDescriptor};
use crate::resolvers::fields::{
    self, entry_scalar, number, optional_number, query_state_scalar, string, term_scalar,
};
use crate::resolvers::{
    InsertPostResolver, PostResolver, QueryStateResolver, TermResolver, node_field,
};

pub const NODE: &str = "Node";
pub const WP_POST: &str = "WPPost";
pub const WP_TERM: &str = "WPTerm";
pub const POST: &str = "Post";
pub const PAGE: &str = "Page";
pub const ATTACHMENT: &str = "Attachment";
pub const CATEGORY: &str = "Category";
pub const TAG: &str = "Tag";
pub const POST_FORMAT: &str = "PostFormat";
pub const PRODUCT: &str = "Product";
pub const ORDER: &str = "Order";
pub const WP_QUERY: &str = "WPQuery";
pub const POST_INPUT: &str = "PostInput";
pub const INSERT_POST_OUTPUT: &str = "InsertPostOutput";
pub const QUERY: &str = "Query";
pub const MUTATION: &str = "Mutation";

/// Every type the schema defines itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreType {
    Node,
    WPPost,
    WPTerm,
    Post,
    Page,
    Attachment,
    Category,
    Tag,
    PostFormat,
    Product,
    Order,
    WPQuery,
    PostInput,
    InsertPostOutput,
    Query,
    Mutation,
}

impl CoreType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Node => NODE,
            Self::WPPost => WP_POST,
            Self::WPTerm => WP_TERM,
            Self::Post => POST,
            Self::Page => PAGE,
            Self::Attachment => ATTACHMENT,
            Self::Category => CATEGORY,
            Self::Tag => TAG,
            Self::PostFormat => POST_FORMAT,
            Self::Product => PRODUCT,
            Self::Order => ORDER,
            Self::WPQuery => WP_QUERY,
            Self::PostInput => POST_INPUT,
            Self::InsertPostOutput => INSERT_POST_OUTPUT,
            Self::Query => QUERY,
            Self::Mutation => MUTATION,
        }
    }

    /// Builds a fresh descriptor. Use [`TypeRegistry::core`](super::TypeRegistry::core)
    /// to get the shared instance.
    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        match self {
            Self::Node => TypeDescriptor::interface(NODE)
                .description("An object with a global ID")
                .field(id_field()),
            Self::WPPost => TypeDescriptor::interface(WP_POST)
                .description("A post-like content entry")
                .fields(entry_fields()),
            Self::WPTerm => TypeDescriptor::interface(WP_TERM)
                .description("A taxonomy term")
                .fields(term_fields()),
            Self::Post => entry_object(POST, "post").description("A blog post"),
            Self::Page => entry_object(PAGE, "page").description("A static page"),
            Self::Attachment => entry_object(ATTACHMENT, "attachment")
                .description("An uploaded media file")
                .field(
                    FieldDefinition::new("post_mime_type", TypeRef::named(TypeRef::STRING))
                        .resolve(entry_scalar(|e: &ContentEntry| {
                            e.mime_type.as_deref().map_or(Value::Null, string)
                        })),
                ),
            Self::Category => term_object(CATEGORY, "category"),
            Self::Tag => term_object(TAG, "post_tag"),
            Self::PostFormat => term_object(POST_FORMAT, "post_format"),
            Self::Product => entry_object(PRODUCT, "product").description("A shop product"),
            Self::Order => entry_object(ORDER, "shop_order").description("A shop order"),
            Self::WPQuery => TypeDescriptor::object(WP_QUERY)
                .description("The main query of the current request")
                .field(
                    FieldDefinition::new("posts", TypeRef::named_nn_list_nn(WP_POST))
                        .resolve(fields::query_state_posts),
                )
                .field(
                    FieldDefinition::new("found_posts", TypeRef::named_nn(TypeRef::INT))
                        .resolve(query_state_scalar(|q| number(q.found_posts))),
                )
                .field(
                    FieldDefinition::new("post_count", TypeRef::named_nn(TypeRef::INT))
                        .resolve(query_state_scalar(|q| number(q.post_count()))),
                )
                .field(
                    FieldDefinition::new("max_num_pages", TypeRef::named_nn(TypeRef::INT))
                        .resolve(query_state_scalar(|q| number(q.max_num_pages))),
                ),
            Self::PostInput => TypeDescriptor::input_object(POST_INPUT)
                .description("Fields for a new entry")
                .fields(
                    [
                        "post_title",
                        "post_content",
                        "post_excerpt",
                        "post_status",
                        "post_type",
                        "post_name",
                    ]
                    .map(|name| FieldDefinition::new(name, TypeRef::named(TypeRef::STRING))),
                )
                .field(FieldDefinition::new("post_parent", TypeRef::named(TypeRef::INT)))
                .field(FieldDefinition::new("post_author", TypeRef::named(TypeRef::INT))),
            Self::InsertPostOutput => TypeDescriptor::object(INSERT_POST_OUTPUT).field(
                FieldDefinition::new("post", TypeRef::named(WP_POST))
                    .resolve(InsertPostResolver::resolve_post),
            ),
            Self::Query => query_type(),
            Self::Mutation => TypeDescriptor::object(MUTATION).field(
                FieldDefinition::new("insert_post", TypeRef::named(INSERT_POST_OUTPUT))
                    .description("Creates a content entry")
                    .argument(ArgumentDefinition::new(
                        "postdata",
                        TypeRef::named_nn(POST_INPUT),
                    ))
                    .resolve(InsertPostResolver::resolve()),
            ),
        }
    }
}

fn id_field() -> FieldDefinition {
    FieldDefinition::new("id", TypeRef::named_nn(TypeRef::ID))
        .description("Global ID")
        .resolve(fields::global_id)
}

fn entry_string(name: &str, read: fn(&ContentEntry) -> &str) -> FieldDefinition {
    FieldDefinition::new(name, TypeRef::named_nn(TypeRef::STRING))
        .resolve(entry_scalar(move |e: &ContentEntry| string(read(e))))
}

fn entry_fields() -> Vec<FieldDefinition> {
    vec![
        id_field(),
        FieldDefinition::new("ID", TypeRef::named_nn(TypeRef::INT))
            .description("Store ID")
            .resolve(entry_scalar(|e: &ContentEntry| number(e.id))),
        entry_string("post_title", |e| &e.title),
        entry_string("post_content", |e| &e.content),
        entry_string("post_excerpt", |e| &e.excerpt),
        entry_string("post_name", |e| &e.slug),
        entry_string("post_status", |e| &e.status),
        entry_string("post_type", |e| &e.post_type),
        FieldDefinition::new("post_date", TypeRef::named_nn(TypeRef::STRING))
            .description("Publication date, RFC 3339")
            .resolve(entry_scalar(|e: &ContentEntry| {
                e.date.format(&Rfc3339).map_or(Value::Null, Value::String)
            })),
        FieldDefinition::new("post_parent", TypeRef::named(WP_POST)).resolve(fields::entry_parent),
        FieldDefinition::new("post_author", TypeRef::named(TypeRef::INT))
            .resolve(entry_scalar(|e: &ContentEntry| optional_number(e.author))),
        entry_string("guid", |e| &e.guid),
        FieldDefinition::new("terms", TypeRef::named_nn_list_nn(WP_TERM))
            .description("Terms assigned to the entry")
            .argument(
                ArgumentDefinition::new("taxonomy", TypeRef::named(TypeRef::STRING))
                    .description("Only terms of this taxonomy"),
            )
            .resolve(fields::entry_terms),
    ]
}

fn term_fields() -> Vec<FieldDefinition> {
    vec![
        id_field(),
        FieldDefinition::new("term_id", TypeRef::named_nn(TypeRef::INT))
            .resolve(term_scalar(|t| number(t.term_id))),
        FieldDefinition::new("name", TypeRef::named_nn(TypeRef::STRING))
            .resolve(term_scalar(|t| string(&t.name))),
        FieldDefinition::new("slug", TypeRef::named_nn(TypeRef::STRING))
            .resolve(term_scalar(|t| string(&t.slug))),
        FieldDefinition::new("taxonomy", TypeRef::named_nn(TypeRef::STRING))
            .resolve(term_scalar(|t| string(&t.taxonomy))),
        FieldDefinition::new("description", TypeRef::named_nn(TypeRef::STRING))
            .resolve(term_scalar(|t| string(&t.description))),
        FieldDefinition::new("parent", TypeRef::named(WP_TERM)).resolve(fields::term_parent),
        FieldDefinition::new("count", TypeRef::named_nn(TypeRef::INT))
            .resolve(term_scalar(|t| number(t.count))),
    ]
}

fn entry_object(name: &str, post_type: &str) -> TypeDescriptor {
    TypeDescriptor::object(name)
        .implement(WP_POST)
        .implement(NODE)
        .fields(entry_fields())
        .classify(EntityKind::Entry, post_type)
}

fn term_object(name: &str, taxonomy: &str) -> TypeDescriptor {
    TypeDescriptor::object(name)
        .implement(WP_TERM)
        .implement(NODE)
        .fields(term_fields())
        .classify(EntityKind::Term, taxonomy)
}

fn query_type() -> TypeDescriptor {
    TypeDescriptor::object(QUERY)
        .field(
            FieldDefinition::new("wp_query", TypeRef::named(WP_QUERY))
                .description("The main query state")
                .resolve(QueryStateResolver::resolve()),
        )
        .field(
            FieldDefinition::new("wp_post", TypeRef::named(WP_POST))
                .description("Fetches an entry by ID, or by slug and post type")
                .argument(ArgumentDefinition::new("ID", TypeRef::named(TypeRef::INT)))
                .argument(ArgumentDefinition::new("slug", TypeRef::named(TypeRef::STRING)))
                .argument(
                    ArgumentDefinition::new("post_type", TypeRef::named(TypeRef::STRING))
                        .description("Defaults to the configured post type"),
                )
                .resolve(PostResolver::resolve()),
        )
        .field(
            FieldDefinition::new("term", TypeRef::named(WP_TERM))
                .description("Fetches a term by ID")
                .argument(ArgumentDefinition::new("id", TypeRef::named(TypeRef::STRING)))
                .resolve(TermResolver::resolve()),
        )
        .field(node_field())
}
