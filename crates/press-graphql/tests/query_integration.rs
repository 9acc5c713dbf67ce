//! Integration tests for the assembled schema.
//!
//! These tests execute GraphQL documents against a schema built over the
//! in-memory store and compare the JSON results.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, Schema, TypeRef};
use press_db_memory::InMemoryStore;
use press_graphql::resolvers::fields::{entry_scalar, global_id, string};
use press_graphql::{
    ExtensionRegistry, FieldDefinition, GraphQLConfig, RootHook, SchemaAssembler,
    TypeDescriptor, TypesHook,
};
use press_store::{ContentEntry, EntityKind, Term};
use serde_json::{Value as JsonValue, json};
use time::OffsetDateTime;
use time::macros::datetime;

// =============================================================================
// Fixtures
// =============================================================================

const COMMERCE: &str = "woocommerce/woocommerce.php";

fn entry(id: u64, post_type: &str, slug: &str, title: &str, date: OffsetDateTime) -> ContentEntry {
    ContentEntry {
        id,
        post_type: post_type.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        content: format!("{title} content"),
        excerpt: String::new(),
        status: "publish".to_string(),
        author: Some(1),
        parent: None,
        mime_type: None,
        date,
        guid: format!("http://example.com/?p={id}"),
    }
}

fn term(term_id: u64, taxonomy: &str, name: &str, slug: &str) -> Term {
    Term {
        term_id,
        taxonomy: taxonomy.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        parent: None,
        count: 0,
    }
}

/// Store with:
/// - 1: post `hello-world`
/// - 2: page `about`
/// - 3: attachment under the page
/// - 4: older post `older-post`
/// - 5: product `mug`
/// - 10: category `news`, assigned to 1
/// - 11: tag `rust`, assigned to 1
fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_entry(entry(1, "post", "hello-world", "Hello world", datetime!(2024-01-02 10:00 UTC)));
    store.insert_entry(entry(2, "page", "about", "About", datetime!(2023-06-01 08:00 UTC)));

    let mut attachment = entry(3, "attachment", "logo", "Logo", datetime!(2023-06-02 08:00 UTC));
    attachment.parent = Some(2);
    attachment.mime_type = Some("image/png".to_string());
    attachment.status = "inherit".to_string();
    store.insert_entry(attachment);

    store.insert_entry(entry(4, "post", "older-post", "Older post", datetime!(2023-01-01 00:00 UTC)));
    store.insert_entry(entry(5, "product", "mug", "Mug", datetime!(2024-02-01 00:00 UTC)));

    store.insert_term(term(10, "category", "News", "news"));
    store.insert_term(term(11, "post_tag", "Rust", "rust"));
    store.assign_term(1, 10);
    store.assign_term(1, 11);
    store
}

async fn build_schema(store: InMemoryStore, extensions: ExtensionRegistry) -> Schema {
    SchemaAssembler::new(Arc::new(store), extensions, GraphQLConfig::default())
        .build()
        .await
        .expect("schema builds")
}

async fn default_schema() -> Schema {
    build_schema(seeded_store(), ExtensionRegistry::new()).await
}

/// Executes a document and returns `(data, errors)` as JSON.
async fn execute(schema: &Schema, query: &str) -> (JsonValue, Vec<JsonValue>) {
    let response = schema.execute(query).await;
    let errors = response
        .errors
        .iter()
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();
    (response.data.into_json().unwrap(), errors)
}

/// True when a failed field carries no value. The engine may leave it out of
/// `data` or null the whole `data` when it was the only field.
fn has_no_value(data: &JsonValue, field: &str) -> bool {
    data.get(field).is_none_or(JsonValue::is_null)
}

// =============================================================================
// Single entry lookup
// =============================================================================

#[tokio::test]
async fn wp_post_by_id() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"{ wp_post(ID: 1) { __typename ID post_title post_name post_type post_date post_author guid } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "wp_post": {
                "__typename": "Post",
                "ID": 1,
                "post_title": "Hello world",
                "post_name": "hello-world",
                "post_type": "post",
                "post_date": "2024-01-02T10:00:00Z",
                "post_author": 1,
                "guid": "http://example.com/?p=1"
            }
        })
    );
}

#[tokio::test]
async fn wp_post_missing_id_is_null_without_error() {
    let schema = default_schema().await;
    let (data, errors) = execute(&schema, "{ wp_post(ID: 42) { post_title } }").await;

    assert!(errors.is_empty());
    assert_eq!(data, json!({"wp_post": null}));
}

#[tokio::test]
async fn wp_post_by_slug_defaults_to_post_type_post() {
    let schema = default_schema().await;

    let (data, errors) = execute(&schema, r#"{ wp_post(slug: "hello-world") { ID } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({"wp_post": {"ID": 1}}));

    // `about` is a page, so the default post type does not find it
    let (data, errors) = execute(&schema, r#"{ wp_post(slug: "about") { ID } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({"wp_post": null}));

    let (data, _) = execute(
        &schema,
        r#"{ wp_post(slug: "about", post_type: "page") { __typename ID } }"#,
    )
    .await;
    assert_eq!(data, json!({"wp_post": {"__typename": "Page", "ID": 2}}));
}

#[tokio::test]
async fn wp_post_id_wins_over_slug() {
    let schema = default_schema().await;
    let (data, _) = execute(&schema, r#"{ wp_post(ID: 4, slug: "hello-world") { ID } }"#).await;
    assert_eq!(data, json!({"wp_post": {"ID": 4}}));
}

#[tokio::test]
async fn attachment_fields_and_parent() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"{
            wp_post(ID: 3) {
                __typename
                post_parent { __typename post_title }
                ... on Attachment { post_mime_type }
            }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "wp_post": {
                "__typename": "Attachment",
                "post_parent": {"__typename": "Page", "post_title": "About"},
                "post_mime_type": "image/png"
            }
        })
    );
}

#[tokio::test]
async fn entry_terms_filtered_by_taxonomy() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"{
            wp_post(ID: 1) {
                all: terms { __typename name }
                categories: terms(taxonomy: "category") { slug count }
            }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "wp_post": {
                "all": [
                    {"__typename": "Category", "name": "News"},
                    {"__typename": "Tag", "name": "Rust"}
                ],
                "categories": [{"slug": "news", "count": 1}]
            }
        })
    );
}

// =============================================================================
// Terms and query state
// =============================================================================

#[tokio::test]
async fn term_lookup() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"{
            news: term(id: "10") { __typename term_id name taxonomy parent { name } }
            missing: term(id: "99") { name }
            garbage: term(id: "abc") { name }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "news": {
                "__typename": "Category",
                "term_id": 10,
                "name": "News",
                "taxonomy": "category",
                "parent": null
            },
            "missing": null,
            "garbage": null
        })
    );
}

#[tokio::test]
async fn wp_query_lists_published_posts_newest_first() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        "{ wp_query { found_posts post_count max_num_pages posts { post_title } } }",
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "wp_query": {
                "found_posts": 2,
                "post_count": 2,
                "max_num_pages": 1,
                "posts": [{"post_title": "Hello world"}, {"post_title": "Older post"}]
            }
        })
    );
}

// =============================================================================
// Node
// =============================================================================

#[tokio::test]
async fn node_round_trip() {
    let schema = default_schema().await;

    let (data, _) = execute(&schema, "{ wp_post(ID: 1) { id } }").await;
    assert_eq!(data, json!({"wp_post": {"id": "V1BQb3N0OjE="}}));

    let (data, errors) = execute(
        &schema,
        r#"{
            post: node(id: "V1BQb3N0OjE=") { __typename id ... on Post { post_title } }
            term: node(id: "V1BUZXJtOjEw") { __typename ... on Category { name } }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "post": {"__typename": "Post", "id": "V1BQb3N0OjE=", "post_title": "Hello world"},
            "term": {"__typename": "Category", "name": "News"}
        })
    );
}

#[tokio::test]
async fn node_not_found_is_null() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"{
            missing: node(id: "V1BQb3N0OjQy") { id }
            unknown_type: node(id: "V2lkZ2V0OjE=") { id }
            non_numeric: node(id: "V1BQb3N0OmFiYw==") { id }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({"missing": null, "unknown_type": null, "non_numeric": null})
    );
}

#[tokio::test]
async fn malformed_node_id_is_a_field_error() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"{
            bad: node(id: "this is not an id") { id }
            good: wp_post(ID: 1) { post_title }
        }"#,
    )
    .await;

    // siblings still resolve
    assert!(has_no_value(&data, "bad"), "{data}");
    assert_eq!(data["good"], json!({"post_title": "Hello world"}));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["extensions"]["code"], "MALFORMED_ID");
}

// =============================================================================
// Commerce types
// =============================================================================

#[tokio::test]
async fn commerce_types_absent_when_plugin_inactive() {
    let schema = default_schema().await;
    assert!(!schema.sdl().contains("type Product"));
    assert!(!schema.sdl().contains("type Order"));

    // a product exists but has no type to resolve to
    let (data, errors) = execute(&schema, "{ wp_post(ID: 5) { post_title } }").await;
    assert!(has_no_value(&data, "wp_post"), "{data}");
    assert_eq!(errors[0]["extensions"]["code"], "UNRESOLVABLE_TYPE");
}

#[tokio::test]
async fn commerce_types_present_when_plugin_active() {
    let store = seeded_store().with_active_extension(COMMERCE);
    let schema = build_schema(store, ExtensionRegistry::new()).await;

    let (data, errors) = execute(&schema, "{ wp_post(ID: 5) { __typename post_title } }").await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({"wp_post": {"__typename": "Product", "post_title": "Mug"}})
    );
}

// =============================================================================
// Mutation
// =============================================================================

#[tokio::test]
async fn insert_post_creates_and_returns_entry() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"mutation {
            insert_post(postdata: {post_title: "Fresh news", post_content: "Body"}) {
                post { __typename post_title post_name post_status post_type }
            }
        }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({
            "insert_post": {
                "post": {
                    "__typename": "Post",
                    "post_title": "Fresh news",
                    "post_name": "fresh-news",
                    "post_status": "draft",
                    "post_type": "post"
                }
            }
        })
    );

    let (data, _) = execute(&schema, r#"{ wp_post(slug: "fresh-news") { post_content } }"#).await;
    assert_eq!(data, json!({"wp_post": {"post_content": "Body"}}));
}

#[tokio::test]
async fn insert_post_rejection_surfaces_store_message() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"mutation { insert_post(postdata: {post_status: "publish"}) { post { id } } }"#,
    )
    .await;

    assert!(has_no_value(&data, "insert_post"), "{data}");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["message"], "Content, title, and excerpt are empty.");
    assert_eq!(errors[0]["extensions"]["code"], "ENTITY_PERSISTENCE_ERROR");
    assert_eq!(errors[0]["extensions"]["reason"], "empty_content");

    // nothing was stored
    let (data, _) = execute(&schema, "{ wp_query { found_posts } }").await;
    assert_eq!(data, json!({"wp_query": {"found_posts": 2}}));
}

#[tokio::test]
async fn insert_post_with_missing_parent_is_rejected() {
    let schema = default_schema().await;
    let (data, errors) = execute(
        &schema,
        r#"mutation { insert_post(postdata: {post_title: "Child", post_parent: 999}) { post { id } } }"#,
    )
    .await;

    assert!(has_no_value(&data, "insert_post"), "{data}");
    assert_eq!(errors[0]["extensions"]["code"], "ENTITY_PERSISTENCE_ERROR");
    assert_eq!(errors[0]["extensions"]["reason"], "invalid_parent");
}

// =============================================================================
// Extension hooks
// =============================================================================

#[tokio::test]
async fn query_hook_adds_and_removes_fields() {
    let mut extensions = ExtensionRegistry::new();
    extensions.register_root(RootHook::QuerySchema, |query| {
        query.without_field("term").field(
            FieldDefinition::new("site_name", TypeRef::named_nn(TypeRef::STRING))
                .resolve(|_| FieldFuture::new(async { Ok(Some(Value::from("Press"))) })),
        )
    });
    let schema = build_schema(seeded_store(), extensions).await;

    let (data, errors) = execute(&schema, "{ site_name }").await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(data, json!({"site_name": "Press"}));

    let (_, errors) = execute(&schema, r#"{ term(id: "10") { name } }"#).await;
    assert!(!errors.is_empty());
}

#[tokio::test]
async fn contributed_type_resolves_through_node() {
    let mut extensions = ExtensionRegistry::new();
    extensions.register_types(TypesHook::SchemaTypes, |mut set| {
        set.push(Arc::new(
            TypeDescriptor::object("Event")
                .implement("Node")
                .field(FieldDefinition::new("id", TypeRef::named_nn(TypeRef::ID)).resolve(global_id))
                .field(
                    FieldDefinition::new("title", TypeRef::named_nn(TypeRef::STRING))
                        .resolve(entry_scalar(|e: &ContentEntry| string(&e.title))),
                )
                .classify(EntityKind::Entry, "event"),
        ));
        set
    });

    let store = seeded_store();
    store.insert_entry(entry(6, "event", "launch", "Launch party", datetime!(2024-03-01 18:00 UTC)));
    let schema = build_schema(store, extensions).await;

    let (data, errors) = execute(
        &schema,
        r#"{ node(id: "V1BQb3N0OjY=") { __typename ... on Event { title } } }"#,
    )
    .await;

    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(
        data,
        json!({"node": {"__typename": "Event", "title": "Launch party"}})
    );
}

#[tokio::test]
async fn post_types_hook_can_remove_a_type() {
    let mut extensions = ExtensionRegistry::new();
    extensions.register_types(TypesHook::PostTypes, |mut set| {
        set.types.retain(|ty| ty.name() != "Attachment");
        set
    });
    let schema = build_schema(seeded_store(), extensions).await;

    assert!(!schema.sdl().contains("type Attachment"));
    let (data, errors) = execute(&schema, "{ wp_post(ID: 3) { ID } }").await;
    assert!(has_no_value(&data, "wp_post"), "{data}");
    assert_eq!(errors[0]["extensions"]["code"], "UNRESOLVABLE_TYPE");
}
