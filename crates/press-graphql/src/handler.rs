//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! - `POST /graphql` - executes a GraphQL document
//! - `GET /graphql` - same, with the document in URL parameters
//!
//! GraphQL execution errors are returned with `200 OK` in the `errors` list.
//! Only failures that prevent execution altogether (schema still building,
//! schema build failed) use a non-200 status.

use std::sync::Arc;

use async_graphql::{Request, Response, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GraphQLError;
use crate::schema::LazySchema;

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    pub lazy_schema: Arc<LazySchema>,
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    pub query: String,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    pub query: Option<String>,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Variables as a JSON string.
    pub variables: Option<String>,
}

/// GraphQL response body.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    pub data: serde_json::Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        let data = serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null);
        let errors = resp
            .errors
            .into_iter()
            .map(|e| serde_json::to_value(&e).unwrap_or(serde_json::Value::Null))
            .collect();

        Self { data, errors }
    }
}

/// Handles `POST /graphql`.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    debug!("Processing GraphQL request");
    execute_graphql(state, request).await
}

/// Handles `GET /graphql`.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    Query(params): Query<GraphQLQueryParams>,
) -> impl IntoResponse {
    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => {
            return error_response(&GraphQLError::InvalidArgument(format!(
                "variables is not valid JSON: {e}"
            )))
            .into_response();
        }
    };

    debug!("Processing GraphQL GET request");
    execute_graphql(state, request).await.into_response()
}

/// Checks whether a document is an introspection query.
fn is_introspection_query(query: &str) -> bool {
    query.contains("__schema") || query.contains("__type") || query.contains("IntrospectionQuery")
}

async fn execute_graphql(state: GraphQLState, request: GraphQLRequest) -> axum::response::Response {
    // Introspection waits for the build; everything else gets a 503 while it runs.
    let schema = if is_introspection_query(&request.query) {
        state.lazy_schema.get_or_build_wait().await
    } else {
        state.lazy_schema.get_or_build().await
    };

    let schema = match schema {
        Ok(schema) => schema,
        Err(e) => {
            if !matches!(e, GraphQLError::SchemaInitializing) {
                warn!(error = %e, "Schema unavailable");
            }
            return error_response(&e).into_response();
        }
    };

    let mut gql_request = Request::new(&request.query);

    if let Some(op_name) = request.operation_name {
        gql_request = gql_request.operation_name(op_name);
    }

    if let Some(vars) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(vars));
    }

    debug!(query = %request.query, "Executing GraphQL query");
    let response = schema.execute(gql_request).await;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(GraphQLResponse::from(response)),
    )
        .into_response()
}

fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = params
        .variables
        .map(|vars| serde_json::from_str(&vars))
        .transpose()?;

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns a request-level error response.
fn error_response(error: &GraphQLError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = serde_json::json!({
        "errors": [{
            "message": error.to_string(),
            "extensions": {
                "code": error.error_code()
            }
        }]
    });

    match error.retry_after() {
        Some(seconds) => (
            status,
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (header::RETRY_AFTER, seconds.to_string()),
            ],
            Json(body),
        )
            .into_response(),
        None => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(body),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_request_deserialize() {
        let json = r#"{
            "query": "{ wp_query { found_posts } }",
            "operationName": "Front",
            "variables": {"id": "V1BQb3N0OjE="}
        }"#;

        let request: GraphQLRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query, "{ wp_query { found_posts } }");
        assert_eq!(request.operation_name, Some("Front".to_string()));
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_params_to_request() {
        let params = GraphQLQueryParams {
            query: Some("{ node(id: $id) { id } }".to_string()),
            operation_name: None,
            variables: Some(r#"{"id": "V1BQb3N0OjE="}"#.to_string()),
        };

        let request = params_to_request(params).unwrap();
        assert!(request.operation_name.is_none());
        assert!(request.variables.is_some());
    }

    #[test]
    fn test_params_to_request_invalid_variables() {
        let params = GraphQLQueryParams {
            query: Some("{ wp_query { found_posts } }".to_string()),
            operation_name: None,
            variables: Some("not valid json".to_string()),
        };

        assert!(params_to_request(params).is_err());
    }

    #[test]
    fn test_introspection_detection() {
        assert!(is_introspection_query("{ __schema { types { name } } }"));
        assert!(!is_introspection_query("{ wp_post(ID: 1) { post_title } }"));
    }

    #[test]
    fn test_initializing_response_has_retry_after() {
        let response = error_response(&GraphQLError::SchemaInitializing);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
            Some("5")
        );
    }
}
