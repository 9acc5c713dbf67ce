use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use press_graphql::{GraphQLState, SchemaState};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    schema: &'static str,
}

fn schema_state_label(state: SchemaState) -> &'static str {
    match state {
        SchemaState::Uninitialized => "uninitialized",
        SchemaState::Building => "building",
        SchemaState::Ready => "ready",
        SchemaState::Failed => "failed",
    }
}

/// Liveness plus the state of the lazily built schema.
pub async fn health(State(state): State<GraphQLState>) -> impl IntoResponse {
    let schema = state.lazy_schema.state().await;
    let status = if schema == SchemaState::Failed {
        "degraded"
    } else {
        "ok"
    };
    (
        StatusCode::OK,
        Json(HealthResponse {
            status,
            schema: schema_state_label(schema),
        }),
    )
}
