use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use press_db_memory::create_content_store;
use press_graphql::{
    ExtensionRegistry, GraphQLState, LazySchema, SchemaAssembler, graphql_handler,
    graphql_handler_get,
};
use press_store::DynContentStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, handlers};

pub struct PressServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig, state: GraphQLState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/graphql", post(graphql_handler).get(graphql_handler_get))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(cfg.server.body_limit_bytes))
}

pub struct ServerBuilder {
    config: AppConfig,
    store: Option<DynContentStore>,
    extensions: ExtensionRegistry,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
            extensions: ExtensionRegistry::new(),
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Uses `store` instead of an in-memory store built from the config.
    pub fn with_store(mut self, store: DynContentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Extension registrations handed to the schema assembler.
    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn build(self) -> PressServer {
        let store = self
            .store
            .unwrap_or_else(|| create_content_store(self.config.store.options()));
        let assembler = SchemaAssembler::new(store, self.extensions, self.config.graphql.clone());
        let state = GraphQLState {
            lazy_schema: Arc::new(LazySchema::new(assembler)),
        };

        PressServer {
            addr: self.config.addr(),
            app: build_app(&self.config, state),
        }
    }
}

impl PressServer {
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
