use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use userhub_core::ServerDeps;

use crate::graphql::{self, AppSchema};

pub fn build_router(deps: Arc<ServerDeps>) -> Router {
    let allowed_origins = deps.config.allowed_origins.clone();
    let schema = graphql::build_schema(deps);

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/graphql", get(graphiql_handler).post(graphql_handler))
        .route_service("/subscriptions", GraphQLSubscription::new(schema.clone()))
        .route("/health", get(health))
        .layer(cors)
        .with_state(AppState { schema })
}

#[derive(Clone)]
pub struct AppState {
    schema: AppSchema,
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    let span = tracing::info_span!("graphql_request");
    let _enter = span.enter();
    let response = state.schema.execute(req.into_inner()).await;
    if !response.errors.is_empty() {
        tracing::warn!(errors = ?response.errors, "GraphQL errors");
    }
    response.into()
}

async fn graphiql_handler() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/subscriptions")
            .finish(),
    )
}

async fn health() -> &'static str {
    "ok"
}
