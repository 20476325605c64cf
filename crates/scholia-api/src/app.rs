use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::{errors, logging},
    routes::{chat, flashcards, folders, health, resources, revision_notes, topics},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chat
        .route("/chat", post(chat::send_chat))
        .route("/chat/:resource_id", get(chat::list_resource_chats))
        // Study artifacts
        .route(
            "/flashcards",
            post(flashcards::create_flashcards).get(flashcards::get_flashcards),
        )
        .route(
            "/revisionNotes",
            post(revision_notes::create_revision_notes).get(revision_notes::get_revision_notes),
        )
        // Folders
        .route("/folder", post(folders::create_folder).get(folders::list_folders))
        .route(
            "/folder/:id",
            get(folders::get_folder).delete(folders::delete_folder),
        )
        // Topics
        .route("/topic", post(topics::create_topic).get(topics::list_topics))
        .route("/topic/:id", get(topics::get_topic).delete(topics::delete_topic))
        // Resources
        .route(
            "/resource/:id",
            get(resources::get_resource).delete(resources::delete_resource),
        );

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    api_routes
        .layer(middleware::from_fn_with_state(
            state.clone(),
            errors::expose_error_details,
        ))
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(errors::timeout_body))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::permissive();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<axum::http::HeaderValue> = config
        .cors
        .origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    cors.allow_origin(origins)
}
