use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::{
    database::Database,
    http_server::{
        routes::{artists, shows, venues},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
}

async fn root() -> &'static str {
    "booking-manager"
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
    });

    let cors_layer = CorsLayer::permissive();

    let app = Router::new()
        .route("/", get(root))
        .route("/venues", get(venues::list))
        .route("/venues/search", post(venues::search))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create),
        )
        .route(
            "/venues/{venue_id}",
            get(venues::detail).delete(venues::delete),
        )
        .route(
            "/venues/{venue_id}/edit",
            get(venues::edit_form).post(venues::edit),
        )
        .route("/artists", get(artists::list))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create),
        )
        .route("/artists/{artist_id}", get(artists::detail))
        .route(
            "/artists/{artist_id}/edit",
            get(artists::edit_form).post(artists::edit),
        )
        .route("/shows", get(shows::list))
        .route("/shows/create", get(shows::create_form).post(shows::create))
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", config.port))?;
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
