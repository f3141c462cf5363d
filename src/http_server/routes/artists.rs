use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::entities;
use crate::forms::{ArtistForm, SearchForm};
use crate::http_server::{error::ApiError, state::AppState};
use crate::services::SearchResults;
use crate::services::artist::{ArtistDetail, ArtistRef, ArtistService, ArtistSummary};

#[axum::debug_handler]
pub async fn list(State(app_state): State<Arc<AppState>>) -> Result<Json<Vec<ArtistRef>>, ApiError> {
    let service = ArtistService::new(app_state.db.clone());
    Ok(Json(service.list().await?))
}

#[axum::debug_handler]
pub async fn search(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchResults<ArtistSummary>>, ApiError> {
    let service = ArtistService::new(app_state.db.clone());
    Ok(Json(service.search(&form.search_term).await?))
}

#[axum::debug_handler]
pub async fn detail(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let service = ArtistService::new(app_state.db.clone());
    Ok(Json(service.detail(artist_id).await?))
}

/// Blank form payload for the create page.
#[axum::debug_handler]
pub async fn create_form() -> Json<ArtistForm> {
    Json(ArtistForm::default())
}

#[axum::debug_handler]
pub async fn create(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ArtistForm>,
) -> Result<(StatusCode, Json<entities::artist::Model>), ApiError> {
    let service = ArtistService::new(app_state.db.clone());
    let created = service.create(form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Current row for pre-populating the edit form.
#[axum::debug_handler]
pub async fn edit_form(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> Result<Json<entities::artist::Model>, ApiError> {
    let service = ArtistService::new(app_state.db.clone());
    Ok(Json(service.get(artist_id).await?))
}

#[axum::debug_handler]
pub async fn edit(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    Form(form): Form<ArtistForm>,
) -> Result<Json<entities::artist::Model>, ApiError> {
    let service = ArtistService::new(app_state.db.clone());
    Ok(Json(service.edit(artist_id, form).await?))
}
