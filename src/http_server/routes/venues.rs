use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::entities;
use crate::forms::{SearchForm, VenueForm};
use crate::http_server::{error::ApiError, state::AppState};
use crate::services::SearchResults;
use crate::services::venue::{AreaVenues, VenueDetail, VenueService, VenueSummary};

#[axum::debug_handler]
pub async fn list(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<AreaVenues>>, ApiError> {
    let service = VenueService::new(app_state.db.clone());
    Ok(Json(service.list_grouped_by_area().await?))
}

#[axum::debug_handler]
pub async fn search(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchResults<VenueSummary>>, ApiError> {
    let service = VenueService::new(app_state.db.clone());
    Ok(Json(service.search(&form.search_term).await?))
}

#[axum::debug_handler]
pub async fn detail(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Json<VenueDetail>, ApiError> {
    let service = VenueService::new(app_state.db.clone());
    Ok(Json(service.detail(venue_id).await?))
}

/// Blank form payload for the create page.
#[axum::debug_handler]
pub async fn create_form() -> Json<VenueForm> {
    Json(VenueForm::default())
}

#[axum::debug_handler]
pub async fn create(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<VenueForm>,
) -> Result<(StatusCode, Json<entities::venue::Model>), ApiError> {
    let service = VenueService::new(app_state.db.clone());
    let created = service.create(form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Current row for pre-populating the edit form.
#[axum::debug_handler]
pub async fn edit_form(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Json<entities::venue::Model>, ApiError> {
    let service = VenueService::new(app_state.db.clone());
    Ok(Json(service.get(venue_id).await?))
}

#[axum::debug_handler]
pub async fn edit(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    Form(form): Form<VenueForm>,
) -> Result<Json<entities::venue::Model>, ApiError> {
    let service = VenueService::new(app_state.db.clone());
    Ok(Json(service.edit(venue_id, form).await?))
}

#[axum::debug_handler]
pub async fn delete(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = VenueService::new(app_state.db.clone());
    service.delete(venue_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
