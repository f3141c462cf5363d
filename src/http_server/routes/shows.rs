use std::sync::Arc;

use axum::{Form, Json, extract::State, http::StatusCode};

use crate::forms::ShowForm;
use crate::http_server::{error::ApiError, state::AppState};
use crate::services::show::{ShowListing, ShowRecord, ShowService};

#[axum::debug_handler]
pub async fn list(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowListing>>, ApiError> {
    let service = ShowService::new(app_state.db.clone());
    Ok(Json(service.list().await?))
}

/// Blank form payload for the create page.
#[axum::debug_handler]
pub async fn create_form() -> Json<ShowForm> {
    Json(ShowForm::default())
}

#[axum::debug_handler]
pub async fn create(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ShowForm>,
) -> Result<(StatusCode, Json<ShowRecord>), ApiError> {
    let service = ShowService::new(app_state.db.clone());
    let created = service.create(form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
