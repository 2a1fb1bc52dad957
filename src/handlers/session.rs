use crate::error::AppError;
use crate::models::session::SessionTracker;
use crate::services::session as service;
use crate::state::AppState;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn get_session_tracker(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let tracker = service::records(&state.history)?;
    Ok(HttpResponse::Ok().json(&SessionTracker { tracker }))
}
