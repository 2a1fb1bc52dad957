use crate::error::AppError;
use crate::services::{export as service, session};
use crate::state::AppState;
use chrono::Utc;
use ntex::http::header;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

fn csv_download(filename: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
}

pub async fn export_heat_csv(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let view = state.heat.view(Utc::now());
    let surfers: Vec<_> = view.surfers.into_iter().map(|s| s.surfer).collect();
    let body = service::heat_csv(
        &view.metadata,
        &surfers,
        &view.rankings,
        state.heat.rules().wave_capacity,
    )?;
    Ok(csv_download(&service::heat_filename(&view.metadata), body))
}

pub async fn export_session_csv(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let records = session::records(&state.history)?;
    let body = service::session_csv(&records, now)?;
    Ok(csv_download(&service::session_filename(now), body))
}
