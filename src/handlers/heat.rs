use crate::error::AppError;
use crate::models::heat::*;
use crate::state::AppState;
use crate::validation;
use chrono::Utc;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn get_heat(state: web::types::State<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(&state.heat.view(Utc::now()))
}

pub async fn update_metadata(
    state: web::types::State<Arc<AppState>>,
    body: web::types::Json<MetadataUpdate>,
) -> Result<HttpResponse, AppError> {
    state.heat.update_metadata(body.into_inner())?;
    Ok(HttpResponse::Ok().json(&Ack::ok()))
}

pub async fn update_surfers(
    state: web::types::State<Arc<AppState>>,
    body: web::types::Json<SurfersUpdate>,
) -> Result<HttpResponse, AppError> {
    state.heat.update_surfers(body.into_inner())?;
    Ok(HttpResponse::Ok().json(&Ack::ok()))
}

pub async fn start_timer(state: web::types::State<Arc<AppState>>) -> HttpResponse {
    let start_time = state.heat.start_timer(Utc::now());
    HttpResponse::Ok().json(&TimerStarted { start_time })
}

pub async fn update_score(
    state: web::types::State<Arc<AppState>>,
    body: web::types::Json<ScoreUpdate>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let score = validation::parse_score(req.score.as_ref())?;
    let rankings = state.heat.set_wave(req.surfer_idx, req.wave_idx, score)?;
    Ok(HttpResponse::Ok().json(&RankingsResponse { rankings }))
}

pub async fn update_interference(
    state: web::types::State<Arc<AppState>>,
    body: web::types::Json<InterferenceUpdate>,
) -> Result<HttpResponse, AppError> {
    let result = match body.code {
        Some(code) => state.heat.set_interference(body.surfer_idx, code)?,
        None => state.heat.cycle_interference(body.surfer_idx)?,
    };
    Ok(HttpResponse::Ok().json(&result))
}

pub async fn mark_interference_wave(
    state: web::types::State<Arc<AppState>>,
    body: web::types::Json<WaveMark>,
) -> Result<HttpResponse, AppError> {
    let interference_waves = state.heat.toggle_wave_mark(body.surfer_idx, body.wave_idx)?;
    Ok(HttpResponse::Ok().json(&WaveMarkResult { interference_waves }))
}

pub async fn get_priority(state: web::types::State<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(&PriorityResponse {
        priority_order: state.heat.priority(),
    })
}

pub async fn grant_priority(
    state: web::types::State<Arc<AppState>>,
    body: web::types::Json<PriorityGrant>,
) -> Result<HttpResponse, AppError> {
    let priority_order = state.heat.grant_priority(body.surfer_idx)?;
    Ok(HttpResponse::Ok().json(&PriorityResponse { priority_order }))
}

pub async fn get_rankings(state: web::types::State<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(&RankingsResponse {
        rankings: state.heat.rankings(),
    })
}

pub async fn close_heat(state: web::types::State<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let rankings = state.heat.close(&state.history)?;
    Ok(HttpResponse::Ok().json(&RankingsResponse { rankings }))
}

pub async fn reopen_heat(state: web::types::State<Arc<AppState>>) -> HttpResponse {
    state.heat.reopen();
    HttpResponse::Ok().json(&Ack::ok())
}

pub async fn reset_heat(state: web::types::State<Arc<AppState>>) -> HttpResponse {
    state.heat.reset();
    HttpResponse::Ok().json(&Ack::ok())
}
