mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod state;
mod validation;

use config::ServerConfig;
use ntex::web;
use ntex_cors::Cors;
use state::AppState;
use std::sync::Arc;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState::new(&config).map_err(std::io::Error::other)?);

    log::info!(
        "Surf heat server starting on {}:{} (rules: {}, {} waves, {} interference codes)",
        config.host,
        config.port,
        config.rules.name,
        config.rules.wave_capacity,
        config.rules.code_count()
    );

    web::HttpServer::new(move || {
        web::App::new()
            .state(state.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .route("/api/health", web::get().to(health))
            // Heat
            .route("/api/heat", web::get().to(handlers::heat::get_heat))
            .route("/api/heat/metadata", web::post().to(handlers::heat::update_metadata))
            .route("/api/heat/surfers", web::post().to(handlers::heat::update_surfers))
            .route("/api/heat/timer", web::post().to(handlers::heat::start_timer))
            .route("/api/heat/score", web::post().to(handlers::heat::update_score))
            .route("/api/heat/interference", web::post().to(handlers::heat::update_interference))
            .route("/api/heat/interference/wave", web::post().to(handlers::heat::mark_interference_wave))
            .service(
                web::resource("/api/heat/priority")
                    .route(web::get().to(handlers::heat::get_priority))
                    .route(web::post().to(handlers::heat::grant_priority)),
            )
            .route("/api/heat/rankings", web::get().to(handlers::heat::get_rankings))
            .route("/api/heat/close", web::post().to(handlers::heat::close_heat))
            .route("/api/heat/reopen", web::post().to(handlers::heat::reopen_heat))
            .route("/api/heat/reset", web::post().to(handlers::heat::reset_heat))
            // Session tracker
            .route("/api/session", web::get().to(handlers::session::get_session_tracker))
            // Exports
            .route("/api/export/heat.csv", web::get().to(handlers::export::export_heat_csv))
            .route("/api/export/session.csv", web::get().to(handlers::export::export_session_csv))
    })
    .bind(format!("{}:{}", config.host, config.port))?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::heat::{MetadataUpdate, Score, SurferDetails, SurfersUpdate};
    use models::rules::RuleSet;
    use models::session::GoalStatus;

    fn test_state() -> AppState {
        let config = ServerConfig::from_lookup(|_| None);
        AppState::new(&config).expect("in-memory state")
    }

    fn name_surfers(state: &AppState, names: &[(&str, &str, f64)]) {
        let update: SurfersUpdate = names
            .iter()
            .map(|(color, name, goal)| {
                (
                    color.to_string(),
                    SurferDetails {
                        name: name.to_string(),
                        goal: *goal,
                    },
                )
            })
            .collect();
        state.heat.update_surfers(update).unwrap();
    }

    fn score(state: &AppState, surfer: usize, wave: usize, value: f64) {
        state
            .heat
            .set_wave(surfer, wave, Some(Score::new(value).unwrap()))
            .unwrap();
    }

    #[test]
    fn test_db_open_in_memory() {
        let db = db::Db::open_in_memory().expect("Failed to open in-memory DB");
        db.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='session_heats'",
                [],
                |row| row.get(0),
            )?;
            assert_eq!(count, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_score_heat_and_rank() {
        let state = test_state();
        score(&state, 0, 0, 8.5);
        score(&state, 0, 1, 6.0);
        score(&state, 1, 0, 9.0);
        score(&state, 1, 3, 7.0);
        state.heat.set_interference(1, 1).unwrap();

        let rankings = state.heat.rankings();
        assert_eq!(rankings.len(), 5);
        assert_eq!((rankings[0].color.as_str(), rankings[0].total.value()), ("Red", 14.5));
        assert_eq!((rankings[1].color.as_str(), rankings[1].total.value()), ("Yellow", 12.5));
    }

    #[test]
    fn test_rejected_score_does_not_mutate() {
        let state = test_state();
        score(&state, 2, 0, 5.0);
        let bad = validation::parse_score(Some(&models::heat::ScoreInput::Number(11.0)));
        assert!(bad.is_err());
        assert_eq!(state.heat.rankings()[0].total.value(), 5.0);
    }

    #[test]
    fn test_close_heats_into_session_history() {
        let state = test_state();
        name_surfers(&state, &[("red", "Kai", 15.0)]);

        score(&state, 0, 0, 8.5);
        score(&state, 0, 1, 6.0);
        let results = state.heat.close(&state.history).unwrap();
        assert_eq!(results[0].total.value(), 14.5);
        assert!(state.heat.view(Utc::now()).metadata.is_closed);

        state.heat.reset();
        score(&state, 0, 0, 9.0);
        score(&state, 0, 1, 7.0);
        state.heat.close(&state.history).unwrap();

        let records = services::session::records(&state.history).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].heats, vec![14.5, 16.0]);
        assert_eq!(records[0].best, 16.0);
        assert_eq!(records[0].average, 15.25);
        assert_eq!(records[0].status, GoalStatus::AboveGoal);
    }

    #[test]
    fn test_double_close_commits_once() {
        let state = test_state();
        name_surfers(&state, &[("blue", "Lea", 0.0)]);
        score(&state, 4, 0, 4.0);

        state.heat.close(&state.history).unwrap();
        state.heat.close(&state.history).unwrap();

        let records = services::session::records(&state.history).unwrap();
        assert_eq!(records[0].heats, vec![4.0]);
    }

    #[test]
    fn test_reopen_and_correct_updates_history() {
        let state = test_state();
        name_surfers(&state, &[("black", "Mo", 12.0)]);
        score(&state, 2, 0, 6.0);
        state.heat.close(&state.history).unwrap();

        state.heat.reopen();
        score(&state, 2, 1, 6.0);
        state.heat.close(&state.history).unwrap();

        let records = services::session::records(&state.history).unwrap();
        assert_eq!(records[0].heats, vec![12.0]);
        assert_eq!(records[0].status, GoalStatus::GoalHit);
    }

    #[test]
    fn test_rename_before_reclose_replaces_history_row() {
        let state = test_state();
        name_surfers(&state, &[("red", "Kai", 0.0), ("yellow", "Ana", 0.0)]);
        score(&state, 0, 0, 7.0);
        score(&state, 1, 0, 5.0);
        state.heat.close(&state.history).unwrap();

        state.heat.reopen();
        name_surfers(&state, &[("red", "Kaiden", 0.0), ("yellow", "", 0.0)]);
        state.heat.close(&state.history).unwrap();

        let records = services::session::records(&state.history).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Kaiden"]);
        assert_eq!(records[0].heats, vec![7.0]);
    }

    #[test]
    fn test_reset_leaves_history_and_lineup() {
        let state = test_state();
        name_surfers(&state, &[("white", "Ana", 10.0)]);
        score(&state, 3, 0, 3.0);
        state.heat.close(&state.history).unwrap();
        state.heat.grant_priority(3).unwrap();

        state.heat.reset();

        let view = state.heat.view(Utc::now());
        assert!(!view.metadata.is_closed);
        assert_eq!(view.surfers[3].surfer.name, "Ana");
        assert!(view.rankings.iter().all(|r| r.total.value() == 0.0));
        assert_eq!(
            view.rankings.iter().map(|r| r.position).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert_eq!(services::session::records(&state.history).unwrap()[0].heats, vec![3.0]);
    }

    #[test]
    fn test_priority_progression() {
        let state = test_state();
        state.heat.grant_priority(4).unwrap();
        state.heat.grant_priority(1).unwrap();
        let order = state.heat.grant_priority(4).unwrap();
        let idx: Vec<usize> = order.iter().map(|e| e.idx).collect();
        assert_eq!(idx, vec![0, 2, 3, 1, 4]);
        assert_eq!(state.heat.priority(), order);
    }

    #[test]
    fn test_heat_export_uses_metadata() {
        let state = test_state();
        state
            .heat
            .update_metadata(MetadataUpdate {
                heat_number: Some("3".into()),
                category: Some("Under 16".into()),
                ..Default::default()
            })
            .unwrap();
        let view = state.heat.view(Utc::now());
        assert_eq!(services::export::heat_filename(&view.metadata), "Under16_H3.csv");
    }

    #[test]
    fn test_classic_rules_state() {
        let config = ServerConfig::from_lookup(|key| (key == "SURF_RULESET").then(|| "classic".to_string()));
        let state = AppState::new(&config).unwrap();
        assert_eq!(state.heat.rules(), &RuleSet::classic());
        assert!(state.heat.set_interference(0, 3).is_err());
        assert!(state.heat.set_wave(0, 12, None).is_err());
    }
}
