use crate::config::ServerConfig;
use crate::db::Db;
use crate::services::heat::HeatStore;

/// Everything request handlers share. Built once at start-up.
pub struct AppState {
    pub heat: HeatStore,
    pub history: Db,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self, rusqlite::Error> {
        Ok(AppState {
            heat: HeatStore::new(config.rules.clone(), config.heat_minutes),
            history: Db::open_in_memory()?,
        })
    }
}
